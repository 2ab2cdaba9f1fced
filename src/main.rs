//! icloud-media-dl: bulk download of an iCloud media library.
//!
//! Signs in (with an optional verification code), enumerates every asset
//! once and streams each one into `Fotos/` or `Videos/` under the chosen
//! directory. Files already present are skipped, so an interrupted run can
//! simply be started again. Pressing `P` pauses and resumes the transfer.

#![warn(clippy::all)]

mod auth;
mod cli;
mod config;
mod download;
mod gateway;
mod logging;
mod messages;
mod pause;
mod prompt;
mod types;

use clap::Parser;

use download::file::DownloadOptions;
use download::{DownloadConfig, DEFAULT_FAILURE_COOLDOWN};
use gateway::error::AuthError;
use gateway::http::HttpGateway;
use gateway::Credentials;
use messages::Messages;
use pause::PauseController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::Config::from_cli(cli)?;
    let messages = messages::for_language(config.language);

    if let Err(e) = run(config, messages).await {
        println!("{}", messages.unexpected_error);
        tracing::error!(target: logging::FATAL_TARGET, "An unexpected error occurred: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(config: config::Config, messages: &'static Messages) -> anyhow::Result<()> {
    println!("{}", messages.banner);
    println!("{}", messages.pause_hint);

    let identity = match config.username.clone() {
        Some(u) => u,
        None => prompt::ask_required(messages.prompt_identity)?,
    };
    let secret = match config.password.clone() {
        Some(p) => p,
        None => prompt::ask_secret(messages.prompt_secret)?,
    };
    let directory = match config.directory.clone() {
        Some(d) => d,
        None => config::expand_tilde(&prompt::ask_required(messages.prompt_directory)?),
    };

    std::fs::create_dir_all(&directory)?;
    logging::init(&directory.join(messages.log_file_name), config.log_level)?;
    tracing::info!("Starting download service");
    tracing::debug!("Configuration: {:?}", config);

    let layout = download::paths::prepare_directories(&directory)?;

    let gateway = HttpGateway::new(&config.service_url)?;
    let credentials = Credentials { identity, secret };
    let code_provider = move || {
        println!("{}", messages.second_factor_required);
        prompt::ask(messages.prompt_second_factor)
    };

    let session = match auth::authenticate(&gateway, &credentials, code_provider).await {
        Ok(session) => session,
        Err(e) => exit_on_auth_failure(&e, messages),
    };

    let filter = match config.media {
        Some(filter) => filter,
        None => prompt::ask_type_filter(messages)?,
    };
    tracing::info!("Downloading {:?}", filter);

    let pause = PauseController::new();
    pause::spawn_key_listener(pause.clone(), messages);

    let download_config = DownloadConfig {
        layout,
        filter,
        options: DownloadOptions::default(),
        failure_cooldown: DEFAULT_FAILURE_COOLDOWN,
        concurrent_downloads: config.concurrency,
        no_progress_bar: config.no_progress_bar,
        progress_label: messages.progress_label,
    };

    let summary = download::download_assets(session.as_ref(), &download_config, &pause).await?;

    println!("{}", messages.finished);
    if summary.failed > 0 {
        println!("{} / {}", summary.total - summary.failed, summary.total);
    }
    Ok(())
}

/// Report a failed sign-in to the operator and the log, then end the process.
fn exit_on_auth_failure(error: &AuthError, messages: &Messages) -> ! {
    if error.is_bad_credentials() {
        println!("{}", messages.login_failed);
        tracing::error!("Failed login: {}", error);
    } else if matches!(error, AuthError::SecondFactorRejected) {
        println!("{}", messages.second_factor_invalid);
        tracing::error!("Invalid verification code.");
    } else {
        println!("{}", messages.auth_problem);
        tracing::error!("A problem occurred with iCloud authentication: {}", error);
    }
    std::process::exit(1)
}
