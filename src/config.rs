use crate::types::{Language, LogLevel, TypeFilter};
use std::path::PathBuf;

/// Application configuration.
///
/// Values left unset here are asked for interactively at startup.
pub struct Config {
    pub username: Option<String>,
    pub password: Option<String>,
    pub directory: Option<PathBuf>,
    pub service_url: String,

    pub concurrency: usize,

    pub media: Option<TypeFilter>,
    pub language: Language,
    pub log_level: LogLevel,

    pub no_progress_bar: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("directory", &self.directory)
            .field("service_url", &self.service_url)
            .field("media", &self.media)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> anyhow::Result<Self> {
        if cli.concurrency == 0 {
            anyhow::bail!("--concurrency must be at least 1");
        }
        let service_url = cli.service_url.trim().to_string();
        if !(service_url.starts_with("http://") || service_url.starts_with("https://")) {
            anyhow::bail!(
                "--service-url must start with http:// or https://, got '{}'",
                service_url
            );
        }

        Ok(Self {
            username: cli.username.filter(|u| !u.trim().is_empty()),
            password: cli.password.filter(|p| !p.is_empty()),
            directory: cli
                .directory
                .filter(|d| !d.trim().is_empty())
                .map(|d| expand_tilde(d.trim())),
            service_url,
            concurrency: cli.concurrency,
            media: cli.media,
            language: cli.language,
            log_level: cli.log_level,
            no_progress_bar: cli.no_progress_bar,
        })
    }
}
