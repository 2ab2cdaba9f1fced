//! Download engine: enumerates the remote library once, then walks it
//! asset by asset: wait out a pause, classify, filter, resolve, skip if the
//! destination exists, otherwise stream the file. A failed asset is logged,
//! followed by a cooldown, and never aborts the batch.

pub mod classify;
pub mod error;
pub mod file;
pub mod paths;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};

use self::classify::classify;
use self::error::DownloadError;
use self::file::DownloadOptions;
use self::paths::{destination_exists, DestinationLayout, PathReservations};
use crate::gateway::{GatewayError, RemoteAsset, Session};
use crate::pause::PauseController;
use crate::types::TypeFilter;

pub const DEFAULT_FAILURE_COOLDOWN: Duration = Duration::from_secs(5);

/// Subset of application config consumed by the download engine.
/// Decoupled from prompting and CLI parsing so the engine can be tested
/// independently.
#[derive(Debug)]
pub struct DownloadConfig {
    pub(crate) layout: DestinationLayout,
    pub(crate) filter: TypeFilter,
    pub(crate) options: DownloadOptions,
    pub(crate) failure_cooldown: Duration,
    pub(crate) concurrent_downloads: usize,
    pub(crate) no_progress_bar: bool,
    pub(crate) progress_label: &'static str,
}

/// What happened to one enumerated asset. Exactly one per asset per run.
#[derive(Debug)]
pub enum DownloadOutcome {
    Downloaded(PathBuf),
    SkippedExisting(PathBuf),
    SkippedFiltered,
    Failed(DownloadError),
}

/// Running tally of a batch, for reporting only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub processed: usize,
    pub downloaded: usize,
    pub skipped_existing: usize,
    pub skipped_filtered: usize,
    pub failed: usize,
    pub failed_files: Vec<String>,
}

impl BatchSummary {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: &DownloadOutcome) {
        self.processed += 1;
        match outcome {
            DownloadOutcome::Downloaded(_) => self.downloaded += 1,
            DownloadOutcome::SkippedExisting(_) => self.skipped_existing += 1,
            DownloadOutcome::SkippedFiltered => self.skipped_filtered += 1,
            DownloadOutcome::Failed(e) => {
                self.failed += 1;
                self.failed_files.push(e.filename().to_string());
            }
        }
    }
}

/// Create a progress bar with a consistent template.
///
/// Returns `ProgressBar::hidden()` when the user passed `--no-progress-bar`
/// or stdout is not a TTY, so piped output is not corrupted.
fn create_progress_bar(no_progress_bar: bool, total: u64, label: &'static str) -> ProgressBar {
    if no_progress_bar || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .expect("valid template")
        .progress_chars("=> "),
    );
    pb.set_prefix(label);
    pb
}

/// Entry point for the download engine.
///
/// Only a failure to enumerate the library is returned as an error; every
/// per-asset problem is folded into the summary.
pub async fn download_assets(
    session: &dyn Session,
    config: &DownloadConfig,
    pause: &PauseController,
) -> Result<BatchSummary, GatewayError> {
    let started = Instant::now();

    let assets = session.list_assets().await?;
    tracing::info!("Retrieved {} files.", assets.len());

    let summary = process_assets(&assets, config, pause).await;

    tracing::info!("── Summary ──");
    tracing::info!(
        "  {} downloaded, {} already present, {} filtered out, {} failed, {} of {} processed",
        summary.downloaded,
        summary.skipped_existing,
        summary.skipped_filtered,
        summary.failed,
        summary.processed,
        summary.total,
    );
    tracing::info!("  elapsed: {}", format_duration(started.elapsed()));
    for filename in &summary.failed_files {
        tracing::error!("Download failed: {}", filename);
    }

    Ok(summary)
}

/// Walk every asset in enumeration order with at most
/// `concurrent_downloads` in flight (one by default).
async fn process_assets(
    assets: &[Arc<dyn RemoteAsset>],
    config: &DownloadConfig,
    pause: &PauseController,
) -> BatchSummary {
    let total = assets.len();
    let pb = create_progress_bar(config.no_progress_bar, total as u64, config.progress_label);
    let reservations = PathReservations::default();
    let mut summary = BatchSummary::new(total);

    let pb_ref = &pb;
    let reservations_ref = &reservations;
    // Boxed as `dyn Stream + Send` to work around rustc's higher-ranked
    // lifetime inference when this runs inside a spawned task.
    let mut outcomes: std::pin::Pin<
        Box<dyn futures_util::Stream<Item = DownloadOutcome> + Send + '_>,
    > = Box::pin(
        stream::iter(assets.iter().cloned().enumerate())
            .map(move |(index, asset)| async move {
                process_asset(
                    index,
                    total,
                    asset.as_ref(),
                    config,
                    pause,
                    reservations_ref,
                    pb_ref,
                )
                .await
            })
            .buffer_unordered(config.concurrent_downloads.max(1)),
    );

    while let Some(outcome) = outcomes.next().await {
        summary.record(&outcome);
        pb.inc(1);
    }

    pb.finish_and_clear();
    summary
}

/// Run one asset through pause → classify → filter → resolve → existence
/// check → download.
async fn process_asset(
    index: usize,
    total: usize,
    asset: &dyn RemoteAsset,
    config: &DownloadConfig,
    pause: &PauseController,
    reservations: &PathReservations,
    pb: &ProgressBar,
) -> DownloadOutcome {
    let filename = asset.filename();

    if pause.is_paused() {
        pb.set_message("paused");
    }
    pause
        .wait_while_paused(config.options.pause_poll_interval)
        .await;
    pb.set_message(filename.to_string());

    let category = classify(filename);
    if !config.filter.admits(category) {
        tracing::debug!("Skipping {} ({}, filtered out)", filename, category);
        return DownloadOutcome::SkippedFiltered;
    }

    let download_path = match config.layout.resolve(category, filename) {
        Ok(path) => path,
        Err(e) => return fail(e, config.failure_cooldown, pb).await,
    };

    // Held until this asset is done so no other worker targets the path.
    let Some(_reservation) = reservations.reserve(&download_path) else {
        pb.suspend(|| {
            tracing::info!(
                "File {} is already being downloaded - skipping download.",
                filename
            )
        });
        return DownloadOutcome::SkippedExisting(download_path);
    };

    if destination_exists(&download_path) {
        pb.suspend(|| tracing::info!("File {} already exists - skipping download.", filename));
        return DownloadOutcome::SkippedExisting(download_path);
    }

    match file::download_file(asset, &download_path, pause, &config.options).await {
        Ok(bytes) => {
            pb.suspend(|| {
                tracing::info!(
                    "File {} of {} downloaded and saved as {}",
                    index + 1,
                    total,
                    download_path.display()
                );
                tracing::debug!("Wrote {} bytes for {}", bytes, filename)
            });
            DownloadOutcome::Downloaded(download_path)
        }
        Err(e) => fail(e, config.failure_cooldown, pb).await,
    }
}

/// Log a per-asset failure and observe the cooldown before moving on.
async fn fail(error: DownloadError, cooldown: Duration, pb: &ProgressBar) -> DownloadOutcome {
    pb.suspend(|| {
        tracing::error!(
            "An error occurred while downloading the file {}: {}",
            error.filename(),
            error.cause()
        );
        tracing::debug!("Failure class for {}: {}", error.filename(), error.kind())
    });
    tokio::time::sleep(cooldown).await;
    DownloadOutcome::Failed(error)
}

fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
