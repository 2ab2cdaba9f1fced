use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::error::DownloadError;
use crate::gateway::RemoteAsset;
use crate::pause::{PauseController, DEFAULT_POLL_INTERVAL};

pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
pub const DEFAULT_STREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Tuning for a single asset transfer.
#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    pub chunk_size: usize,
    pub stream_timeout: Duration,
    pub pause_poll_interval: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            stream_timeout: DEFAULT_STREAM_TIMEOUT,
            pause_poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Stream one asset into `download_path` in fixed-size chunks.
///
/// The destination is created exclusively and written in place: on failure
/// whatever was written stays on disk. Before every chunk write the
/// transfer waits while `pause` is set. Returns the number of bytes written.
pub async fn download_file(
    asset: &dyn RemoteAsset,
    download_path: &Path,
    pause: &PauseController,
    options: &DownloadOptions,
) -> Result<u64, DownloadError> {
    let filename = asset.filename();

    let opening = asset.open_stream(options.stream_timeout);
    let mut stream = tokio::time::timeout(options.stream_timeout, opening)
        .await
        .map_err(|_| DownloadError::StreamTimeout {
            filename: filename.to_string(),
            timeout: options.stream_timeout,
        })?
        .map_err(|source| DownloadError::StreamOpen {
            filename: filename.to_string(),
            source,
        })?;

    let write_err = |source: std::io::Error| DownloadError::Write {
        filename: filename.to_string(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(download_path)
        .await
        .map_err(write_err)?;

    let chunk_size = options.chunk_size.max(1);
    let mut chunk: Vec<u8> = Vec::with_capacity(chunk_size);
    let mut bytes_written: u64 = 0;

    while let Some(piece) = stream.next().await {
        let piece = piece.map_err(|source| DownloadError::Transfer {
            filename: filename.to_string(),
            bytes_written,
            source,
        })?;

        let mut rest = piece.as_slice();
        while !rest.is_empty() {
            let take = (chunk_size - chunk.len()).min(rest.len());
            chunk.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if chunk.len() == chunk_size {
                write_chunk(&mut file, &chunk, pause, options.pause_poll_interval)
                    .await
                    .map_err(write_err)?;
                bytes_written += chunk.len() as u64;
                chunk.clear();
            }
        }
    }

    if !chunk.is_empty() {
        write_chunk(&mut file, &chunk, pause, options.pause_poll_interval)
            .await
            .map_err(write_err)?;
        bytes_written += chunk.len() as u64;
    }

    file.sync_all().await.map_err(write_err)?;
    Ok(bytes_written)
}

async fn write_chunk(
    file: &mut File,
    chunk: &[u8],
    pause: &PauseController,
    poll_interval: Duration,
) -> std::io::Result<()> {
    pause.wait_while_paused(poll_interval).await;
    file.write_all(chunk).await?;
    file.flush().await
}
