use std::time::Duration;

use thiserror::Error;

use crate::gateway::StreamError;

/// Per-asset download failures.
///
/// None of these abort a batch: the engine records them as a failed
/// outcome, logs them and moves on after the cooldown.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Timed out after {}s opening stream for {filename}", timeout.as_secs_f64())]
    StreamTimeout { filename: String, timeout: Duration },

    #[error("Failed to open stream for {filename}: {source}")]
    StreamOpen {
        filename: String,
        source: StreamError,
    },

    #[error("Stream for {filename} broke after {bytes_written} bytes: {source}")]
    Transfer {
        filename: String,
        bytes_written: u64,
        source: StreamError,
    },

    #[error("Failed to write {filename}: {source}")]
    Write {
        filename: String,
        source: std::io::Error,
    },

    #[error("Invalid filename {filename:?}: not a single path component")]
    InvalidFilename { filename: String },
}

impl DownloadError {
    /// The remote filename this failure belongs to.
    pub fn filename(&self) -> &str {
        match self {
            DownloadError::StreamTimeout { filename, .. }
            | DownloadError::StreamOpen { filename, .. }
            | DownloadError::Transfer { filename, .. }
            | DownloadError::Write { filename, .. }
            | DownloadError::InvalidFilename { filename } => filename,
        }
    }

    /// What went wrong, without the filename the `Display` form repeats.
    pub fn cause(&self) -> String {
        match self {
            DownloadError::StreamTimeout { timeout, .. } => {
                format!("timed out after {}s opening stream", timeout.as_secs_f64())
            }
            DownloadError::StreamOpen { source, .. } => source.to_string(),
            DownloadError::Transfer {
                bytes_written,
                source,
                ..
            } => format!("stream broke after {} bytes: {}", bytes_written, source),
            DownloadError::Write { source, .. } => source.to_string(),
            DownloadError::InvalidFilename { .. } => "not a single path component".to_string(),
        }
    }

    /// Coarse failure class used in log lines and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            DownloadError::StreamTimeout { .. } => "stream-acquisition-timeout",
            DownloadError::StreamOpen { .. } | DownloadError::Transfer { .. } => "stream-failure",
            DownloadError::Write { .. } => "write-failure",
            DownloadError::InvalidFilename { .. } => "classification-edge-case",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_file() {
        let e = DownloadError::StreamTimeout {
            filename: "IMG_0001.JPG".into(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(e.filename(), "IMG_0001.JPG");
        assert_eq!(e.kind(), "stream-acquisition-timeout");
        assert!(e.to_string().contains("IMG_0001.JPG"));
        assert!(e.to_string().contains("30s"));
    }

    #[test]
    fn test_write_failure_carries_cause() {
        let e = DownloadError::Write {
            filename: "clip.mov".into(),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(e.kind(), "write-failure");
        assert!(e.to_string().contains("disk full"));
    }

    #[test]
    fn test_invalid_filename_kind() {
        let e = DownloadError::InvalidFilename {
            filename: String::new(),
        };
        assert_eq!(e.filename(), "");
        assert_eq!(e.kind(), "classification-edge-case");
    }

    #[test]
    fn test_transfer_reports_progress() {
        let e = DownloadError::Transfer {
            filename: "a.jpg".into(),
            bytes_written: 2048,
            source: StreamError::Other("connection reset".into()),
        };
        assert_eq!(e.kind(), "stream-failure");
        assert!(e.to_string().contains("2048 bytes"));
        assert!(e.to_string().contains("connection reset"));
    }

    #[test]
    fn test_cause_omits_filename() {
        let e = DownloadError::StreamOpen {
            filename: "gone.mov".into(),
            source: StreamError::HttpStatus { status: 404 },
        };
        assert_eq!(e.cause(), "HTTP error 404");

        let e = DownloadError::Transfer {
            filename: "a.jpg".into(),
            bytes_written: 4,
            source: StreamError::Other("connection reset".into()),
        };
        assert_eq!(e.cause(), "stream broke after 4 bytes: connection reset");
        assert!(!e.cause().contains("a.jpg"));
    }
}
