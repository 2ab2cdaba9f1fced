use crate::types::*;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "icloud-media-dl",
    about = "Download every photo and video from an iCloud media library"
)]
pub struct Cli {
    /// Account email address (prompted for when omitted)
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Account password (if not provided, will prompt).
    /// WARNING: passing via --password is visible in process listings.
    /// Prefer the ICLOUD_PASSWORD environment variable instead.
    #[arg(short = 'p', long, env = "ICLOUD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Root directory for downloads; photos land in Fotos/, videos in Videos/
    #[arg(short = 'd', long)]
    pub directory: Option<String>,

    /// Media to download (prompted for when omitted)
    #[arg(long, value_enum)]
    pub media: Option<TypeFilter>,

    /// Base URL of the media service API
    #[arg(long, env = "MEDIA_SERVICE_URL")]
    pub service_url: String,

    /// Language of prompts, messages and the log file name
    #[arg(long, value_enum, default_value = "de")]
    pub language: Language,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Number of files downloaded at the same time
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Disable progress bar
    #[arg(long)]
    pub no_progress_bar: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut full = vec!["icloud-media-dl", "--service-url", "https://media.example.com"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full)
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]).unwrap();
        assert!(cli.username.is_none());
        assert!(cli.directory.is_none());
        assert!(cli.media.is_none());
        assert_eq!(cli.language, Language::De);
        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(cli.concurrency, 1);
        assert!(!cli.no_progress_bar);
    }

    #[test]
    fn test_media_values() {
        assert_eq!(
            parse(&["--media", "photos"]).unwrap().media,
            Some(TypeFilter::PhotosOnly)
        );
        assert_eq!(
            parse(&["--media", "videos"]).unwrap().media,
            Some(TypeFilter::VideosOnly)
        );
        assert_eq!(
            parse(&["--media", "both"]).unwrap().media,
            Some(TypeFilter::Both)
        );
        assert!(parse(&["--media", "audio"]).is_err());
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&[
            "-u",
            "me@example.com",
            "-d",
            "/tmp/backup",
            "--language",
            "en",
        ])
        .unwrap();
        assert_eq!(cli.username.as_deref(), Some("me@example.com"));
        assert_eq!(cli.directory.as_deref(), Some("/tmp/backup"));
        assert_eq!(cli.language, Language::En);
    }
}
