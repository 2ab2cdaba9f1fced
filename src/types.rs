use crate::download::classify::AssetCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Which media categories a run downloads. Chosen once, fixed for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TypeFilter {
    #[value(name = "photos")]
    PhotosOnly,
    #[value(name = "videos")]
    VideosOnly,
    Both,
}

impl TypeFilter {
    pub fn admits(&self, category: AssetCategory) -> bool {
        match self {
            TypeFilter::PhotosOnly => category == AssetCategory::Photo,
            TypeFilter::VideosOnly => category == AssetCategory::Video,
            TypeFilter::Both => true,
        }
    }

    /// Parse an interactive answer. Accepts the German and English
    /// shorthands (`f`/`p`, `v`, `beide`/`both`) case-insensitively.
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "f" | "p" | "foto" | "fotos" | "photo" | "photos" => Some(TypeFilter::PhotosOnly),
            "v" | "video" | "videos" => Some(TypeFilter::VideosOnly),
            "b" | "beide" | "both" => Some(TypeFilter::Both),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    De,
    En,
}
