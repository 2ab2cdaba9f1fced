//! Extension-based photo/video classification.

/// Extensions routed to the photo folder. Everything else is a video.
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    Photo,
    Video,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Photo => "photo",
            AssetCategory::Video => "video",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a remote filename by its extension.
///
/// Total and deterministic: a missing or unrecognised extension (including
/// non-media sidecars such as `.aae`) classifies as [`AssetCategory::Video`].
pub fn classify(filename: &str) -> AssetCategory {
    let is_photo = file_extension(filename).is_some_and(|ext| {
        PHOTO_EXTENSIONS
            .iter()
            .any(|photo| ext.eq_ignore_ascii_case(photo))
    });
    if is_photo {
        AssetCategory::Photo
    } else {
        AssetCategory::Video
    }
}

/// Extension of the final path component, without the dot.
///
/// A leading dot does not start an extension, so `".jpg"` has none.
fn file_extension(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let trimmed = name.trim_start_matches('.');
    let dot = trimmed.rfind('.')?;
    Some(&trimmed[dot + 1..])
}
