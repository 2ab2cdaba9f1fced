use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use super::classify::AssetCategory;
use super::error::DownloadError;

pub const PHOTOS_FOLDER: &str = "Fotos";
pub const VIDEOS_FOLDER: &str = "Videos";

/// The two category folders under the operator's root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationLayout {
    pub photos: PathBuf,
    pub videos: PathBuf,
}

impl DestinationLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            photos: root.join(PHOTOS_FOLDER),
            videos: root.join(VIDEOS_FOLDER),
        }
    }

    pub fn folder(&self, category: AssetCategory) -> &Path {
        match category {
            AssetCategory::Photo => &self.photos,
            AssetCategory::Video => &self.videos,
        }
    }

    /// Join the category folder with the remote filename, verbatim.
    ///
    /// Two remote assets with the same filename resolve to the same path.
    /// Names that are not exactly one normal path component (empty, `.`,
    /// `..`, or containing a separator) are rejected.
    pub fn resolve(
        &self,
        category: AssetCategory,
        filename: &str,
    ) -> Result<PathBuf, DownloadError> {
        if !is_single_component(filename) {
            return Err(DownloadError::InvalidFilename {
                filename: filename.to_string(),
            });
        }
        Ok(self.folder(category).join(filename))
    }
}

fn is_single_component(filename: &str) -> bool {
    if filename.is_empty() || filename.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Create both category folders if missing. Idempotent.
pub fn prepare_directories(root: &Path) -> std::io::Result<DestinationLayout> {
    let layout = DestinationLayout::new(root);
    std::fs::create_dir_all(&layout.photos)?;
    std::fs::create_dir_all(&layout.videos)?;
    Ok(layout)
}

/// Whether something already sits at `path`. Existence alone counts as
/// "already downloaded"; size and content are not inspected.
pub fn destination_exists(path: &Path) -> bool {
    path.exists()
}

/// Destination paths currently claimed by a worker.
///
/// Only used with more than one concurrent download so two workers never
/// create the same file.
#[derive(Debug, Default)]
pub struct PathReservations {
    claimed: Mutex<HashSet<PathBuf>>,
}

impl PathReservations {
    /// Claim `path`. `None` if another worker already holds it.
    pub fn reserve(&self, path: &Path) -> Option<Reservation<'_>> {
        let mut claimed = self.claimed.lock().unwrap_or_else(|e| e.into_inner());
        if claimed.insert(path.to_path_buf()) {
            Some(Reservation {
                owner: self,
                path: path.to_path_buf(),
            })
        } else {
            None
        }
    }

    fn release(&self, path: &Path) {
        let mut claimed = self.claimed.lock().unwrap_or_else(|e| e.into_inner());
        claimed.remove(path);
    }
}

/// Releases its path when dropped.
#[derive(Debug)]
pub struct Reservation<'a> {
    owner: &'a PathReservations,
    path: PathBuf,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.owner.release(&self.path);
    }
}
