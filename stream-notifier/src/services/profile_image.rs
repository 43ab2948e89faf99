//! Broadcaster profile image used as the dialog icon.
//!
//! The image is downloaded once per session and removed again during
//! cleanup. Only files written by this store are ever deleted.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

pub const DEFAULT_ICON_NAME: &str = "profile_image.png";
/// Used when the URL yields no name, or one that would shadow the bundled icon.
pub const DOWNLOADED_ICON_NAME: &str = "downloaded_profile_image.png";

pub struct ProfileImageStore {
    dir: PathBuf,
    saved: Mutex<Option<PathBuf>>,
}

impl ProfileImageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            saved: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Bundled fallback icon.
    pub fn default_icon(&self) -> PathBuf {
        self.dir.join(DEFAULT_ICON_NAME)
    }

    /// Write downloaded image bytes under the file name taken from `url`.
    pub async fn save(&self, url: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.dir.join(file_name_from_url(url));
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), "Saved profile image");
        *self.saved.lock().await = Some(path.clone());
        Ok(path)
    }

    pub async fn saved_path(&self) -> Option<PathBuf> {
        self.saved.lock().await.clone()
    }

    /// Delete the downloaded image, if any.
    pub async fn remove(&self) {
        let Some(path) = self.saved.lock().await.take() else {
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed profile image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove downloaded profile image: {e}"),
        }
    }
}

/// Last path segment of `url`. Never the bundled icon's name.
pub fn file_name_from_url(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .filter(|name| name != DEFAULT_ICON_NAME)
        .unwrap_or_else(|| DOWNLOADED_ICON_NAME.to_string())
}
