use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{ImageRemoveError, ImageStore, ImageWriteError};

/// Photos stored as `<uuid>.<ext>` inside a single directory.
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Only bare file names are ours; URLs, absolute paths and anything with
    /// separators are references to images this store never wrote.
    fn managed_path(&self, path: &str) -> Option<PathBuf> {
        let mut components = Path::new(path).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(self.dir.join(name)),
            _ => None,
        }
    }
}

/// Lowercased extension of `original`, kept only when purely alphanumeric.
fn extension_of(original: &str) -> Option<String> {
    Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn put(&self, bytes: &[u8], original_filename: &str) -> Result<String, ImageWriteError> {
        let id = Uuid::new_v4().simple().to_string();
        let file_name = match extension_of(original_filename) {
            Some(ext) => format!("{id}.{ext}"),
            None => id,
        };
        let target = self.dir.join(&file_name);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ImageWriteError {
                path: self.dir.display().to_string(),
                message: format!("failed to create image directory: {e}"),
            })?;

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| ImageWriteError {
                path: target.display().to_string(),
                message: e.to_string(),
            })?;

        info!(img_path = %file_name, size = bytes.len(), "Stored image");
        Ok(file_name)
    }

    async fn remove(&self, path: &str) -> Result<bool, ImageRemoveError> {
        let Some(target) = self.managed_path(path) else {
            debug!(img_path = %path, "Not a managed image, skipping removal");
            return Ok(false);
        };

        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                info!(img_path = %path, "Removed image");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(img_path = %path, "Image already gone");
                Ok(false)
            }
            Err(e) => Err(ImageRemoveError {
                path: target.display().to_string(),
                message: e.to_string(),
            }),
        }
    }
}
