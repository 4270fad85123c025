use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("failed to write image '{path}': {message}")]
pub struct ImageWriteError {
    pub path: String,
    pub message: String,
}

#[derive(Error, Debug)]
#[error("failed to remove image '{path}': {message}")]
pub struct ImageRemoveError {
    pub path: String,
    pub message: String,
}

/// Output port: binary photo storage keyed by generated file names.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under a fresh name that keeps the extension of
    /// `original_filename`; returns the relative path to record.
    async fn put(&self, bytes: &[u8], original_filename: &str) -> Result<String, ImageWriteError>;

    /// Delete a previously stored image. `Ok(false)` when there was nothing
    /// to delete (already gone, or not a path this store manages).
    async fn remove(&self, path: &str) -> Result<bool, ImageRemoveError>;
}
