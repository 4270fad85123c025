use thiserror::Error;

use crate::domain::ports::ImageWriteError;
use crate::domain::repo::StoreWriteError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Failed to persist users: {message}")]
    StoreWrite { message: String },

    #[error("Failed to store image: {message}")]
    ImageWrite { message: String },
}

impl DomainError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn store_write(message: impl Into<String>) -> Self {
        Self::StoreWrite {
            message: message.into(),
        }
    }

    pub fn image_write(message: impl Into<String>) -> Self {
        Self::ImageWrite {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound { .. })
    }
}

impl From<StoreWriteError> for DomainError {
    fn from(e: StoreWriteError) -> Self {
        Self::store_write(e.to_string())
    }
}

impl From<ImageWriteError> for DomainError {
    fn from(e: ImageWriteError) -> Self {
        Self::image_write(e.to_string())
    }
}
