use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::User;

/// Why the persisted collection could not be read.
#[derive(Error, Debug)]
pub enum StoreReadError {
    #[error("user store '{location}' does not exist")]
    Missing { location: String },

    #[error("user store '{location}' could not be read: {message}")]
    Unreadable { location: String, message: String },

    #[error("user store '{location}' is corrupt: {message}")]
    Corrupt { location: String, message: String },
}

#[derive(Error, Debug)]
#[error("user store '{location}' could not be written: {message}")]
pub struct StoreWriteError {
    pub location: String,
    pub message: String,
}

/// Port for the domain layer: the whole-collection record store.
///
/// Every call reads or rewrites the entire collection; there is no indexing
/// and no partial update, so the practical ceiling is a few thousand users.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Every persisted user, newest-created first.
    async fn load(&self) -> Result<Vec<User>, StoreReadError>;
    /// Replace the persisted collection with `users`.
    ///
    /// The store sorts by `created_at` descending before writing.
    async fn save(&self, users: Vec<User>) -> Result<(), StoreWriteError>;
}
