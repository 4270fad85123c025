use async_trait::async_trait;

use crate::contract::{
    error::UsersInfoError,
    model::{ImageUpload, NewUser, User, UserPatch},
};

/// Public API trait for the users_info module that other modules can use
#[async_trait]
pub trait UsersInfoApi: Send + Sync {
    /// Get a user by ID
    async fn get_user(&self, id: &str) -> Result<User, UsersInfoError>;

    /// All users, newest first
    async fn list_users(&self) -> Result<Vec<User>, UsersInfoError>;

    /// Create a new user, optionally with an uploaded photo
    async fn create_user(
        &self,
        new_user: NewUser,
        upload: Option<ImageUpload>,
    ) -> Result<User, UsersInfoError>;

    /// Update a user; a new photo replaces the old one
    async fn update_user(
        &self,
        id: &str,
        patch: UserPatch,
        upload: Option<ImageUpload>,
    ) -> Result<User, UsersInfoError>;

    /// Delete a user and its photo
    async fn delete_user(&self, id: &str) -> Result<(), UsersInfoError>;
}
