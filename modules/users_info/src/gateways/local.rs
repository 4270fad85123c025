use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::UsersInfoApi,
    error::UsersInfoError,
    model::{ImageUpload, NewUser, User, UserPatch},
};
use crate::domain::service::Service;

/// Local implementation of the UsersInfoApi trait that delegates to the domain service
pub struct UsersInfoLocalClient {
    service: Arc<Service>,
}

impl UsersInfoLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersInfoApi for UsersInfoLocalClient {
    async fn get_user(&self, id: &str) -> Result<User, UsersInfoError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn list_users(&self) -> Result<Vec<User>, UsersInfoError> {
        Ok(self.service.list_users().await)
    }

    async fn create_user(
        &self,
        new_user: NewUser,
        upload: Option<ImageUpload>,
    ) -> Result<User, UsersInfoError> {
        self.service
            .create_user(new_user, upload)
            .await
            .map_err(Into::into)
    }

    async fn update_user(
        &self,
        id: &str,
        patch: UserPatch,
        upload: Option<ImageUpload>,
    ) -> Result<User, UsersInfoError> {
        self.service
            .update_user(id, patch, upload)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: &str) -> Result<(), UsersInfoError> {
        self.service.delete_user(id).await.map_err(Into::into)
    }
}
