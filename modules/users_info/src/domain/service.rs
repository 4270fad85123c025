use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{ImageUpload, NewUser, Timestamp, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::ports::ImageStore;
use crate::domain::repo::{StoreReadError, UsersRepository};

/// Domain service coordinating the record store and the image store.
/// Depends only on the ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    images: Arc<dyn ImageStore>,
    config: ServiceConfig,
    // Serializes every load-modify-save cycle over the whole collection.
    write_lock: Arc<Mutex<()>>,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_image: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_image: "default-image.jpg".to_string(),
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn UsersRepository>,
        images: Arc<dyn ImageStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            images,
            config,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[instrument(name = "users_info.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Vec<User> {
        let users = self.load_snapshot().await;
        debug!("Listed {} users", users.len());
        users
    }

    #[instrument(name = "users_info.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &str) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.load_snapshot()
            .await
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(
        name = "users_info.service.create_user",
        skip(self, new_user, upload),
        fields(name = %new_user.name, has_upload = upload.is_some())
    )]
    pub async fn create_user(
        &self,
        new_user: NewUser,
        upload: Option<ImageUpload>,
    ) -> Result<User, DomainError> {
        info!("Creating new user");

        let _guard = self.write_lock.lock().await;
        let mut users = self.load_snapshot().await;

        let id = fresh_id(&users);
        let (image_path, stored) = match upload {
            Some(upload) => (
                self.images.put(&upload.bytes, &upload.file_name).await?,
                true,
            ),
            None => (
                new_user
                    .image
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or_else(|| self.config.default_image.clone()),
                false,
            ),
        };

        let user = User {
            id,
            name: new_user.name,
            age: new_user.age,
            city: new_user.city,
            image_path,
            created_at: now(),
            updated_at: Vec::new(),
        };
        users.push(user.clone());

        if let Err(e) = self.repo.save(users).await {
            if stored {
                self.discard_image(&user.image_path).await;
            }
            return Err(e.into());
        }

        info!(user_id = %user.id, img_path = %user.image_path, "Successfully created user");
        Ok(user)
    }

    #[instrument(
        name = "users_info.service.update_user",
        skip(self, patch, upload),
        fields(user_id = %id, has_upload = upload.is_some())
    )]
    pub async fn update_user(
        &self,
        id: &str,
        patch: UserPatch,
        upload: Option<ImageUpload>,
    ) -> Result<User, DomainError> {
        info!("Updating user");

        let _guard = self.write_lock.lock().await;
        let mut users = self.load_snapshot().await;

        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))?;

        // New photo goes to disk before the document references it.
        let new_image = match upload {
            Some(upload) => Some(self.images.put(&upload.bytes, &upload.file_name).await?),
            None => None,
        };

        let current = &mut users[idx];
        let previous_image = current.image_path.clone();
        if let Some(name) = patch.name {
            current.name = name;
        }
        if let Some(age) = patch.age {
            current.age = age;
        }
        if let Some(city) = patch.city {
            current.city = city;
        }
        if let Some(path) = &new_image {
            current.image_path = path.clone();
        }
        current.updated_at.push(now());
        let updated = current.clone();
        let previous_shared = is_referenced(&users, &previous_image);

        if let Err(e) = self.repo.save(users).await {
            if let Some(path) = &new_image {
                self.discard_image(path).await;
            }
            return Err(e.into());
        }

        // Old photo goes only after nothing references it anymore.
        if new_image.is_some() {
            self.release_image(&previous_image, previous_shared).await;
        }

        info!(updates = updated.updated_at.len(), "Successfully updated user");
        Ok(updated)
    }

    #[instrument(name = "users_info.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &str) -> Result<(), DomainError> {
        info!("Deleting user");

        let _guard = self.write_lock.lock().await;
        let mut users = self.load_snapshot().await;

        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))?;
        let removed = users.remove(idx);
        let shared = is_referenced(&users, &removed.image_path);

        // Reference first, file second: a crash in between leaves an orphan
        // file, never a record pointing at a missing one.
        self.repo.save(users).await?;
        self.release_image(&removed.image_path, shared).await;

        info!("Successfully deleted user");
        Ok(())
    }

    /// Load the collection, degrading to an empty one when the store cannot
    /// be read. A corrupt document is logged at error level: the next write
    /// replaces it.
    async fn load_snapshot(&self) -> Vec<User> {
        match self.repo.load().await {
            Ok(users) => users,
            Err(e @ StoreReadError::Missing { .. }) => {
                warn!(error = %e, "User store not found, starting with no users");
                Vec::new()
            }
            Err(e) => {
                error!(
                    error = %e,
                    "User store unreadable, serving an empty collection; the next write will overwrite it"
                );
                Vec::new()
            }
        }
    }

    /// Drop an image that is no longer referenced. Never touches the shared
    /// default image, nor a file another record still points at, and never
    /// fails the caller.
    async fn release_image(&self, path: &str, still_referenced: bool) {
        if path == self.config.default_image {
            debug!(img_path = %path, "Keeping shared default image");
            return;
        }
        if still_referenced {
            debug!(img_path = %path, "Image still referenced by another user, keeping it");
            return;
        }
        self.discard_image(path).await;
    }

    async fn discard_image(&self, path: &str) {
        match self.images.remove(path).await {
            Ok(true) => debug!(img_path = %path, "Removed image"),
            Ok(false) => debug!(img_path = %path, "Image already absent or external"),
            Err(e) => warn!(error = %e, "Image cleanup failed, leaving file behind"),
        }
    }
}

/// Current time at the precision the store persists.
fn now() -> Timestamp {
    Timestamp::At(Utc::now().trunc_subsecs(3))
}

fn is_referenced(users: &[User], path: &str) -> bool {
    users.iter().any(|u| u.image_path == path)
}

fn fresh_id(existing: &[User]) -> String {
    loop {
        let id = Uuid::new_v4().simple().to_string();
        if !existing.iter().any(|u| u.id == id) {
            return id;
        }
    }
}
