//! Flat-file repository: the whole collection lives in one pretty-printed
//! JSON array. Writes go to a sibling `.tmp` file that is then renamed over
//! the document, so a crash mid-write leaves the previous version intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tracing::debug;

use crate::contract::model::User;
use crate::domain::repo::{StoreReadError, StoreWriteError, UsersRepository};
use crate::infra::storage::document::UserDocument;
use crate::infra::storage::mapper::{to_document, to_user};

pub struct JsonFileUsersRepository {
    path: PathBuf,
    default_image: String,
}

impl JsonFileUsersRepository {
    pub fn new(path: impl Into<PathBuf>, default_image: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_image: default_image.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "users.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Creation time for records stored without one: the document's last
    /// modification, so every load before the next save agrees and that save
    /// persists the value readers already saw.
    async fn default_created_at(&self) -> DateTime<Utc> {
        let modified = tokio::fs::metadata(&self.path)
            .await
            .and_then(|m| m.modified())
            .unwrap_or(std::time::UNIX_EPOCH);
        DateTime::<Utc>::from(modified).trunc_subsecs(3)
    }

    fn write_error(&self, message: impl std::fmt::Display) -> StoreWriteError {
        StoreWriteError {
            location: self.location(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl UsersRepository for JsonFileUsersRepository {
    async fn load(&self) -> Result<Vec<User>, StoreReadError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreReadError::Missing {
                    location: self.location(),
                })
            }
            Err(e) => {
                return Err(StoreReadError::Unreadable {
                    location: self.location(),
                    message: e.to_string(),
                })
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            debug!(path = %self.location(), "User store is empty");
            return Ok(Vec::new());
        }

        let docs: Vec<UserDocument> =
            serde_json::from_slice(&raw).map_err(|e| StoreReadError::Corrupt {
                location: self.location(),
                message: e.to_string(),
            })?;

        let stamp = self.default_created_at().await;
        let users: Vec<User> = docs
            .into_iter()
            .map(|doc| to_user(doc, &self.default_image, stamp))
            .collect();
        debug!(path = %self.location(), count = users.len(), "Loaded user store");
        Ok(users)
    }

    async fn save(&self, mut users: Vec<User>) -> Result<(), StoreWriteError> {
        // Stable: equal timestamps keep their relative order.
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let docs: Vec<UserDocument> = users.iter().map(to_document).collect();
        let data = serde_json::to_vec_pretty(&docs)
            .map_err(|e| self.write_error(format!("failed to serialize users: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(format!("failed to create directory: {e}")))?;
        }

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &data)
            .await
            .map_err(|e| self.write_error(format!("failed to write tmp file: {e}")))?;

        #[cfg(target_os = "windows")]
        {
            let _ = tokio::fs::remove_file(&self.path).await;
        }
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.write_error(format!("failed to replace document: {e}")))?;

        debug!(path = %self.location(), count = docs.len(), "Saved user store");
        Ok(())
    }
}
