use std::collections::HashMap;

use axum::extract::{multipart::MultipartError, Multipart};
use tracing::debug;

use crate::contract::model::{ImageUpload, NewUser, UserPatch};

/// Text fields plus at most one uploaded file from a `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct UserForm {
    fields: HashMap<String, String>,
    pub upload: Option<ImageUpload>,
}

impl UserForm {
    /// Drain `multipart`, taking the file part named `file_field` as the upload.
    ///
    /// Browsers submit an empty part with an empty filename when no file was
    /// chosen; that counts as no upload.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == file_field {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if file_name.is_empty() || bytes.is_empty() {
                    debug!(field = %name, "Empty file part, treating as no upload");
                    continue;
                }
                debug!(field = %name, file_name = %file_name, size = bytes.len(), "Received upload");
                form.upload = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    file_name,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Add-user form: `name`, `age`, `city`, optional external `image` path.
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            name: self.text("name").unwrap_or_default().to_string(),
            age: self.text("age").unwrap_or_default().to_string(),
            city: self.text("city").unwrap_or_default().to_string(),
            image: self
                .text("image")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    /// Edit form: fields that were not submitted keep their current value.
    pub fn to_patch(&self) -> UserPatch {
        UserPatch {
            name: self.text("name").map(str::to_string),
            age: self.text("age").map(str::to_string),
            city: self.text("city").map(str::to_string),
        }
    }
}
