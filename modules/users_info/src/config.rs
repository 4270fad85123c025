use serde::{Deserialize, Serialize};

/// Configuration for the users_info module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersInfoConfig {
    /// JSON document holding every user record (relative to home_dir).
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Directory of uploaded photos (relative to home_dir).
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
    /// Shared fallback photo; never deleted.
    #[serde(default = "default_image")]
    pub default_image: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for UsersInfoConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            images_dir: default_images_dir(),
            default_image: default_image(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

fn default_data_file() -> String {
    "db.json".to_string()
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_image() -> String {
    "default-image.jpg".to_string()
}

fn default_max_upload_mb() -> usize {
    16
}
