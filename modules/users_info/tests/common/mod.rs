#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;
use users_info::config::UsersInfoConfig;
use users_info::UsersInfo;

/// A users module rooted in its own temporary home directory.
pub struct Fixture {
    pub home: TempDir,
    pub module: UsersInfo,
}

impl Fixture {
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("tempdir");
        let module = UsersInfo::init(UsersInfoConfig::default(), home.path()).expect("init");
        Self { home, module }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.module.images_dir().to_path_buf()
    }

    pub fn image_file(&self, name: &str) -> PathBuf {
        self.images_dir().join(name)
    }

    /// Put the shared default photo on disk, as a deployment would.
    pub fn install_default_image(&self) -> PathBuf {
        let path = self.image_file("default-image.jpg");
        std::fs::create_dir_all(self.images_dir()).expect("images dir");
        std::fs::write(&path, b"default").expect("default image");
        path
    }

    pub fn read_store(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.module.data_file()).expect("db.json");
        serde_json::from_str(&raw).expect("valid json")
    }
}
