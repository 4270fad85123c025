use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{NewUser, User, UserPatch};

/// REST DTO for user representation with serde/utoipa
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub age: String,
    pub city: String,
    /// Stored file name, external URL/path, or the default image.
    pub image_path: String,
    /// RFC 3339, UTC, millisecond precision. Legacy text that is not a
    /// readable date is returned as stored.
    pub created_at: String,
    /// One timestamp per update, oldest first.
    pub updated_at: Vec<String>,
}

/// REST DTO for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserReq {
    pub name: String,
    pub age: String,
    pub city: String,
    /// Externally hosted photo; the default image is used when absent.
    #[serde(default)]
    pub image: Option<String>,
}

/// REST DTO for updating a user (partial)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateUserReq {
    pub name: Option<String>,
    pub age: Option<String>,
    pub city: Option<String>,
}

/// REST DTO for user list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListDto {
    pub users: Vec<UserDto>,
    pub total: usize,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.iter().map(ToString::to_string).collect(),
            id: user.id,
            name: user.name,
            age: user.age,
            city: user.city,
            image_path: user.image_path,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            name: req.name,
            age: req.age,
            city: req.city,
            image: req.image,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            name: req.name,
            age: req.age,
            city: req.city,
        }
    }
}
