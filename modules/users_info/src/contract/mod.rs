pub mod client;
pub mod error;
pub mod model;

pub use model::{ImageUpload, NewUser, Timestamp, User, UserPatch};
