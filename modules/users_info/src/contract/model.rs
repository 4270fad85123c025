use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

/// Pure user model for inter-module communication (no serde/schemars)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: String,
    pub city: String,
    /// Image store file name, an external path, or the default image.
    pub image_path: String,
    pub created_at: Timestamp,
    /// One entry per successful update, oldest first.
    pub updated_at: Vec<Timestamp>,
}

/// A record timestamp. Stored text that is not a recognizable date is kept
/// as written so it survives a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Timestamp {
    At(DateTime<Utc>),
    Raw(String),
}

impl Timestamp {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::At(ts) => Some(*ts),
            Timestamp::Raw(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(ts: DateTime<Utc>) -> Self {
        Timestamp::At(ts)
    }
}

/// RFC 3339 UTC with milliseconds; raw text verbatim.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::At(ts) => f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Timestamp::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Readable instants order chronologically; raw text sorts before any instant.
impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Timestamp::At(a), Timestamp::At(b)) => a.cmp(b),
            (Timestamp::Raw(a), Timestamp::Raw(b)) => a.cmp(b),
            (Timestamp::Raw(_), Timestamp::At(_)) => Ordering::Less,
            (Timestamp::At(_), Timestamp::Raw(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Data for creating a new user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub name: String,
    pub age: String,
    pub city: String,
    /// Externally hosted photo, stored verbatim when no upload is given.
    pub image: Option<String>,
}

/// Partial update data for a user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<String>,
    pub city: Option<String>,
}

/// Raw uploaded photo as handed over by the HTTP layer.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
