pub mod images;

pub use images::{ImageRemoveError, ImageStore, ImageWriteError};
