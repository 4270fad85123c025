pub mod images;
pub mod storage;
