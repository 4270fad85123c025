pub mod document;
pub mod json_repo;
pub mod mapper;

pub use json_repo::JsonFileUsersRepository;
