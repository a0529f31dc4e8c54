#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, LocalProgressRepository, SessionRepository, Storage, StorageError,
};
