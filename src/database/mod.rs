pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{DatabaseManager, DatabaseError};
