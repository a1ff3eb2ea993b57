//! # Tododactyl - a small MongoDB-backed todo store
//!
//! [`db::ConnectionManager`] guards the connection lifecycle and
//! [`repository::TodoRepository`] provides CRUD over the `todos` collection.
//!
//! ## Environment Variables
//!
//! - `DB_URI` or `MONGODB_URL`: MongoDB connection string
//! - `DATABASE_NAME`: target database

pub mod config;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod repository;

pub use config::StoreConfig;
pub use db::{ConnectionManager, ConnectionState};
pub use errors::{ConfigError, TodoError};
pub use models::TodoItem;
pub use repository::TodoRepository;
