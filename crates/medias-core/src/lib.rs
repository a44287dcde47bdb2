//! Medias Core Library
//!
//! Domain models, error types, configuration and validation shared by every Medias crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, CatalogConfig, Config, DatabaseConfig, StorageConfig};
pub use error::{AppError, ErrorKind, ErrorMetadata, LogLevel, ResultExt};
pub use storage_types::StorageBackend;
