//! Blob store abstraction
//!
//! The catalog never moves file bytes itself. It hands clients presigned URLs and only asks
//! the store whether an object is present.

use crate::StorageBackend;
use async_trait::async_trait;
use medias_core::models::ObjectRef;
use medias_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound {
                message: "object not found".to_string(),
                details: Some(key),
            },
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Blob store abstraction trait
///
/// Objects are addressed by `{sha256}/{filename}`; see [`crate::keys::object_key`].
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Time-limited URL a client can `PUT` the object bytes to.
    async fn presign_upload(&self, object: ObjectRef<'_>) -> StorageResult<String>;

    /// Time-limited URL a client can `GET` the object from.
    async fn presign_download(&self, object: ObjectRef<'_>) -> StorageResult<String>;

    /// Whether the object is present. Absence is `Ok(false)`, never an error.
    async fn exists(&self, object: ObjectRef<'_>) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
