#[cfg(feature = "storage-memory")]
use crate::MemoryBlobStore;
#[cfg(feature = "storage-s3")]
use crate::S3BlobStore;
use crate::{BlobStore, StorageBackend, StorageError, StorageResult};
use medias_core::Config;
use std::sync::Arc;

/// The configured blob store, plus direct access to the in-memory backend when selected so
/// the server can accept uploads for it.
#[derive(Clone)]
pub struct ConfiguredBlobStore {
    pub store: Arc<dyn BlobStore>,
    #[cfg(feature = "storage-memory")]
    pub memory: Option<Arc<MemoryBlobStore>>,
}

/// Create a blob store based on configuration
pub fn create_blob_store(config: &Config) -> StorageResult<ConfiguredBlobStore> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;

            let store = S3BlobStore::new(
                bucket,
                config.s3_region().to_string(),
                config.s3_endpoint().map(String::from),
                config.s3_public_endpoint().map(String::from),
                config.presign_expiry(),
            )?;
            Ok(ConfiguredBlobStore {
                store: Arc::new(store),
                #[cfg(feature = "storage-memory")]
                memory: None,
            })
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => {
            let memory = Arc::new(MemoryBlobStore::new(config.memory_storage_base_url()));
            Ok(ConfiguredBlobStore {
                store: memory.clone(),
                memory: Some(memory),
            })
        }

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)"
                .to_string(),
        )),
    }
}
