//! Medias Storage Library
//!
//! The `BlobStore` trait plus S3 and in-memory implementations. The catalog only presigns
//! URLs and checks for presence; file bytes travel directly between clients and the store.
//!
//! # Storage key format
//!
//! Every backend uses `{sha256}/{filename}`, generated in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_blob_store, ConfiguredBlobStore};
pub use keys::object_key;
pub use medias_core::StorageBackend;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryBlobStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3BlobStore;
pub use traits::{BlobStore, StorageError, StorageResult};
