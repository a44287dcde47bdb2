//! In-process blob store
//!
//! Hands out URLs under a configurable base and keeps uploaded bytes in a map. Used by the
//! development server and by tests that need a store whose contents they control.

use crate::keys::object_key;
use crate::traits::{BlobStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use medias_core::models::ObjectRef;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Characters left as-is in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode each `/`-separated segment of a storage key.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Clone)]
pub struct MemoryBlobStore {
    base_url: String,
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
    unavailable: Arc<AtomicBool>,
    presign_calls: Arc<AtomicUsize>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Arc::new(Mutex::new(HashMap::new())),
            unavailable: Arc::new(AtomicBool::new(false)),
            presign_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store bytes under a raw key, as a client `PUT` to the upload URL would.
    pub fn put_key(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.check_available()?;
        let mut objects = self.lock()?;
        objects.insert(key.to_string(), data);
        tracing::debug!(key = %key, "Memory object stored");
        Ok(())
    }

    pub fn get_key(&self, key: &str) -> StorageResult<Bytes> {
        self.check_available()?;
        let objects = self.lock()?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    pub fn put_object(&self, object: ObjectRef<'_>, data: Bytes) -> StorageResult<()> {
        self.put_key(&object_key(object), data)
    }

    pub fn remove_object(&self, object: ObjectRef<'_>) -> StorageResult<bool> {
        let mut objects = self.lock()?;
        Ok(objects.remove(&object_key(object)).is_some())
    }

    /// Make every subsequent call fail with a backend error until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of presigned URLs handed out so far.
    pub fn presign_calls(&self) -> usize {
        self.presign_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError(
                "memory store unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, Bytes>>> {
        self.objects
            .lock()
            .map_err(|_| StorageError::BackendError("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn presign_upload(&self, object: ObjectRef<'_>) -> StorageResult<String> {
        self.check_available()?;
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "{}/upload/{}",
            self.base_url,
            encode_key(&object_key(object))
        ))
    }

    async fn presign_download(&self, object: ObjectRef<'_>) -> StorageResult<String> {
        self.check_available()?;
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "{}/{}",
            self.base_url,
            encode_key(&object_key(object))
        ))
    }

    async fn exists(&self, object: ObjectRef<'_>) -> StorageResult<bool> {
        self.check_available()?;
        let objects = self.lock()?;
        Ok(objects.contains_key(&object_key(object)))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
