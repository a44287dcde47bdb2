use crate::keys::object_key;
use crate::traits::{BlobStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use http::Method;
use medias_core::models::ObjectRef;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, Result as ObjectResult};
use std::time::{Duration, Instant};

/// S3 blob store backed by `object_store`.
#[derive(Clone)]
pub struct S3BlobStore {
    store: AmazonS3,
    /// Signs URLs for clients; differs from `store` when a public endpoint is configured.
    signer: AmazonS3,
    bucket: String,
    expiry: Duration,
}

impl S3BlobStore {
    /// Create a new S3BlobStore instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers such as MinIO
    /// * `public_endpoint_url` - Optional endpoint that presigned URLs should point at
    /// * `expiry` - Lifetime of presigned URLs
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_endpoint_url: Option<String>,
        expiry: Duration,
    ) -> StorageResult<Self> {
        let store = Self::build(&bucket, &region, endpoint_url.as_deref())?;

        let signer = match public_endpoint_url {
            Some(ref public) if Some(public.as_str()) != endpoint_url.as_deref() => {
                tracing::info!(
                    bucket = %bucket,
                    endpoint = %public,
                    "Signing presigned URLs against public endpoint"
                );
                Self::build(&bucket, &region, Some(public))?
            }
            _ => store.clone(),
        };

        Ok(S3BlobStore {
            store,
            signer,
            bucket,
            expiry,
        })
    }

    fn build(bucket: &str, region: &str, endpoint_url: Option<&str>) -> StorageResult<AmazonS3> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket);

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    async fn presign(&self, method: Method, object: ObjectRef<'_>) -> StorageResult<String> {
        let key = object_key(object);
        let location = Path::from(key.as_str());
        let start = Instant::now();

        let url_result: ObjectResult<_> = self
            .signer
            .signed_url(method.clone(), &location, self.expiry)
            .await;

        let url = url_result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                method = %method,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 presign failed"
            );
            StorageError::PresignFailed(e.to_string())
        })?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            method = %method,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 presigned URL generated"
        );

        Ok(url.to_string())
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn presign_upload(&self, object: ObjectRef<'_>) -> StorageResult<String> {
        self.presign(Method::PUT, object).await
    }

    async fn presign_download(&self, object: ObjectRef<'_>) -> StorageResult<String> {
        self.presign(Method::GET, object).await
    }

    async fn exists(&self, object: ObjectRef<'_>) -> StorageResult<bool> {
        let key = object_key(object);
        let location = Path::from(key.as_str());
        let start = Instant::now();

        let result = match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 head failed"
                );
                Err(StorageError::BackendError(e.to_string()))
            }
        };

        if let Ok(found) = result {
            tracing::debug!(
                bucket = %self.bucket,
                key = %key,
                found,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 head completed"
            );
        }

        result
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
