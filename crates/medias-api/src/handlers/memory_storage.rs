//! Upload and download endpoints backing the URLs handed out by the in-memory blob store.

use crate::error::HttpAppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bytes::Bytes;
use medias_core::AppError;
use medias_storage::MemoryBlobStore;
use std::sync::Arc;

pub async fn put_object(
    State(store): State<Arc<MemoryBlobStore>>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<StatusCode, HttpAppError> {
    let size = body.len();
    store.put_key(&key, body).map_err(AppError::from)?;
    tracing::debug!(key = %key, size, "Object uploaded to memory storage");
    Ok(StatusCode::OK)
}

pub async fn get_object(
    State(store): State<Arc<MemoryBlobStore>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let data = store.get_key(&key).map_err(AppError::from)?;
    Ok(data)
}
