//! Route configuration and setup

use crate::constants::{
    API_PREFIX, HTTP_CONCURRENCY_LIMIT, MAX_JSON_BODY_BYTES, MAX_MEMORY_OBJECT_BYTES,
    STORAGE_PREFIX,
};
use crate::handlers;
use crate::http_metrics::{CustomMakeSpan, CustomOnRequest, CustomOnResponse};
use crate::middleware::{metrics_middleware, request_id_middleware};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Json, Router,
};
use medias_core::Config;
use medias_storage::MemoryBlobStore;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    tracing::info!(
        http_concurrency_limit = HTTP_CONCURRENCY_LIMIT,
        "HTTP concurrency limit layer enabled"
    );

    Ok(build_router(state)
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(cors))
}

/// Routes and per-request middleware, without CORS or the concurrency cap.
pub fn build_router(state: Arc<AppState>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(CustomMakeSpan)
        .on_request(CustomOnRequest)
        .on_response(CustomOnResponse);

    let mut app = Router::new()
        .merge(api_routes(state.clone()))
        .merge(public_routes(state.clone()));

    if let Some(store) = state.memory_storage.clone() {
        app = app.merge(memory_storage_routes(store));
    }

    app.route_layer(axum::middleware::from_fn_with_state(
        state.metrics.clone(),
        metrics_middleware,
    ))
    .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
    .layer(trace_layer)
    .layer(axum::middleware::from_fn(request_id_middleware))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::OPTIONS];

    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins()
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any))
}

/// Catalog routes under the versioned prefix.
fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            &format!("{}/media", API_PREFIX),
            post(handlers::media_create::create_media),
        )
        .route(
            &format!("{}/media/{{id}}", API_PREFIX),
            get(handlers::media_get::get_media),
        )
        .route(
            &format!("{}/media/{{id}}/finalize", API_PREFIX),
            post(handlers::media_finalize::finalize_media),
        )
        .route(
            &format!("{}/tags", API_PREFIX),
            post(handlers::tags::create_tag).get(handlers::tags::list_tags),
        )
        .layer(RequestBodyLimitLayer::new(MAX_JSON_BODY_BYTES))
        .with_state(state)
}

/// Health, metrics and API description.
fn public_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/debug/vars", get(handlers::health::debug_vars))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .with_state(state)
}

/// Targets of the URLs handed out by the in-memory blob store.
fn memory_storage_routes(store: Arc<MemoryBlobStore>) -> Router {
    Router::new()
        .route(
            &format!("{}/upload/{{*key}}", STORAGE_PREFIX),
            put(handlers::memory_storage::put_object),
        )
        .route(
            &format!("{}/{{*key}}", STORAGE_PREFIX),
            get(handlers::memory_storage::get_object),
        )
        .layer(DefaultBodyLimit::max(MAX_MEMORY_OBJECT_BYTES))
        .with_state(store)
}
