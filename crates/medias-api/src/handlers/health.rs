use crate::constants::HEALTH_CHECK_TIMEOUT_SECS;
use crate::http_metrics::RouteStats;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy", body = HealthCheckResponse),
        (status = 503, description = "Database unreachable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timeout = Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS);

    let database = match &state.db_pool {
        None => Ok("not_configured".to_string()),
        Some(pool) => {
            match tokio::time::timeout(timeout, sqlx::query("SELECT 1").execute(pool)).await {
                Ok(Ok(_)) => Ok("healthy".to_string()),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Database health check failed");
                    Err(format!("unhealthy: {}", e))
                }
                Err(_) => {
                    tracing::error!("Database health check timed out");
                    Err("timeout".to_string())
                }
            }
        }
    };

    match database {
        Ok(database) => (
            StatusCode::OK,
            Json(HealthCheckResponse {
                status: "healthy".to_string(),
                database,
            }),
        ),
        Err(database) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthCheckResponse {
                status: "unhealthy".to_string(),
                database,
            }),
        ),
    }
}

/// Request counts and cumulative durations per `"METHOD /route.status"`.
pub async fn debug_vars(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, RouteStats>> {
    Json(state.metrics.snapshot())
}
