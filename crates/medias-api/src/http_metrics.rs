//! Per-route request counters and the trace layer hooks.
//!
//! Counters are keyed `"METHOD /route.status"` and served as JSON from `/debug/vars`.

use crate::middleware::RequestId;
use axum::{
    extract::{MatchedPath, Request, State},
    http::Response,
    middleware::Next,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tower_http::trace::{MakeSpan, OnRequest, OnResponse};
use tracing::Span;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RouteStats {
    pub count: u64,
    pub total_duration_ms: f64,
}

/// In-process request metrics.
#[derive(Clone, Default)]
pub struct HttpMetrics {
    routes: Arc<Mutex<BTreeMap<String, RouteStats>>>,
}

impl HttpMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request_end(&self, method: &str, route: &str, status: u16, duration: Duration) {
        let key = format!("{} {}.{}", method, route, status);
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        let stats = routes.entry(key).or_default();
        stats.count += 1;
        stats.total_duration_ms += duration.as_secs_f64() * 1000.0;
    }

    pub fn snapshot(&self) -> BTreeMap<String, RouteStats> {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Record one request against its matched route. Install with `route_layer` so the
/// `MatchedPath` extension is present.
pub async fn metrics_middleware(
    State(metrics): State<HttpMetrics>,
    request: Request,
    next: Next,
) -> axum::response::Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let started = Instant::now();
    let response = next.run(request).await;
    metrics.record_request_end(&method, &route, response.status().as_u16(), started.elapsed());
    response
}

#[derive(Clone)]
pub struct CustomMakeSpan;

impl<B> MakeSpan<B> for CustomMakeSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let method = request.method().as_str();
        let uri = request.uri().path();
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(|mp| mp.as_str())
            .unwrap_or(uri);
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .unwrap_or("");

        let span = tracing::info_span!(
            "http_request",
            http.method = %method,
            http.route = %route,
            http.target = %uri,
            request_id = %request_id,
            http.user_agent = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        );

        if let Some(user_agent) = request
            .headers()
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
        {
            span.record("http.user_agent", user_agent);
        }

        span
    }
}

#[derive(Clone)]
pub struct CustomOnRequest;

impl<B> OnRequest<B> for CustomOnRequest {
    fn on_request(&mut self, _request: &axum::http::Request<B>, _span: &Span) {
        tracing::debug!("started processing request");
    }
}

#[derive(Clone)]
pub struct CustomOnResponse;

impl<B> OnResponse<B> for CustomOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();
        span.record("http.status_code", status);

        if response.status().is_server_error() {
            tracing::error!(
                status = status,
                latency_ms = latency.as_millis() as u64,
                "request failed"
            );
        } else if response.status().is_client_error() {
            tracing::warn!(
                status = status,
                latency_ms = latency.as_millis() as u64,
                "client error"
            );
        } else {
            tracing::info!(
                status = status,
                latency_ms = latency.as_millis() as u64,
                "request completed"
            );
        }
    }
}
