//! Medias HTTP API
//!
//! axum adapter over the catalog workflows. The binary in `main.rs` loads configuration and
//! serves the router built by `setup`.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod http_metrics;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod telemetry;
