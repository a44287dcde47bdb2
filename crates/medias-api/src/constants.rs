//! API constants

/// Prefix of every catalog route.
pub const API_PREFIX: &str = "/api/v1";

/// Mount point of the in-memory blob backend's upload and download routes.
pub const STORAGE_PREFIX: &str = "/storage";

/// Upper bound on JSON request bodies.
pub const MAX_JSON_BODY_BYTES: usize = 1024 * 1024;

/// Upper bound on a single object PUT to the in-memory backend.
pub const MAX_MEMORY_OBJECT_BYTES: usize = 256 * 1024 * 1024;

/// Timeout for the database ping in `/health`.
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Server-wide cap on in-flight requests.
pub const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
