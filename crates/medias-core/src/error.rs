//! Error types module
//!
//! All failures in the catalog are unified under `AppError`. Every variant maps to one of
//! four kinds (`InvalidEntity`, `Conflict`, `NotFound`, `Internal`) which drive the HTTP
//! status, retryability and what a client is allowed to see.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation failures
    Debug,
    /// Rejections caused by resource state
    Warn,
    /// Unexpected failures
    Error,
}

/// Error kind, independent of where the error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidEntity,
    Conflict,
    NotFound,
    Internal,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "CONFLICT")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid entity: {message}")]
    InvalidEntity {
        message: String,
        details: Option<String>,
    },

    /// Transport-level parse failure (malformed body, path or query).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        details: Option<String>,
    },

    #[error("Not found: {message}")]
    NotFound {
        message: String,
        details: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        details: Option<String>,
    },

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::BadRequest(format!("UUID parsing error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

fn join_details(detail: String, previous: Option<String>) -> Option<String> {
    match previous {
        Some(prev) if !prev.is_empty() => Some(format!("{}: {}", detail, prev)),
        _ => Some(detail),
    }
}

impl AppError {
    pub fn invalid_entity(message: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::InvalidEntity {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn conflict(message: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::Conflict {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
            details: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidEntity { .. } | AppError::BadRequest(_) => ErrorKind::InvalidEntity,
            AppError::Conflict { .. } => ErrorKind::Conflict,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Internal { .. }
            | AppError::InternalWithSource { .. } => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Message without the kind prefix used by `Display`.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidEntity { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Internal { message, .. }
            | AppError::InternalWithSource { message, .. } => message.clone(),
            AppError::BadRequest(msg) | AppError::Storage(msg) => msg.clone(),
            AppError::Database(err) => err.to_string(),
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            AppError::InvalidEntity { details, .. }
            | AppError::Conflict { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Internal { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    /// Attach the step that failed. Errors that already carry a kind keep it and get the
    /// detail prepended; raw collaborator failures become `Internal`.
    pub fn with_detail(self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match self {
            AppError::InvalidEntity { message, details } => AppError::InvalidEntity {
                message,
                details: join_details(detail, details),
            },
            AppError::Conflict { message, details } => AppError::Conflict {
                message,
                details: join_details(detail, details),
            },
            AppError::NotFound { message, details } => AppError::NotFound {
                message,
                details: join_details(detail, details),
            },
            AppError::Internal { message, details } => AppError::Internal {
                message,
                details: join_details(detail, details),
            },
            AppError::BadRequest(msg) => AppError::BadRequest(format!("{}: {}", detail, msg)),
            AppError::Storage(msg) => AppError::Internal {
                message: detail,
                details: Some(msg),
            },
            #[cfg(feature = "sqlx")]
            AppError::Database(err) => AppError::InternalWithSource {
                message: detail,
                source: anyhow::Error::new(err),
            },
            #[cfg(not(feature = "sqlx"))]
            AppError::Database(msg) => AppError::Internal {
                message: detail,
                details: Some(msg),
            },
            AppError::InternalWithSource { message, source } => AppError::InternalWithSource {
                message: detail,
                source: source.context(message),
            },
        }
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::InvalidEntity { .. } => "InvalidEntity",
            AppError::BadRequest(_) => "BadRequest",
            AppError::Conflict { .. } => "Conflict",
            AppError::NotFound { .. } => "NotFound",
            AppError::Internal { .. } | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();
        if let Some(extra) = self.details() {
            details.push_str(&format!(" ({})", extra));
        }

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

/// Adds step context to any error convertible into `AppError`.
pub trait ResultExt<T> {
    fn context_detail(self, detail: impl Into<String>) -> Result<T, AppError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context_detail(self, detail: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| e.into().with_detail(detail))
    }
}

/// Static metadata for each kind: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidEntity { .. } => (
            422,
            "INVALID",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::Conflict { .. } => (
            409,
            "CONFLICT",
            false,
            Some("Use a different filename or checksum"),
            false,
            LogLevel::Warn,
        ),
        AppError::NotFound { .. } => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Database(_)
        | AppError::Storage(_)
        | AppError::Internal { .. }
        | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "An unexpected error occurred".to_string(),
            _ => self.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_invalid_entity() {
        let err = AppError::invalid_entity("invalid size", "size must be positive");
        assert_eq!(err.kind(), ErrorKind::InvalidEntity);
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(err.error_code(), "INVALID");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "invalid size");
        assert_eq!(err.details(), Some("size must be positive"));
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_conflict() {
        let err = AppError::conflict("media already finalized", "cannot finalize twice");
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "CONFLICT");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "INTERNAL");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "An unexpected error occurred");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_with_detail_keeps_kind() {
        let err = AppError::not_found("media not found").with_detail("error finding media");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "media not found");
        assert_eq!(err.details(), Some("error finding media"));

        let err = AppError::invalid_entity("some tags not found", "one or more tag names do not exist")
            .with_detail("error creating media");
        assert_eq!(err.kind(), ErrorKind::InvalidEntity);
        assert_eq!(
            err.details(),
            Some("error creating media: one or more tag names do not exist")
        );
    }

    #[test]
    fn test_with_detail_classifies_raw_failures_as_internal() {
        let err = AppError::Storage("connection reset".to_string())
            .with_detail("error generating download URL");
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), "error generating download URL");
        assert_eq!(err.details(), Some("connection reset"));
        assert_eq!(err.client_message(), "An unexpected error occurred");
    }

    #[test]
    fn test_context_detail_on_result() {
        let res: Result<(), AppError> = Err(AppError::internal("boom"));
        let err = res.context_detail("error finalizing media").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.details(), Some("error finalizing media"));
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("socket closed")).with_detail("error finding media");
        let detailed = err.detailed_message();
        assert!(detailed.contains("error finding media"));
        assert!(detailed.contains("socket closed"));
    }
}
