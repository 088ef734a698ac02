//! Error metadata contract
//!
//! Pipeline failures are plain `thiserror` enums in the crates that raise them. The
//! calling layer only needs to know how to present a failure, so every such enum
//! implements [`ErrorMetadata`] and can be turned into an [`ErrorResponse`].

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for bad input that got past validation
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "REMUX_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Serializable failure returned to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub status: u16,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Build a response from any error that describes itself.
    ///
    /// The full error text is attached as `details` unless the error is sensitive
    /// and `expose_sensitive` is false (production).
    pub fn from_error<E>(err: &E, expose_sensitive: bool) -> Self
    where
        E: ErrorMetadata + Display,
    {
        let details = if !err.is_sensitive() || expose_sensitive {
            Some(err.to_string())
        } else {
            None
        };

        Self {
            error: err.client_message(),
            code: err.error_code().to_string(),
            status: err.http_status_code(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action().map(String::from),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("backend exploded: {0}")]
    struct Exploded(String);

    impl ErrorMetadata for Exploded {
        fn http_status_code(&self) -> u16 {
            502
        }
        fn error_code(&self) -> &'static str {
            "EXPLODED"
        }
        fn is_recoverable(&self) -> bool {
            true
        }
        fn suggested_action(&self) -> Option<&'static str> {
            Some("Retry after a short delay")
        }
        fn client_message(&self) -> String {
            "Storage unavailable".to_string()
        }
        fn is_sensitive(&self) -> bool {
            true
        }
        fn log_level(&self) -> LogLevel {
            LogLevel::Error
        }
    }

    #[test]
    fn test_sensitive_details_hidden() {
        let err = Exploded("secret endpoint".to_string());
        let response = ErrorResponse::from_error(&err, false);

        assert_eq!(response.error, "Storage unavailable");
        assert_eq!(response.code, "EXPLODED");
        assert_eq!(response.status, 502);
        assert!(response.recoverable);
        assert_eq!(response.details, None);

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("details"));
        assert!(!json.contains("secret endpoint"));
    }

    #[test]
    fn test_sensitive_details_exposed_outside_production() {
        let err = Exploded("secret endpoint".to_string());
        let response = ErrorResponse::from_error(&err, true);
        assert_eq!(
            response.details.as_deref(),
            Some("backend exploded: secret endpoint")
        );
    }
}
