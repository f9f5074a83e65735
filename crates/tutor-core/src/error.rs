//! Error types for the Tutor client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Tutor client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum TutorError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Client-side validation failure (e.g. attachment type or size)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend returned a non-success status
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connection, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "multipart", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TutorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Api error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Serialization error
    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an Api error
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this error came from the gateway rather than local validation.
    ///
    /// Returns true for:
    /// - `Api` errors (backend rejected the request)
    /// - `Transport` errors (the request never completed)
    /// - `Serialization` errors (the response could not be decoded)
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::Transport(_) | Self::Serialization { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<reqwest::Error> for TutorError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Self::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TutorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for TutorError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, TutorError>`.
pub type Result<T> = std::result::Result<T, TutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(TutorError::validation("too large").is_validation());
        assert!(TutorError::api(500, "boom").is_api());
        assert!(TutorError::transport("refused").is_transport());
        assert!(TutorError::not_found("Session", "s-1").is_not_found());
    }

    #[test]
    fn test_gateway_failure_classification() {
        assert!(TutorError::api(404, "missing").is_gateway_failure());
        assert!(TutorError::transport("timeout").is_gateway_failure());
        assert!(TutorError::serialization("JSON", "eof").is_gateway_failure());
        assert!(!TutorError::validation("bad mime").is_gateway_failure());
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: TutorError = err.into();
        assert!(matches!(
            converted,
            TutorError::Serialization { ref format, .. } if format == "JSON"
        ));
    }

    #[test]
    fn test_display_includes_status() {
        let err = TutorError::api(503, "unavailable");
        assert_eq!(err.to_string(), "Backend error (503): unavailable");
    }
}
