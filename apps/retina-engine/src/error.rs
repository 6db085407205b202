//! Error taxonomy for the Retina engine.
//!
//! Every fallible engine call returns [`EngineError`]. Errors are detected
//! before any sampling begins, so a failed call never yields partial results.
//!
//! | Code | Meaning |
//! |------|---------|
//! | `CONFIGURATION_ERROR` | Caller input violates a contract (missing parameter, `runs < 1`, ...) |
//! | `DOMAIN_ERROR` | Utility evaluated outside the model's valid domain |
//! | `CYCLE_DETECTED` | Dependency validation rejected a cyclic edge set (reported as data) |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utility::UtilityMode;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Machine-readable error codes surfaced at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid caller input.
    ConfigurationError,
    /// Utility model evaluated outside its domain.
    DomainError,
    /// Dependency edges would form a cycle.
    CycleDetected,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::DomainError => "DOMAIN_ERROR",
            Self::CycleDetected => "CYCLE_DETECTED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors raised by the simulation, utility and credit components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Missing or invalid caller input.
    #[error("Configuration error [{field}]: {message}")]
    Configuration {
        /// Offending field or parameter key.
        field: String,
        /// Human-readable message.
        message: String,
    },

    /// Utility evaluation outside the model's valid domain.
    #[error("Domain error in {mode} utility: {message}")]
    Domain {
        /// Utility model that rejected the value.
        mode: UtilityMode,
        /// Human-readable message.
        message: String,
    },
}

impl EngineError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a domain error.
    #[must_use]
    pub fn domain(mode: UtilityMode, message: impl Into<String>) -> Self {
        Self::Domain {
            mode,
            message: message.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { .. } => ErrorCode::ConfigurationError,
            Self::Domain { .. } => ErrorCode::DomainError,
        }
    }

    /// Convert to a serializable response for the UI boundary.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        let mut details = std::collections::HashMap::new();
        let message = match self {
            Self::Configuration { field, message } => {
                details.insert("field".to_string(), field.clone());
                message.clone()
            }
            Self::Domain { mode, message } => {
                details.insert("mode".to_string(), mode.to_string());
                message.clone()
            }
        };

        ErrorResponse {
            code: self.code().reason().to_string(),
            message,
            details,
        }
    }
}

/// Serializable error body handed to the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    pub details: std::collections::HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_reason() {
        assert_eq!(ErrorCode::ConfigurationError.reason(), "CONFIGURATION_ERROR");
        assert_eq!(ErrorCode::DomainError.reason(), "DOMAIN_ERROR");
        assert_eq!(ErrorCode::CycleDetected.to_string(), "CYCLE_DETECTED");
    }

    #[test]
    fn test_configuration_error_display() {
        let err = EngineError::configuration("stdDev", "missing required parameter");
        assert_eq!(
            err.to_string(),
            "Configuration error [stdDev]: missing required parameter"
        );
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
    }

    #[test]
    fn test_domain_error_display() {
        let err = EngineError::domain(UtilityMode::Crra, "normalized outcome must be positive");
        let msg = err.to_string();
        assert!(msg.contains("CRRA"));
        assert!(msg.contains("must be positive"));
        assert_eq!(err.code(), ErrorCode::DomainError);
    }

    #[test]
    fn test_to_response() {
        let response = EngineError::configuration("runs", "must be at least 1").to_response();

        assert_eq!(response.code, "CONFIGURATION_ERROR");
        assert_eq!(response.message, "must be at least 1");
        assert_eq!(response.details.get("field").map(String::as_str), Some("runs"));
    }

    #[test]
    fn test_error_is_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(EngineError::configuration("seed", "test"));
        assert!(!err.to_string().is_empty());
    }
}
