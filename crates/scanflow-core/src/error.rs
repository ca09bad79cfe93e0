//! # Error Types
//!
//! Protocol error types for scanflow-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  scanflow-core errors (this file)                                      │
//! │  ├── DecodeError       - Config payload could not be read              │
//! │  ├── InvalidColorSpec  - A color string failed to parse                │
//! │  ├── ValidationError   - Builder/options input rejected                │
//! │  └── CoreError         - Umbrella over the three above                 │
//! │                                                                         │
//! │  scanflow-session errors (separate crate)                              │
//! │  └── SessionError      - Async flow failures                           │
//! │                                                                         │
//! │  Flow: DecodeError/ValidationError → CoreError → SessionError → Caller │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! `Cancelled` and `PermissionDenied` are first-class scan outcomes
//! (see [`crate::types::ScanOutcome`]), never error variants.

use thiserror::Error;

// =============================================================================
// Decode Error
// =============================================================================

/// Failures reading a config payload on the receiving side of the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not a well-formed JSON object.
    #[error("Malformed config payload: {0}")]
    Malformed(String),

    /// A required key is absent.
    ///
    /// The name is the wire key (e.g. `buttonText`), not the Rust field name,
    /// so diagnostics match what the producer wrote.
    #[error("Config payload is missing required field '{0}'")]
    MissingField(String),

    /// A key is present but its value is unusable (wrong JSON type, empty title).
    #[error("Config payload field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    /// The payload declares a version this decoder does not understand.
    #[error("Unsupported config payload version: {0}")]
    UnsupportedVersion(String),
}

// =============================================================================
// Color Error
// =============================================================================

/// A color string could not be resolved to an ARGB value.
///
/// ## Recovery Policy
/// ```text
/// buttonColor      invalid ──► warn, keep platform default (recovered)
/// buttonTextColor  invalid ──► propagated to the caller (fatal)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color spec '{spec}': {reason}")]
pub struct InvalidColorSpec {
    pub spec: String,
    pub reason: String,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors raised while building configs and options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g. unknown barcode format name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The extra key is reserved for the config payload.
    #[error("extra key '{key}' is reserved")]
    ReservedKey { key: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Color(#[from] InvalidColorSpec),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_messages() {
        let err = DecodeError::MissingField("buttonText".to_string());
        assert_eq!(
            err.to_string(),
            "Config payload is missing required field 'buttonText'"
        );

        let err = DecodeError::UnsupportedVersion("9".to_string());
        assert_eq!(err.to_string(), "Unsupported config payload version: 9");
    }

    #[test]
    fn test_color_error_message() {
        let err = InvalidColorSpec {
            spec: "#XYZ".to_string(),
            reason: "unknown color".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid color spec '#XYZ': unknown color");
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let core_err: CoreError = DecodeError::Malformed("eof".to_string()).into();
        assert!(matches!(core_err, CoreError::Decode(_)));

        let core_err: CoreError = ValidationError::Required {
            field: "toolbarTitle".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Validation error: toolbarTitle is required");
    }
}
