//! # Validation Module
//!
//! Input checks shared by the config builder, the payload decoder and the
//! options builder.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: ScanConfigBuilder::build (caller side)                       │
//! │  ├── Required fields present, title non-empty                          │
//! │  └── Button text color resolves                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: codec::decode (scanner side)                                 │
//! │  ├── Well-formed object, required keys present                         │
//! │  └── Colors NOT resolved here (rendering decides)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ConfirmationStep rendering                                   │
//! │  └── Text color fatal, background color recovered                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::DATA_TRANSFER_KEY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the toolbar title.
///
/// ## Rules
/// - Must not be empty or whitespace only
///
/// ## Example
/// ```rust
/// use scanflow_core::validation::validate_toolbar_title;
///
/// assert!(validate_toolbar_title("Title App").is_ok());
/// assert!(validate_toolbar_title("   ").is_err());
/// ```
pub fn validate_toolbar_title(title: &str) -> ValidationResult<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "toolbarTitle".to_string(),
        });
    }

    Ok(())
}

/// Unwraps a required builder field, naming it on failure.
pub fn require(field: &str, value: Option<String>) -> ValidationResult<String> {
    value.ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates a caller-supplied extra key.
///
/// ## Rules
/// - Must not be empty
/// - Must not be the config payload key
///
/// ## Example
/// ```rust
/// use scanflow_core::validation::validate_extra_key;
///
/// assert!(validate_extra_key("STORE_ID").is_ok());
/// assert!(validate_extra_key("DataTransfer").is_err());
/// ```
pub fn validate_extra_key(key: &str) -> ValidationResult<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "extra key".to_string(),
        });
    }

    if key == DATA_TRANSFER_KEY {
        return Err(ValidationError::ReservedKey {
            key: key.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
