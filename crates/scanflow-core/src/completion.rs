//! # Raw Completion Signal
//!
//! What the external scanner hands back when it finishes: a result code and a
//! bag of extras. Nothing here interprets the result; that is
//! [`crate::classifier`]'s job.
//!
//! ## Signals the Scanner Produces
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Situation              Result code   Extras                            │
//! │  ─────────────────────  ───────────   ─────────────────────────────     │
//! │  Barcode decoded        Ok            SCAN_RESULT, SCAN_RESULT_FORMAT,  │
//! │                                       orientation, EC level, image path │
//! │  User backed out        Canceled      (none)                            │
//! │  Camera permission      Canceled      MISSING_CAMERA_PERMISSION = true  │
//! │  Scanner timeout        Canceled      TIMEOUT = true                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Contents are only read from an `Ok` signal; a `Canceled` signal never
//! carries decoded text even if a stray `SCAN_RESULT` extra is present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::options::BarcodeFormat;
use crate::request::{extras, ExtraValue};

// =============================================================================
// Result Code
// =============================================================================

/// Coarse status reported by the scanner alongside its extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    Ok,
    Canceled,
}

// =============================================================================
// Scan Metadata
// =============================================================================

/// Diagnostic details that accompany a completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScanMetadata {
    /// Symbology name, e.g. `"EAN_13"`.
    pub format_name: Option<String>,
    /// Rotation in degrees that produced the decode.
    pub orientation: Option<i32>,
    pub error_correction_level: Option<String>,
    /// Path to the saved barcode image, when image capture was requested.
    pub barcode_image_path: Option<String>,
    /// The scanner gave up on its own inactivity timer.
    pub timed_out: bool,
}

// =============================================================================
// Raw Completion
// =============================================================================

/// The unclassified completion signal for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawCompletion {
    result_code: ResultCode,
    extras: BTreeMap<String, ExtraValue>,
}

impl RawCompletion {
    pub fn new(result_code: ResultCode) -> Self {
        RawCompletion {
            result_code,
            extras: BTreeMap::new(),
        }
    }

    /// A successful decode.
    pub fn decoded(text: impl Into<String>) -> Self {
        Self::new(ResultCode::Ok).with_extra(extras::RESULT, text.into())
    }

    /// A successful decode with its symbology.
    pub fn decoded_as(text: impl Into<String>, format: BarcodeFormat) -> Self {
        Self::decoded(text).with_extra(extras::RESULT_FORMAT, format.as_str())
    }

    /// The user backed out.
    pub fn cancelled() -> Self {
        Self::new(ResultCode::Canceled)
    }

    /// The scanner could not get camera permission.
    pub fn permission_denied() -> Self {
        Self::cancelled().with_extra(extras::MISSING_CAMERA_PERMISSION, true)
    }

    /// The scanner's own timeout fired.
    pub fn timed_out() -> Self {
        Self::cancelled().with_extra(extras::TIMEOUT, true)
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn result_code(&self) -> ResultCode {
        self.result_code
    }

    pub fn extras(&self) -> &BTreeMap<String, ExtraValue> {
        &self.extras
    }

    /// Decoded text; `None` unless the scanner reported success.
    pub fn contents(&self) -> Option<&str> {
        match self.result_code {
            ResultCode::Ok => self.extras.get(extras::RESULT).and_then(ExtraValue::as_str),
            ResultCode::Canceled => None,
        }
    }

    /// Whether the permission-denial marker is attached.
    ///
    /// Presence is the signal: the marker's value is not inspected, so an
    /// explicit `false` still counts as denied.
    pub fn permission_denied_marker(&self) -> bool {
        self.extras.contains_key(extras::MISSING_CAMERA_PERMISSION)
    }

    /// Collects the diagnostic extras.
    pub fn metadata(&self) -> ScanMetadata {
        let text = |key: &str| {
            self.extras
                .get(key)
                .and_then(ExtraValue::as_str)
                .map(str::to_string)
        };

        match self.result_code {
            ResultCode::Ok => ScanMetadata {
                format_name: text(extras::RESULT_FORMAT),
                orientation: self
                    .extras
                    .get(extras::RESULT_ORIENTATION)
                    .and_then(ExtraValue::as_int),
                error_correction_level: text(extras::RESULT_ERROR_CORRECTION_LEVEL),
                barcode_image_path: text(extras::RESULT_BARCODE_IMAGE_PATH),
                timed_out: false,
            },
            ResultCode::Canceled => ScanMetadata {
                timed_out: self
                    .extras
                    .get(extras::TIMEOUT)
                    .and_then(ExtraValue::as_bool)
                    .unwrap_or(false),
                ..ScanMetadata::default()
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_only_on_ok() {
        assert_eq!(RawCompletion::decoded("123").contents(), Some("123"));
        assert_eq!(RawCompletion::decoded("").contents(), Some(""));

        let stray = RawCompletion::cancelled().with_extra(extras::RESULT, "123");
        assert_eq!(stray.contents(), None);

        // Ok without a result extra is treated as no text
        assert_eq!(RawCompletion::new(ResultCode::Ok).contents(), None);
    }

    #[test]
    fn test_permission_marker_is_presence_based() {
        assert!(RawCompletion::permission_denied().permission_denied_marker());
        assert!(RawCompletion::cancelled()
            .with_extra(extras::MISSING_CAMERA_PERMISSION, false)
            .permission_denied_marker());
        assert!(!RawCompletion::cancelled().permission_denied_marker());
    }

    #[test]
    fn test_metadata() {
        let raw = RawCompletion::decoded_as("4006381333931", BarcodeFormat::Ean13)
            .with_extra(extras::RESULT_ORIENTATION, 90)
            .with_extra(extras::RESULT_BARCODE_IMAGE_PATH, "/tmp/barcodeimage.jpg");

        let meta = raw.metadata();
        assert_eq!(meta.format_name.as_deref(), Some("EAN_13"));
        assert_eq!(meta.orientation, Some(90));
        assert_eq!(meta.barcode_image_path.as_deref(), Some("/tmp/barcodeimage.jpg"));
        assert!(!meta.timed_out);

        assert!(RawCompletion::timed_out().metadata().timed_out);
        assert_eq!(RawCompletion::cancelled().metadata(), ScanMetadata::default());
    }
}
