//! # Scan Request
//!
//! The launch-time description handed to the external scanner: an action name
//! plus a flat map of primitive extras, one of which is the encoded config.
//!
//! ## Request Assembly
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ScanConfig ──► codec::encode ──► extras["DataTransfer"] = "{...}"     │
//! │                                                                         │
//! │   ScanOptions ─┬─► caller extras        (validated, never DataTransfer) │
//! │                └─► option extras        (SCAN_ORIENTATION_LOCKED, ...)  │
//! │                                                                         │
//! │   ScanRequest { action: "com.google.zxing.client.android.SCAN", extras }│
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::codec;
use crate::config::ScanConfig;
use crate::error::DecodeError;
use crate::options::{BarcodeFormat, ScanOptions};
use crate::DATA_TRANSFER_KEY;

/// Extra keys understood by the external scanner.
///
/// These names are part of the scanner's existing contract and must not change.
pub mod extras {
    /// Action name of a scan request.
    pub const ACTION: &str = "com.google.zxing.client.android.SCAN";

    // Request extras
    pub const ORIENTATION_LOCKED: &str = "SCAN_ORIENTATION_LOCKED";
    pub const PROMPT_MESSAGE: &str = "PROMPT_MESSAGE";
    pub const CAMERA_ID: &str = "SCAN_CAMERA_ID";
    pub const TORCH_ENABLED: &str = "TORCH_ENABLED";
    pub const BEEP_ENABLED: &str = "BEEP_ENABLED";
    pub const BARCODE_IMAGE_ENABLED: &str = "BARCODE_IMAGE_ENABLED";
    pub const FORMATS: &str = "SCAN_FORMATS";
    pub const TIMEOUT: &str = "TIMEOUT";

    // Completion extras
    pub const RESULT: &str = "SCAN_RESULT";
    pub const RESULT_FORMAT: &str = "SCAN_RESULT_FORMAT";
    pub const RESULT_ORIENTATION: &str = "SCAN_RESULT_ORIENTATION";
    pub const RESULT_ERROR_CORRECTION_LEVEL: &str = "SCAN_RESULT_ERROR_CORRECTION_LEVEL";
    pub const RESULT_BARCODE_IMAGE_PATH: &str = "SCAN_RESULT_IMAGE_PATH";
    pub const MISSING_CAMERA_PERMISSION: &str = "MISSING_CAMERA_PERMISSION";
}

// =============================================================================
// Extra Value
// =============================================================================

/// A primitive value the scanner boundary can carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Str(String),
}

impl ExtraValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExtraValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtraValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of `Int` and `Long` values that fit in an `i32`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ExtraValue::Int(i) => Some(*i),
            ExtraValue::Long(l) => i32::try_from(*l).ok(),
            _ => None,
        }
    }
}

impl From<bool> for ExtraValue {
    fn from(value: bool) -> Self {
        ExtraValue::Bool(value)
    }
}

impl From<i32> for ExtraValue {
    fn from(value: i32) -> Self {
        ExtraValue::Int(value)
    }
}

impl From<i64> for ExtraValue {
    fn from(value: i64) -> Self {
        ExtraValue::Long(value)
    }
}

impl From<&str> for ExtraValue {
    fn from(value: &str) -> Self {
        ExtraValue::Str(value.to_string())
    }
}

impl From<String> for ExtraValue {
    fn from(value: String) -> Self {
        ExtraValue::Str(value)
    }
}

// =============================================================================
// Scan Request
// =============================================================================

/// A fully assembled request, ready to hand to the external scanner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRequest {
    action: String,
    extras: BTreeMap<String, ExtraValue>,
}

impl ScanRequest {
    /// Assembles a request from a config and its launch options.
    ///
    /// Option extras are written after caller extras, so a caller extra that
    /// shadows an option key is overridden by the option.
    pub fn build(config: &ScanConfig, options: &ScanOptions) -> Self {
        let mut map = options.extras().clone();

        map.insert(
            DATA_TRANSFER_KEY.to_string(),
            ExtraValue::Str(codec::encode(config)),
        );

        let locked = options
            .orientation_locked
            .unwrap_or_else(|| config.orientation_locked());
        map.insert(extras::ORIENTATION_LOCKED.to_string(), locked.into());

        if let Some(prompt) = &options.prompt {
            map.insert(extras::PROMPT_MESSAGE.to_string(), prompt.as_str().into());
        }
        if let Some(camera_id) = options.camera_id {
            // Camera ids beyond i32 cannot be expressed on the wire; drop them
            if let Ok(id) = i32::try_from(camera_id) {
                map.insert(extras::CAMERA_ID.to_string(), id.into());
            }
        }
        map.insert(extras::TORCH_ENABLED.to_string(), options.torch_enabled.into());
        map.insert(extras::BEEP_ENABLED.to_string(), options.beep_enabled.into());
        map.insert(
            extras::BARCODE_IMAGE_ENABLED.to_string(),
            options.barcode_image_enabled.into(),
        );
        if let Some(formats) = &options.desired_formats {
            map.insert(extras::FORMATS.to_string(), BarcodeFormat::join(formats).into());
        }
        if let Some(timeout) = options.timeout_ms {
            map.insert(
                extras::TIMEOUT.to_string(),
                ExtraValue::Long(i64::try_from(timeout).unwrap_or(i64::MAX)),
            );
        }

        ScanRequest {
            action: extras::ACTION.to_string(),
            extras: map,
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn extras(&self) -> &BTreeMap<String, ExtraValue> {
        &self.extras
    }

    pub fn extra(&self, key: &str) -> Option<&ExtraValue> {
        self.extras.get(key)
    }

    /// The encoded config payload, if one is attached.
    pub fn config_payload(&self) -> Option<&str> {
        self.extra(DATA_TRANSFER_KEY).and_then(ExtraValue::as_str)
    }

    /// Effective orientation lock; the scanner locks when the extra is absent.
    pub fn orientation_locked(&self) -> bool {
        self.extra(extras::ORIENTATION_LOCKED)
            .and_then(ExtraValue::as_bool)
            .unwrap_or(true)
    }

    /// Scanner side: decodes the attached config.
    ///
    /// `Ok(None)` means no payload was attached and the scanner should use its
    /// stock UI.
    pub fn decode_config(&self) -> Result<Option<ScanConfig>, DecodeError> {
        match self.config_payload() {
            Some(payload) if !payload.is_empty() => codec::decode(payload).map(Some),
            _ => Ok(None),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
