//! # Scan Options
//!
//! Per-launch knobs forwarded to the external scanner as request extras.
//!
//! ## Option → Extra Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Option               Extra key                  Value                  │
//! │  ──────────────────   ───────────────────────    ─────────────────────  │
//! │  orientation_locked   SCAN_ORIENTATION_LOCKED    bool (config fallback) │
//! │  prompt               PROMPT_MESSAGE             string                 │
//! │  camera_id            SCAN_CAMERA_ID             int                    │
//! │  torch_enabled        TORCH_ENABLED              bool                   │
//! │  beep_enabled         BEEP_ENABLED               bool                   │
//! │  barcode_image        BARCODE_IMAGE_ENABLED      bool                   │
//! │  desired_formats      SCAN_FORMATS               "UPC_A,EAN_13"         │
//! │  timeout_ms           TIMEOUT                    long                   │
//! │  add_extra(k, v)      k                          v                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `timeout_ms` is a hint for the scanner, which reports expiry as a
//! cancellation. The session itself never times out.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::request::ExtraValue;
use crate::validation::validate_extra_key;

// =============================================================================
// Barcode Format
// =============================================================================

/// Symbologies the external scanner can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarcodeFormat {
    // Product codes
    UpcA,
    UpcE,
    #[serde(rename = "EAN_8")]
    Ean8,
    #[serde(rename = "EAN_13")]
    Ean13,
    #[serde(rename = "RSS_14")]
    Rss14,

    // Other 1D
    #[serde(rename = "CODE_39")]
    Code39,
    #[serde(rename = "CODE_93")]
    Code93,
    #[serde(rename = "CODE_128")]
    Code128,
    Itf,
    RssExpanded,

    // 2D
    QrCode,
    DataMatrix,
    #[serde(rename = "PDF_417")]
    Pdf417,
}

impl BarcodeFormat {
    /// Retail product codes.
    pub const PRODUCT_CODE_TYPES: &'static [BarcodeFormat] = &[
        BarcodeFormat::UpcA,
        BarcodeFormat::UpcE,
        BarcodeFormat::Ean8,
        BarcodeFormat::Ean13,
        BarcodeFormat::Rss14,
    ];

    /// All linear symbologies.
    pub const ONE_D_CODE_TYPES: &'static [BarcodeFormat] = &[
        BarcodeFormat::UpcA,
        BarcodeFormat::UpcE,
        BarcodeFormat::Ean8,
        BarcodeFormat::Ean13,
        BarcodeFormat::Rss14,
        BarcodeFormat::Code39,
        BarcodeFormat::Code93,
        BarcodeFormat::Code128,
        BarcodeFormat::Itf,
        BarcodeFormat::RssExpanded,
    ];

    /// Wire name as the scanner expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeFormat::UpcA => "UPC_A",
            BarcodeFormat::UpcE => "UPC_E",
            BarcodeFormat::Ean8 => "EAN_8",
            BarcodeFormat::Ean13 => "EAN_13",
            BarcodeFormat::Rss14 => "RSS_14",
            BarcodeFormat::Code39 => "CODE_39",
            BarcodeFormat::Code93 => "CODE_93",
            BarcodeFormat::Code128 => "CODE_128",
            BarcodeFormat::Itf => "ITF",
            BarcodeFormat::RssExpanded => "RSS_EXPANDED",
            BarcodeFormat::QrCode => "QR_CODE",
            BarcodeFormat::DataMatrix => "DATA_MATRIX",
            BarcodeFormat::Pdf417 => "PDF_417",
        }
    }

    /// Joins formats the way the `SCAN_FORMATS` extra carries them.
    pub fn join(formats: &[BarcodeFormat]) -> String {
        formats
            .iter()
            .map(BarcodeFormat::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parses a comma-separated format list, ignoring blank entries.
    pub fn parse_list(list: &str) -> Result<Vec<BarcodeFormat>, ValidationError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarcodeFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UPC_A" => Ok(BarcodeFormat::UpcA),
            "UPC_E" => Ok(BarcodeFormat::UpcE),
            "EAN_8" => Ok(BarcodeFormat::Ean8),
            "EAN_13" => Ok(BarcodeFormat::Ean13),
            "RSS_14" => Ok(BarcodeFormat::Rss14),
            "CODE_39" => Ok(BarcodeFormat::Code39),
            "CODE_93" => Ok(BarcodeFormat::Code93),
            "CODE_128" => Ok(BarcodeFormat::Code128),
            "ITF" => Ok(BarcodeFormat::Itf),
            "RSS_EXPANDED" => Ok(BarcodeFormat::RssExpanded),
            "QR_CODE" => Ok(BarcodeFormat::QrCode),
            "DATA_MATRIX" => Ok(BarcodeFormat::DataMatrix),
            "PDF_417" => Ok(BarcodeFormat::Pdf417),
            other => Err(ValidationError::InvalidFormat {
                field: "barcode format".to_string(),
                reason: format!("unknown format '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Scan Options
// =============================================================================

/// Launch options for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Explicit orientation lock; `None` defers to the config's value.
    pub orientation_locked: Option<bool>,

    /// Prompt shown on the capture surface instead of the default.
    pub prompt: Option<String>,

    /// Camera to open; `None` means no preference.
    pub camera_id: Option<u32>,

    /// Start with the torch on.
    pub torch_enabled: bool,

    /// Beep on a successful scan.
    pub beep_enabled: bool,

    /// Ask the scanner to save the barcode image and report its path.
    pub barcode_image_enabled: bool,

    /// Restrict decoding to these formats; `None` means all formats.
    pub desired_formats: Option<Vec<BarcodeFormat>>,

    /// Scanner-side inactivity timeout.
    pub timeout_ms: Option<u64>,

    /// Caller-defined extras, validated against the reserved key.
    extras: BTreeMap<String, ExtraValue>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            orientation_locked: None,
            prompt: None,
            camera_id: None,
            torch_enabled: false,
            beep_enabled: true,
            barcode_image_enabled: false,
            desired_formats: None,
            timeout_ms: None,
            extras: BTreeMap::new(),
        }
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation_locked(mut self, locked: bool) -> Self {
        self.orientation_locked = Some(locked);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Selects a camera. A negative id means "no preference".
    pub fn camera_id(mut self, camera_id: i32) -> Self {
        self.camera_id = u32::try_from(camera_id).ok();
        self
    }

    pub fn torch_enabled(mut self, enabled: bool) -> Self {
        self.torch_enabled = enabled;
        self
    }

    pub fn beep_enabled(mut self, enabled: bool) -> Self {
        self.beep_enabled = enabled;
        self
    }

    pub fn barcode_image_enabled(mut self, enabled: bool) -> Self {
        self.barcode_image_enabled = enabled;
        self
    }

    pub fn desired_formats(mut self, formats: &[BarcodeFormat]) -> Self {
        self.desired_formats = Some(formats.to_vec());
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Adds a free-form extra.
    ///
    /// ## Errors
    /// `ReservedKey` for the config payload key, `Required` for an empty key.
    pub fn add_extra(
        mut self,
        key: impl Into<String>,
        value: impl Into<ExtraValue>,
    ) -> CoreResult<Self> {
        let key = key.into();
        validate_extra_key(&key)?;
        self.extras.insert(key, value.into());
        Ok(self)
    }

    /// Caller-defined extras.
    pub fn extras(&self) -> &BTreeMap<String, ExtraValue> {
        &self.extras
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::DATA_TRANSFER_KEY;

    #[test]
    fn test_format_names_round_trip() {
        for format in BarcodeFormat::ONE_D_CODE_TYPES
            .iter()
            .chain([BarcodeFormat::QrCode, BarcodeFormat::DataMatrix, BarcodeFormat::Pdf417].iter())
        {
            assert_eq!(format.as_str().parse::<BarcodeFormat>().unwrap(), *format);
        }
        assert_eq!("qr_code".parse::<BarcodeFormat>().unwrap(), BarcodeFormat::QrCode);
        assert!("AZTEC".parse::<BarcodeFormat>().is_err());
    }

    #[test]
    fn test_format_list() {
        assert_eq!(
            BarcodeFormat::join(BarcodeFormat::PRODUCT_CODE_TYPES),
            "UPC_A,UPC_E,EAN_8,EAN_13,RSS_14"
        );
        assert_eq!(
            BarcodeFormat::parse_list("EAN_13, qr_code,").unwrap(),
            vec![BarcodeFormat::Ean13, BarcodeFormat::QrCode]
        );
        assert!(BarcodeFormat::parse_list("EAN_13,BOGUS").is_err());
    }

    #[test]
    fn test_defaults() {
        let options = ScanOptions::default();
        assert_eq!(options.orientation_locked, None);
        assert!(options.beep_enabled);
        assert!(!options.torch_enabled);
        assert!(options.extras().is_empty());
    }

    #[test]
    fn test_negative_camera_id_means_no_preference() {
        assert_eq!(ScanOptions::new().camera_id(-1).camera_id, None);
        assert_eq!(ScanOptions::new().camera_id(1).camera_id, Some(1));
    }

    #[test]
    fn test_reserved_extra_key_rejected() {
        let err = ScanOptions::new().add_extra(DATA_TRANSFER_KEY, "x").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::ReservedKey { .. })
        ));

        let options = ScanOptions::new().add_extra("STORE_ID", "store-001").unwrap();
        assert_eq!(
            options.extras().get("STORE_ID"),
            Some(&ExtraValue::Str("store-001".to_string()))
        );
    }
}
