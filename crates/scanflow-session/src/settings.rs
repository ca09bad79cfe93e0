//! # Scanner Settings
//!
//! Per-device defaults for every launch: orientation lock, beep, torch,
//! camera, formats, prompt, and the scanner-side timeout.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SCANFLOW_ORIENTATION_LOCKED=false                                  │
//! │     SCANFLOW_FORMATS=EAN_13,UPC_A                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/scanflow/scanner.toml (Linux)                            │
//! │     ~/Library/Application Support/com.scanflow.scanflow/scanner.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     config's orientation, beep on, torch off, all formats              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # scanner.toml
//! [scanner]
//! orientation_locked = true
//! beep_enabled = true
//! torch_enabled = false
//! barcode_image_enabled = false
//! camera_id = 0
//! timeout_ms = 30000
//! formats = ["EAN_13", "UPC_A"]
//! prompt = "Place the barcode inside the frame"
//! ```

use std::path::PathBuf;

use scanflow_core::{BarcodeFormat, ScanOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Scanner Section
// =============================================================================

/// The `[scanner]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Lock the capture surface to its launch orientation. Absent means the
    /// scan config decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation_locked: Option<bool>,

    #[serde(default = "default_true")]
    pub beep_enabled: bool,

    #[serde(default)]
    pub torch_enabled: bool,

    /// Save the decoded barcode image and report its path.
    #[serde(default)]
    pub barcode_image_enabled: bool,

    /// Preferred camera; absent means the scanner picks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<u32>,

    /// Scanner-side inactivity timeout. Expiry is reported as a cancellation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Restrict decoding to these formats; absent means all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<BarcodeFormat>>,

    /// Prompt shown on the capture surface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for ScannerSettings {
    fn default() -> Self {
        ScannerSettings {
            orientation_locked: None,
            beep_enabled: true,
            torch_enabled: false,
            barcode_image_enabled: false,
            camera_id: None,
            timeout_ms: None,
            formats: None,
            prompt: None,
        }
    }
}

// =============================================================================
// Main Settings
// =============================================================================

/// Complete scanner settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    #[serde(default)]
    pub scanner: ScannerSettings,
}

impl ScanSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Settings file (scanner.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut settings = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading scanner settings from file");
                let contents = std::fs::read_to_string(&path)?;
                settings = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Settings file not found, using defaults");
            }
        }

        settings.apply_env_overrides();
        settings.validate()?;

        Ok(settings)
    }

    /// Loads settings or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load scanner settings: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves settings to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Scanner settings saved");
        Ok(())
    }

    /// Validates the settings.
    pub fn validate(&self) -> SessionResult<()> {
        let scanner = &self.scanner;

        if scanner.timeout_ms == Some(0) {
            return Err(SessionError::InvalidConfig(
                "timeout_ms must be greater than 0".into(),
            ));
        }

        if let Some(formats) = &scanner.formats {
            if formats.is_empty() {
                return Err(SessionError::InvalidConfig(
                    "formats must list at least one format, or be omitted".into(),
                ));
            }
        }

        if let Some(prompt) = &scanner.prompt {
            if prompt.trim().is_empty() {
                return Err(SessionError::InvalidConfig("prompt must not be blank".into()));
            }
        }

        Ok(())
    }

    /// Launch options seeded from these settings.
    pub fn scan_options(&self) -> ScanOptions {
        let scanner = &self.scanner;
        let mut options = ScanOptions::new()
            .beep_enabled(scanner.beep_enabled)
            .torch_enabled(scanner.torch_enabled)
            .barcode_image_enabled(scanner.barcode_image_enabled);

        if let Some(locked) = scanner.orientation_locked {
            options = options.orientation_locked(locked);
        }

        options.camera_id = scanner.camera_id;
        options.timeout_ms = scanner.timeout_ms;
        options.desired_formats = scanner.formats.clone();
        options.prompt = scanner.prompt.clone();
        options
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `SCANFLOW_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let flag = |key: &str| lookup(key).and_then(|value| parse_bool(key, &value));

        if let Some(locked) = flag("SCANFLOW_ORIENTATION_LOCKED") {
            debug!(locked, "Overriding orientation lock from environment");
            self.scanner.orientation_locked = Some(locked);
        }

        if let Some(enabled) = flag("SCANFLOW_BEEP_ENABLED") {
            self.scanner.beep_enabled = enabled;
        }

        if let Some(enabled) = flag("SCANFLOW_TORCH_ENABLED") {
            self.scanner.torch_enabled = enabled;
        }

        if let Some(id) = lookup("SCANFLOW_CAMERA_ID") {
            match id.parse::<u32>() {
                Ok(id) => self.scanner.camera_id = Some(id),
                Err(_) => warn!(camera_id = %id, "Invalid camera id in environment"),
            }
        }

        if let Some(timeout) = lookup("SCANFLOW_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) => self.scanner.timeout_ms = Some(ms),
                Err(_) => warn!(timeout = %timeout, "Invalid timeout in environment"),
            }
        }

        if let Some(formats) = lookup("SCANFLOW_FORMATS") {
            match BarcodeFormat::parse_list(&formats) {
                Ok(parsed) => {
                    debug!(formats = %formats, "Overriding formats from environment");
                    self.scanner.formats = Some(parsed);
                }
                Err(e) => warn!(error = %e, "Invalid formats in environment"),
            }
        }

        if let Some(prompt) = lookup("SCANFLOW_PROMPT") {
            self.scanner.prompt = Some(prompt);
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "scanflow", "scanflow")
            .map(|dirs| dirs.config_dir().join("scanner.toml"))
    }
}

/// Parses a boolean environment value, warning on anything else.
fn parse_bool(key: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(key, value = %value, "Ignoring non-boolean environment value");
            None
        }
    }
}
