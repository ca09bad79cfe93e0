//! # Scan Config
//!
//! The value object a caller builds to customize the scanner UI for one scan.
//!
//! ## Where Each Field Shows Up
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Capture surface (during scan)        Confirmation surface (after)      │
//! │  ─────────────────────────────        ────────────────────────────      │
//! │  ┌─────────────────────────────┐      ┌─────────────────────────────┐   │
//! │  │ toolbarTitle                │      │ bannerMessage1              │   │
//! │  ├─────────────────────────────┤      │ bannerMessage2              │   │
//! │  │ productName                 │      │                             │   │
//! │  │ productQuantity             │      │ ┌─────────────────────────┐ │   │
//! │  │                             │      │ │ buttonLabel             │ │   │
//! │  │      [ viewfinder ]         │      │ │ buttonTextColor         │ │   │
//! │  │                             │      │ │ buttonBackgroundColor?  │ │   │
//! │  └─────────────────────────────┘      │ └─────────────────────────┘ │   │
//! │   orientationLocked applies here      └─────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability
//! Fields are private; a config is built once through [`ScanConfigBuilder`]
//! (or decoded from a payload) and then only read.

use crate::color::ColorSpec;
use crate::error::CoreResult;
use crate::validation::{require, validate_toolbar_title};

// =============================================================================
// Scan Config
// =============================================================================

/// UI customization for a single scan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub(crate) toolbar_title: String,
    pub(crate) product_name: String,
    pub(crate) product_quantity: String,
    pub(crate) banner_message_1: String,
    pub(crate) banner_message_2: String,
    pub(crate) button_label: String,
    pub(crate) button_background_color: Option<ColorSpec>,
    pub(crate) button_text_color: ColorSpec,
    pub(crate) orientation_locked: bool,
}

impl ScanConfig {
    /// Starts a builder. Orientation is locked unless told otherwise.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    pub fn toolbar_title(&self) -> &str {
        &self.toolbar_title
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn product_quantity(&self) -> &str {
        &self.product_quantity
    }

    pub fn banner_message_1(&self) -> &str {
        &self.banner_message_1
    }

    pub fn banner_message_2(&self) -> &str {
        &self.banner_message_2
    }

    pub fn button_label(&self) -> &str {
        &self.button_label
    }

    /// `None` means "leave the platform's default button background alone".
    pub fn button_background_color(&self) -> Option<&ColorSpec> {
        self.button_background_color.as_ref()
    }

    pub fn button_text_color(&self) -> &ColorSpec {
        &self.button_text_color
    }

    pub fn orientation_locked(&self) -> bool {
        self.orientation_locked
    }

    /// The header the capture surface shows while the camera is running.
    pub fn header(&self) -> CaptureHeader<'_> {
        CaptureHeader {
            toolbar_title: &self.toolbar_title,
            product_name: &self.product_name,
            product_quantity: &self.product_quantity,
        }
    }
}

/// Borrowed view of the capture-time header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureHeader<'a> {
    pub toolbar_title: &'a str,
    pub product_name: &'a str,
    pub product_quantity: &'a str,
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`ScanConfig`].
///
/// ## Example
/// ```rust
/// use scanflow_core::ScanConfig;
///
/// let config = ScanConfig::builder()
///     .toolbar_title("Title App")
///     .product_name("jshdsjjks")
///     .product_quantity("10 Unit")
///     .banner_messages("message 1", "message222")
///     .button_label("Button Text")
///     .button_text_color("#FFFFFF")
///     .build()
///     .unwrap();
///
/// assert!(config.button_background_color().is_none());
/// assert!(config.orientation_locked());
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfigBuilder {
    toolbar_title: Option<String>,
    product_name: Option<String>,
    product_quantity: Option<String>,
    banner_message_1: Option<String>,
    banner_message_2: Option<String>,
    button_label: Option<String>,
    button_background_color: Option<ColorSpec>,
    button_text_color: Option<String>,
    orientation_locked: bool,
}

impl Default for ScanConfigBuilder {
    fn default() -> Self {
        ScanConfigBuilder {
            toolbar_title: None,
            product_name: None,
            product_quantity: None,
            banner_message_1: None,
            banner_message_2: None,
            button_label: None,
            button_background_color: None,
            button_text_color: None,
            orientation_locked: true,
        }
    }
}

impl ScanConfigBuilder {
    pub fn toolbar_title(mut self, title: impl Into<String>) -> Self {
        self.toolbar_title = Some(title.into());
        self
    }

    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn product_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.product_quantity = Some(quantity.into());
        self
    }

    /// Sets both confirmation banner lines.
    pub fn banner_messages(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.banner_message_1 = Some(first.into());
        self.banner_message_2 = Some(second.into());
        self
    }

    pub fn button_label(mut self, label: impl Into<String>) -> Self {
        self.button_label = Some(label.into());
        self
    }

    /// Overrides the button background.
    ///
    /// Not validated: an unresolvable background is dropped at render time.
    pub fn button_background_color(mut self, color: impl Into<String>) -> Self {
        self.button_background_color = Some(ColorSpec::new(color));
        self
    }

    pub fn button_text_color(mut self, color: impl Into<String>) -> Self {
        self.button_text_color = Some(color.into());
        self
    }

    pub fn orientation_locked(mut self, locked: bool) -> Self {
        self.orientation_locked = locked;
        self
    }

    /// Validates and freezes the config.
    ///
    /// ## Errors
    /// - `Validation(Required)` for any missing field or an empty title
    /// - `Color` when the button text color does not resolve
    pub fn build(self) -> CoreResult<ScanConfig> {
        let toolbar_title = require("toolbarTitle", self.toolbar_title)?;
        validate_toolbar_title(&toolbar_title)?;

        let product_name = require("productName", self.product_name)?;
        let product_quantity = require("productQuantity", self.product_quantity)?;
        let banner_message_1 = require("bsMessage1", self.banner_message_1)?;
        let banner_message_2 = require("bsMessage2", self.banner_message_2)?;
        let button_label = require("buttonText", self.button_label)?;
        let button_text_color =
            ColorSpec::parse(require("buttonTextColor", self.button_text_color)?)?;

        Ok(ScanConfig {
            toolbar_title,
            product_name,
            product_quantity,
            banner_message_1,
            banner_message_2,
            button_label,
            button_background_color: self.button_background_color,
            button_text_color,
            orientation_locked: self.orientation_locked,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
