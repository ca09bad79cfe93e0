//! # scanflow-core: Pure Scan Protocol for Scanflow
//!
//! This crate is the **heart** of Scanflow. It describes a scan request,
//! carries its UI customization across the scanner boundary, and classifies
//! what comes back. Zero I/O, zero async.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scanflow Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Caller (POS screen)                          │   │
//! │  │      build ScanConfig ──► launch ──► await outcome/decision     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            scanflow-session (async sessions, confirmation)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ scanflow-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐  │   │
//! │  │   │  config   │  │   codec   │  │  request  │  │ classifier │  │   │
//! │  │   │ ScanConfig│  │ encode    │  │ ScanReq.  │  │  classify  │  │   │
//! │  │   │ ColorSpec │  │ decode    │  │ options   │  │ completion │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CHANNELS • NO UI • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            External scanner (camera, decoder, permissions)      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `ScanConfig` value object and builder
//! - [`color`] - Color specs and their resolution to ARGB
//! - [`codec`] - Config payload encode/decode
//! - [`options`] - Launch options and barcode formats
//! - [`request`] - The assembled scan request and extra keys
//! - [`completion`] - The raw completion signal
//! - [`classifier`] - Raw completion → `ScanOutcome`
//! - [`types`] - Outcomes, decisions, caller-facing events
//! - [`error`] - Protocol error types
//! - [`validation`] - Shared input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use scanflow_core::{codec, ScanConfig};
//!
//! let config = ScanConfig::builder()
//!     .toolbar_title("Receiving")
//!     .product_name("Cola 330ml")
//!     .product_quantity("24 Unit")
//!     .banner_messages("Is this the right item?", "Check the label")
//!     .button_label("Item is correct")
//!     .button_text_color("#FFFFFF")
//!     .build()
//!     .unwrap();
//!
//! let payload = codec::encode(&config);
//! assert_eq!(codec::decode(&payload).unwrap(), config);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classifier;
pub mod codec;
pub mod color;
pub mod completion;
pub mod config;
pub mod error;
pub mod options;
pub mod request;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use classifier::{classify, classify_completion};
pub use color::{Argb, ColorSpec};
pub use completion::{RawCompletion, ResultCode, ScanMetadata};
pub use config::{CaptureHeader, ScanConfig, ScanConfigBuilder};
pub use error::{CoreError, CoreResult, DecodeError, InvalidColorSpec, ValidationError};
pub use options::{BarcodeFormat, ScanOptions};
pub use request::{ExtraValue, ScanRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Extra key under which the encoded [`ScanConfig`] travels.
///
/// ## Wire Contract
/// Existing scanner integrations read this exact key; it must never change
/// and no other extra may use it (see [`validation::validate_extra_key`]).
pub const DATA_TRANSFER_KEY: &str = "DataTransfer";
