//! # Color Specs
//!
//! Button colors travel across the scanner boundary as strings and are only
//! resolved when the confirmation surface renders them.
//!
//! ## Accepted Forms
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "#RRGGBB"     → alpha forced to 0xFF          "#1E88E5" → 0xFF1E88E5   │
//! │  "#AARRGGBB"   → taken as-is                   "#801E88E5" → 0x801E88E5 │
//! │  named color   → platform palette (see below)  "teal"    → 0xFF008080   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`ColorSpec`] keeps the producer's original text so the config payload
//! round-trips byte-for-byte; [`ColorSpec::resolve`] does the parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidColorSpec;

// =============================================================================
// Argb
// =============================================================================

/// A resolved 32-bit color, packed as `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argb(u32);

impl Argb {
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Argb(value)
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(&self) -> u8 {
        self.0 as u8
    }

    /// Shortest hex form: `#RRGGBB` when opaque, `#AARRGGBB` otherwise.
    pub fn to_hex(&self) -> String {
        if self.alpha() == 0xFF {
            format!("#{:06X}", self.0 & 0x00FF_FFFF)
        } else {
            format!("#{:08X}", self.0)
        }
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// =============================================================================
// Named Palette
// =============================================================================

/// Names understood by the platform color parser, lowercase.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0xFF00_0000),
    ("darkgray", 0xFF44_4444),
    ("gray", 0xFF88_8888),
    ("lightgray", 0xFFCC_CCCC),
    ("white", 0xFFFF_FFFF),
    ("red", 0xFFFF_0000),
    ("green", 0xFF00_FF00),
    ("blue", 0xFF00_00FF),
    ("yellow", 0xFFFF_FF00),
    ("cyan", 0xFF00_FFFF),
    ("magenta", 0xFFFF_00FF),
    ("aqua", 0xFF00_FFFF),
    ("fuchsia", 0xFFFF_00FF),
    ("darkgrey", 0xFF44_4444),
    ("grey", 0xFF88_8888),
    ("lightgrey", 0xFFCC_CCCC),
    ("lime", 0xFF00_FF00),
    ("maroon", 0xFF80_0000),
    ("navy", 0xFF00_0080),
    ("olive", 0xFF80_8000),
    ("purple", 0xFF80_0080),
    ("silver", 0xFFC0_C0C0),
    ("teal", 0xFF00_8080),
];

// =============================================================================
// ColorSpec
// =============================================================================

/// An unresolved color string as written by the payload producer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorSpec(String);

impl ColorSpec {
    /// Wraps a color string without validating it.
    ///
    /// Decoded payloads use this path: a bad optional color must not fail the
    /// whole payload, only the rendering of that one field.
    pub fn new(spec: impl Into<String>) -> Self {
        ColorSpec(spec.into())
    }

    /// Wraps a color string, rejecting it if it does not resolve.
    pub fn parse(spec: impl Into<String>) -> Result<Self, InvalidColorSpec> {
        let spec = ColorSpec(spec.into());
        spec.resolve()?;
        Ok(spec)
    }

    /// Builds a spec from a resolved color.
    pub fn from_argb(color: Argb) -> Self {
        ColorSpec(color.to_hex())
    }

    /// Returns the original text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the spec to an ARGB value.
    ///
    /// ## Example
    /// ```rust
    /// use scanflow_core::color::ColorSpec;
    ///
    /// assert_eq!(ColorSpec::new("#FFFFFF").resolve().unwrap().value(), 0xFFFFFFFF);
    /// assert_eq!(ColorSpec::new("#80000000").resolve().unwrap().alpha(), 0x80);
    /// assert!(ColorSpec::new("#FFF").resolve().is_err());
    /// ```
    pub fn resolve(&self) -> Result<Argb, InvalidColorSpec> {
        if let Some(hex) = self.0.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| self.invalid("expected #RRGGBB or #AARRGGBB"));
        }

        let lowered = self.0.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, value)| Argb(*value))
            .ok_or_else(|| self.invalid("unknown color"))
    }

    fn invalid(&self, reason: &str) -> InvalidColorSpec {
        InvalidColorSpec {
            spec: self.0.clone(),
            reason: reason.to_string(),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Argb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let value = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some(Argb(0xFF00_0000 | value)),
        8 => Some(Argb(value)),
        _ => None,
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Argb> for ColorSpec {
    fn from(color: Argb) -> Self {
        ColorSpec::from_argb(color)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rgb_forces_opaque_alpha() {
        let color = ColorSpec::new("#1E88E5").resolve().unwrap();
        assert_eq!(color.value(), 0xFF1E_88E5);
        assert_eq!(color.alpha(), 0xFF);
        assert_eq!(color.red(), 0x1E);
        assert_eq!(color.green(), 0x88);
        assert_eq!(color.blue(), 0xE5);
    }

    #[test]
    fn test_resolve_argb_keeps_alpha() {
        let color = ColorSpec::new("#801e88e5").resolve().unwrap();
        assert_eq!(color.value(), 0x801E_88E5);
    }

    #[test]
    fn test_resolve_named_colors() {
        assert_eq!(ColorSpec::new("teal").resolve().unwrap().value(), 0xFF00_8080);
        assert_eq!(ColorSpec::new("WHITE").resolve().unwrap().value(), 0xFFFF_FFFF);
        assert_eq!(
            ColorSpec::new("grey").resolve().unwrap(),
            ColorSpec::new("gray").resolve().unwrap()
        );
    }

    #[test]
    fn test_resolve_rejects_bad_specs() {
        let bad_specs = [
            "", "#", "#FFF", "#FFFFF", "#FFFFFFF", "#GGGGGG", "#+FFFFF", "FFFFFF", "orange",
        ];
        for bad in bad_specs {
            assert!(ColorSpec::new(bad).resolve().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_resolve_rejects_surrounding_whitespace() {
        for padded in [" #FFFFFF", "#FFFFFF ", " #FFFFFF ", " red", "red\n"] {
            assert!(ColorSpec::new(padded).resolve().is_err(), "accepted {padded:?}");
        }
        assert!(ColorSpec::parse(" #000000").is_err());
    }

    #[test]
    fn test_parse_validates() {
        assert!(ColorSpec::parse("#000000").is_ok());
        let err = ColorSpec::parse("#12").unwrap_err();
        assert_eq!(err.spec, "#12");
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Argb::from_u32(0xFFFF_FFFF).to_hex(), "#FFFFFF");
        assert_eq!(Argb::from_u32(0x0000_00FF).to_hex(), "#000000FF");
        assert_eq!(ColorSpec::from_argb(Argb::from_u32(0xFF12_3456)).as_str(), "#123456");
    }

    #[test]
    fn test_spec_keeps_original_text() {
        let spec = ColorSpec::new("#ffffff");
        assert_eq!(spec.as_str(), "#ffffff");
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"#ffffff\"");
    }
}
