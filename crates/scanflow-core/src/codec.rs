//! # Config Payload Codec
//!
//! Serializes a [`ScanConfig`] into the string extra that rides along with the
//! scan request, and reads it back on the scanner side.
//!
//! ## Wire Format (payload version 1)
//! A flat JSON object whose values are all strings. Key order is irrelevant.
//! ```json
//! {
//!   "payloadVersion": "1",
//!   "toolbarTitle": "Title App",
//!   "productName": "jshdsjjks",
//!   "productQuantity": "10 Unit",
//!   "bsMessage1": "message 1",
//!   "bsMessage2": "message222",
//!   "buttonText": "Button Text",
//!   "buttonTextColor": "#FFFFFF",
//!   "buttonColor": "#1E88E5",
//!   "orientationLocked": "true"
//! }
//! ```
//!
//! ## Compatibility Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  payloadVersion absent     → legacy producer, decoded as version 1     │
//! │  payloadVersion != "1"     → UnsupportedVersion                        │
//! │  buttonColor absent/null   → platform default background               │
//! │  orientationLocked absent  → locked                                    │
//! │  unknown keys              → ignored (e.g. legacy "productImage")      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payload is attached under [`crate::DATA_TRANSFER_KEY`].

use serde_json::{Map, Value};

use crate::color::ColorSpec;
use crate::config::ScanConfig;
use crate::error::DecodeError;

/// Payload version written by [`encode`].
pub const PAYLOAD_VERSION: &str = "1";

/// Wire key names.
pub mod keys {
    pub const PAYLOAD_VERSION: &str = "payloadVersion";
    pub const TOOLBAR_TITLE: &str = "toolbarTitle";
    pub const PRODUCT_NAME: &str = "productName";
    pub const PRODUCT_QUANTITY: &str = "productQuantity";
    pub const BANNER_MESSAGE_1: &str = "bsMessage1";
    pub const BANNER_MESSAGE_2: &str = "bsMessage2";
    pub const BUTTON_TEXT: &str = "buttonText";
    pub const BUTTON_TEXT_COLOR: &str = "buttonTextColor";
    pub const BUTTON_COLOR: &str = "buttonColor";
    pub const ORIENTATION_LOCKED: &str = "orientationLocked";
}

/// Keys a payload must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 7] = [
    keys::TOOLBAR_TITLE,
    keys::PRODUCT_NAME,
    keys::PRODUCT_QUANTITY,
    keys::BANNER_MESSAGE_1,
    keys::BANNER_MESSAGE_2,
    keys::BUTTON_TEXT,
    keys::BUTTON_TEXT_COLOR,
];

// =============================================================================
// Encode
// =============================================================================

/// Serializes a config into its payload string.
///
/// `buttonColor` is omitted when the config has no background override.
pub fn encode(config: &ScanConfig) -> String {
    let mut map = Map::new();
    let mut put = |key: &str, value: &str| {
        map.insert(key.to_string(), Value::String(value.to_string()));
    };

    put(keys::PAYLOAD_VERSION, PAYLOAD_VERSION);
    put(keys::TOOLBAR_TITLE, config.toolbar_title());
    put(keys::PRODUCT_NAME, config.product_name());
    put(keys::PRODUCT_QUANTITY, config.product_quantity());
    put(keys::BANNER_MESSAGE_1, config.banner_message_1());
    put(keys::BANNER_MESSAGE_2, config.banner_message_2());
    put(keys::BUTTON_TEXT, config.button_label());
    put(keys::BUTTON_TEXT_COLOR, config.button_text_color().as_str());
    if let Some(color) = config.button_background_color() {
        put(keys::BUTTON_COLOR, color.as_str());
    }
    put(
        keys::ORIENTATION_LOCKED,
        if config.orientation_locked() { "true" } else { "false" },
    );

    Value::Object(map).to_string()
}

// =============================================================================
// Decode
// =============================================================================

/// Reads a payload string back into a config.
///
/// ## Errors
/// - `Malformed` when the text is not a JSON object
/// - `MissingField(key)` for the first absent required key
/// - `InvalidField` for a non-string value or an empty title
/// - `UnsupportedVersion` for a version other than [`PAYLOAD_VERSION`]
///
/// Colors are carried through unresolved; see [`crate::color`].
pub fn decode(payload: &str) -> Result<ScanConfig, DecodeError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(DecodeError::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    if let Some(version) = string_field(&object, keys::PAYLOAD_VERSION)? {
        if version != PAYLOAD_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
    }

    // Report the first missing key deterministically before reading values
    for key in REQUIRED_FIELDS {
        if string_field(&object, key)?.is_none() {
            return Err(DecodeError::MissingField(key.to_string()));
        }
    }

    let toolbar_title = required(&object, keys::TOOLBAR_TITLE)?;
    if toolbar_title.trim().is_empty() {
        return Err(DecodeError::InvalidField {
            field: keys::TOOLBAR_TITLE.to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(ScanConfig {
        toolbar_title,
        product_name: required(&object, keys::PRODUCT_NAME)?,
        product_quantity: required(&object, keys::PRODUCT_QUANTITY)?,
        banner_message_1: required(&object, keys::BANNER_MESSAGE_1)?,
        banner_message_2: required(&object, keys::BANNER_MESSAGE_2)?,
        button_label: required(&object, keys::BUTTON_TEXT)?,
        button_background_color: string_field(&object, keys::BUTTON_COLOR)?.map(ColorSpec::new),
        button_text_color: ColorSpec::new(required(&object, keys::BUTTON_TEXT_COLOR)?),
        orientation_locked: orientation_field(&object)?,
    })
}

/// Returns a string value; `None` for absent or `null`.
fn string_field(object: &Map<String, Value>, key: &str) -> Result<Option<String>, DecodeError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DecodeError::InvalidField {
            field: key.to_string(),
            reason: format!("expected a string, got {}", json_kind(other)),
        }),
    }
}

fn required(object: &Map<String, Value>, key: &str) -> Result<String, DecodeError> {
    string_field(object, key)?.ok_or_else(|| DecodeError::MissingField(key.to_string()))
}

fn orientation_field(object: &Map<String, Value>) -> Result<bool, DecodeError> {
    match object.get(keys::ORIENTATION_LOCKED) {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s == "true" => Ok(true),
        Some(Value::String(s)) if s == "false" => Ok(false),
        Some(other) => Err(DecodeError::InvalidField {
            field: keys::ORIENTATION_LOCKED.to_string(),
            reason: format!("expected \"true\" or \"false\", got {other}"),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> ScanConfig {
        ScanConfig::builder()
            .toolbar_title("Title App")
            .product_name("jshdsjjks")
            .product_quantity("10 Unit")
            .banner_messages("message 1", "message222")
            .button_label("Button Text")
            .button_text_color("#FFFFFF")
            .build()
            .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let plain = sample_config();
        assert_eq!(decode(&encode(&plain)).unwrap(), plain);

        let styled = ScanConfig::builder()
            .toolbar_title("Receiving")
            .product_name("")
            .product_quantity("")
            .banner_messages("", "Ünïcödé \"quoted\" \n line")
            .button_label("OK")
            .button_text_color("#80000000")
            .button_background_color("teal")
            .orientation_locked(false)
            .build()
            .unwrap();
        assert_eq!(decode(&encode(&styled)).unwrap(), styled);
    }

    #[test]
    fn test_encode_shape() {
        let value: Value = serde_json::from_str(&encode(&sample_config())).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["payloadVersion"], "1");
        assert_eq!(object["buttonText"], "Button Text");
        assert_eq!(object["orientationLocked"], "true");
        assert!(!object.contains_key("buttonColor"));
        assert!(object.values().all(Value::is_string));
    }

    #[test]
    fn test_missing_required_field() {
        let payload = json!({
            "toolbarTitle": "T",
            "productName": "P",
            "productQuantity": "1",
            "bsMessage1": "m1",
            "bsMessage2": "m2",
            "buttonTextColor": "#FFFFFF"
        })
        .to_string();

        assert_eq!(
            decode(&payload),
            Err(DecodeError::MissingField("buttonText".to_string()))
        );
    }

    #[test]
    fn test_first_missing_field_reported_in_order() {
        let payload = json!({ "toolbarTitle": "T" }).to_string();
        assert_eq!(
            decode(&payload),
            Err(DecodeError::MissingField("productName".to_string()))
        );
    }

    #[test]
    fn test_malformed_payloads() {
        for bad in ["toolbarTitle=T", "", "{", "[1,2]", "\"text\"", "null"] {
            assert!(
                matches!(decode(bad), Err(DecodeError::Malformed(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_legacy_payload_without_version() {
        // Shape produced by older integrations: null buttonColor, extra image key
        let payload = json!({
            "toolbarTitle": "Title App",
            "productImage": null,
            "productName": "jshdsjjks",
            "productQuantity": "10 Unit",
            "bsMessage1": "message 1",
            "bsMessage2": "message222",
            "buttonText": "Button Text",
            "buttonColor": null,
            "buttonTextColor": "#FFFFFF"
        })
        .to_string();

        assert_eq!(decode(&payload).unwrap(), sample_config());
    }

    #[test]
    fn test_unsupported_version() {
        let mut value: Value = serde_json::from_str(&encode(&sample_config())).unwrap();
        value["payloadVersion"] = json!("2");

        assert_eq!(
            decode(&value.to_string()),
            Err(DecodeError::UnsupportedVersion("2".to_string()))
        );
    }

    #[test]
    fn test_invalid_field_values() {
        let mut value: Value = serde_json::from_str(&encode(&sample_config())).unwrap();
        value["buttonText"] = json!(42);
        assert!(matches!(
            decode(&value.to_string()),
            Err(DecodeError::InvalidField { field, .. }) if field == "buttonText"
        ));

        let mut value: Value = serde_json::from_str(&encode(&sample_config())).unwrap();
        value["toolbarTitle"] = json!("");
        assert!(matches!(
            decode(&value.to_string()),
            Err(DecodeError::InvalidField { field, .. }) if field == "toolbarTitle"
        ));

        let mut value: Value = serde_json::from_str(&encode(&sample_config())).unwrap();
        value["orientationLocked"] = json!("yes");
        assert!(matches!(
            decode(&value.to_string()),
            Err(DecodeError::InvalidField { field, .. }) if field == "orientationLocked"
        ));
    }

    #[test]
    fn test_colors_not_resolved_at_decode() {
        let mut value: Value = serde_json::from_str(&encode(&sample_config())).unwrap();
        value["buttonColor"] = json!("#nope");
        value["buttonTextColor"] = json!("#nope");

        let config = decode(&value.to_string()).unwrap();
        assert_eq!(config.button_text_color().as_str(), "#nope");
        assert!(config.button_background_color().is_some());
    }
}
