//! # Protocol Types
//!
//! Outcome, decision and event types delivered back to the caller.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Protocol Types                                  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │  ScanOutcome    │   │ ConfirmationDecision │   │   SessionId     │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  Cancelled      │   │  Accepted(Decoded)   │   │  UUID v4        │  │
//! │  │  PermissionDen. │   │  Rejected            │   │                 │  │
//! │  │  Decoded(text)  │   └──────────────────────┘   └─────────────────┘  │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │  ScanEvent                   │   │  DecisionEvent               │   │
//! │  │  sessionId, outcome,         │   │  sessionId, decision,        │   │
//! │  │  metadata, completedAt       │   │  decidedAt                   │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both outcome and decision are terminal: each is produced exactly once for
//! its session or confirmation step.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::completion::ScanMetadata;

// =============================================================================
// Session Id
// =============================================================================

/// Correlates one launch with its one completion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        SessionId::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Decoded Scan
// =============================================================================

/// Text decoded by the external scanner.
///
/// An empty string is a real decode result, distinct from "no text".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DecodedScan {
    pub text: String,
}

impl DecodedScan {
    pub fn new(text: impl Into<String>) -> Self {
        DecodedScan { text: text.into() }
    }
}

// =============================================================================
// Scan Outcome
// =============================================================================

/// Classified result of one scan session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The user backed out, or the scanner gave up without a denial marker.
    Cancelled,
    /// The scanner reported missing camera permission.
    PermissionDenied,
    /// A barcode was decoded.
    Decoded(DecodedScan),
}

impl ScanOutcome {
    /// Shorthand for `Decoded`.
    pub fn decoded(text: impl Into<String>) -> Self {
        ScanOutcome::Decoded(DecodedScan::new(text))
    }

    /// Returns true if this outcome leads to a confirmation step.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, ScanOutcome::Decoded(_))
    }

    pub fn decoded_text(&self) -> Option<&str> {
        match self {
            ScanOutcome::Decoded(scan) => Some(&scan.text),
            _ => None,
        }
    }

    pub fn into_decoded(self) -> Option<DecodedScan> {
        match self {
            ScanOutcome::Decoded(scan) => Some(scan),
            _ => None,
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOutcome::Cancelled => write!(f, "cancelled"),
            ScanOutcome::PermissionDenied => write!(f, "permission_denied"),
            ScanOutcome::Decoded(_) => write!(f, "decoded"),
        }
    }
}

// =============================================================================
// Confirmation Decision
// =============================================================================

/// The user's verdict on a decoded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfirmationDecision {
    /// The user confirmed the value; the caller may commit it.
    Accepted(DecodedScan),
    /// The user rejected or dismissed the confirmation.
    Rejected,
}

impl ConfirmationDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ConfirmationDecision::Accepted(_))
    }

    /// The accepted text, if any.
    pub fn accepted_text(&self) -> Option<&str> {
        match self {
            ConfirmationDecision::Accepted(scan) => Some(&scan.text),
            ConfirmationDecision::Rejected => None,
        }
    }
}

impl fmt::Display for ConfirmationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmationDecision::Accepted(_) => write!(f, "accepted"),
            ConfirmationDecision::Rejected => write!(f, "rejected"),
        }
    }
}

// =============================================================================
// Caller-Facing Events
// =============================================================================

/// Delivered once per session when the raw completion has been classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    #[ts(as = "String")]
    pub session_id: SessionId,
    pub outcome: ScanOutcome,
    pub metadata: ScanMetadata,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

/// Delivered once per confirmation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DecisionEvent {
    #[ts(as = "String")]
    pub session_id: SessionId,
    pub decision: ConfirmationDecision,
    #[ts(as = "String")]
    pub decided_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&ScanOutcome::decoded("123")).unwrap();
        assert_eq!(json, r#"{"kind":"decoded","text":"123"}"#);

        let json = serde_json::to_string(&ScanOutcome::PermissionDenied).unwrap();
        assert_eq!(json, r#"{"kind":"permission_denied"}"#);

        let back: ScanOutcome = serde_json::from_str(r#"{"kind":"cancelled"}"#).unwrap();
        assert_eq!(back, ScanOutcome::Cancelled);
    }

    #[test]
    fn test_outcome_accessors() {
        let empty = ScanOutcome::decoded("");
        assert!(empty.needs_confirmation());
        assert_eq!(empty.decoded_text(), Some(""));

        assert!(!ScanOutcome::Cancelled.needs_confirmation());
        assert_eq!(ScanOutcome::PermissionDenied.into_decoded(), None);
    }

    #[test]
    fn test_decision_accessors() {
        let accepted = ConfirmationDecision::Accepted(DecodedScan::new("42"));
        assert!(accepted.is_accepted());
        assert_eq!(accepted.accepted_text(), Some("42"));
        assert_eq!(accepted.to_string(), "accepted");
        assert_eq!(ConfirmationDecision::Rejected.accepted_text(), None);
    }

    #[test]
    fn test_event_field_names() {
        let event = DecisionEvent {
            session_id: SessionId::new(),
            decision: ConfirmationDecision::Rejected,
            decided_at: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("sessionId").is_some());
        assert!(value.get("decidedAt").is_some());
        assert_eq!(value["decision"]["kind"], "rejected");
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
