//! # Result Classifier
//!
//! Maps a raw completion signal to exactly one [`ScanOutcome`].
//!
//! ## Decision Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw text            permission marker        Outcome                  │
//! │  ──────────────────  ─────────────────        ─────────────────────    │
//! │  absent              present                  PermissionDenied         │
//! │  absent              absent                   Cancelled                │
//! │  present (even "")   either                   Decoded { text }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The marker is checked before falling back to `Cancelled` so a denial is
//! never reported to the user as a plain back-out.

use tracing::debug;

use crate::completion::RawCompletion;
use crate::types::ScanOutcome;

/// Classifies the two raw signals.
///
/// ## Example
/// ```rust
/// use scanflow_core::classifier::classify;
/// use scanflow_core::ScanOutcome;
///
/// assert_eq!(classify(None, true), ScanOutcome::PermissionDenied);
/// assert_eq!(classify(None, false), ScanOutcome::Cancelled);
/// assert_eq!(classify(Some(""), true), ScanOutcome::decoded(""));
/// ```
pub fn classify(raw_text: Option<&str>, permission_denied_marker: bool) -> ScanOutcome {
    match (raw_text, permission_denied_marker) {
        (Some(text), _) => ScanOutcome::decoded(text),
        (None, true) => ScanOutcome::PermissionDenied,
        (None, false) => ScanOutcome::Cancelled,
    }
}

/// Classifies a full completion signal.
pub fn classify_completion(raw: &RawCompletion) -> ScanOutcome {
    let outcome = classify(raw.contents(), raw.permission_denied_marker());
    debug!(
        result_code = ?raw.result_code(),
        outcome = %outcome,
        "Classified scan completion"
    );
    outcome
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::extras;

    #[test]
    fn test_classifier_is_total() {
        let texts = [None, Some(""), Some("nonempty")];
        let markers = [true, false];

        for text in texts {
            for marker in markers {
                let expected = match (text, marker) {
                    (Some(t), _) => ScanOutcome::decoded(t),
                    (None, true) => ScanOutcome::PermissionDenied,
                    (None, false) => ScanOutcome::Cancelled,
                };
                assert_eq!(classify(text, marker), expected, "text={text:?} marker={marker}");
            }
        }
    }

    #[test]
    fn test_empty_text_is_decoded_not_cancelled() {
        assert_eq!(classify(Some(""), false), ScanOutcome::decoded(""));
    }

    #[test]
    fn test_classify_completion() {
        assert_eq!(
            classify_completion(&RawCompletion::decoded("123456789012")),
            ScanOutcome::decoded("123456789012")
        );
        assert_eq!(
            classify_completion(&RawCompletion::permission_denied()),
            ScanOutcome::PermissionDenied
        );
        assert_eq!(classify_completion(&RawCompletion::cancelled()), ScanOutcome::Cancelled);
        assert_eq!(classify_completion(&RawCompletion::timed_out()), ScanOutcome::Cancelled);
    }

    #[test]
    fn test_decoded_text_wins_over_marker() {
        let raw = RawCompletion::decoded("42").with_extra(extras::MISSING_CAMERA_PERMISSION, true);
        assert_eq!(classify_completion(&raw), ScanOutcome::decoded("42"));
    }
}
