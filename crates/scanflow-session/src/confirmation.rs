//! # Confirmation Step
//!
//! After a successful decode the user confirms or rejects the value before
//! the caller commits it.
//!
//! ## Presentation and Decision
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Decoded { text } + ScanConfig                                          │
//! │     │                                                                   │
//! │     ▼  ConfirmationView::render                                         │
//! │  ┌───────────────────────────────────────────────┐                      │
//! │  │  bsMessage1 / bsMessage2                      │                      │
//! │  │  scanned text                                 │                      │
//! │  │  [ buttonText ]  text color: must resolve     │                      │
//! │  │                  background: absent  ► default│                      │
//! │  │                              invalid ► warn,  │                      │
//! │  │                                        default│                      │
//! │  └───────────────────────────────────────────────┘                      │
//! │     │                                                                   │
//! │     ▼  surface.present(view, DecisionPort)                              │
//! │  button click ──► accept()  ──┐                                         │
//! │  back / swipe ──► dismiss() ──┼──► first call wins ──► decision().await │
//! │  explicit no  ──► reject()  ──┘    later calls return false             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A button click both accepts and closes the sheet, and closing the sheet
//! fires a dismiss. The first-wins port keeps that pair down to one decision.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use scanflow_core::{
    Argb, ConfirmationDecision, DecisionEvent, DecodedScan, InvalidColorSpec, ScanConfig,
    SessionId,
};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::SessionResult;
use crate::scanner::ConfirmationSurface;

// =============================================================================
// Confirmation View
// =============================================================================

/// Button background after color resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonBackground {
    /// Leave the platform's styling untouched.
    PlatformDefault,
    Color(Argb),
}

/// Everything the surface needs to draw the sheet, colors already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationView {
    pub session_id: SessionId,
    pub scanned_text: String,
    pub banner_message_1: String,
    pub banner_message_2: String,
    pub button_label: String,
    pub button_text_color: Argb,
    pub button_background: ButtonBackground,
}

impl ConfirmationView {
    /// Resolves the config's styling for one decoded value.
    ///
    /// ## Errors
    /// Fails only when the button text color does not resolve. A bad
    /// background color falls back to the platform default.
    pub fn render(
        session_id: SessionId,
        scan: &DecodedScan,
        config: &ScanConfig,
    ) -> Result<Self, InvalidColorSpec> {
        let button_text_color = config.button_text_color().resolve()?;

        let button_background = match config.button_background_color() {
            None => ButtonBackground::PlatformDefault,
            Some(spec) => match spec.resolve() {
                Ok(color) => ButtonBackground::Color(color),
                Err(e) => {
                    warn!(
                        session_id = %session_id,
                        error = %e,
                        "Ignoring invalid button background color"
                    );
                    ButtonBackground::PlatformDefault
                }
            },
        };

        Ok(ConfirmationView {
            session_id,
            scanned_text: scan.text.clone(),
            banner_message_1: config.banner_message_1().to_string(),
            banner_message_2: config.banner_message_2().to_string(),
            button_label: config.button_label().to_string(),
            button_text_color,
            button_background,
        })
    }
}

// =============================================================================
// Decision Port
// =============================================================================

/// How the user ended the confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Accept,
    Reject,
    Dismiss,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => write!(f, "accept"),
            Verdict::Reject => write!(f, "reject"),
            Verdict::Dismiss => write!(f, "dismiss"),
        }
    }
}

/// The surface's side of a confirmation: the first verdict wins.
///
/// Clones share one slot, so every UI callback can hold its own copy.
#[derive(Debug, Clone)]
pub struct DecisionPort {
    session_id: SessionId,
    scan: DecodedScan,
    slot: Arc<Mutex<Option<oneshot::Sender<ConfirmationDecision>>>>,
}

impl DecisionPort {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The user confirmed the value. Returns false if already decided.
    pub fn accept(&self) -> bool {
        self.decide(Verdict::Accept)
    }

    /// The user rejected the value. Returns false if already decided.
    pub fn reject(&self) -> bool {
        self.decide(Verdict::Reject)
    }

    /// The sheet was closed without a choice. Returns false if already decided.
    pub fn dismiss(&self) -> bool {
        self.decide(Verdict::Dismiss)
    }

    pub fn is_decided(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn decide(&self, verdict: Verdict) -> bool {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(tx) = sender else {
            debug!(
                session_id = %self.session_id,
                %verdict,
                "Confirmation already decided, ignoring"
            );
            return false;
        };

        let decision = match verdict {
            Verdict::Accept => ConfirmationDecision::Accepted(self.scan.clone()),
            Verdict::Reject | Verdict::Dismiss => ConfirmationDecision::Rejected,
        };
        debug!(session_id = %self.session_id, %verdict, "Confirmation decided");

        if tx.send(decision).is_err() {
            info!(session_id = %self.session_id, "Decision arrived after teardown, discarding");
        }
        true
    }
}

// =============================================================================
// Confirmation Step
// =============================================================================

/// Starts the confirmation for a decoded value.
pub struct ConfirmationStep;

impl ConfirmationStep {
    /// Renders the view and hands it to the surface.
    ///
    /// Presentation happens before this returns, so no decision can exist
    /// before it.
    pub fn present(
        session_id: SessionId,
        scan: DecodedScan,
        config: &ScanConfig,
        surface: &dyn ConfirmationSurface,
    ) -> SessionResult<PendingConfirmation> {
        let view = ConfirmationView::render(session_id, &scan, config)?;
        let (tx, rx) = oneshot::channel();
        let port = DecisionPort {
            session_id,
            scan,
            slot: Arc::new(Mutex::new(Some(tx))),
        };

        info!(session_id = %session_id, "Presenting confirmation");
        surface.present(view, port)?;

        Ok(PendingConfirmation {
            session_id,
            decision_rx: rx,
        })
    }
}

/// Caller's handle on a presented confirmation.
#[derive(Debug)]
pub struct PendingConfirmation {
    session_id: SessionId,
    decision_rx: oneshot::Receiver<ConfirmationDecision>,
}

impl PendingConfirmation {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Waits for the user's verdict.
    ///
    /// A surface that releases every port without deciding counts as a
    /// dismissal.
    pub async fn decision(self) -> DecisionEvent {
        let decision = match self.decision_rx.await {
            Ok(decision) => decision,
            Err(_) => {
                warn!(session_id = %self.session_id, "Confirmation closed without a verdict");
                ConfirmationDecision::Rejected
            }
        };

        info!(session_id = %self.session_id, decision = %decision, "Confirmation finished");
        DecisionEvent {
            session_id: self.session_id,
            decision,
            decided_at: Utc::now(),
        }
    }

    /// Abandons the confirmation; a later verdict is discarded.
    pub fn teardown(mut self) {
        self.decision_rx.close();
        debug!(session_id = %self.session_id, "Confirmation torn down");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
