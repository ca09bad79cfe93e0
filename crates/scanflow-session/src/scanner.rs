//! # External Collaborators
//!
//! The two seams to the host platform: the external scanner and the surface
//! that shows the confirmation sheet. Both hand back a one-shot port; the
//! host calls it later from whatever callback the platform fires.
//!
//! ## Host Integration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ScanSession ──launch(request, CompletionPort)──► ScannerLauncher      │
//! │        ▲                                              │                 │
//! │        └──────────── port.deliver(RawCompletion) ◄────┘ (later)         │
//! │                                                                         │
//! │   ConfirmationStep ──present(view, DecisionPort)──► ConfirmationSurface │
//! │        ▲                                              │                 │
//! │        └──────── port.accept() / reject() / dismiss() ┘ (later)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ChannelScanner`] and [`ChannelSurface`] forward each launch or
//! presentation onto an unbounded channel, for hosts that drive the platform
//! from their own task.

use scanflow_core::ScanRequest;
use tokio::sync::mpsc;
use tracing::debug;

use crate::confirmation::{ConfirmationView, DecisionPort};
use crate::error::{SessionError, SessionResult};
use crate::session::CompletionPort;

// =============================================================================
// Traits
// =============================================================================

/// Starts the external scanner.
///
/// Implementations must return promptly; the completion arrives later
/// through `port`.
pub trait ScannerLauncher: Send + Sync {
    fn launch(&self, request: ScanRequest, port: CompletionPort) -> SessionResult<()>;
}

/// Shows the confirmation sheet for a decoded value.
pub trait ConfirmationSurface: Send + Sync {
    fn present(&self, view: ConfirmationView, port: DecisionPort) -> SessionResult<()>;
}

// =============================================================================
// Channel Adapters
// =============================================================================

/// A launch forwarded by [`ChannelScanner`].
#[derive(Debug)]
pub struct LaunchedScan {
    pub request: ScanRequest,
    pub port: CompletionPort,
}

/// Forwards launches to a receiver.
#[derive(Debug, Clone)]
pub struct ChannelScanner {
    tx: mpsc::UnboundedSender<LaunchedScan>,
}

impl ChannelScanner {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LaunchedScan>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelScanner { tx }, rx)
    }
}

impl ScannerLauncher for ChannelScanner {
    fn launch(&self, request: ScanRequest, port: CompletionPort) -> SessionResult<()> {
        debug!(
            session_id = %port.session_id(),
            action = request.action(),
            "Forwarding scan launch"
        );
        self.tx
            .send(LaunchedScan { request, port })
            .map_err(|_| SessionError::ScannerUnavailable("scanner host has stopped".into()))
    }
}

/// A presentation forwarded by [`ChannelSurface`].
#[derive(Debug)]
pub struct PresentedConfirmation {
    pub view: ConfirmationView,
    pub port: DecisionPort,
}

/// Forwards presentations to a receiver.
#[derive(Debug, Clone)]
pub struct ChannelSurface {
    tx: mpsc::UnboundedSender<PresentedConfirmation>,
}

impl ChannelSurface {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PresentedConfirmation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelSurface { tx }, rx)
    }
}

impl ConfirmationSurface for ChannelSurface {
    fn present(&self, view: ConfirmationView, port: DecisionPort) -> SessionResult<()> {
        debug!(session_id = %view.session_id, "Forwarding confirmation");
        self.tx
            .send(PresentedConfirmation { view, port })
            .map_err(|_| SessionError::SurfaceUnavailable("confirmation host has stopped".into()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
