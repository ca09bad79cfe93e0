//! # Scan Session
//!
//! One in-flight scan request: launched once, completed at most once.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  launch(config, options, scanner)                                       │
//! │     │  build ScanRequest (config payload under "DataTransfer")          │
//! │     │  create one-shot channel                                          │
//! │     │  scanner.launch(request, CompletionPort) ──► external scanner     │
//! │     ▼                                                                   │
//! │  ScanSession ── outcome().await ──┐                                     │
//! │                                   │  (suspends, no polling, no timeout) │
//! │  CompletionPort.deliver(raw) ─────┘                                     │
//! │     │  first delivery wins                                              │
//! │     │  second delivery ──► Err(AlreadyDelivered)                        │
//! │     │  after teardown ──► Err(TornDown), result discarded               │
//! │     ▼                                                                   │
//! │  CompletedScan { ScanEvent { outcome, metadata, completed_at } }        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A scanner that drops its port without delivering is treated like a
//! platform that finishes the scan activity without a result: `Cancelled`.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use scanflow_core::{
    classify_completion, RawCompletion, ScanConfig, ScanEvent, ScanOptions, ScanOutcome,
    ScanRequest, SessionId,
};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};
use crate::scanner::ScannerLauncher;

// =============================================================================
// Completion Port
// =============================================================================

/// The scanner's side of a session: accepts exactly one raw completion.
#[derive(Debug, Clone)]
pub struct CompletionPort {
    session_id: SessionId,
    slot: Arc<Mutex<Option<oneshot::Sender<RawCompletion>>>>,
}

impl CompletionPort {
    fn new(session_id: SessionId, tx: oneshot::Sender<RawCompletion>) -> Self {
        CompletionPort {
            session_id,
            slot: Arc::new(Mutex::new(Some(tx))),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns true until a completion has been delivered.
    pub fn is_open(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Delivers the raw completion.
    ///
    /// ## Errors
    /// - `AlreadyDelivered` if any clone of this port already delivered
    /// - `TornDown` if the session was torn down; the completion is dropped
    pub fn deliver(&self, raw: RawCompletion) -> SessionResult<()> {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(tx) = sender else {
            warn!(session_id = %self.session_id, "Duplicate scan completion ignored");
            return Err(SessionError::AlreadyDelivered {
                session_id: self.session_id,
                what: "scan completion",
            });
        };

        tx.send(raw).map_err(|_| {
            info!(
                session_id = %self.session_id,
                "Scan completion arrived after teardown, discarding"
            );
            SessionError::TornDown(self.session_id)
        })
    }
}

// =============================================================================
// Scan Session
// =============================================================================

/// Caller's handle on one launched scan.
#[derive(Debug)]
pub struct ScanSession {
    id: SessionId,
    config: ScanConfig,
    request: ScanRequest,
    completion_rx: oneshot::Receiver<RawCompletion>,
}

impl ScanSession {
    /// Builds the request and hands control to the external scanner.
    ///
    /// The config payload is attached before the scanner sees the request.
    pub fn launch(
        config: ScanConfig,
        options: &ScanOptions,
        scanner: &dyn ScannerLauncher,
    ) -> SessionResult<Self> {
        let id = SessionId::new();
        let request = ScanRequest::build(&config, options);
        let (tx, rx) = oneshot::channel();

        info!(
            session_id = %id,
            orientation_locked = request.orientation_locked(),
            "Launching scanner"
        );
        scanner.launch(request.clone(), CompletionPort::new(id, tx))?;

        Ok(ScanSession {
            id,
            config,
            request,
            completion_rx: rx,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The request exactly as it was handed to the scanner.
    pub fn request(&self) -> &ScanRequest {
        &self.request
    }

    /// Waits for the completion and classifies it.
    ///
    /// Stays pending for as long as the scanner holds its port open.
    pub async fn outcome(self) -> CompletedScan {
        let raw = match self.completion_rx.await {
            Ok(raw) => raw,
            Err(_) => {
                warn!(session_id = %self.id, "Scanner released the session without a result");
                RawCompletion::cancelled()
            }
        };

        let outcome = classify_completion(&raw);
        let metadata = raw.metadata();
        info!(
            session_id = %self.id,
            outcome = %outcome,
            format = metadata.format_name.as_deref().unwrap_or("-"),
            timed_out = metadata.timed_out,
            "Scan completed"
        );

        CompletedScan {
            event: ScanEvent {
                session_id: self.id,
                outcome,
                metadata,
                completed_at: Utc::now(),
            },
            config: self.config,
        }
    }

    /// Abandons the session; a later completion is discarded.
    pub fn teardown(self) {
        let ScanSession {
            id,
            mut completion_rx,
            ..
        } = self;
        completion_rx.close();
        debug!(session_id = %id, "Scan session torn down");
    }
}

// =============================================================================
// Completed Scan
// =============================================================================

/// A classified session, still owning its config for the confirmation step.
#[derive(Debug, Clone)]
pub struct CompletedScan {
    event: ScanEvent,
    config: ScanConfig,
}

impl CompletedScan {
    pub fn event(&self) -> &ScanEvent {
        &self.event
    }

    pub fn outcome(&self) -> &ScanOutcome {
        &self.event.outcome
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn into_parts(self) -> (ScanEvent, ScanConfig) {
        (self.event, self.config)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use scanflow_core::request::extras;
    use scanflow_core::BarcodeFormat;

    use crate::scanner::{ChannelScanner, LaunchedScan};

    fn config() -> ScanConfig {
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

    fn launch() -> (ScanSession, LaunchedScan) {
        let (scanner, mut launches) = ChannelScanner::new();
        let session = ScanSession::launch(config(), &ScanOptions::default(), &scanner).unwrap();
        let launched = launches.try_recv().unwrap();
        (session, launched)
    }

    #[tokio::test]
    async fn test_decoded_completion_with_metadata() {
        let (session, launched) = launch();
        assert_eq!(session.request(), &launched.request);

        launched
            .port
            .deliver(RawCompletion::decoded_as("123456789012", BarcodeFormat::UpcA))
            .unwrap();

        let completed = session.outcome().await;
        assert_eq!(completed.outcome(), &ScanOutcome::decoded("123456789012"));
        assert_eq!(completed.event().metadata.format_name.as_deref(), Some("UPC_A"));
        assert_eq!(completed.config(), &config());
    }

    #[tokio::test]
    async fn test_second_delivery_is_detectable_no_op() {
        let (session, launched) = launch();
        let port = launched.port.clone();

        assert!(port.is_open());
        launched.port.deliver(RawCompletion::decoded("first")).unwrap();
        assert!(!port.is_open());

        let err = port.deliver(RawCompletion::decoded("second")).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyDelivered { .. }));

        let completed = session.outcome().await;
        assert_eq!(completed.outcome().decoded_text(), Some("first"));
    }

    #[tokio::test]
    async fn test_delivery_after_teardown_is_discarded() {
        let (session, launched) = launch();
        let id = session.id();
        session.teardown();

        let err = launched.port.deliver(RawCompletion::decoded("late")).unwrap_err();
        assert!(matches!(err, SessionError::TornDown(torn) if torn == id));
    }

    #[tokio::test]
    async fn test_dropped_port_is_cancelled() {
        let (session, launched) = launch();
        drop(launched);

        let completed = session.outcome().await;
        assert_eq!(completed.outcome(), &ScanOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_stays_pending_without_completion() {
        let (session, launched) = launch();

        let waited = tokio::time::timeout(Duration::from_secs(3600), session.outcome()).await;
        assert!(waited.is_err());
        assert!(launched.port.is_open());
    }

    #[tokio::test]
    async fn test_timeout_marker_surfaces_in_metadata() {
        let (session, launched) = launch();
        assert!(launched.request.extra(extras::TIMEOUT).is_none());

        launched.port.deliver(RawCompletion::timed_out()).unwrap();
        let completed = session.outcome().await;

        assert_eq!(completed.outcome(), &ScanOutcome::Cancelled);
        assert!(completed.event().metadata.timed_out);
    }
}
