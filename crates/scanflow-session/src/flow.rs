//! # Scan Flow
//!
//! Drives one scan end to end: launch, classification, and the confirmation
//! step on a decoded result.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  IDLE ──launch──► PENDING ──raw signal──► CLASSIFIED                    │
//! │                                              │                          │
//! │                   Cancelled/PermissionDenied │ Decoded                  │
//! │                          ┌───────────────────┴──────┐                   │
//! │                          ▼                          ▼                   │
//! │                        DONE ◄──accept/reject──  CONFIRMING              │
//! │                                                                         │
//! │  DONE is terminal. Teardown from PENDING or CONFIRMING ends the flow    │
//! │  without invoking the emitter again.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! - The scan event is emitted before any confirmation is presented
//! - A decision exists only after the surface has been handed its port
//! - At most one confirmation per session
//!
//! ## Usage
//! ```rust,ignore
//! let flow = ScanFlow::new(scanner, surface);
//! let handle = flow.spawn(config, &options)?;
//!
//! // host lifecycle
//! on_destroy(|| handle.teardown());
//!
//! match handle.wait().await? {
//!     FlowEnd::Completed(report) => commit(report.accepted_text()),
//!     FlowEnd::TornDown { .. } => {}
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use scanflow_core::{DecisionEvent, ScanConfig, ScanEvent, ScanOptions, SessionId};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::confirmation::ConfirmationStep;
use crate::error::{SessionError, SessionResult};
use crate::scanner::{ConfirmationSurface, ScannerLauncher};
use crate::session::ScanSession;

// =============================================================================
// Flow State
// =============================================================================

/// Where a scan flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Pending,
    Classified,
    Confirming,
    Done,
}

impl FlowState {
    /// Returns true if `next` is a legal successor of this state.
    pub fn can_transition_to(self, next: FlowState) -> bool {
        matches!(
            (self, next),
            (FlowState::Idle, FlowState::Pending)
                | (FlowState::Pending, FlowState::Classified)
                | (FlowState::Classified, FlowState::Confirming)
                | (FlowState::Classified, FlowState::Done)
                | (FlowState::Confirming, FlowState::Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == FlowState::Done
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowState::Idle => write!(f, "idle"),
            FlowState::Pending => write!(f, "pending"),
            FlowState::Classified => write!(f, "classified"),
            FlowState::Confirming => write!(f, "confirming"),
            FlowState::Done => write!(f, "done"),
        }
    }
}

/// Tracks one flow's state and rejects illegal transitions.
#[derive(Debug)]
pub struct FlowMachine {
    session_id: SessionId,
    state: FlowState,
}

impl FlowMachine {
    pub fn new(session_id: SessionId) -> Self {
        FlowMachine {
            session_id,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn advance(&mut self, next: FlowState) -> SessionResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(session_id = %self.session_id, from = %self.state, to = %next, "Flow transition");
        self.state = next;
        Ok(())
    }
}

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Receives the caller-facing events (implemented by the host UI).
pub trait FlowEventEmitter: Send + Sync {
    /// Emits the classified scan result.
    fn emit_scan(&self, event: &ScanEvent);

    /// Emits the user's confirmation decision.
    fn emit_decision(&self, event: &DecisionEvent);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl FlowEventEmitter for NoOpEmitter {
    fn emit_scan(&self, _event: &ScanEvent) {}
    fn emit_decision(&self, _event: &DecisionEvent) {}
}

// =============================================================================
// Flow Results
// =============================================================================

/// Everything a finished flow delivered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub scan: ScanEvent,
    /// Present only when the scan decoded a value.
    pub decision: Option<DecisionEvent>,
}

impl FlowReport {
    /// The text the caller may commit, if the user accepted one.
    pub fn accepted_text(&self) -> Option<&str> {
        self.decision
            .as_ref()
            .and_then(|event| event.decision.accepted_text())
    }
}

/// How a spawned flow ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEnd {
    Completed(FlowReport),
    /// The host tore the flow down while it was waiting.
    TornDown {
        session_id: SessionId,
        state: FlowState,
    },
}

// =============================================================================
// Scan Flow
// =============================================================================

/// Runs scans against a scanner and a confirmation surface.
#[derive(Clone)]
pub struct ScanFlow {
    scanner: Arc<dyn ScannerLauncher>,
    surface: Arc<dyn ConfirmationSurface>,
    emitter: Arc<dyn FlowEventEmitter>,
}

impl ScanFlow {
    pub fn new(scanner: Arc<dyn ScannerLauncher>, surface: Arc<dyn ConfirmationSurface>) -> Self {
        Self::with_emitter(scanner, surface, Arc::new(NoOpEmitter))
    }

    pub fn with_emitter(
        scanner: Arc<dyn ScannerLauncher>,
        surface: Arc<dyn ConfirmationSurface>,
        emitter: Arc<dyn FlowEventEmitter>,
    ) -> Self {
        ScanFlow {
            scanner,
            surface,
            emitter,
        }
    }

    /// Runs one scan to completion on the current task.
    pub async fn run(
        &self,
        config: ScanConfig,
        options: &ScanOptions,
    ) -> SessionResult<FlowReport> {
        let (session, machine) = self.launch(config, options)?;

        // Never signalled; the shutdown branch is disabled once the sender drops
        let (_, shutdown_rx) = mpsc::channel(1);

        match self.drive(session, machine, shutdown_rx).await? {
            FlowEnd::Completed(report) => Ok(report),
            FlowEnd::TornDown { session_id, .. } => Err(SessionError::TornDown(session_id)),
        }
    }

    /// Launches the scanner now and drives the rest on a spawned task.
    ///
    /// Launch failures are returned here, before anything is spawned.
    pub fn spawn(&self, config: ScanConfig, options: &ScanOptions) -> SessionResult<FlowHandle> {
        let (session, machine) = self.launch(config, options)?;
        let session_id = session.id();

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let flow = self.clone();
        let task = tokio::spawn(async move { flow.drive(session, machine, shutdown_rx).await });

        Ok(FlowHandle {
            session_id,
            shutdown_tx,
            task,
        })
    }

    fn launch(
        &self,
        config: ScanConfig,
        options: &ScanOptions,
    ) -> SessionResult<(ScanSession, FlowMachine)> {
        let session = ScanSession::launch(config, options, self.scanner.as_ref())?;
        let mut machine = FlowMachine::new(session.id());
        machine.advance(FlowState::Pending)?;
        Ok((session, machine))
    }

    async fn drive(
        &self,
        session: ScanSession,
        mut machine: FlowMachine,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) -> SessionResult<FlowEnd> {
        let session_id = session.id();

        let completed = tokio::select! {
            biased;
            Some(()) = shutdown_rx.recv() => {
                return Ok(Self::torn_down(session_id, &machine));
            }
            completed = session.outcome() => completed,
        };
        machine.advance(FlowState::Classified)?;

        if Self::shutdown_requested(&mut shutdown_rx) {
            return Ok(Self::torn_down(session_id, &machine));
        }

        let (scan, config) = completed.into_parts();
        self.emitter.emit_scan(&scan);

        let Some(decoded) = scan.outcome.clone().into_decoded() else {
            machine.advance(FlowState::Done)?;
            return Ok(FlowEnd::Completed(FlowReport {
                scan,
                decision: None,
            }));
        };

        machine.advance(FlowState::Confirming)?;
        let pending =
            ConfirmationStep::present(session_id, decoded, &config, self.surface.as_ref())?;

        let decision = tokio::select! {
            biased;
            Some(()) = shutdown_rx.recv() => {
                return Ok(Self::torn_down(session_id, &machine));
            }
            decision = pending.decision() => decision,
        };

        if Self::shutdown_requested(&mut shutdown_rx) {
            return Ok(Self::torn_down(session_id, &machine));
        }

        self.emitter.emit_decision(&decision);
        machine.advance(FlowState::Done)?;

        Ok(FlowEnd::Completed(FlowReport {
            scan,
            decision: Some(decision),
        }))
    }

    fn shutdown_requested(shutdown_rx: &mut mpsc::Receiver<()>) -> bool {
        matches!(shutdown_rx.try_recv(), Ok(()))
    }

    fn torn_down(session_id: SessionId, machine: &FlowMachine) -> FlowEnd {
        info!(session_id = %session_id, state = %machine.state(), "Scan flow torn down");
        FlowEnd::TornDown {
            session_id,
            state: machine.state(),
        }
    }
}

// =============================================================================
// Flow Handle
// =============================================================================

/// Handle for a spawned flow.
#[derive(Debug)]
pub struct FlowHandle {
    session_id: SessionId,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<SessionResult<FlowEnd>>,
}

impl FlowHandle {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Waits for the flow to finish.
    pub async fn wait(self) -> SessionResult<FlowEnd> {
        self.task.await?
    }

    /// Tears the flow down and waits for its task to stop.
    ///
    /// Once this returns the emitter will not be called again for this
    /// session. A flow that already finished reports `Completed`.
    pub async fn teardown(self) -> SessionResult<FlowEnd> {
        // The task may have finished already; its result is returned below
        let _ = self.shutdown_tx.send(()).await;
        self.task.await?
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use scanflow_core::{ConfirmationDecision, DecodedScan, RawCompletion, ScanOutcome};
    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::confirmation::ButtonBackground;
    use crate::scanner::{ChannelScanner, ChannelSurface, LaunchedScan, PresentedConfirmation};

    #[derive(Default)]
    struct RecordingEmitter {
        scans: Mutex<Vec<ScanEvent>>,
        decisions: Mutex<Vec<DecisionEvent>>,
    }

    impl FlowEventEmitter for RecordingEmitter {
        fn emit_scan(&self, event: &ScanEvent) {
            self.scans.lock().unwrap().push(event.clone());
        }

        fn emit_decision(&self, event: &DecisionEvent) {
            self.decisions.lock().unwrap().push(event.clone());
        }
    }

    struct Harness {
        flow: ScanFlow,
        emitter: Arc<RecordingEmitter>,
        launches: UnboundedReceiver<LaunchedScan>,
        presentations: UnboundedReceiver<PresentedConfirmation>,
    }

    fn harness() -> Harness {
        let (scanner, launches) = ChannelScanner::new();
        let (surface, presentations) = ChannelSurface::new();
        let emitter = Arc::new(RecordingEmitter::default());
        let flow = ScanFlow::with_emitter(Arc::new(scanner), Arc::new(surface), emitter.clone());
        Harness {
            flow,
            emitter,
            launches,
            presentations,
        }
    }

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

    fn completed(end: FlowEnd) -> FlowReport {
        match end {
            FlowEnd::Completed(report) => report,
            other => panic!("expected a completed flow, got {:?}", other),
        }
    }

    #[test]
    fn test_state_transitions() {
        let mut machine = FlowMachine::new(SessionId::new());
        machine.advance(FlowState::Pending).unwrap();
        machine.advance(FlowState::Classified).unwrap();
        machine.advance(FlowState::Confirming).unwrap();
        machine.advance(FlowState::Done).unwrap();
        assert!(machine.state().is_terminal());

        let err = machine.advance(FlowState::Pending).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                from: FlowState::Done,
                to: FlowState::Pending
            }
        ));
    }

    #[test]
    fn test_no_skipping_classification() {
        assert!(!FlowState::Pending.can_transition_to(FlowState::Confirming));
        assert!(!FlowState::Pending.can_transition_to(FlowState::Done));
        assert!(!FlowState::Idle.can_transition_to(FlowState::Classified));
        assert!(FlowState::Classified.can_transition_to(FlowState::Done));
    }

    #[tokio::test]
    async fn test_decoded_then_accepted() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();

        let launched = h.launches.recv().await.unwrap();
        assert!(launched.request.orientation_locked());
        launched.port.deliver(RawCompletion::decoded("123456789012")).unwrap();

        let presented = h.presentations.recv().await.unwrap();
        assert_eq!(presented.view.scanned_text, "123456789012");
        assert_eq!(presented.view.button_background, ButtonBackground::PlatformDefault);
        assert!(presented.port.accept());

        let report = completed(handle.wait().await.unwrap());
        assert_eq!(report.scan.outcome, ScanOutcome::decoded("123456789012"));
        assert_eq!(
            report.decision.as_ref().map(|d| &d.decision),
            Some(&ConfirmationDecision::Accepted(DecodedScan::new("123456789012")))
        );
        assert_eq!(report.accepted_text(), Some("123456789012"));

        assert_eq!(h.emitter.scans.lock().unwrap().len(), 1);
        assert_eq!(h.emitter.decisions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_permission_denied_skips_confirmation() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();

        let launched = h.launches.recv().await.unwrap();
        launched.port.deliver(RawCompletion::permission_denied()).unwrap();

        let report = completed(handle.wait().await.unwrap());
        assert_eq!(report.scan.outcome, ScanOutcome::PermissionDenied);
        assert!(report.decision.is_none());
        assert!(h.presentations.try_recv().is_err());
        assert!(h.emitter.decisions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_skips_confirmation() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();

        let launched = h.launches.recv().await.unwrap();
        launched.port.deliver(RawCompletion::cancelled()).unwrap();

        let report = completed(handle.wait().await.unwrap());
        assert_eq!(report.scan.outcome, ScanOutcome::Cancelled);
        assert!(report.decision.is_none());
        assert!(h.presentations.try_recv().is_err());
        assert_eq!(h.emitter.scans.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dismiss_is_rejected() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();

        h.launches.recv().await.unwrap().port.deliver(RawCompletion::decoded("")).unwrap();

        let presented = h.presentations.recv().await.unwrap();
        assert_eq!(presented.view.scanned_text, "");
        assert!(presented.port.dismiss());

        let report = completed(handle.wait().await.unwrap());
        assert_eq!(report.scan.outcome, ScanOutcome::decoded(""));
        assert_eq!(report.accepted_text(), None);
    }

    #[tokio::test]
    async fn test_report_serializes_for_the_frontend() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();
        h.launches.recv().await.unwrap().port.deliver(RawCompletion::permission_denied()).unwrap();

        let report = completed(handle.wait().await.unwrap());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["scan"]["outcome"]["kind"], "permission_denied");
        assert!(json["scan"]["sessionId"].is_string());
        assert!(json["scan"]["completedAt"].is_string());
        assert!(json["decision"].is_null());
    }

    #[tokio::test]
    async fn test_double_completion_delivers_first() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();

        let launched = h.launches.recv().await.unwrap();
        launched.port.deliver(RawCompletion::cancelled()).unwrap();
        assert!(matches!(
            launched.port.deliver(RawCompletion::decoded("late")),
            Err(SessionError::AlreadyDelivered { .. })
        ));

        let report = completed(handle.wait().await.unwrap());
        assert_eq!(report.scan.outcome, ScanOutcome::Cancelled);
        assert!(h.presentations.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_double_decision_delivers_first() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();

        h.launches.recv().await.unwrap().port.deliver(RawCompletion::decoded("42")).unwrap();

        let presented = h.presentations.recv().await.unwrap();
        assert!(presented.port.accept());
        assert!(!presented.port.dismiss());

        let report = completed(handle.wait().await.unwrap());
        assert_eq!(report.accepted_text(), Some("42"));
        assert_eq!(h.emitter.decisions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_teardown_while_pending_discards_completion() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();
        let session_id = handle.session_id();
        let launched = h.launches.recv().await.unwrap();

        let end = handle.teardown().await.unwrap();
        assert_eq!(
            end,
            FlowEnd::TornDown {
                session_id,
                state: FlowState::Pending
            }
        );

        let err = launched.port.deliver(RawCompletion::decoded("late")).unwrap_err();
        assert!(matches!(err, SessionError::TornDown(_)));
        assert!(h.emitter.scans.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_while_confirming_discards_decision() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();

        h.launches.recv().await.unwrap().port.deliver(RawCompletion::decoded("42")).unwrap();
        let presented = h.presentations.recv().await.unwrap();

        let end = handle.teardown().await.unwrap();
        assert!(matches!(
            end,
            FlowEnd::TornDown {
                state: FlowState::Confirming,
                ..
            }
        ));

        presented.port.accept();
        assert_eq!(h.emitter.scans.lock().unwrap().len(), 1);
        assert!(h.emitter.decisions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_after_completion_reports_completed() {
        let mut h = harness();
        let handle = h.flow.spawn(config(), &ScanOptions::default()).unwrap();

        h.launches.recv().await.unwrap().port.deliver(RawCompletion::cancelled()).unwrap();

        // Let the flow finish before tearing it down
        while h.emitter.scans.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }

        let end = handle.teardown().await.unwrap();
        assert_eq!(completed(end).scan.outcome, ScanOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_run_inline_with_scripted_host() {
        let Harness {
            flow,
            mut launches,
            mut presentations,
            ..
        } = harness();

        let host = tokio::spawn(async move {
            let launched = launches.recv().await.unwrap();
            launched
                .port
                .deliver(RawCompletion::decoded("4006381333931"))
                .unwrap();
            let presented = presentations.recv().await.unwrap();
            presented.port.reject();
        });

        let report = flow.run(config(), &ScanOptions::default()).await.unwrap();
        host.await.unwrap();

        assert_eq!(report.scan.outcome.decoded_text(), Some("4006381333931"));
        assert_eq!(
            report.decision.map(|d| d.decision),
            Some(ConfirmationDecision::Rejected)
        );
    }

    #[tokio::test]
    async fn test_fatal_text_color_fails_flow() {
        let mut h = harness();
        let payload = scanflow_core::codec::encode(&config()).replace("#FFFFFF", "chartreuse");
        let bad = scanflow_core::codec::decode(&payload).unwrap();

        let handle = h.flow.spawn(bad, &ScanOptions::default()).unwrap();
        h.launches.recv().await.unwrap().port.deliver(RawCompletion::decoded("42")).unwrap();

        let err = handle.wait().await.unwrap_err();
        assert!(matches!(err, SessionError::Core(_)));
        assert!(h.presentations.try_recv().is_err());
    }
}
