//! Simulated host: an external scanner and a user at the confirmation sheet.

use scanflow_core::{DecisionEvent, RawCompletion, ScanEvent};
use scanflow_session::{FlowEventEmitter, LaunchedScan, PresentedConfirmation};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::scenario::{Scenario, ScannerBehavior, UserBehavior};

/// Answers every launch according to the scenario.
pub async fn run_scanner(scenario: Scenario, mut launches: UnboundedReceiver<LaunchedScan>) {
    // Ports of scans left open, so their sessions stay pending
    let mut open = Vec::new();

    while let Some(LaunchedScan { request, port }) = launches.recv().await {
        let config = match request.decode_config() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Unreadable config payload, using stock UI");
                None
            }
        };
        let header = config.as_ref().map(|c| c.header());
        info!(
            session_id = %port.session_id(),
            title = header.map(|h| h.toolbar_title).unwrap_or("-"),
            product = header.map(|h| h.product_name).unwrap_or("-"),
            quantity = header.map(|h| h.product_quantity).unwrap_or("-"),
            orientation_locked = request.orientation_locked(),
            "Scanner opened"
        );

        let raw = match scenario.scanner {
            ScannerBehavior::Decoded => {
                RawCompletion::decoded_as(scenario.text.clone(), scenario.format)
            }
            ScannerBehavior::Cancelled => RawCompletion::cancelled(),
            ScannerBehavior::PermissionDenied => RawCompletion::permission_denied(),
            ScannerBehavior::TimedOut => RawCompletion::timed_out(),
            ScannerBehavior::Hang => {
                info!(session_id = %port.session_id(), "Scanner left open");
                open.push(port);
                continue;
            }
        };

        sleep(scenario.delay()).await;
        if let Err(e) = port.deliver(raw) {
            warn!(error = %e, "Scanner result was not accepted");
        }
    }
}

/// Plays the user at the confirmation sheet.
pub async fn run_user(
    scenario: Scenario,
    mut presentations: UnboundedReceiver<PresentedConfirmation>,
) {
    while let Some(PresentedConfirmation { view, port }) = presentations.recv().await {
        info!(
            session_id = %view.session_id,
            text = %view.scanned_text,
            message_1 = %view.banner_message_1,
            message_2 = %view.banner_message_2,
            button = %view.button_label,
            text_color = %view.button_text_color,
            background = ?view.button_background,
            "Confirmation sheet shown"
        );

        sleep(scenario.delay()).await;
        match scenario.user {
            UserBehavior::Accept => {
                port.accept();
            }
            UserBehavior::Reject => {
                port.reject();
            }
            UserBehavior::Dismiss => {
                port.dismiss();
            }
            UserBehavior::AcceptAndDismiss => {
                port.accept();
                if !port.dismiss() {
                    info!(session_id = %view.session_id, "Dismiss after accept ignored");
                }
            }
        }
    }
}

/// Logs caller-facing events.
pub struct LoggingEmitter;

impl FlowEventEmitter for LoggingEmitter {
    fn emit_scan(&self, event: &ScanEvent) {
        info!(
            session_id = %event.session_id,
            outcome = %event.outcome,
            timed_out = event.metadata.timed_out,
            "scan event"
        );
    }

    fn emit_decision(&self, event: &DecisionEvent) {
        info!(
            session_id = %event.session_id,
            decision = %event.decision,
            "decision event"
        );
    }
}
