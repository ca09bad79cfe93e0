//! # Scanflow Demo
//!
//! Runs one scan against a simulated scanner and user, then prints the flow
//! report as JSON.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Scan Demo Host                                 │
//! │                                                                         │
//! │  env ──► Scenario ──┐                                                   │
//! │  scanner.toml ──► ScanSettings ──► ScanOptions                          │
//! │                     │                  │                                │
//! │                     ▼                  ▼                                │
//! │   scanner task ◄── ChannelScanner ◄── ScanFlow ──► ChannelSurface ──►   │
//! │                                          │                 user task    │
//! │                                          ▼                              │
//! │                                   FlowReport (stdout)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Environment
//! - `SCANFLOW_DEMO_OUTCOME` - decoded | cancelled | permission_denied | timeout | hang
//! - `SCANFLOW_DEMO_TEXT`, `SCANFLOW_DEMO_FORMAT` - the decoded value
//! - `SCANFLOW_DEMO_DECISION` - accept | reject | dismiss | accept_and_dismiss
//! - `SCANFLOW_DEMO_BUTTON_COLOR` - confirmation button background
//! - `SCANFLOW_DEMO_DELAY_MS` - simulated latency
//! - `RUST_LOG` - log filter (default `info`)

mod host;
mod scenario;

use std::sync::Arc;

use scanflow_core::ScanConfig;
use scanflow_session::{ChannelScanner, ChannelSurface, FlowEnd, ScanFlow, ScanSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::host::LoggingEmitter;
use crate::scenario::{Scenario, ScannerBehavior};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Scanflow demo...");

    // Load configuration
    let scenario = Scenario::load()?;
    let settings = ScanSettings::load_or_default(None);
    info!(
        outcome = ?scenario.scanner,
        decision = ?scenario.user,
        orientation_locked = ?settings.scanner.orientation_locked,
        "Scenario loaded"
    );

    let mut builder = ScanConfig::builder()
        .toolbar_title("Stock Receiving")
        .product_name("Sparkling Water 500ml")
        .product_quantity("24 Unit")
        .banner_messages("Is this the right item?", "Compare the barcode with the label")
        .button_label("Item is correct")
        .button_text_color("#FFFFFF");
    if let Some(color) = &scenario.button_color {
        builder = builder.button_background_color(color.clone());
    }
    let config = builder.build()?;

    // Wire the simulated host
    let (scanner, launches) = ChannelScanner::new();
    let (surface, presentations) = ChannelSurface::new();
    tokio::spawn(host::run_scanner(scenario.clone(), launches));
    tokio::spawn(host::run_user(scenario.clone(), presentations));

    let flow =
        ScanFlow::with_emitter(Arc::new(scanner), Arc::new(surface), Arc::new(LoggingEmitter));
    let handle = flow.spawn(config, &settings.scan_options())?;

    let end = if scenario.scanner == ScannerBehavior::Hang {
        tokio::time::sleep(scenario.hang_wait()).await;
        info!(session_id = %handle.session_id(), "Host closing, tearing down scan");
        handle.teardown().await?
    } else {
        handle.wait().await?
    };

    match end {
        FlowEnd::Completed(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            match report.accepted_text() {
                Some(text) => info!(text, "Committing scanned value"),
                None => info!("Nothing to commit"),
            }
        }
        FlowEnd::TornDown { session_id, state } => {
            info!(%session_id, %state, "Scan abandoned");
        }
    }

    Ok(())
}
