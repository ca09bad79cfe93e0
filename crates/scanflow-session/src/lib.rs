//! # scanflow-session: Async Scan Sessions for Scanflow
//!
//! This crate runs the scan protocol on top of `scanflow-core`: it hands the
//! request to the external scanner, suspends until exactly one completion
//! arrives, classifies it, and sequences the confirmation step.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Scan Flow Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      ScanFlow (Orchestrator)                     │  │
//! │  │                                                                  │  │
//! │  │  Spawned as a Tokio task per scan                                │  │
//! │  │  Owns the state machine and the teardown signal                  │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  ScanSession   │  │ Classifier     │  │  ConfirmationStep      │    │
//! │  │                │  │ (core)         │  │                        │    │
//! │  │ Launches the   │  │ Raw signal ──► │  │ Renders the sheet,     │    │
//! │  │ scanner, one-  │  │ Cancelled /    │  │ one-shot decision      │    │
//! │  │ shot completion│  │ PermissionDen./│  │ port, first verdict    │    │
//! │  │ port           │  │ Decoded        │  │ wins                   │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  HOST SEAMS:                                                           │
//! │  • ScannerLauncher      - starts the external scanner                  │
//! │  • ConfirmationSurface  - shows the confirmation sheet                 │
//! │  • FlowEventEmitter     - receives ScanEvent / DecisionEvent           │
//! │  • FlowHandle::teardown - host destroyed, discard pending results      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`flow`] - `ScanFlow` driver, state machine, teardown handle
//! - [`session`] - `ScanSession` and its completion port
//! - [`confirmation`] - `ConfirmationStep`, view rendering, decision port
//! - [`scanner`] - Host collaborator traits and channel adapters
//! - [`settings`] - Scanner settings (TOML + env)
//! - [`error`] - Session error types

pub mod confirmation;
pub mod error;
pub mod flow;
pub mod scanner;
pub mod session;
pub mod settings;

pub use confirmation::{
    ButtonBackground, ConfirmationStep, ConfirmationView, DecisionPort, PendingConfirmation,
};
pub use error::{SessionError, SessionResult};
pub use flow::{
    FlowEnd, FlowEventEmitter, FlowHandle, FlowMachine, FlowReport, FlowState, NoOpEmitter,
    ScanFlow,
};
pub use scanner::{
    ChannelScanner, ChannelSurface, ConfirmationSurface, LaunchedScan, PresentedConfirmation,
    ScannerLauncher,
};
pub use session::{CompletedScan, CompletionPort, ScanSession};
pub use settings::{ScanSettings, ScannerSettings};
