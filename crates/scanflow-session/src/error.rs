//! # Session Error Types
//!
//! Error types for running scan sessions and their confirmation step.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Protocol     │  │   Lifecycle     │  │     Collaborators       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core           │  │  AlreadyDeliv.  │  │  ScannerUnavailable     │ │
//! │  │  (decode, color,│  │  TornDown       │  │  SurfaceUnavailable     │ │
//! │  │   validation)   │  │  InvalidTrans.  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Configuration  │  │    Internal     │                              │
//! │  │                 │  │                 │                              │
//! │  │  InvalidConfig  │  │  TaskFailed     │                              │
//! │  │  ConfigLoad/Save│  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Cancelled` and `PermissionDenied` are outcomes, never errors.

use scanflow_core::{CoreError, InvalidColorSpec, SessionId};
use thiserror::Error;

use crate::flow::FlowState;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session error type covering every failure of the async protocol.
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// Config, codec, color, or validation failure from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Lifecycle Errors
    // =========================================================================
    /// A second signal arrived on a one-shot port.
    #[error("Session {session_id}: {what} already delivered")]
    AlreadyDelivered {
        session_id: SessionId,
        what: &'static str,
    },

    /// The host was torn down before the signal arrived; it was discarded.
    #[error("Session {0} was torn down")]
    TornDown(SessionId),

    /// The flow state machine refused a transition.
    #[error("Invalid flow transition: {from} -> {to}")]
    InvalidTransition { from: FlowState, to: FlowState },

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    /// The external scanner could not be launched.
    #[error("Scanner unavailable: {0}")]
    ScannerUnavailable(String),

    /// The confirmation surface could not be shown.
    #[error("Confirmation surface unavailable: {0}")]
    SurfaceUnavailable(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid scanner settings.
    #[error("Invalid scanner settings: {0}")]
    InvalidConfig(String),

    /// Failed to load the settings file.
    #[error("Failed to load settings: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save the settings file.
    #[error("Failed to save settings: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// A spawned flow task panicked or was aborted.
    #[error("Flow task failed: {0}")]
    TaskFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<InvalidColorSpec> for SessionError {
    fn from(err: InvalidColorSpec) -> Self {
        SessionError::Core(CoreError::Color(err))
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSaveFailed(err.to_string())
    }
}

impl From<tokio::task::JoinError> for SessionError {
    fn from(err: tokio::task::JoinError) -> Self {
        SessionError::TaskFailed(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
