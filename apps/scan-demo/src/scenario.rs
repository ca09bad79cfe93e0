//! Demo scenario module.
//!
//! The scenario is loaded from environment variables with fallback to
//! defaults: a decoded EAN that the simulated user accepts.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use scanflow_core::BarcodeFormat;

/// What the simulated scanner reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerBehavior {
    Decoded,
    Cancelled,
    PermissionDenied,
    TimedOut,
    /// Never completes; the demo tears the flow down instead.
    Hang,
}

impl FromStr for ScannerBehavior {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decoded" => Ok(ScannerBehavior::Decoded),
            "cancelled" | "canceled" => Ok(ScannerBehavior::Cancelled),
            "permission_denied" | "denied" => Ok(ScannerBehavior::PermissionDenied),
            "timeout" | "timed_out" => Ok(ScannerBehavior::TimedOut),
            "hang" => Ok(ScannerBehavior::Hang),
            _ => Err(ScenarioError::InvalidValue("SCANFLOW_DEMO_OUTCOME".to_string())),
        }
    }
}

/// What the simulated user does with the confirmation sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserBehavior {
    Accept,
    Reject,
    Dismiss,
    /// Taps the button, which also closes the sheet.
    AcceptAndDismiss,
}

impl FromStr for UserBehavior {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accept" => Ok(UserBehavior::Accept),
            "reject" => Ok(UserBehavior::Reject),
            "dismiss" => Ok(UserBehavior::Dismiss),
            "accept_and_dismiss" => Ok(UserBehavior::AcceptAndDismiss),
            _ => Err(ScenarioError::InvalidValue("SCANFLOW_DEMO_DECISION".to_string())),
        }
    }
}

/// Demo scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// SCANFLOW_DEMO_OUTCOME
    pub scanner: ScannerBehavior,

    /// SCANFLOW_DEMO_TEXT
    pub text: String,

    /// SCANFLOW_DEMO_FORMAT
    pub format: BarcodeFormat,

    /// SCANFLOW_DEMO_DECISION
    pub user: UserBehavior,

    /// SCANFLOW_DEMO_BUTTON_COLOR (optional)
    pub button_color: Option<String>,

    /// SCANFLOW_DEMO_DELAY_MS, simulated scanner and user latency
    pub delay_ms: u64,
}

impl Scenario {
    /// Load the scenario from environment variables.
    pub fn load() -> Result<Self, ScenarioError> {
        let scenario = Scenario {
            scanner: env::var("SCANFLOW_DEMO_OUTCOME")
                .unwrap_or_else(|_| "decoded".to_string())
                .parse()?,

            text: env::var("SCANFLOW_DEMO_TEXT").unwrap_or_else(|_| "4006381333931".to_string()),

            format: env::var("SCANFLOW_DEMO_FORMAT")
                .unwrap_or_else(|_| "EAN_13".to_string())
                .parse()
                .map_err(|_| ScenarioError::InvalidValue("SCANFLOW_DEMO_FORMAT".to_string()))?,

            user: env::var("SCANFLOW_DEMO_DECISION")
                .unwrap_or_else(|_| "accept".to_string())
                .parse()?,

            button_color: env::var("SCANFLOW_DEMO_BUTTON_COLOR").ok(),

            delay_ms: env::var("SCANFLOW_DEMO_DELAY_MS")
                .unwrap_or_else(|_| "250".to_string())
                .parse()
                .map_err(|_| ScenarioError::InvalidValue("SCANFLOW_DEMO_DELAY_MS".to_string()))?,
        };

        Ok(scenario)
    }

    /// Simulated scanner and user latency.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// How long the host waits on a hanging scanner before tearing down.
    pub fn hang_wait(&self) -> Duration {
        Duration::from_millis(self.delay_ms.saturating_mul(4))
    }
}

/// Scenario error types.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_parsing() {
        assert_eq!("DENIED".parse::<ScannerBehavior>().unwrap(), ScannerBehavior::PermissionDenied);
        assert_eq!("canceled".parse::<ScannerBehavior>().unwrap(), ScannerBehavior::Cancelled);
        assert!("maybe".parse::<ScannerBehavior>().is_err());

        assert_eq!(
            "accept_and_dismiss".parse::<UserBehavior>().unwrap(),
            UserBehavior::AcceptAndDismiss
        );
        assert!("shrug".parse::<UserBehavior>().is_err());
    }

    #[test]
    fn test_hang_wait_saturates() {
        let mut scenario = Scenario {
            scanner: ScannerBehavior::Hang,
            text: "4006381333931".to_string(),
            format: BarcodeFormat::Ean13,
            user: UserBehavior::Accept,
            button_color: None,
            delay_ms: 250,
        };
        assert_eq!(scenario.hang_wait(), Duration::from_millis(1_000));

        scenario.delay_ms = u64::MAX;
        assert_eq!(scenario.hang_wait(), Duration::from_millis(u64::MAX));
        assert_eq!(scenario.delay(), Duration::from_millis(u64::MAX));
    }
}
