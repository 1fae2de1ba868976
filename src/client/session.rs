//! Per-submission state machine
//!
//! ```text
//! Idle --begin--> Submitting --complete--> Success
//!                                        | ServerError
//!                                        | Timeout
//!                                        | ConnectionError
//!                                        | Unexpected
//! (terminal) --reset--> Idle
//! ```
//!
//! There is no automatic retry edge; going back to Idle is always the user's call.

use crate::errors::{RiskError, Result};
use crate::types::PredictionResult;

/// Shown when the backend answers 502/503/504
pub const WAKING_UP_MESSAGE: &str =
    "The prediction service is waking up. Please wait a moment and submit again.";

/// Shown when the request exceeds the client timeout
pub const TIMEOUT_MESSAGE: &str =
    "The prediction service did not respond in time. Please try again.";

/// Shown when no connection could be made
pub const UNREACHABLE_MESSAGE: &str =
    "API unreachable. Make sure the backend server is running.";

/// Where a submission currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Success(PredictionResult),
    ServerError { status: u16, transient: bool },
    Timeout { duration_ms: u64 },
    ConnectionError(String),
    Unexpected(String),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Submitting => "Submitting",
            SubmissionState::Success(_) => "Success",
            SubmissionState::ServerError { .. } => "ServerError",
            SubmissionState::Timeout { .. } => "Timeout",
            SubmissionState::ConnectionError(_) => "ConnectionError",
            SubmissionState::Unexpected(_) => "Unexpected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionState::Idle | SubmissionState::Submitting)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionState::Success(_))
    }

    /// The prediction, if the submission succeeded
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            SubmissionState::Success(result) => Some(result),
            _ => None,
        }
    }

    /// User-facing text for failed submissions
    pub fn message(&self) -> Option<String> {
        match self {
            SubmissionState::ServerError {
                transient: true, ..
            } => Some(WAKING_UP_MESSAGE.to_string()),
            SubmissionState::ServerError { status, .. } => {
                Some(format!("Server error: HTTP {}", status))
            }
            SubmissionState::Timeout { .. } => Some(TIMEOUT_MESSAGE.to_string()),
            SubmissionState::ConnectionError(_) => Some(UNREACHABLE_MESSAGE.to_string()),
            SubmissionState::Unexpected(detail) => {
                Some(format!("An unexpected error occurred: {}", detail))
            }
            _ => None,
        }
    }

    /// Terminal state for the outcome of one request
    pub fn from_outcome(outcome: Result<PredictionResult>) -> Self {
        match outcome {
            Ok(result) => SubmissionState::Success(result),
            Err(RiskError::UpstreamTransient { status }) => SubmissionState::ServerError {
                status,
                transient: true,
            },
            Err(RiskError::UnexpectedServerStatus { status }) => SubmissionState::ServerError {
                status,
                transient: false,
            },
            Err(RiskError::UpstreamTimeout { duration_ms }) => {
                SubmissionState::Timeout { duration_ms }
            }
            Err(RiskError::UpstreamUnreachable(detail)) => SubmissionState::ConnectionError(detail),
            Err(other) => SubmissionState::Unexpected(other.to_string()),
        }
    }
}

/// One form submission
#[derive(Debug, Clone)]
pub struct Submission {
    state: SubmissionState,
}

impl Default for Submission {
    fn default() -> Self {
        Self::new()
    }
}

impl Submission {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Idle -> Submitting
    pub fn begin(&mut self) -> Result<()> {
        match self.state {
            SubmissionState::Idle => {
                self.state = SubmissionState::Submitting;
                Ok(())
            }
            _ => Err(self.invalid("begin")),
        }
    }

    /// Submitting -> terminal
    pub fn complete(&mut self, outcome: Result<PredictionResult>) -> Result<&SubmissionState> {
        match self.state {
            SubmissionState::Submitting => {
                self.state = SubmissionState::from_outcome(outcome);
                Ok(&self.state)
            }
            _ => Err(self.invalid("complete")),
        }
    }

    /// terminal -> Idle
    pub fn reset(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            self.state = SubmissionState::Idle;
            Ok(())
        } else {
            Err(self.invalid("reset"))
        }
    }

    fn invalid(&self, event: &str) -> RiskError {
        RiskError::InvalidTransition {
            from: self.state.name().to_string(),
            event: event.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassProbabilities;

    fn prediction() -> PredictionResult {
        PredictionResult {
            predicted_category: "Low".to_string(),
            confidence: 0.7,
            class_probabilities: ClassProbabilities::new(vec![
                ("High".to_string(), 0.1),
                ("Low".to_string(), 0.7),
                ("Medium".to_string(), 0.2),
            ]),
        }
    }

    #[test]
    fn test_happy_path() {
        let mut submission = Submission::new();
        submission.begin().unwrap();
        assert_eq!(submission.state(), &SubmissionState::Submitting);

        let state = submission.complete(Ok(prediction())).unwrap();
        assert!(state.is_success());
        assert_eq!(state.result().unwrap().predicted_category, "Low");
        assert!(state.message().is_none());

        submission.reset().unwrap();
        assert_eq!(submission.state(), &SubmissionState::Idle);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut submission = Submission::new();
        assert!(matches!(
            submission.complete(Ok(prediction())),
            Err(RiskError::InvalidTransition { .. })
        ));
        assert!(submission.reset().is_err());

        submission.begin().unwrap();
        assert!(submission.begin().is_err());
        assert!(submission.reset().is_err());

        submission
            .complete(Err(RiskError::UpstreamTimeout { duration_ms: 5000 }))
            .unwrap();
        assert!(submission.begin().is_err());
    }

    #[test]
    fn test_outcome_classification() {
        let state = SubmissionState::from_outcome(Err(RiskError::UpstreamTransient { status: 503 }));
        assert_eq!(
            state,
            SubmissionState::ServerError {
                status: 503,
                transient: true
            }
        );
        assert_eq!(state.message().unwrap(), WAKING_UP_MESSAGE);

        let state =
            SubmissionState::from_outcome(Err(RiskError::UnexpectedServerStatus { status: 422 }));
        assert!(state.message().unwrap().contains("422"));

        let state = SubmissionState::from_outcome(Err(RiskError::UpstreamUnreachable(
            "connection refused".to_string(),
        )));
        assert_eq!(state.name(), "ConnectionError");
        assert_eq!(state.message().unwrap(), UNREACHABLE_MESSAGE);

        let state =
            SubmissionState::from_outcome(Err(RiskError::InvalidResponse("not json".to_string())));
        assert_eq!(state.name(), "Unexpected");
        assert!(state.message().unwrap().contains("not json"));
    }
}
