//! Submission lifecycle:
//! `Idle → Validating → RelayingAssets → Submitting → Succeeded | Failed`.

use intake_core::SubmitResponse;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    RelayingAssets,
    Submitting,
    Succeeded(SubmitResponse),
    /// Holds the message shown in the dismissible failure banner.
    Failed(String),
}

impl SubmissionPhase {
    /// Whether a submission is in flight (the submit control stays disabled).
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SubmissionPhase::Validating
                | SubmissionPhase::RelayingAssets
                | SubmissionPhase::Submitting
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionPhase::Succeeded(_) | SubmissionPhase::Failed(_))
    }

    /// Whether moving from `self` to `next` follows the lifecycle.
    ///
    /// Any busy phase may fail; terminal phases only go back to idle (reset or
    /// banner dismissal) or start a new submission.
    pub fn can_transition_to(&self, next: &SubmissionPhase) -> bool {
        use SubmissionPhase::*;
        match (self, next) {
            (Idle, Validating) => true,
            (Validating, RelayingAssets) => true,
            (RelayingAssets, Submitting) => true,
            (Submitting, Succeeded(_)) => true,
            (s, Failed(_)) if s.is_busy() => true,
            (s, Idle) if s.is_terminal() => true,
            (s, Validating) if s.is_terminal() => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Validating => "validating",
            SubmissionPhase::RelayingAssets => "relaying_assets",
            SubmissionPhase::Submitting => "submitting",
            SubmissionPhase::Succeeded(_) => "succeeded",
            SubmissionPhase::Failed(_) => "failed",
        }
    }
}
