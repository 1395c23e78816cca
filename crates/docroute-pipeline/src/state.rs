//! # Pipeline State Machine
//!
//! ```text
//! Start → Validating ─┬─ Skipped ───┐
//!                     ├─ Validated ─┴─ LookingUp ─┬─ Resolved → Dispatching ─┬─ Sent
//!                     └─ ValidationFailed         ├─ NoMatch                 └─ DispatchFailed
//!                                                 └─ LookupFailed
//! ```
//!
//! Every transition goes through [`PipelineState::transition`], which
//! rejects anything not in the table above. Terminal states accept no
//! transition, so a completed stage can never be re-entered.

use serde::Serialize;
use thiserror::Error;

/// Where a submission is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Start,
    Validating,
    /// No validation profile configured.
    Skipped,
    Validated,
    /// Terminal: validation errors or engine failure.
    ValidationFailed,
    LookingUp,
    /// Terminal: no directory entry or no matching endpoint.
    NoMatch,
    /// Terminal: directory failure or malformed endpoint metadata.
    LookupFailed,
    Resolved,
    Dispatching,
    /// Terminal: message handed to the message-exchange layer.
    Sent,
    /// Terminal.
    DispatchFailed,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed
                | Self::NoMatch
                | Self::LookupFailed
                | Self::Sent
                | Self::DispatchFailed
        )
    }

    /// Whether the submission ended in the `Sent` state.
    pub fn is_success(&self) -> bool {
        *self == Self::Sent
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Validating => "VALIDATING",
            Self::Skipped => "SKIPPED",
            Self::Validated => "VALIDATED",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::LookingUp => "LOOKING_UP",
            Self::NoMatch => "NO_MATCH",
            Self::LookupFailed => "LOOKUP_FAILED",
            Self::Resolved => "RESOLVED",
            Self::Dispatching => "DISPATCHING",
            Self::Sent => "SENT",
            Self::DispatchFailed => "DISPATCH_FAILED",
        }
    }

    /// States reachable from this one. No wildcard, so a new variant must
    /// be placed in the table explicitly.
    fn successors(&self) -> &'static [PipelineState] {
        match self {
            Self::Start => &[Self::Validating],
            Self::Validating => &[Self::Skipped, Self::Validated, Self::ValidationFailed],
            Self::Skipped | Self::Validated => &[Self::LookingUp],
            Self::LookingUp => &[Self::Resolved, Self::NoMatch, Self::LookupFailed],
            Self::Resolved => &[Self::Dispatching],
            Self::Dispatching => &[Self::Sent, Self::DispatchFailed],
            Self::ValidationFailed
            | Self::NoMatch
            | Self::LookupFailed
            | Self::Sent
            | Self::DispatchFailed => &[],
        }
    }

    /// Move to `to`, or fail if the table does not allow it.
    pub fn transition(self, to: PipelineState) -> Result<PipelineState, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::AlreadyTerminal { state: self });
        }
        if !self.successors().contains(&to) {
            return Err(TransitionError::InvalidTransition { from: self, to });
        }
        tracing::debug!(from = %self, to = %to, "pipeline transition");
        Ok(to)
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Error Types ──────────────────────────────────────────────────────

/// A transition not permitted by the state table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("invalid pipeline transition from {from} to {to}")]
    InvalidTransition {
        from: PipelineState,
        to: PipelineState,
    },
    #[error("pipeline is in terminal state {state}")]
    AlreadyTerminal { state: PipelineState },
}
