//! Stage outcomes as values.

use docroute_core::CodedFailure;

/// Result of running one pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    /// The stage succeeded and the pipeline may advance.
    Completed(T),
    /// A legitimate negative answer: validation errors, no directory entry,
    /// no matching endpoint.
    Negative,
    /// A collaborator or data failure with a stable code.
    Failed(CodedFailure),
}

impl<T> StageOutcome<T> {
    /// Whether the pipeline must stop after this stage.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::Completed(_))
    }

    pub fn failure(&self) -> Option<&CodedFailure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }
}
