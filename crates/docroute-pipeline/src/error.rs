use docroute_core::IdentifierError;
use docroute_message::MessageError;
use docroute_routing::RoutingInputError;
use thiserror::Error;

use crate::state::TransitionError;

/// The request itself is invalid. Nothing has been looked up or sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error(transparent)]
    Routing(#[from] RoutingInputError),
    #[error(transparent)]
    Message(#[from] MessageError),
    #[error("invalid '{field}': {source}")]
    Identifier {
        field: &'static str,
        source: IdentifierError,
    },
}

/// A submission could not be run to a report.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    /// The orchestrator attempted a transition its state table forbids.
    #[error("internal pipeline error: {0}")]
    Transition(#[from] TransitionError),
}
