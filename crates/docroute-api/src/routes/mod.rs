//! # Route Table
//!
//! Every `/v1` operation is listed once in [`Operation`]; [`router`] mounts
//! them all.

pub mod lookup;
pub mod status;
pub mod submit;

use axum::routing::{get, post, MethodRouter};
use axum::Router;

use crate::state::AppState;

/// The operations served under `/v1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Standalone directory lookup.
    Lookup,
    /// Submit-and-send.
    Submit,
    Status,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Self::Lookup, Self::Submit, Self::Status];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Lookup => "/v1/lookup/{participant_id}/{document_type_id}",
            Self::Submit => "/v1/submit",
            Self::Status => "/v1/status",
        }
    }

    fn handler(&self) -> MethodRouter<AppState> {
        match self {
            Self::Lookup => get(lookup::lookup),
            Self::Submit => post(submit::submit),
            Self::Status => get(status::status),
        }
    }
}

/// Router with every [`Operation`] mounted.
pub fn router() -> Router<AppState> {
    Operation::ALL
        .iter()
        .fold(Router::new(), |router, op| router.route(op.path(), op.handler()))
}
