//! # docroute-core — Foundational Types for docroute
//!
//! The leaf of the workspace dependency DAG. Defines the typed identifiers
//! that every routing decision is made on, the validation result model, and
//! the stable error codes surfaced to callers.
//!
//! ## Key Design Principles
//!
//! 1. **No bare strings for directory identifiers.** Participant, document
//!    type, and process identifiers are distinct newtypes that can only be
//!    obtained through an [`IdentifierFactory`]. You cannot pass a
//!    [`ProcessIdentifier`] where a [`DocumentTypeIdentifier`] is expected.
//!
//! 2. **One grammar per deployment.** The factory is chosen once at startup
//!    (`simple` or `peppol`) and shared read-only across requests.
//!
//! 3. **Stable error codes.** [`ErrorCode`] ids are part of the external
//!    contract and never change meaning.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `docroute-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod error_code;
pub mod identifier;
pub mod transport;
pub mod validation;

pub use error::{ExecutorSetIdError, IdentifierError};
pub use error_code::{CodedFailure, ErrorCode};
pub use identifier::{
    DocumentTypeIdentifier, IdentifierFactory, IdentifierKind, ParticipantIdentifier,
    ProcessIdentifier,
};
pub use transport::TransportProfile;
pub use validation::{ExecutorSetId, Severity, ValidationEntry, ValidationResultList};
