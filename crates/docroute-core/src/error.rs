//! # Error Types
//!
//! Parse and construction errors for the core value types. Every variant
//! carries enough context (identifier kind, offending input) to be shown
//! to an API caller unchanged.

use thiserror::Error;

use crate::identifier::IdentifierKind;

/// Error raised when a raw string does not satisfy the identifier grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The input has no `::` separator between scheme and value.
    #[error("{kind} identifier \"{raw}\" is not in scheme::value form")]
    MissingSeparator {
        /// Which identifier was being parsed.
        kind: IdentifierKind,
        /// The rejected input.
        raw: String,
    },

    /// The scheme part is empty.
    #[error("{kind} identifier scheme must not be empty")]
    EmptyScheme {
        /// Which identifier was being parsed.
        kind: IdentifierKind,
    },

    /// The value part is empty.
    #[error("{kind} identifier value must not be empty")]
    EmptyValue {
        /// Which identifier was being parsed.
        kind: IdentifierKind,
    },

    /// The scheme violates the active grammar.
    #[error("{kind} identifier scheme \"{scheme}\" is invalid: {reason}")]
    InvalidScheme {
        /// Which identifier was being parsed.
        kind: IdentifierKind,
        /// The rejected scheme.
        scheme: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The value violates the active grammar.
    #[error("{kind} identifier value \"{value}\" is invalid: {reason}")]
    InvalidValue {
        /// Which identifier was being parsed.
        kind: IdentifierKind,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A transport profile id was empty or contained whitespace.
    #[error("invalid transport profile \"{0}\": must be non-empty without whitespace")]
    InvalidTransportProfile(String),

    /// The identifier factory name is not one of the supported grammars.
    #[error("unknown identifier scheme \"{0}\" (expected \"simple\" or \"peppol\")")]
    UnknownFactory(String),
}

/// Error raised when a validation execution set id cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorSetIdError {
    /// Wrong number of `:`-separated parts.
    #[error("execution set id \"{0}\" must be group:artifact:version[:classifier]")]
    Malformed(String),

    /// One of the parts is empty.
    #[error("execution set id \"{0}\" contains an empty part")]
    EmptyPart(String),
}
