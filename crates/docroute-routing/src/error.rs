//! Errors raised while resolving routing information.

use docroute_core::{ErrorCode, IdentifierError};
use thiserror::Error;

/// A submission's metadata block cannot be turned into routing input.
///
/// Always a caller error: nothing has been looked up or sent yet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingInputError {
    /// The caller pre-filled the endpoint URL.
    #[error("the 'metadata.endpointURL' field must not be present")]
    EndpointUrlPresent,

    /// The caller pre-filled the receiver certificate.
    #[error("the 'metadata.receiverCertificate' field must not be present")]
    CertificatePresent,

    /// One of the identifier fields does not parse.
    #[error("invalid 'metadata.{field}': {source}")]
    InvalidIdentifier {
        /// JSON field name of the offending identifier.
        field: &'static str,
        source: IdentifierError,
    },
}

/// Certificate bytes are not a usable X.509 certificate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CertificateError {
    /// No certificate content at all.
    #[error("certificate is empty")]
    Empty,

    /// The text is neither base64 nor PEM.
    #[error("certificate encoding is invalid: {0}")]
    Encoding(String),

    /// The bytes decode but are not a DER certificate structure.
    #[error("certificate structure is invalid: {0}")]
    Structure(String),
}

/// The selected endpoint cannot be turned into routing information.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinalizeError {
    /// The endpoint reference is not an absolute http(s) URL.
    #[error("endpoint URI \"{uri}\" is invalid: {reason}")]
    InvalidEndpointUri { uri: String, reason: String },

    /// The endpoint certificate cannot be decoded.
    #[error("endpoint certificate cannot be decoded: {0}")]
    Certificate(#[from] CertificateError),
}

impl FinalizeError {
    /// Stable error code for reporting.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::EndpointMetadataMalformed
    }
}
