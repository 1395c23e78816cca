//! # Stable Error Codes
//!
//! Hard collaborator failures (directory, validation engine, message
//! exchange) are classified by an [`ErrorCode`]. The ids are part of the
//! external contract: callers may match on them, so an id is never reused
//! for a different meaning.

use serde::{Serialize, Serializer};

/// Stable classification of a hard failure in one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The directory could not be reached or answered with a failure status.
    DirectoryLookupFailed,
    /// The directory answered, but the body is not valid service metadata.
    DirectoryResponseMalformed,
    /// The matching endpoint carries an unusable URI or certificate.
    EndpointMetadataMalformed,
    /// The validation engine could not be reached or failed internally.
    ValidationEngineFailed,
    /// The configured execution set is unknown to the validation engine.
    ValidationSetUnknown,
    /// The message-exchange layer could not be reached or failed internally.
    DispatchTransportFailed,
    /// The message-exchange layer refused the message.
    DispatchRejected,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 7] = [
        Self::DirectoryLookupFailed,
        Self::DirectoryResponseMalformed,
        Self::EndpointMetadataMalformed,
        Self::ValidationEngineFailed,
        Self::ValidationSetUnknown,
        Self::DispatchTransportFailed,
        Self::DispatchRejected,
    ];

    /// The stable identifier reported to callers.
    pub fn id(&self) -> &'static str {
        match self {
            Self::DirectoryLookupFailed => "DD-001",
            Self::DirectoryResponseMalformed => "DD-002",
            Self::EndpointMetadataMalformed => "DD-003",
            Self::ValidationEngineFailed => "VAL-001",
            Self::ValidationSetUnknown => "VAL-002",
            Self::DispatchTransportFailed => "ME-001",
            Self::DispatchRejected => "ME-002",
        }
    }

    /// Short human-readable description of the failure class.
    pub fn description(&self) -> &'static str {
        match self {
            Self::DirectoryLookupFailed => "directory lookup failed",
            Self::DirectoryResponseMalformed => "directory response is malformed",
            Self::EndpointMetadataMalformed => "endpoint metadata is malformed",
            Self::ValidationEngineFailed => "validation engine failed",
            Self::ValidationSetUnknown => "validation execution set is unknown",
            Self::DispatchTransportFailed => "message exchange transport failed",
            Self::DispatchRejected => "message rejected by message exchange",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// A hard failure as reported to the caller: stable code plus context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodedFailure {
    /// Stable failure classification.
    pub code: ErrorCode,
    /// Human-readable context.
    pub message: String,
}

impl CodedFailure {
    /// Create a failure record.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CodedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.code.id(), self.message)
    }
}
