//! Collaborator client error types.
//!
//! Each error maps to a stable [`ErrorCode`] through `code()`. The pipeline
//! reports `failure()` (code plus message) and never inspects variants.

use docroute_core::{CodedFailure, ErrorCode};

/// A client could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum ClientInitError {
    #[error("failed to build HTTP client for {service}: {source}")]
    Http {
        service: &'static str,
        source: reqwest::Error,
    },
    #[error("bearer token for {0} is not a valid header value")]
    InvalidToken(&'static str),
    #[error("base URL for {service} cannot carry a path: {url}")]
    InvalidBaseUrl { service: &'static str, url: String },
}

/// Errors from the directory lookup service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// HTTP transport error after retries.
    #[error("directory request {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The directory returned a non-2xx, non-404 status.
    #[error("directory {endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The directory answered with something that is not service metadata.
    #[error("directory response from {endpoint} is malformed: {reason}")]
    Malformed { endpoint: String, reason: String },
}

impl DirectoryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http { .. } | Self::Status { .. } => ErrorCode::DirectoryLookupFailed,
            Self::Malformed { .. } => ErrorCode::DirectoryResponseMalformed,
        }
    }

    pub fn failure(&self) -> CodedFailure {
        CodedFailure::new(self.code(), self.to_string())
    }
}

/// Errors from the validation engine.
#[derive(Debug, thiserror::Error)]
pub enum ValidationEngineError {
    #[error("validation request {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("validation engine {endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The engine does not know the requested execution set.
    #[error("validation execution set \"{0}\" is unknown to the engine")]
    UnknownExecutorSet(String),
    #[error("validation response from {endpoint} is malformed: {reason}")]
    Malformed { endpoint: String, reason: String },
}

impl ValidationEngineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownExecutorSet(_) => ErrorCode::ValidationSetUnknown,
            _ => ErrorCode::ValidationEngineFailed,
        }
    }

    pub fn failure(&self) -> CodedFailure {
        CodedFailure::new(self.code(), self.to_string())
    }
}

/// Errors from the message-exchange gateway.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Transport failure; the message may or may not have been delivered.
    #[error("dispatch request {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The gateway refused the message (4xx).
    #[error("message gateway rejected the message with {status}: {body}")]
    Rejected { status: u16, body: String },
    /// The gateway failed while sending (5xx or unexpected status).
    #[error("message gateway failed with {status}: {body}")]
    Failed { status: u16, body: String },
}

impl DispatchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Rejected { .. } => ErrorCode::DispatchRejected,
            Self::Http { .. } | Self::Failed { .. } => ErrorCode::DispatchTransportFailed,
        }
    }

    pub fn failure(&self) -> CodedFailure {
        CodedFailure::new(self.code(), self.to_string())
    }
}
