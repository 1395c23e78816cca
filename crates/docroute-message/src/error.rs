use thiserror::Error;

/// A payload list cannot be assembled into a message.
///
/// Every variant is a caller error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// The submission carried no payloads.
    #[error("at least one payload is required")]
    NoPayloads,

    /// A payload's MIME type does not parse.
    #[error("payload {index}: invalid MIME type \"{mime_type}\": {reason}")]
    InvalidMimeType {
        index: usize,
        mime_type: String,
        reason: String,
    },

    /// Two payloads carry the same caller-supplied content id.
    #[error("duplicate content ID \"{0}\"")]
    DuplicateContentId(String),

    /// A payload's `value` is not valid base64.
    #[error("payload {index}: value is not valid base64: {reason}")]
    InvalidBase64 { index: usize, reason: String },
}
