//! # docroute-message — Outgoing Message Model
//!
//! An [`MEMessage`] is the unit handed to the message-exchange layer: an
//! ordered, non-empty sequence of [`MEPayload`]s, each with a MIME type and
//! a content id that is unique within the message.
//!
//! Messages are built in one step by [`MEMessage::assemble`], which either
//! returns a message satisfying every invariant or a [`MessageError`].
//! There is no mutable builder.

pub mod assemble;
pub mod content_id;
pub mod error;
pub mod payload;

pub use assemble::{MEMessage, PayloadSpec, SubmittedPayload};
pub use content_id::ContentId;
pub use error::MessageError;
pub use payload::MEPayload;
