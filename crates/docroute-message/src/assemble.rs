//! # Message Assembler
//!
//! Builds an [`MEMessage`] from payload descriptors:
//!
//! - the list must be non-empty,
//! - each MIME type must parse,
//! - a non-blank caller content id is kept verbatim and must be unique,
//! - a missing or blank content id is replaced by a generated one that
//!   collides with no other id in the message.
//!
//! Payload order is preserved.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mime::Mime;
use serde::{Deserialize, Serialize};

use crate::content_id::ContentId;
use crate::error::MessageError;
use crate::payload::MEPayload;

/// One payload as submitted over HTTP, with base64 content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedPayload {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "contentID", default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Base64 of the payload bytes.
    pub value: String,
}

/// One payload descriptor with raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSpec {
    pub mime_type: String,
    pub content_id: Option<String>,
    pub data: Vec<u8>,
}

impl SubmittedPayload {
    fn decode(&self, index: usize) -> Result<PayloadSpec, MessageError> {
        let data = STANDARD
            .decode(self.value.trim())
            .map_err(|e| MessageError::InvalidBase64 {
                index,
                reason: e.to_string(),
            })?;
        Ok(PayloadSpec {
            mime_type: self.mime_type.clone(),
            content_id: self.content_id.clone(),
            data,
        })
    }
}

/// The ordered, non-empty payload sequence handed to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct MEMessage {
    payloads: Vec<MEPayload>,
}

impl MEMessage {
    /// Assemble a message from raw payload descriptors.
    pub fn assemble(specs: Vec<PayloadSpec>) -> Result<Self, MessageError> {
        if specs.is_empty() {
            return Err(MessageError::NoPayloads);
        }

        let mut mime_types = Vec::with_capacity(specs.len());
        let mut used: HashSet<ContentId> = HashSet::new();
        for (index, spec) in specs.iter().enumerate() {
            mime_types.push(parse_mime(index, &spec.mime_type)?);
            if let Some(id) = spec.content_id.as_deref().and_then(ContentId::supplied) {
                if !used.insert(id.clone()) {
                    return Err(MessageError::DuplicateContentId(id.to_string()));
                }
            }
        }

        let payloads = specs
            .into_iter()
            .zip(mime_types)
            .map(|(spec, mime_type)| {
                let content_id = match spec.content_id.as_deref().and_then(ContentId::supplied) {
                    Some(id) => id,
                    None => fresh_id(&mut used),
                };
                MEPayload::new(mime_type, content_id, spec.data)
            })
            .collect();

        Ok(Self { payloads })
    }

    /// Decode base64 payload values and assemble.
    pub fn assemble_submitted(payloads: &[SubmittedPayload]) -> Result<Self, MessageError> {
        let specs = payloads
            .iter()
            .enumerate()
            .map(|(index, p)| p.decode(index))
            .collect::<Result<Vec<_>, _>>()?;
        Self::assemble(specs)
    }

    pub fn payloads(&self) -> &[MEPayload] {
        &self.payloads
    }

    /// The first payload: the business document subject to validation.
    pub fn primary(&self) -> &MEPayload {
        // Non-empty by construction.
        &self.payloads[0]
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Never true for an assembled message.
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl<'a> IntoIterator for &'a MEMessage {
    type Item = &'a MEPayload;
    type IntoIter = std::slice::Iter<'a, MEPayload>;

    fn into_iter(self) -> Self::IntoIter {
        self.payloads.iter()
    }
}

fn parse_mime(index: usize, raw: &str) -> Result<Mime, MessageError> {
    raw.trim()
        .parse::<Mime>()
        .map_err(|e| MessageError::InvalidMimeType {
            index,
            mime_type: raw.to_string(),
            reason: e.to_string(),
        })
}

fn fresh_id(used: &mut HashSet<ContentId>) -> ContentId {
    loop {
        let id = ContentId::generate();
        if used.insert(id.clone()) {
            return id;
        }
    }
}
