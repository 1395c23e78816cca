use mime::Mime;

use crate::content_id::ContentId;

/// One content unit of an outgoing message.
///
/// Only built by the assembler, which guarantees the content id is unique
/// within the owning message.
#[derive(Debug, Clone, PartialEq)]
pub struct MEPayload {
    mime_type: Mime,
    content_id: ContentId,
    data: Vec<u8>,
}

impl MEPayload {
    pub(crate) fn new(mime_type: Mime, content_id: ContentId, data: Vec<u8>) -> Self {
        Self {
            mime_type,
            content_id,
            data,
        }
    }

    pub fn mime_type(&self) -> &Mime {
        &self.mime_type
    }

    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
