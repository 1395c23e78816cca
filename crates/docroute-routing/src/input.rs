//! # Routing Input Resolver
//!
//! Converts the metadata block of a submission into a
//! [`RoutingInformationInput`]. Submissions that pre-fill the endpoint URL or
//! the receiver certificate are rejected outright: both must come from the
//! directory.

use docroute_core::{
    DocumentTypeIdentifier, IdentifierError, IdentifierFactory, ParticipantIdentifier,
    ProcessIdentifier, TransportProfile,
};
use serde::{Deserialize, Serialize};

use crate::error::RoutingInputError;

/// The `metadata` block of an outgoing-message submission, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    #[serde(rename = "senderID")]
    pub sender_id: String,
    #[serde(rename = "receiverID")]
    pub receiver_id: String,
    #[serde(rename = "documentTypeID")]
    pub document_type_id: String,
    #[serde(rename = "processID")]
    pub process_id: String,
    #[serde(rename = "transportProtocol")]
    pub transport_protocol: String,
    /// Must be absent or blank.
    #[serde(rename = "endpointURL", default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Must be absent or blank.
    #[serde(
        rename = "receiverCertificate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub receiver_certificate: Option<String>,
}

/// The caller's routing intent before lookup.
///
/// Immutable. Only produced by [`RoutingInformationInput::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingInformationInput {
    sender: ParticipantIdentifier,
    receiver: ParticipantIdentifier,
    document_type: DocumentTypeIdentifier,
    process: ProcessIdentifier,
    transport_profile: TransportProfile,
}

fn has_text(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl RoutingInformationInput {
    /// Resolve a submission's metadata with the deployment's identifier
    /// grammar.
    ///
    /// The forbidden-field checks run before any identifier is parsed.
    pub fn resolve(
        metadata: &SubmissionMetadata,
        factory: IdentifierFactory,
    ) -> Result<Self, RoutingInputError> {
        if has_text(&metadata.endpoint_url) {
            return Err(RoutingInputError::EndpointUrlPresent);
        }
        if has_text(&metadata.receiver_certificate) {
            return Err(RoutingInputError::CertificatePresent);
        }

        let field = |field: &'static str| {
            move |source: IdentifierError| RoutingInputError::InvalidIdentifier { field, source }
        };

        Ok(Self {
            sender: factory
                .parse_participant(&metadata.sender_id)
                .map_err(field("senderID"))?,
            receiver: factory
                .parse_participant(&metadata.receiver_id)
                .map_err(field("receiverID"))?,
            document_type: factory
                .parse_document_type(&metadata.document_type_id)
                .map_err(field("documentTypeID"))?,
            process: factory
                .parse_process(&metadata.process_id)
                .map_err(field("processID"))?,
            transport_profile: TransportProfile::new(metadata.transport_protocol.as_str())
                .map_err(field("transportProtocol"))?,
        })
    }

    pub fn sender(&self) -> &ParticipantIdentifier {
        &self.sender
    }

    pub fn receiver(&self) -> &ParticipantIdentifier {
        &self.receiver
    }

    pub fn document_type(&self) -> &DocumentTypeIdentifier {
        &self.document_type
    }

    pub fn process(&self) -> &ProcessIdentifier {
        &self.process
    }

    pub fn transport_profile(&self) -> &TransportProfile {
        &self.transport_profile
    }
}
