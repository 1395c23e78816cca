//! # Routing Information Finalizer

use docroute_core::{
    DocumentTypeIdentifier, ParticipantIdentifier, ProcessIdentifier, TransportProfile,
};
use url::Url;

use crate::certificate::Certificate;
use crate::error::FinalizeError;
use crate::input::RoutingInformationInput;
use crate::selector::EndpointMatch;

/// Fully resolved delivery target: the caller's routing intent plus the
/// directory's endpoint URL and certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingInformation {
    input: RoutingInformationInput,
    endpoint_url: Url,
    certificate: Certificate,
}

impl RoutingInformation {
    /// Combine routing input with a selected endpoint.
    ///
    /// Fails if the endpoint reference is not an absolute http(s) URL or the
    /// certificate is not a structurally valid X.509 certificate.
    pub fn finalize(
        input: &RoutingInformationInput,
        selected: EndpointMatch<'_>,
    ) -> Result<Self, FinalizeError> {
        let record = selected.record();
        let endpoint_url = parse_endpoint_url(&record.endpoint_reference)?;
        let certificate = Certificate::from_encoded(&record.certificate)?;
        Ok(Self {
            input: input.clone(),
            endpoint_url,
            certificate,
        })
    }

    pub fn input(&self) -> &RoutingInformationInput {
        &self.input
    }

    pub fn sender(&self) -> &ParticipantIdentifier {
        self.input.sender()
    }

    pub fn receiver(&self) -> &ParticipantIdentifier {
        self.input.receiver()
    }

    pub fn document_type(&self) -> &DocumentTypeIdentifier {
        self.input.document_type()
    }

    pub fn process(&self) -> &ProcessIdentifier {
        self.input.process()
    }

    pub fn transport_profile(&self) -> &TransportProfile {
        self.input.transport_profile()
    }

    pub fn endpoint_url(&self) -> &Url {
        &self.endpoint_url
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }
}

fn parse_endpoint_url(raw: &str) -> Result<Url, FinalizeError> {
    let invalid = |reason: String| FinalizeError::InvalidEndpointUri {
        uri: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
