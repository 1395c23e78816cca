//! HTTP message gateway client.
//!
//! Hands the resolved routing information and the assembled message to a
//! message-exchange gateway with `POST {base}/outgoing`. The gateway builds,
//! signs, and transmits the protocol envelope.
//!
//! ## Wire Format
//!
//! ```json
//! {
//!   "senderID": "...", "receiverID": "...", "documentTypeID": "...",
//!   "processID": "...", "transportProfile": "...",
//!   "endpointURL": "https://ap.example/as4",
//!   "receiverCertificate": "<base64 DER>",
//!   "payloads": [{ "contentID": "...", "mimeType": "...", "value": "<base64>" }]
//! }
//! ```

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use docroute_message::MEMessage;
use docroute_routing::RoutingInformation;
use serde::Serialize;

use crate::adapter::MessageDispatcher;
use crate::config::ClientConfig;
use crate::error::{ClientInitError, DispatchError};
use crate::{build_http, join_segments};

const SERVICE: &str = "gateway";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutgoingEnvelope<'a> {
    #[serde(rename = "senderID")]
    sender_id: String,
    #[serde(rename = "receiverID")]
    receiver_id: String,
    #[serde(rename = "documentTypeID")]
    document_type_id: String,
    #[serde(rename = "processID")]
    process_id: String,
    transport_profile: &'a str,
    #[serde(rename = "endpointURL")]
    endpoint_url: &'a str,
    receiver_certificate: String,
    payloads: Vec<EnvelopePayload<'a>>,
}

#[derive(Debug, Serialize)]
struct EnvelopePayload<'a> {
    #[serde(rename = "contentID")]
    content_id: &'a str,
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    value: String,
}

impl<'a> OutgoingEnvelope<'a> {
    fn new(routing: &'a RoutingInformation, message: &'a MEMessage) -> Self {
        Self {
            sender_id: routing.sender().uri_encoded(),
            receiver_id: routing.receiver().uri_encoded(),
            document_type_id: routing.document_type().uri_encoded(),
            process_id: routing.process().uri_encoded(),
            transport_profile: routing.transport_profile().as_str(),
            endpoint_url: routing.endpoint_url().as_str(),
            receiver_certificate: routing.certificate().to_base64(),
            payloads: message
                .payloads()
                .iter()
                .map(|p| EnvelopePayload {
                    content_id: p.content_id().as_str(),
                    mime_type: p.mime_type().as_ref(),
                    value: STANDARD.encode(p.data()),
                })
                .collect(),
        }
    }
}

/// [`MessageDispatcher`] backed by a message-exchange gateway.
///
/// Never retries.
#[derive(Debug, Clone)]
pub struct HttpMessageDispatcher {
    http: reqwest::Client,
    base_url: url::Url,
}

impl HttpMessageDispatcher {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientInitError> {
        Ok(Self {
            http: build_http(SERVICE, config)?,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl MessageDispatcher for HttpMessageDispatcher {
    async fn dispatch(
        &self,
        routing: &RoutingInformation,
        message: &MEMessage,
    ) -> Result<(), DispatchError> {
        let url = join_segments(&self.base_url, &["outgoing"]);
        let endpoint = format!("POST {}", url.path());
        let envelope = OutgoingEnvelope::new(routing, message);

        let resp = self
            .http
            .post(url)
            .json(&envelope)
            .send()
            .await
            .map_err(|source| DispatchError::Http { endpoint, source })?;

        let status = resp.status();
        if status.is_success() {
            tracing::info!(
                receiver = %routing.receiver(),
                endpoint = %routing.endpoint_url(),
                payloads = message.len(),
                "message handed to gateway"
            );
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        if status.is_client_error() {
            Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(DispatchError::Failed {
                status: status.as_u16(),
                body,
            })
        }
    }
}
