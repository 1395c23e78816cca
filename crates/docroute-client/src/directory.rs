//! HTTP directory client.
//!
//! `GET {base}/{participantID}/services/{documentTypeID}` with both path
//! segments percent-encoded. A 404 means the participant is not registered
//! for the document type.

use async_trait::async_trait;
use docroute_routing::ServiceMetadata;

use crate::adapter::{DirectoryClient, LookupQuery};
use crate::config::ClientConfig;
use crate::error::{ClientInitError, DirectoryError};
use crate::retry::{self, RetryOn};
use crate::{build_http, join_segments};

const SERVICE: &str = "directory";

/// [`DirectoryClient`] backed by a JSON directory service.
#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl HttpDirectoryClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientInitError> {
        Ok(Self {
            http: build_http(SERVICE, config)?,
            base_url: config.base_url.clone(),
        })
    }

    fn lookup_url(&self, query: &LookupQuery) -> url::Url {
        let participant = query.participant.uri_encoded();
        let document_type = query.document_type.uri_encoded();
        let mut url = join_segments(
            &self.base_url,
            &[participant.as_str(), "services", document_type.as_str()],
        );
        if let Some(process) = &query.process {
            url.query_pairs_mut()
                .append_pair("processID", &process.uri_encoded());
        }
        if let Some(transport) = &query.transport_profile {
            url.query_pairs_mut()
                .append_pair("transportProfile", transport.as_str());
        }
        url
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn lookup(&self, query: &LookupQuery) -> Result<Option<ServiceMetadata>, DirectoryError> {
        let url = self.lookup_url(query);
        let endpoint = format!("GET {}", url.path());

        let resp = retry::retry_send(SERVICE, RetryOn::AnyTransport, || {
            self.http.get(url.clone()).send()
        })
            .await
            .map_err(|source| DirectoryError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(
                participant = %query.participant,
                document_type = %query.document_type,
                "directory has no entry"
            );
            return Ok(None);
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DirectoryError::Status {
                endpoint,
                status,
                body,
            });
        }

        let body = resp.text().await.map_err(|source| DirectoryError::Http {
            endpoint: endpoint.clone(),
            source,
        })?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| DirectoryError::Malformed {
                endpoint,
                reason: e.to_string(),
            })
    }
}
