//! HTTP validation engine client.
//!
//! `POST {base}/validate/{executorSet}` with the raw document as the body.
//! The engine answers with a JSON array of findings.

use async_trait::async_trait;
use docroute_core::{ExecutorSetId, ValidationResultList};

use crate::adapter::ValidationEngine;
use crate::config::ClientConfig;
use crate::error::{ClientInitError, ValidationEngineError};
use crate::retry::{self, RetryOn};
use crate::{build_http, join_segments};

const SERVICE: &str = "validation";

/// [`ValidationEngine`] backed by a remote validation service.
#[derive(Debug, Clone)]
pub struct HttpValidationEngine {
    http: reqwest::Client,
    base_url: url::Url,
}

impl HttpValidationEngine {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientInitError> {
        Ok(Self {
            http: build_http(SERVICE, config)?,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl ValidationEngine for HttpValidationEngine {
    async fn validate(
        &self,
        executor_set: &ExecutorSetId,
        document: &[u8],
    ) -> Result<ValidationResultList, ValidationEngineError> {
        let ves = executor_set.to_string();
        let url = join_segments(&self.base_url, &["validate", ves.as_str()]);
        let endpoint = format!("POST {}", url.path());

        let resp = retry::retry_send(SERVICE, RetryOn::ConnectOnly, || {
            self.http
                .post(url.clone())
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(document.to_vec())
                .send()
        })
        .await
        .map_err(|source| ValidationEngineError::Http {
            endpoint: endpoint.clone(),
            source,
        })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ValidationEngineError::UnknownExecutorSet(ves));
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ValidationEngineError::Status {
                endpoint,
                status,
                body,
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|source| ValidationEngineError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;
        serde_json::from_str(&body).map_err(|e| ValidationEngineError::Malformed {
            endpoint,
            reason: e.to_string(),
        })
    }
}
