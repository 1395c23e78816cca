//! # docroute-client — Collaborator Clients
//!
//! The pipeline talks to three external capabilities. Each is an object-safe
//! async trait, shared as `Arc<dyn Trait>`:
//!
//! | Trait | Capability | HTTP implementation |
//! |-------|-----------|---------------------|
//! | [`DirectoryClient`] | `lookup(participant, docType) → ServiceMetadata \| none` | [`HttpDirectoryClient`] |
//! | [`ValidationEngine`] | `validate(executorSet, bytes) → ValidationResultList` | [`HttpValidationEngine`] |
//! | [`MessageDispatcher`] | `dispatch(routing, message) → sent \| error` | [`HttpMessageDispatcher`] |
//!
//! ## Retry Policy
//!
//! Directory lookups retry any transport failure with exponential backoff.
//! Validation calls retry only failures to connect: a timed-out POST is not
//! re-sent with the whole document. Dispatch is never retried: a second
//! attempt could deliver the document twice.
//!
//! ## Error Codes
//!
//! Every error type exposes `code()` returning the stable
//! [`docroute_core::ErrorCode`] reported to callers.

pub mod adapter;
pub mod config;
pub mod directory;
pub mod error;
pub mod gateway;
pub(crate) mod retry;
pub mod validation;

pub use adapter::{DirectoryClient, LookupQuery, MessageDispatcher, ValidationEngine};
pub use config::ClientConfig;
pub use directory::HttpDirectoryClient;
pub use error::{ClientInitError, DirectoryError, DispatchError, ValidationEngineError};
pub use gateway::HttpMessageDispatcher;
pub use validation::HttpValidationEngine;

use std::time::Duration;

/// Build a `reqwest` client with the configured timeout and, when a token is
/// set, a sensitive `Authorization: Bearer` default header.
pub(crate) fn build_http(
    service: &'static str,
    config: &ClientConfig,
) -> Result<reqwest::Client, ClientInitError> {
    if config.base_url.cannot_be_a_base() {
        return Err(ClientInitError::InvalidBaseUrl {
            service,
            url: config.base_url.to_string(),
        });
    }

    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(token) = &config.token {
        let mut value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|_| ClientInitError::InvalidToken(service))?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, value);
    }

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(headers)
        .build()
        .map_err(|source| ClientInitError::Http { service, source })
}

/// Append percent-encoded path segments to a base URL.
pub(crate) fn join_segments(base: &url::Url, segments: &[&str]) -> url::Url {
    let mut url = base.clone();
    // Checked in `build_http`: the base can carry path segments.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
