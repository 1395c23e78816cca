//! # Request Metrics
//!
//! Atomic counters, reported by `GET /v1/status`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;

/// Shared metrics state. Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    errors: AtomicU64,
    lookups: AtomicU64,
    submissions: AtomicU64,
    sent: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub errors: u64,
    pub lookups: u64,
    pub submissions: u64,
    pub sent: u64,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self) {
        self.inner.lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a submission that produced a report.
    pub fn record_submission(&self, sent: bool) {
        self.inner.submissions.fetch_add(1, Ordering::Relaxed);
        if sent {
            self.inner.sent.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.inner.requests.load(Ordering::Relaxed),
            errors: self.inner.errors.load(Ordering::Relaxed),
            lookups: self.inner.lookups.load(Ordering::Relaxed),
            submissions: self.inner.submissions.load(Ordering::Relaxed),
            sent: self.inner.sent.load(Ordering::Relaxed),
        }
    }
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.inner.requests.fetch_add(1, Ordering::Relaxed);
        if response.status().is_client_error() || response.status().is_server_error() {
            m.inner.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    response
}
