//! `GET /v1/status`

use axum::extract::State;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::middleware::metrics::MetricsSnapshot;
use crate::state::AppState;

const MASK: &str = "***";

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    /// UTC, RFC 3339.
    pub timestamp: String,
    pub metrics: MetricsSnapshot,
    pub config: ConfigItems,
}

/// Configuration items, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigItems(Vec<(&'static str, String)>);

impl ConfigItems {
    /// Copy `items`, masking values whose key names a secret.
    pub fn masked(items: &[(&'static str, String)]) -> Self {
        Self(
            items
                .iter()
                .map(|(key, value)| {
                    if is_secret(key) {
                        (*key, MASK.to_string())
                    } else {
                        (*key, value.clone())
                    }
                })
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Serialize for ConfigItems {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

fn is_secret(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.contains("token") || key.contains("password")
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        metrics: state.metrics.snapshot(),
        config: ConfigItems::masked(&state.settings),
    })
}
