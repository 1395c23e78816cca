//! # docroute-api — HTTP Service
//!
//! Axum front end over [`docroute_pipeline::Pipeline`].
//!
//! ## API Surface
//!
//! | Route                                              | Module               |
//! |----------------------------------------------------|----------------------|
//! | `GET /v1/lookup/{participantID}/{documentTypeID}`  | [`routes::lookup`]   |
//! | `POST /v1/submit`                                  | [`routes::submit`]   |
//! | `GET /v1/status`                                   | [`routes::status`]   |
//! | `GET /health/liveness`, `GET /health/readiness`    | unauthenticated      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the application router.
///
/// Health checks are mounted outside the auth middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = state.metrics.clone();

    let api = routes::router()
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness() -> &'static str {
    "ready"
}
