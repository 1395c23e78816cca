//! `POST /v1/submit`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use docroute_pipeline::{OutgoingMessage, SubmissionReport};

use crate::error::AppError;
use crate::state::AppState;

/// Run one outgoing message through the pipeline.
///
/// A report is returned with 200 whatever the outcome; its `success` and
/// `state` fields carry the result. Parameter errors are 400.
pub async fn submit(
    State(state): State<AppState>,
    body: Result<Json<OutgoingMessage>, JsonRejection>,
) -> Result<Json<SubmissionReport>, AppError> {
    let Json(message) = body?;
    let report = state.pipeline.submit(&message).await?;
    state.metrics.record_submission(report.success);
    Ok(Json(report))
}
