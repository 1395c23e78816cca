//! `GET /v1/lookup/{participantID}/{documentTypeID}`

use axum::extract::{Path, State};
use axum::Json;
use docroute_pipeline::LookupReport;

use crate::error::AppError;
use crate::state::AppState;

/// Query the directory for a participant and document type. Path segments
/// are the percent-encoded URI forms of both identifiers.
pub async fn lookup(
    State(state): State<AppState>,
    Path((participant_id, document_type_id)): Path<(String, String)>,
) -> Result<Json<LookupReport>, AppError> {
    let report = state
        .pipeline
        .lookup(&participant_id, &document_type_id)
        .await?;
    state.metrics.record_lookup();
    Ok(Json(report))
}
