//! # Stage Reports
//!
//! JSON-serializable summaries returned to callers.
//!
//! A submit report carries the routing identifiers, one section per
//! attempted stage, the terminal state, and overall success:
//!
//! ```json
//! {
//!   "senderid": "...", "receiverid": "...", "documentTypeID": "...",
//!   "processID": "...", "transportProfile": "...",
//!   "validation-skipped": true,
//!   "lookup-results": { "response": {...}, "endpointReference": "https://...", "success": true },
//!   "sending-results": { "success": true },
//!   "state": "SENT",
//!   "success": true
//! }
//! ```
//!
//! Sections for stages that were never attempted are omitted.

use docroute_core::{CodedFailure, ExecutorSetId, ValidationResultList};
use docroute_routing::{RoutingInformationInput, ServiceMetadata};
use serde::Serialize;

use crate::outcome::StageOutcome;
use crate::stages::{LookupAttempt, ValidationAttempt};
use crate::state::PipelineState;

/// Validation section of a submit report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor_set: Option<ExecutorSetId>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_millis: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ValidationResultList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CodedFailure>,
}

/// Lookup section of a submit report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResults {
    /// The directory's answer. Omitted when it had none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ServiceMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_reference: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CodedFailure>,
}

/// Sending section of a submit report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendingResults {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CodedFailure>,
}

/// Structured outcome of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReport {
    #[serde(rename = "senderid")]
    pub sender_id: String,
    #[serde(rename = "receiverid")]
    pub receiver_id: String,
    #[serde(rename = "documentTypeID")]
    pub document_type_id: String,
    #[serde(rename = "processID")]
    pub process_id: String,
    #[serde(rename = "transportProfile")]
    pub transport_profile: String,
    #[serde(rename = "validation-skipped", skip_serializing_if = "Option::is_none")]
    pub validation_skipped: Option<bool>,
    #[serde(rename = "validation-results", skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
    #[serde(rename = "lookup-results", skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupResults>,
    #[serde(rename = "sending-results", skip_serializing_if = "Option::is_none")]
    pub sending: Option<SendingResults>,
    pub state: PipelineState,
    pub success: bool,
}

impl SubmissionReport {
    /// An empty report for `input`, before any stage has run.
    pub fn new(input: &RoutingInformationInput) -> Self {
        Self {
            sender_id: input.sender().uri_encoded(),
            receiver_id: input.receiver().uri_encoded(),
            document_type_id: input.document_type().uri_encoded(),
            process_id: input.process().uri_encoded(),
            transport_profile: input.transport_profile().to_string(),
            validation_skipped: None,
            validation: None,
            lookup: None,
            sending: None,
            state: PipelineState::Start,
            success: false,
        }
    }

    pub(crate) fn record_validation(
        &mut self,
        profile: Option<&ExecutorSetId>,
        attempt: &ValidationAttempt,
    ) {
        if attempt.is_skipped() {
            self.validation_skipped = Some(true);
            return;
        }
        let run = attempt.run.as_ref();
        self.validation = Some(ValidationReport {
            executor_set: run.map(|r| r.executor_set.clone()).or_else(|| profile.cloned()),
            success: !attempt.outcome.is_blocking(),
            duration_millis: run.map(|r| r.duration_ms),
            results: run.map(|r| r.results.clone()),
            error: attempt.outcome.failure().cloned(),
        });
    }

    pub(crate) fn record_lookup(&mut self, attempt: &LookupAttempt) {
        let endpoint_reference = match &attempt.outcome {
            StageOutcome::Completed(routing) => Some(routing.endpoint_url().to_string()),
            _ => None,
        };
        self.lookup = Some(LookupResults {
            response: attempt.response.clone(),
            endpoint_reference,
            success: !attempt.outcome.is_blocking(),
            error: attempt.outcome.failure().cloned(),
        });
    }

    pub(crate) fn record_sending(&mut self, outcome: &StageOutcome<()>) {
        self.sending = Some(SendingResults {
            success: !outcome.is_blocking(),
            error: outcome.failure().cloned(),
        });
    }

    pub(crate) fn finish(&mut self, state: PipelineState) {
        self.state = state;
        self.success = state.is_success();
    }
}

/// Outcome of a standalone directory lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupReport {
    #[serde(rename = "participantID")]
    pub participant_id: String,
    #[serde(rename = "documentTypeID")]
    pub document_type_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ServiceMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CodedFailure>,
}
