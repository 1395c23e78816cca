//! # Pipeline Orchestrator
//!
//! Sequences one submission through the stages:
//!
//! 1. **Pre-flight** (pure): resolve routing input, assemble the message.
//!    Any parameter error aborts here, before a collaborator is called.
//! 2. **Validation** of the primary payload, or "skipped".
//! 3. **Lookup**: directory query, endpoint selection, finalization.
//! 4. **Dispatch** to the message-exchange layer, exactly once.
//!
//! The pipeline stops at the first blocking outcome. Every attempted stage
//! is recorded in the [`SubmissionReport`].

use std::sync::Arc;

use docroute_client::{
    ClientInitError, DirectoryClient, HttpDirectoryClient, HttpMessageDispatcher,
    HttpValidationEngine, MessageDispatcher, ValidationEngine,
};
use docroute_core::{ExecutorSetId, IdentifierFactory};
use docroute_message::MEMessage;
use docroute_routing::RoutingInformationInput;
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::{ParameterError, PipelineError};
use crate::outcome::StageOutcome;
use crate::report::{LookupReport, SubmissionReport};
use crate::stages::{DispatchStage, LookupStage, ValidationStage};
use crate::state::PipelineState;

/// An outgoing-message submission, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub metadata: docroute_routing::SubmissionMetadata,
    #[serde(default)]
    pub payloads: Vec<docroute_message::SubmittedPayload>,
}

/// A submission that passed pre-flight.
#[derive(Debug, Clone)]
pub struct PreparedSubmission {
    pub input: RoutingInformationInput,
    pub message: MEMessage,
}

/// The submission pipeline. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct Pipeline {
    factory: IdentifierFactory,
    validation: ValidationStage,
    lookup: LookupStage,
    dispatch: DispatchStage,
}

impl Pipeline {
    pub fn new(
        factory: IdentifierFactory,
        validation: ValidationStage,
        directory: Arc<dyn DirectoryClient>,
        dispatcher: Arc<dyn MessageDispatcher>,
    ) -> Self {
        Self {
            factory,
            validation,
            lookup: LookupStage::new(directory, factory),
            dispatch: DispatchStage::new(dispatcher),
        }
    }

    /// Build the pipeline with HTTP collaborators from configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ClientInitError> {
        let directory: Arc<dyn DirectoryClient> =
            Arc::new(HttpDirectoryClient::new(&config.directory)?);
        let dispatcher: Arc<dyn MessageDispatcher> =
            Arc::new(HttpMessageDispatcher::new(&config.gateway)?);

        let validation = match (&config.validation_profile, &config.validation_service) {
            (Some(profile), Some(service)) => {
                let engine: Arc<dyn ValidationEngine> = Arc::new(HttpValidationEngine::new(service)?);
                ValidationStage::new(profile.clone(), engine)
            }
            _ => ValidationStage::disabled(),
        };

        Ok(Self::new(
            config.identifier_scheme,
            validation,
            directory,
            dispatcher,
        ))
    }

    pub fn identifier_factory(&self) -> IdentifierFactory {
        self.factory
    }

    pub fn validation_profile(&self) -> Option<&ExecutorSetId> {
        self.validation.profile()
    }

    /// Pre-flight: routing input and message assembly. No side effects.
    pub fn prepare(&self, submission: &OutgoingMessage) -> Result<PreparedSubmission, ParameterError> {
        let input = RoutingInformationInput::resolve(&submission.metadata, self.factory)?;
        let message = MEMessage::assemble_submitted(&submission.payloads)?;
        Ok(PreparedSubmission { input, message })
    }

    /// Run a submission through every stage.
    pub async fn submit(&self, submission: &OutgoingMessage) -> Result<SubmissionReport, PipelineError> {
        let prepared = self.prepare(submission)?;
        self.run(&prepared).await
    }

    /// Run a prepared submission.
    pub async fn run(&self, prepared: &PreparedSubmission) -> Result<SubmissionReport, PipelineError> {
        let mut report = SubmissionReport::new(&prepared.input);
        let mut state = PipelineState::Start.transition(PipelineState::Validating)?;

        let validation = self.validation.run(prepared.message.primary().data()).await;
        report.record_validation(self.validation.profile(), &validation);
        state = state.transition(match (&validation.outcome, validation.is_skipped()) {
            (StageOutcome::Completed(()), true) => PipelineState::Skipped,
            (StageOutcome::Completed(()), false) => PipelineState::Validated,
            _ => PipelineState::ValidationFailed,
        })?;
        if state.is_terminal() {
            return Ok(finish(report, state));
        }

        state = state.transition(PipelineState::LookingUp)?;
        let lookup = self.lookup.run(&prepared.input).await;
        report.record_lookup(&lookup);
        let routing = match lookup.outcome {
            StageOutcome::Completed(routing) => {
                state = state.transition(PipelineState::Resolved)?;
                routing
            }
            StageOutcome::Negative => {
                return Ok(finish(report, state.transition(PipelineState::NoMatch)?));
            }
            StageOutcome::Failed(_) => {
                return Ok(finish(report, state.transition(PipelineState::LookupFailed)?));
            }
        };

        state = state.transition(PipelineState::Dispatching)?;
        let sending = self.dispatch.run(&routing, &prepared.message).await;
        report.record_sending(&sending);
        let state = state.transition(match sending {
            StageOutcome::Completed(()) => PipelineState::Sent,
            _ => PipelineState::DispatchFailed,
        })?;
        Ok(finish(report, state))
    }

    /// Standalone directory lookup for a participant and document type,
    /// both in URI-encoded form.
    pub async fn lookup(
        &self,
        participant_id: &str,
        document_type_id: &str,
    ) -> Result<LookupReport, ParameterError> {
        let participant = self
            .factory
            .parse_participant(participant_id)
            .map_err(|source| ParameterError::Identifier {
                field: "participantID",
                source,
            })?;
        let document_type = self
            .factory
            .parse_document_type(document_type_id)
            .map_err(|source| ParameterError::Identifier {
                field: "documentTypeID",
                source,
            })?;

        let mut report = LookupReport {
            participant_id: participant.uri_encoded(),
            document_type_id: document_type.uri_encoded(),
            success: false,
            response: None,
            error: None,
        };
        match self.lookup.fetch(&participant, &document_type).await {
            Ok(Some(metadata)) => {
                report.success = true;
                report.response = Some(metadata);
            }
            Ok(None) => {}
            Err(failure) => report.error = Some(failure),
        }
        Ok(report)
    }
}

fn finish(mut report: SubmissionReport, state: PipelineState) -> SubmissionReport {
    report.finish(state);
    tracing::info!(
        sender = %report.sender_id,
        receiver = %report.receiver_id,
        state = %state,
        success = report.success,
        "submission finished"
    );
    report
}
