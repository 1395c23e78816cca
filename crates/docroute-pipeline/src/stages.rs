//! # Stage Adapters
//!
//! Each adapter wraps one collaborator and turns its answer into a
//! [`StageOutcome`] plus whatever the report needs to show. Adapters never
//! return `Err`: failures are outcomes.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use docroute_client::{DirectoryClient, LookupQuery, MessageDispatcher, ValidationEngine};
use docroute_core::{
    CodedFailure, DocumentTypeIdentifier, ExecutorSetId, IdentifierFactory,
    ParticipantIdentifier, ValidationResultList,
};
use docroute_message::MEMessage;
use docroute_routing::{
    select_endpoint, RoutingInformation, RoutingInformationInput, ServiceMetadata,
};

use crate::outcome::StageOutcome;

// -- Validation ---------------------------------------------------------------

/// One run of the validation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRun {
    pub executor_set: ExecutorSetId,
    pub results: ValidationResultList,
    pub duration_ms: u64,
}

/// What the validation stage observed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationAttempt {
    /// `None` when no profile is configured.
    pub run: Option<ValidationRun>,
    pub outcome: StageOutcome<()>,
}

impl ValidationAttempt {
    pub fn is_skipped(&self) -> bool {
        self.run.is_none() && matches!(self.outcome, StageOutcome::Completed(()))
    }
}

/// Validates the primary payload against the configured profile.
#[derive(Clone)]
pub struct ValidationStage {
    profile: Option<(ExecutorSetId, Arc<dyn ValidationEngine>)>,
}

impl ValidationStage {
    /// A stage that always reports "skipped".
    pub fn disabled() -> Self {
        Self { profile: None }
    }

    pub fn new(executor_set: ExecutorSetId, engine: Arc<dyn ValidationEngine>) -> Self {
        Self {
            profile: Some((executor_set, engine)),
        }
    }

    pub fn profile(&self) -> Option<&ExecutorSetId> {
        self.profile.as_ref().map(|(ves, _)| ves)
    }

    pub async fn run(&self, document: &[u8]) -> ValidationAttempt {
        let Some((executor_set, engine)) = &self.profile else {
            tracing::debug!("no validation profile configured, skipping validation");
            return ValidationAttempt {
                run: None,
                outcome: StageOutcome::Completed(()),
            };
        };

        let started = Instant::now();
        let result = engine.validate(executor_set, document).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(results) => {
                let passed = results.contains_no_error();
                tracing::info!(
                    executor_set = %executor_set,
                    errors = results.error_count(),
                    warnings = results.warning_count(),
                    duration_ms,
                    passed,
                    "validation finished"
                );
                ValidationAttempt {
                    run: Some(ValidationRun {
                        executor_set: executor_set.clone(),
                        results,
                        duration_ms,
                    }),
                    outcome: if passed {
                        StageOutcome::Completed(())
                    } else {
                        StageOutcome::Negative
                    },
                }
            }
            Err(error) => {
                tracing::warn!(executor_set = %executor_set, %error, "validation engine failed");
                ValidationAttempt {
                    run: None,
                    outcome: StageOutcome::Failed(error.failure()),
                }
            }
        }
    }
}

// -- Lookup -------------------------------------------------------------------

/// What the lookup stage observed.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupAttempt {
    /// The directory's answer, when it had one.
    pub response: Option<ServiceMetadata>,
    pub outcome: StageOutcome<RoutingInformation>,
}

/// Looks up the receiver, selects the endpoint, and finalizes routing.
#[derive(Clone)]
pub struct LookupStage {
    directory: Arc<dyn DirectoryClient>,
    factory: IdentifierFactory,
}

impl LookupStage {
    pub fn new(directory: Arc<dyn DirectoryClient>, factory: IdentifierFactory) -> Self {
        Self { directory, factory }
    }

    /// Raw directory lookup without endpoint selection.
    pub async fn fetch(
        &self,
        participant: &ParticipantIdentifier,
        document_type: &DocumentTypeIdentifier,
    ) -> Result<Option<ServiceMetadata>, CodedFailure> {
        let query = LookupQuery::new(participant.clone(), document_type.clone());
        self.directory.lookup(&query).await.map_err(|error| {
            tracing::warn!(participant = %participant, %error, "directory lookup failed");
            error.failure()
        })
    }

    pub async fn run(&self, input: &RoutingInformationInput) -> LookupAttempt {
        let query = LookupQuery::new(input.receiver().clone(), input.document_type().clone())
            .with_process(input.process().clone())
            .with_transport_profile(input.transport_profile().clone());

        let metadata = match self.directory.lookup(&query).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                tracing::info!(
                    receiver = %input.receiver(),
                    document_type = %input.document_type(),
                    "receiver not registered in directory"
                );
                return LookupAttempt {
                    response: None,
                    outcome: StageOutcome::Negative,
                };
            }
            Err(error) => {
                tracing::warn!(receiver = %input.receiver(), %error, "directory lookup failed");
                return LookupAttempt {
                    response: None,
                    outcome: StageOutcome::Failed(error.failure()),
                };
            }
        };

        let outcome = match select_endpoint(
            &metadata,
            self.factory,
            input.process(),
            input.transport_profile(),
            Utc::now(),
        ) {
            None => {
                tracing::info!(
                    receiver = %input.receiver(),
                    process = %input.process(),
                    transport = %input.transport_profile(),
                    "no matching endpoint"
                );
                StageOutcome::Negative
            }
            Some(selected) => match RoutingInformation::finalize(input, selected) {
                Ok(routing) => {
                    tracing::info!(
                        receiver = %input.receiver(),
                        endpoint = %routing.endpoint_url(),
                        certificate = %routing.certificate().sha256_fingerprint(),
                        "endpoint resolved"
                    );
                    StageOutcome::Completed(routing)
                }
                Err(error) => {
                    tracing::warn!(receiver = %input.receiver(), %error, "matching endpoint is malformed");
                    StageOutcome::Failed(CodedFailure::new(error.code(), error.to_string()))
                }
            },
        };

        LookupAttempt {
            response: Some(metadata),
            outcome,
        }
    }
}

// -- Dispatch -----------------------------------------------------------------

/// Hands the message to the message-exchange layer. Never retries.
#[derive(Clone)]
pub struct DispatchStage {
    dispatcher: Arc<dyn MessageDispatcher>,
}

impl DispatchStage {
    pub fn new(dispatcher: Arc<dyn MessageDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn run(&self, routing: &RoutingInformation, message: &MEMessage) -> StageOutcome<()> {
        match self.dispatcher.dispatch(routing, message).await {
            Ok(()) => StageOutcome::Completed(()),
            Err(error) => {
                tracing::warn!(
                    receiver = %routing.receiver(),
                    endpoint = %routing.endpoint_url(),
                    %error,
                    "dispatch failed"
                );
                StageOutcome::Failed(error.failure())
            }
        }
    }
}
