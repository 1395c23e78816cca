//! # Collaborator Traits
//!
//! The pipeline depends on these traits, never on the HTTP clients. Tests and
//! alternative deployments substitute their own implementations.
//!
//! All traits are object-safe and `Send + Sync` so they can be held as
//! `Arc<dyn Trait>` in shared application state.

use async_trait::async_trait;
use docroute_core::{
    DocumentTypeIdentifier, ExecutorSetId, ParticipantIdentifier, ProcessIdentifier,
    TransportProfile, ValidationResultList,
};
use docroute_message::MEMessage;
use docroute_routing::{RoutingInformation, ServiceMetadata};

use crate::error::{DirectoryError, DispatchError, ValidationEngineError};

/// What to look up in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub participant: ParticipantIdentifier,
    pub document_type: DocumentTypeIdentifier,
    /// Narrows the answer when the directory supports it.
    pub process: Option<ProcessIdentifier>,
    /// Narrows the answer when the directory supports it.
    pub transport_profile: Option<TransportProfile>,
}

impl LookupQuery {
    pub fn new(participant: ParticipantIdentifier, document_type: DocumentTypeIdentifier) -> Self {
        Self {
            participant,
            document_type,
            process: None,
            transport_profile: None,
        }
    }

    pub fn with_process(mut self, process: ProcessIdentifier) -> Self {
        self.process = Some(process);
        self
    }

    pub fn with_transport_profile(mut self, transport_profile: TransportProfile) -> Self {
        self.transport_profile = Some(transport_profile);
        self
    }
}

/// Directory lookup capability.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Fetch service metadata. `Ok(None)` means the directory has no entry
    /// for the participant and document type.
    async fn lookup(&self, query: &LookupQuery) -> Result<Option<ServiceMetadata>, DirectoryError>;
}

/// Business-document validation capability.
#[async_trait]
pub trait ValidationEngine: Send + Sync {
    async fn validate(
        &self,
        executor_set: &ExecutorSetId,
        document: &[u8],
    ) -> Result<ValidationResultList, ValidationEngineError>;
}

/// Message-exchange capability. Called at most once per submission.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    async fn dispatch(
        &self,
        routing: &RoutingInformation,
        message: &MEMessage,
    ) -> Result<(), DispatchError>;
}
