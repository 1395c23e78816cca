//! # docroute-pipeline — Submission Pipeline
//!
//! Orchestrates validation → lookup → endpoint selection → dispatch for one
//! submission, and the standalone directory lookup.
//!
//! ## Architecture
//!
//! - [`config`]: [`PipelineConfig`] from YAML plus environment.
//! - [`stages`]: one adapter per collaborator, each yielding a
//!   [`StageOutcome`].
//! - [`state`]: [`PipelineState`], the transition table.
//! - [`report`]: [`SubmissionReport`] and [`LookupReport`] JSON shapes.
//! - [`pipeline`]: [`Pipeline`], the orchestrator.
//!
//! Collaborators are injected as `Arc<dyn Trait>`. [`Pipeline::from_config`]
//! wires the HTTP implementations; tests wire doubles.

pub mod config;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod report;
pub mod stages;
pub mod state;

pub use config::{ConfigError, PipelineConfig};
pub use error::{ParameterError, PipelineError};
pub use outcome::StageOutcome;
pub use pipeline::{OutgoingMessage, Pipeline, PreparedSubmission};
pub use report::{LookupReport, LookupResults, SendingResults, SubmissionReport, ValidationReport};
pub use stages::{DispatchStage, LookupStage, ValidationStage};
pub use state::{PipelineState, TransitionError};
