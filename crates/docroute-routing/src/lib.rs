//! # docroute-routing — Routing Resolution
//!
//! Turns a caller's declared routing intent plus the directory's answer into
//! a fully resolved delivery target.
//!
//! ```text
//! SubmissionMetadata ──resolve──▶ RoutingInformationInput ─┐
//!                                                          ├─finalize─▶ RoutingInformation
//! ServiceMetadata ──select_endpoint──▶ EndpointMatch ──────┘
//! ```
//!
//! ## Security Invariant
//!
//! The endpoint URL and receiver certificate only ever come from the
//! directory. [`RoutingInformationInput::resolve`] rejects submissions that
//! pre-fill either field, and [`RoutingInformation`] has no public
//! constructor other than [`RoutingInformation::finalize`], which requires an
//! [`EndpointMatch`] that only [`select_endpoint`] can produce.

pub mod certificate;
pub mod error;
pub mod input;
pub mod metadata;
pub mod routing;
pub mod selector;

pub use certificate::Certificate;
pub use error::{CertificateError, FinalizeError, RoutingInputError};
pub use input::{RoutingInformationInput, SubmissionMetadata};
pub use metadata::{EndpointRecord, ProcessMetadata, ServiceMetadata};
pub use routing::RoutingInformation;
pub use selector::{select_endpoint, EndpointMatch};
