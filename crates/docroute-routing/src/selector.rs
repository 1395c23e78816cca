//! # Endpoint Selector
//!
//! Picks the one endpoint in a directory answer that serves the requested
//! process over the requested transport profile.
//!
//! Rules, in order:
//!
//! 1. Process ids in the metadata are parsed with the deployment grammar and
//!    compared as typed identifiers. Ids that fail to parse never match and
//!    are skipped with a warning.
//! 2. The transport profile must equal the requested one exactly.
//! 3. Endpoints outside their activation window at `now` are not eligible.
//! 4. If several endpoints qualify, the first in document order wins and a
//!    warning is logged.
//!
//! The selector does not interpret the endpoint URI or certificate. A match
//! with malformed data surfaces as a [`crate::FinalizeError`] when the
//! match is finalized.

use chrono::{DateTime, Utc};
use docroute_core::{IdentifierFactory, ProcessIdentifier, TransportProfile};

use crate::metadata::{EndpointRecord, ServiceMetadata};

/// An endpoint record chosen by [`select_endpoint`].
///
/// Cannot be constructed outside this crate, so routing information can only
/// ever be finalized from a real directory answer.
#[derive(Debug, Clone, Copy)]
pub struct EndpointMatch<'a> {
    record: &'a EndpointRecord,
}

impl<'a> EndpointMatch<'a> {
    pub(crate) fn new(record: &'a EndpointRecord) -> Self {
        Self { record }
    }

    /// The selected endpoint record.
    pub fn record(&self) -> &'a EndpointRecord {
        self.record
    }
}

/// Select the endpoint for `(process, transport)`, or `None` when the
/// metadata has no eligible match.
pub fn select_endpoint<'a>(
    metadata: &'a ServiceMetadata,
    factory: IdentifierFactory,
    process: &ProcessIdentifier,
    transport: &TransportProfile,
    now: DateTime<Utc>,
) -> Option<EndpointMatch<'a>> {
    let mut candidates = metadata
        .processes
        .iter()
        .filter(|p| match factory.parse_process(&p.process_id) {
            Ok(id) => id == *process,
            Err(error) => {
                tracing::warn!(
                    process_id = %p.process_id,
                    %error,
                    "skipping unparsable process id in service metadata"
                );
                false
            }
        })
        .flat_map(|p| p.endpoints.iter())
        .filter(|ep| *transport == *ep.transport_profile.as_str())
        .filter(|ep| {
            let active = ep.is_active_at(now);
            if !active {
                tracing::debug!(
                    endpoint = %ep.endpoint_reference,
                    "matching endpoint outside its activation window"
                );
            }
            active
        });

    let first = candidates.next()?;
    let extra = candidates.count();
    if extra > 0 {
        tracing::warn!(
            participant = %metadata.participant_id,
            process = %process,
            transport = %transport,
            duplicates = extra,
            "directory lists several matching endpoints; using the first"
        );
    }
    Some(EndpointMatch::new(first))
}
