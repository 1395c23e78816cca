//! # Service Metadata
//!
//! The directory's answer for one `(participant, document type)` pair, in
//! the JSON shape the directory client exchanges:
//!
//! ```json
//! {
//!   "participantID": "iso6523-actorid-upis::9915:test",
//!   "documentTypeID": "busdox-docid-qns::urn:...::Invoice##...::2.1",
//!   "processes": [{
//!     "processID": "cenbii-procid-ubl::urn:...:billing:01:1.0",
//!     "endpoints": [{
//!       "transportProfile": "peppol-transport-as4-v2_0",
//!       "endpointReference": "https://ap.example/as4",
//!       "certificate": "MIIC...",
//!       "serviceActivationDate": "2024-01-01T00:00:00Z"
//!     }]
//!   }]
//! }
//! ```
//!
//! Identifiers and endpoint data stay raw strings here. They are only
//! interpreted when an endpoint is selected and finalized, so one malformed
//! record cannot poison an otherwise usable answer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service metadata for one participant and document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMetadata {
    #[serde(rename = "participantID")]
    pub participant_id: String,
    #[serde(rename = "documentTypeID")]
    pub document_type_id: String,
    #[serde(default)]
    pub processes: Vec<ProcessMetadata>,
}

/// Endpoints registered for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetadata {
    #[serde(rename = "processID")]
    pub process_id: String,
    #[serde(default)]
    pub endpoints: Vec<EndpointRecord>,
}

/// One advertised delivery target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    pub transport_profile: String,
    pub endpoint_reference: String,
    /// Base64 DER (PEM tolerated).
    pub certificate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_activation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub require_business_level_signature: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_authentication_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_contact_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_information_url: Option<String>,
}

impl EndpointRecord {
    /// Whether `now` falls inside the advertised activation window.
    ///
    /// Both bounds are inclusive and either may be absent.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.service_activation_date.map_or(true, |from| from <= now);
        let not_expired = self.service_expiration_date.map_or(true, |until| now <= until);
        started && not_expired
    }
}

impl ServiceMetadata {
    /// Total number of endpoint records across all processes.
    pub fn endpoint_count(&self) -> usize {
        self.processes.iter().map(|p| p.endpoints.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> EndpointRecord {
        EndpointRecord {
            transport_profile: "T1".to_string(),
            endpoint_reference: "https://ep.example/as4".to_string(),
            certificate: "MIIB".to_string(),
            service_activation_date: None,
            service_expiration_date: None,
            require_business_level_signature: false,
            minimum_authentication_level: None,
            service_description: None,
            technical_contact_url: None,
            technical_information_url: None,
        }
    }

    #[test]
    fn deserializes_directory_json() {
        let json = serde_json::json!({
            "participantID": "s::9915:test",
            "documentTypeID": "d::invoice",
            "processes": [{
                "processID": "p::PR1",
                "endpoints": [{
                    "transportProfile": "T1",
                    "endpointReference": "https://ep.example/as4",
                    "certificate": "MIIB",
                    "serviceActivationDate": "2024-01-01T00:00:00Z",
                    "requireBusinessLevelSignature": true,
                    "technicalContactUrl": "mailto:ops@ep.example"
                }]
            }]
        });
        let md: ServiceMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(md.processes.len(), 1);
        let ep = &md.processes[0].endpoints[0];
        assert_eq!(ep.transport_profile, "T1");
        assert!(ep.require_business_level_signature);
        assert_eq!(
            ep.service_activation_date,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(md.endpoint_count(), 1);
    }

    #[test]
    fn missing_processes_is_empty() {
        let md: ServiceMetadata = serde_json::from_value(serde_json::json!({
            "participantID": "s::v",
            "documentTypeID": "d::v"
        }))
        .unwrap();
        assert!(md.processes.is_empty());
    }

    #[test]
    fn activation_window_bounds_are_inclusive() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut ep = record();
        ep.service_activation_date = Some(from);
        ep.service_expiration_date = Some(until);

        assert!(ep.is_active_at(from));
        assert!(ep.is_active_at(until));
        assert!(!ep.is_active_at(from - chrono::Duration::seconds(1)));
        assert!(!ep.is_active_at(until + chrono::Duration::seconds(1)));
    }

    #[test]
    fn open_window_is_always_active() {
        assert!(record().is_active_at(Utc::now()));
    }
}
