//! # Transport Profiles
//!
//! A transport profile names the message-exchange protocol variant an
//! endpoint speaks. The directory advertises one per endpoint; the caller
//! requests one per submission; selection requires an exact match.

use serde::{Serialize, Serializer};

use crate::error::IdentifierError;

/// OASIS BDXR AS4 profile.
pub const BDXR_AS4: &str = "bdxr-transport-ebms3-as4-v1p0";

/// Peppol AS4 profile, version 2.0.
pub const PEPPOL_AS4_V2: &str = "peppol-transport-as4-v2_0";

/// Validated transport profile identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportProfile(String);

impl TransportProfile {
    /// Create a transport profile, rejecting empty ids and ids with whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(IdentifierError::InvalidTransportProfile(id));
        }
        Ok(Self(id))
    }

    /// The BDXR AS4 profile.
    pub fn bdxr_as4() -> Self {
        Self(BDXR_AS4.to_string())
    }

    /// The profile id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransportProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TransportProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl PartialEq<str> for TransportProfile {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
