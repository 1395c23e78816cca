//! # Directory Identifiers
//!
//! Typed participant, document-type, and process identifiers. Each one is a
//! `(scheme, value)` pair written in URI-encoded form as `scheme::value`.
//!
//! ## Construction
//!
//! Identifiers can only be created through an [`IdentifierFactory`], which
//! applies the grammar selected for the deployment:
//!
//! - [`IdentifierFactory::Simple`]: any non-empty scheme without whitespace
//!   (at most 25 characters) and any non-empty value without control
//!   characters.
//! - [`IdentifierFactory::Peppol`]: the fixed Peppol schemes, ISO 6523
//!   participant values, and the Peppol length limits. Participant
//!   identifiers are case-insensitive and stored lowercased.
//!
//! Identifiers serialize as their URI-encoded string. They deliberately do
//! not implement `Deserialize`: inbound strings must go through a factory.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::IdentifierError;

/// Separator between scheme and value in the URI-encoded form.
pub const URI_SEPARATOR: &str = "::";

/// Maximum scheme length accepted by every grammar.
const MAX_SCHEME_LEN: usize = 25;

/// Peppol participant identifier scheme.
pub const PEPPOL_PARTICIPANT_SCHEME: &str = "iso6523-actorid-upis";

/// Peppol document type identifier schemes.
pub const PEPPOL_DOCTYPE_SCHEMES: &[&str] = &["busdox-docid-qns", "peppol-doctype-wildcard"];

/// Peppol process identifier scheme.
pub const PEPPOL_PROCESS_SCHEME: &str = "cenbii-procid-ubl";

/// Which of the three identifier families a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Participant,
    DocumentType,
    Process,
}

impl IdentifierKind {
    /// Lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::DocumentType => "document type",
            Self::Process => "process",
        }
    }

    fn max_value_len(&self) -> usize {
        match self {
            Self::Participant => 50,
            Self::DocumentType => 500,
            Self::Process => 200,
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared storage for the three identifier newtypes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SchemeValue {
    scheme: String,
    value: String,
}

macro_rules! identifier_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SchemeValue);

        impl $name {
            /// The identifier scheme.
            pub fn scheme(&self) -> &str {
                &self.0.scheme
            }

            /// The identifier value.
            pub fn value(&self) -> &str {
                &self.0.value
            }

            /// The `scheme::value` form used on the wire and in reports.
            pub fn uri_encoded(&self) -> String {
                format!("{}{}{}", self.0.scheme, URI_SEPARATOR, self.0.value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}{}", self.0.scheme, URI_SEPARATOR, self.0.value)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

identifier_newtype!(
    /// Identifies a network participant (sender or receiver).
    ParticipantIdentifier
);

identifier_newtype!(
    /// Identifies the business document type being exchanged.
    DocumentTypeIdentifier
);

identifier_newtype!(
    /// Identifies the business process the document belongs to.
    ProcessIdentifier
);

/// The identifier grammar in force for a deployment.
///
/// Chosen once from configuration and shared read-only by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierFactory {
    /// Permissive grammar: any well-formed `scheme::value`.
    #[default]
    Simple,
    /// Peppol policy for identifiers.
    Peppol,
}

impl IdentifierFactory {
    /// Configuration name of this grammar.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Peppol => "peppol",
        }
    }

    /// Parse a participant identifier from its URI-encoded form.
    pub fn parse_participant(&self, raw: &str) -> Result<ParticipantIdentifier, IdentifierError> {
        let (scheme, value) = split_uri_encoded(IdentifierKind::Participant, raw)?;
        self.create_participant(scheme, value)
    }

    /// Parse a document type identifier from its URI-encoded form.
    pub fn parse_document_type(
        &self,
        raw: &str,
    ) -> Result<DocumentTypeIdentifier, IdentifierError> {
        let (scheme, value) = split_uri_encoded(IdentifierKind::DocumentType, raw)?;
        self.create_document_type(scheme, value)
    }

    /// Parse a process identifier from its URI-encoded form.
    pub fn parse_process(&self, raw: &str) -> Result<ProcessIdentifier, IdentifierError> {
        let (scheme, value) = split_uri_encoded(IdentifierKind::Process, raw)?;
        self.create_process(scheme, value)
    }

    /// Create a participant identifier from its parts.
    pub fn create_participant(
        &self,
        scheme: &str,
        value: &str,
    ) -> Result<ParticipantIdentifier, IdentifierError> {
        self.check(IdentifierKind::Participant, scheme, value)
            .map(ParticipantIdentifier)
    }

    /// Create a document type identifier from its parts.
    pub fn create_document_type(
        &self,
        scheme: &str,
        value: &str,
    ) -> Result<DocumentTypeIdentifier, IdentifierError> {
        self.check(IdentifierKind::DocumentType, scheme, value)
            .map(DocumentTypeIdentifier)
    }

    /// Create a process identifier from its parts.
    pub fn create_process(
        &self,
        scheme: &str,
        value: &str,
    ) -> Result<ProcessIdentifier, IdentifierError> {
        self.check(IdentifierKind::Process, scheme, value)
            .map(ProcessIdentifier)
    }

    fn check(
        &self,
        kind: IdentifierKind,
        scheme: &str,
        value: &str,
    ) -> Result<SchemeValue, IdentifierError> {
        if scheme.is_empty() {
            return Err(IdentifierError::EmptyScheme { kind });
        }
        if value.is_empty() {
            return Err(IdentifierError::EmptyValue { kind });
        }
        if scheme.chars().count() > MAX_SCHEME_LEN {
            return Err(IdentifierError::InvalidScheme {
                kind,
                scheme: scheme.to_string(),
                reason: format!("longer than {MAX_SCHEME_LEN} characters"),
            });
        }
        if scheme
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == ':')
        {
            return Err(IdentifierError::InvalidScheme {
                kind,
                scheme: scheme.to_string(),
                reason: "contains whitespace, control characters, or ':'".to_string(),
            });
        }
        if value.chars().any(char::is_control) {
            return Err(IdentifierError::InvalidValue {
                kind,
                value: value.to_string(),
                reason: "contains control characters".to_string(),
            });
        }

        match self {
            Self::Simple => Ok(SchemeValue {
                scheme: scheme.to_string(),
                value: value.to_string(),
            }),
            Self::Peppol => check_peppol(kind, scheme, value),
        }
    }
}

impl std::str::FromStr for IdentifierFactory {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "peppol" => Ok(Self::Peppol),
            _ => Err(IdentifierError::UnknownFactory(s.to_string())),
        }
    }
}

impl std::fmt::Display for IdentifierFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split `scheme::value` at the first separator.
fn split_uri_encoded(kind: IdentifierKind, raw: &str) -> Result<(&str, &str), IdentifierError> {
    raw.split_once(URI_SEPARATOR)
        .ok_or_else(|| IdentifierError::MissingSeparator {
            kind,
            raw: raw.to_string(),
        })
}

fn check_peppol(
    kind: IdentifierKind,
    scheme: &str,
    value: &str,
) -> Result<SchemeValue, IdentifierError> {
    let scheme_lower = scheme.to_ascii_lowercase();
    let allowed: &[&str] = match kind {
        IdentifierKind::Participant => &[PEPPOL_PARTICIPANT_SCHEME],
        IdentifierKind::DocumentType => PEPPOL_DOCTYPE_SCHEMES,
        IdentifierKind::Process => &[PEPPOL_PROCESS_SCHEME],
    };
    if !allowed.contains(&scheme_lower.as_str()) {
        return Err(IdentifierError::InvalidScheme {
            kind,
            scheme: scheme.to_string(),
            reason: format!("expected one of: {}", allowed.join(", ")),
        });
    }

    let max = kind.max_value_len();
    if value.chars().count() > max {
        return Err(IdentifierError::InvalidValue {
            kind,
            value: value.to_string(),
            reason: format!("longer than {max} characters"),
        });
    }

    if kind == IdentifierKind::Participant {
        if !has_iso6523_prefix(value) {
            return Err(IdentifierError::InvalidValue {
                kind,
                value: value.to_string(),
                reason: "expected a 4-digit ISO 6523 ICD prefix (NNNN:...)".to_string(),
            });
        }
        return Ok(SchemeValue {
            scheme: scheme_lower,
            value: value.to_lowercase(),
        });
    }

    Ok(SchemeValue {
        scheme: scheme_lower,
        value: value.to_string(),
    })
}

fn has_iso6523_prefix(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() > 5 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b':'
}
