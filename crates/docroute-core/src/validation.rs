//! # Validation Result Model
//!
//! The business-document validation engine is an external collaborator.
//! This module defines the shape of what it is asked ([`ExecutorSetId`]) and
//! what it answers ([`ValidationResultList`]).
//!
//! A list passes when it holds no entry of error severity. Warnings and
//! informational entries are reported but never block dispatch.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ExecutorSetIdError;

/// Name of a versioned validation rule bundle, written
/// `group:artifact:version[:classifier]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutorSetId {
    group: String,
    artifact: String,
    version: String,
    classifier: Option<String>,
}

impl ExecutorSetId {
    /// Parse the colon-separated form.
    pub fn parse(raw: &str) -> Result<Self, ExecutorSetIdError> {
        let parts: Vec<&str> = raw.split(':').collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(ExecutorSetIdError::Malformed(raw.to_string()));
        }
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(ExecutorSetIdError::EmptyPart(raw.to_string()));
        }
        Ok(Self {
            group: parts[0].to_string(),
            artifact: parts[1].to_string(),
            version: parts[2].to_string(),
            classifier: parts.get(3).map(|s| s.to_string()),
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }
}

impl std::fmt::Display for ExecutorSetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ExecutorSetId {
    type Err = ExecutorSetIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ExecutorSetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExecutorSetId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Severity of a single validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Whether a finding of this severity blocks dispatch.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }
}

/// One finding produced by a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationEntry {
    /// Rule (or rule-set layer) that produced the finding.
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    /// Position in the document, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Ordered findings of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResultList(Vec<ValidationEntry>);

impl ValidationResultList {
    pub fn new(entries: Vec<ValidationEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[ValidationEntry] {
        &self.0
    }

    /// True when no entry has error severity.
    pub fn contains_no_error(&self) -> bool {
        !self.0.iter().any(|e| e.severity.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.0.iter().filter(|e| e.severity.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.0
            .iter()
            .filter(|e| e.severity == Severity::Warning)
            .count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ValidationEntry> for ValidationResultList {
    fn from_iter<I: IntoIterator<Item = ValidationEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
