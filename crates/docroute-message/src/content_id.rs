use serde::{Serialize, Serializer};

/// Domain used for generated content ids.
const GENERATED_DOMAIN: &str = "docroute";

/// Identifier of one payload within its message. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a caller-supplied id verbatim. Returns `None` for blank input.
    pub fn supplied(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    /// A fresh random id of the form `<uuid>@docroute`.
    pub fn generate() -> Self {
        Self(format!("{}@{GENERATED_DOMAIN}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
