//! # Endpoint Certificates
//!
//! The directory publishes each endpoint's certificate as base64 DER (PEM
//! armour is tolerated). [`Certificate`] holds DER bytes that have been
//! checked to parse as an X.509 certificate structure.
//!
//! Only the structure is checked. Trust-chain verification, revocation, and
//! validity periods are the message-exchange layer's concern.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::CertificateDer;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::CertificateError;

const PEM_MARKER: &str = "-----BEGIN";

/// A structurally valid X.509 certificate in DER form.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    /// Wrap DER bytes after checking they parse as a certificate.
    pub fn from_der(der: Vec<u8>) -> Result<Self, CertificateError> {
        if der.is_empty() {
            return Err(CertificateError::Empty);
        }
        check_structure(&der)?;
        Ok(Self { der })
    }

    /// Decode the textual form published by the directory: base64 DER,
    /// optionally wrapped in PEM armour. Embedded whitespace is ignored.
    pub fn from_encoded(text: &str) -> Result<Self, CertificateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CertificateError::Empty);
        }
        let der = if text.contains(PEM_MARKER) {
            CertificateDer::from_pem_slice(text.as_bytes())
                .map_err(|e| CertificateError::Encoding(format!("{e:?}")))?
                .as_ref()
                .to_vec()
        } else {
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            STANDARD
                .decode(compact.as_bytes())
                .map_err(|e| CertificateError::Encoding(e.to_string()))?
        };
        Self::from_der(der)
    }

    /// The DER bytes.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Base64 of the DER bytes, the form used on the wire.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.der)
    }

    /// Lowercase hex SHA-256 over the DER bytes.
    pub fn sha256_fingerprint(&self) -> String {
        Sha256::digest(&self.der)
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

/// Parse as a single X.509 certificate. Extensions, critical or not, and
/// the certificate version are not judged.
fn check_structure(der: &[u8]) -> Result<(), CertificateError> {
    let (rest, _) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| CertificateError::Structure(e.to_string()))?;
    if !rest.is_empty() {
        return Err(CertificateError::Structure(format!(
            "{} trailing bytes after certificate",
            rest.len()
        )));
    }
    Ok(())
}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Certificate")
            .field("sha256", &self.sha256_fingerprint())
            .field("len", &self.der.len())
            .finish()
    }
}

impl Serialize for Certificate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}
