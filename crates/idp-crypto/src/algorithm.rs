//! Algorithm identifiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for algorithm lookups.
#[derive(Debug, Error)]
pub enum AlgorithmError {
    /// Unknown algorithm.
    #[error("unknown algorithm: {0}")]
    Unknown(String),
}

/// Digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256.
    #[serde(rename = "SHA256")]
    Sha256,

    /// SHA-384.
    #[serde(rename = "SHA384")]
    Sha384,

    /// SHA-512.
    #[serde(rename = "SHA512")]
    Sha512,
}

impl HashAlgorithm {
    /// Returns the output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Returns the algorithm name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Returns the XML-DSig `DigestMethod` URI.
    #[must_use]
    pub const fn xml_dsig_uri(self) -> &'static str {
        match self {
            Self::Sha256 => "http://www.w3.org/2001/04/xmlenc#sha256",
            Self::Sha384 => "http://www.w3.org/2001/04/xmldsig-more#sha384",
            Self::Sha512 => "http://www.w3.org/2001/04/xmlenc#sha512",
        }
    }

    /// Looks up a digest algorithm by its XML-DSig URI.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::Unknown`] for unrecognized URIs.
    pub fn from_xml_dsig_uri(uri: &str) -> Result<Self, AlgorithmError> {
        [Self::Sha256, Self::Sha384, Self::Sha512]
            .into_iter()
            .find(|alg| alg.xml_dsig_uri() == uri)
            .ok_or_else(|| AlgorithmError::Unknown(uri.to_string()))
    }
}

/// Signature algorithm used to self-sign the certificate.
///
/// Named the way key stores usually spell it, e.g. `SHA256withRSA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateSignatureAlgorithm {
    /// `sha256WithRSAEncryption`.
    #[serde(rename = "SHA256withRSA")]
    Sha256WithRsa,
}

impl CertificateSignatureAlgorithm {
    /// Parses an algorithm name, ignoring case.
    ///
    /// Accepts `SHA256withRSA`, `SHA256WithRSA`, `sha256WithRSAEncryption`
    /// and `RS256`.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::Unknown`] for anything else.
    pub fn from_name(name: &str) -> Result<Self, AlgorithmError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sha256withrsa" | "sha256withrsaencryption" | "rs256" => Ok(Self::Sha256WithRsa),
            _ => Err(AlgorithmError::Unknown(name.to_string())),
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256WithRsa => "SHA256withRSA",
        }
    }
}
