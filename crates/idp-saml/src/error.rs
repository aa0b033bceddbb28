//! SAML error types.
//!
//! Each stage has its own error enum; [`SamlError`] gathers them for
//! callers that drive the whole pipeline.

use idp_crypto::{CertificateError, KeyGenerationError};
use thiserror::Error;

use crate::builder::AssertionBuildError;
use crate::signature::{SigningError, ValidationError};
use crate::types::status_codes;
use crate::xml::XmlError;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML pipeline errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// XML parsing or canonicalization error.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// The unsigned document could not be built.
    #[error("assertion build failed: {0}")]
    Build(#[from] AssertionBuildError),

    /// The document could not be signed.
    #[error("signature creation failed: {0}")]
    Signing(#[from] SigningError),

    /// A signature did not validate.
    #[error("signature validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Key material could not be assembled.
    #[error("key generation failed: {0}")]
    KeyGeneration(#[from] KeyGenerationError),

    /// A certificate could not be read.
    #[error(transparent)]
    Certificate(#[from] CertificateError),

    /// Base64 decoding error.
    #[error("base64 decoding error: {0}")]
    Base64Decode(String),

    /// A received message is unusable.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl SamlError {
    /// Returns the SAML status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> &'static str {
        if self.is_client_error() {
            status_codes::REQUESTER
        } else {
            status_codes::RESPONDER
        }
    }

    /// Returns true when the error was caused by the input rather than by
    /// this system.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Base64Decode(_)
                | Self::InvalidMessage(_)
                | Self::Xml(XmlError::Parse(_))
        )
    }
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}
