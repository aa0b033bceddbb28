//! CLI error types.

use idp_saml::service::{GroupError, KeySourceError};
use idp_saml::SamlError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] idp_core::Error),

    /// Key components could not be loaded.
    #[error("key source error: {0}")]
    KeySource(#[from] KeySourceError),

    /// Group directory could not be read.
    #[error("group directory error: {0}")]
    Groups(#[from] GroupError),

    /// SAML pipeline error.
    #[error(transparent)]
    Saml(#[from] SamlError),

    /// The issuing service rejected the request or failed.
    #[error("{0}")]
    Issue(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
