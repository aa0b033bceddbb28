//! Service-level error taxonomy.
//!
//! Messages of server-side variants are deliberately generic: they cross
//! the trust boundary to the end user, while the underlying cause is logged
//! by the caller before conversion.

use thiserror::Error;

/// Result type alias using the IdP error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the issuing service.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller supplied invalid input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller is not allowed to use the requested group.
    #[error("access denied")]
    Authorization,

    /// Key components could not be loaded.
    #[error("key material unavailable")]
    KeySource(String),

    /// Key assembly, signing or encoding failed.
    #[error("cryptographic error")]
    Crypto(String),

    /// A collaborator (group directory, parameter store) failed.
    #[error("upstream service unavailable")]
    Upstream(String),

    /// Internal error.
    #[error("internal error")]
    Internal,
}

impl Error {
    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::KeySource(_)
                | Self::Crypto(_)
                | Self::Upstream(_)
                | Self::Internal
        )
    }

    /// Returns whether this error represents a client error.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Authorization)
    }

    /// Operator-facing detail, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Config(d)
            | Self::Validation(d)
            | Self::KeySource(d)
            | Self::Crypto(d)
            | Self::Upstream(d) => Some(d.as_str()),
            Self::Authorization | Self::Internal => None,
        }
    }
}
