//! Errors from raw RSA operations.

use thiserror::Error;

/// RSA signing or key encoding failed.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The RSA primitive rejected the input.
    #[error("RSA operation failed: {0}")]
    Signing(String),

    /// A key could not be encoded.
    #[error("unusable RSA key: {0}")]
    InvalidKey(String),
}
