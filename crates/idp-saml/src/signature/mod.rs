//! XML Signature support for SAML assertions.
//!
//! Assertions are signed with an enveloped XML-DSig signature:
//! exclusive canonicalization, an RSA PKCS#1 v1.5 signature method and
//! the matching digest, with the signature placed right after the
//! assertion's `Issuer`.
//!
//! [`XmlSigner`] produces signatures; [`SignatureValidator`] checks them.

mod signer;
mod validator;

pub use signer::{sign, SigningError, XmlSigner};
pub use validator::{SignatureValidator, ValidatedSignature, ValidationError};

use crate::types::transform_algorithms;

/// Transforms applied to the signed reference, in order.
pub const REFERENCE_TRANSFORMS: [&str; 2] = [
    transform_algorithms::ENVELOPED_SIGNATURE,
    transform_algorithms::EXCLUSIVE_C14N,
];
