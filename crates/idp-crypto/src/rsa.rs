//! RSA PKCS#1 v1.5 signing and verification.
//!
//! XML-DSig in SAML deployments almost universally means
//! `rsa-sha256`; the SHA-384/512 variants are kept for consumers that
//! negotiate stronger digests.

use aws_lc_rs::{
    rand::SystemRandom,
    signature::{self, RsaKeyPair},
};

use crate::algorithm::HashAlgorithm;
use crate::signature::SignatureError;

/// RSA PKCS#1 v1.5 signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaSignatureAlgorithm {
    /// RSA PKCS#1 v1.5 with SHA-256.
    Rs256,
    /// RSA PKCS#1 v1.5 with SHA-384.
    Rs384,
    /// RSA PKCS#1 v1.5 with SHA-512.
    Rs512,
}

impl RsaSignatureAlgorithm {
    /// Returns the XML-DSig algorithm URI.
    #[must_use]
    pub const fn xml_dsig_uri(self) -> &'static str {
        match self {
            Self::Rs256 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256",
            Self::Rs384 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384",
            Self::Rs512 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512",
        }
    }

    /// Returns the digest the signature is computed over.
    #[must_use]
    pub const fn hash_algorithm(self) -> HashAlgorithm {
        match self {
            Self::Rs256 => HashAlgorithm::Sha256,
            Self::Rs384 => HashAlgorithm::Sha384,
            Self::Rs512 => HashAlgorithm::Sha512,
        }
    }

    /// Looks up an algorithm by its XML-DSig URI.
    #[must_use]
    pub fn from_xml_dsig_uri(uri: &str) -> Option<Self> {
        [Self::Rs256, Self::Rs384, Self::Rs512]
            .into_iter()
            .find(|alg| alg.xml_dsig_uri() == uri)
    }
}

/// Signs data with an RSA key pair.
///
/// PKCS#1 v1.5 padding is deterministic, so the same key and data always
/// produce the same signature.
///
/// # Errors
///
/// Returns [`SignatureError::Signing`] if aws-lc-rs rejects the operation.
pub fn rsa_sign(
    key_pair: &RsaKeyPair,
    data: &[u8],
    algorithm: RsaSignatureAlgorithm,
) -> Result<Vec<u8>, SignatureError> {
    let rng = SystemRandom::new();
    let mut signature = vec![0u8; key_pair.public_modulus_len()];

    let padding = match algorithm {
        RsaSignatureAlgorithm::Rs256 => &signature::RSA_PKCS1_SHA256,
        RsaSignatureAlgorithm::Rs384 => &signature::RSA_PKCS1_SHA384,
        RsaSignatureAlgorithm::Rs512 => &signature::RSA_PKCS1_SHA512,
    };

    key_pair
        .sign(padding, &rng, data, &mut signature)
        .map_err(|e| SignatureError::Signing(e.to_string()))?;

    Ok(signature)
}

/// Verifies an RSA signature.
///
/// # Arguments
///
/// * `public_key_der` - RSA public key, DER `RSAPublicKey` (PKCS#1)
/// * `data` - Original data that was signed
/// * `sig` - Signature to verify
/// * `algorithm` - Signature algorithm
///
/// Returns `false` for a mismatching signature or an unusable key.
#[must_use]
pub fn rsa_verify(
    public_key_der: &[u8],
    data: &[u8],
    sig: &[u8],
    algorithm: RsaSignatureAlgorithm,
) -> bool {
    use aws_lc_rs::signature::{
        UnparsedPublicKey, RSA_PKCS1_2048_8192_SHA256, RSA_PKCS1_2048_8192_SHA384,
        RSA_PKCS1_2048_8192_SHA512,
    };

    let verification_alg: &dyn signature::VerificationAlgorithm = match algorithm {
        RsaSignatureAlgorithm::Rs256 => &RSA_PKCS1_2048_8192_SHA256,
        RsaSignatureAlgorithm::Rs384 => &RSA_PKCS1_2048_8192_SHA384,
        RsaSignatureAlgorithm::Rs512 => &RSA_PKCS1_2048_8192_SHA512,
    };

    UnparsedPublicKey::new(verification_alg, public_key_der)
        .verify(data, sig)
        .is_ok()
}
