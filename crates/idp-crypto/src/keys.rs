//! Assembled RSA key material.

use std::fmt;

use aws_lc_rs::signature::RsaKeyPair;
use num_bigint::BigUint;
use pkcs1::der::Encode;

use crate::certificate::Certificate;
use crate::rsa::{rsa_sign, rsa_verify, RsaSignatureAlgorithm};
use crate::signature::SignatureError;

/// An RSA public key as `(n, e)`.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    modulus: BigUint,
    exponent: BigUint,
}

impl RsaPublicKey {
    /// Creates a public key from its modulus and exponent.
    #[must_use]
    pub const fn new(modulus: BigUint, exponent: BigUint) -> Self {
        Self { modulus, exponent }
    }

    /// Returns the modulus.
    #[must_use]
    pub const fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Returns the public exponent.
    #[must_use]
    pub const fn exponent(&self) -> &BigUint {
        &self.exponent
    }

    /// Returns the modulus size in bits.
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.modulus.bits()
    }

    /// Encodes the key as a PKCS#1 `RSAPublicKey`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidKey`] if DER encoding fails.
    pub fn to_pkcs1_der(&self) -> Result<Vec<u8>, SignatureError> {
        let n = self.modulus.to_bytes_be();
        let e = self.exponent.to_bytes_be();
        let key = pkcs1::RsaPublicKey {
            modulus: uint(&n)?,
            public_exponent: uint(&e)?,
        };
        key.to_der()
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))
    }
}

fn uint(bytes: &[u8]) -> Result<pkcs1::UintRef<'_>, SignatureError> {
    pkcs1::UintRef::new(bytes).map_err(|e| SignatureError::InvalidKey(e.to_string()))
}

impl fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPublicKey")
            .field("bits", &self.bits())
            .field("exponent", &self.exponent)
            .finish()
    }
}

/// A signing key, its public half and the certificate binding them.
///
/// Immutable once assembled. `Send + Sync`, so one instance can back any
/// number of concurrent signing operations.
pub struct KeyMaterial {
    public_key: RsaPublicKey,
    public_key_der: Vec<u8>,
    signing_key: RsaKeyPair,
    certificate: Certificate,
}

impl KeyMaterial {
    pub(crate) fn new(
        public_key: RsaPublicKey,
        public_key_der: Vec<u8>,
        signing_key: RsaKeyPair,
        certificate: Certificate,
    ) -> Self {
        Self {
            public_key,
            public_key_der,
            signing_key,
            certificate,
        }
    }

    /// Returns the public key.
    #[must_use]
    pub const fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Returns the public key as PKCS#1 DER.
    #[must_use]
    pub fn public_key_der(&self) -> &[u8] {
        &self.public_key_der
    }

    /// Returns the self-signed certificate.
    #[must_use]
    pub const fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Returns the modulus length in bytes, which is also the signature length.
    #[must_use]
    pub fn signature_len(&self) -> usize {
        self.signing_key.public_modulus_len()
    }

    /// Signs `data` with RSA PKCS#1 v1.5.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Signing`] on failure.
    pub fn sign(
        &self,
        data: &[u8],
        algorithm: RsaSignatureAlgorithm,
    ) -> Result<Vec<u8>, SignatureError> {
        rsa_sign(&self.signing_key, data, algorithm)
    }

    /// Verifies a signature made by this key.
    #[must_use]
    pub fn verify(&self, data: &[u8], signature: &[u8], algorithm: RsaSignatureAlgorithm) -> bool {
        rsa_verify(&self.public_key_der, data, signature, algorithm)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("public_key", &self.public_key)
            .field("certificate", &self.certificate)
            .finish_non_exhaustive()
    }
}
