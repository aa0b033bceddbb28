//! Key material assembly from raw RSA CRT components.
//!
//! Assembly is a pure factory: the components are checked against the RSA
//! invariants, encoded as PKCS#1, loaded into aws-lc-rs (which runs its own
//! consistency checks) and finally used to self-sign a certificate. Any
//! failure yields a tagged [`KeyGenerationError`] and no material.

use num_bigint::BigUint;
use pkcs1::der::Encode;
use thiserror::Error;

use crate::algorithm::CertificateSignatureAlgorithm;
use crate::certificate::{self, Certificate};
use crate::components::KeyComponents;
use crate::keys::{KeyMaterial, RsaPublicKey};

const RSA_OID: pkcs1::ObjectIdentifier =
    pkcs1::ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Errors raised while assembling key material.
#[derive(Debug, Error)]
pub enum KeyGenerationError {
    /// A component could not be parsed.
    #[error("malformed key component {name}: {reason}")]
    MalformedComponent {
        /// Component name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The public exponent is even or not greater than one.
    #[error("public exponent must be odd and greater than one")]
    InvalidPublicExponent,

    /// A prime is not greater than one.
    #[error("prime {0} must be greater than one")]
    InvalidPrime(char),

    /// `n != p * q`.
    #[error("modulus is not the product of the primes")]
    ModulusMismatch,

    /// `e * d != 1 mod lcm(p - 1, q - 1)`.
    #[error("private exponent is not the inverse of the public exponent")]
    PrivateExponentMismatch,

    /// A CRT exponent does not equal `d mod (prime - 1)`.
    #[error("CRT exponent for prime {0} does not match the private exponent")]
    CrtExponentMismatch(char),

    /// `q * qInv != 1 mod p`.
    #[error("CRT coefficient is not the inverse of q modulo p")]
    CrtCoefficientMismatch,

    /// aws-lc-rs refused the private key.
    #[error("could not construct private key: {0}")]
    KeyRejected(String),

    /// The certificate signature algorithm is not supported.
    #[error("unsupported certificate signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The subject distinguished name could not be parsed.
    #[error("invalid certificate subject: {0}")]
    InvalidSubject(String),

    /// The certificate validity period is empty or unrepresentable.
    #[error("invalid certificate validity: {0}")]
    InvalidValidity(String),

    /// Key encoding failed.
    #[error("could not encode key: {0}")]
    Encoding(String),

    /// Certificate construction or self-signing failed.
    #[error("could not construct X509Certificate: {0}")]
    Certificate(String),
}

/// Builds [`KeyMaterial`] from [`KeyComponents`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMaterialAssembler;

impl KeyMaterialAssembler {
    /// Assembles the key pair and self-signed certificate.
    ///
    /// Deterministic for identical components: PKCS#1 v1.5 self-signing
    /// involves no randomness.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyGenerationError`] describing the first failed check.
    pub fn assemble(components: &KeyComponents) -> Result<KeyMaterial, KeyGenerationError> {
        let metadata = &components.certificate;
        let algorithm = CertificateSignatureAlgorithm::from_name(&metadata.signature_algorithm)
            .map_err(|_| {
                KeyGenerationError::UnsupportedAlgorithm(metadata.signature_algorithm.clone())
            })?;

        validate_components(components)?;

        let private_key_der = encode_private_key(components)?;
        let signing_key = aws_lc_rs::signature::RsaKeyPair::from_der(&private_key_der)
            .map_err(|e| KeyGenerationError::KeyRejected(e.to_string()))?;
        let pkcs8_der = wrap_pkcs8(&private_key_der)?;

        let public_key = RsaPublicKey::new(
            components.modulus.clone(),
            components.public_exponent.clone(),
        );
        let public_key_der = public_key
            .to_pkcs1_der()
            .map_err(|e| KeyGenerationError::Encoding(e.to_string()))?;

        let certificate_der = certificate::self_signed(&pkcs8_der, metadata, algorithm)?;
        let certificate = Certificate::from_der(certificate_der)
            .map_err(|e| KeyGenerationError::Certificate(e.to_string()))?;

        tracing::debug!(
            modulus_bits = components.modulus.bits(),
            subject = %metadata.subject_name,
            serial = %metadata.serial,
            "assembled key material"
        );

        let material = KeyMaterial::new(public_key, public_key_der, signing_key, certificate);
        Ok(material)
    }
}

/// Checks the RSA CRT invariants.
///
/// # Errors
///
/// Returns the [`KeyGenerationError`] variant naming the violated invariant.
pub fn validate_components(c: &KeyComponents) -> Result<(), KeyGenerationError> {
    let one = BigUint::from(1u32);

    if c.public_exponent <= one || !c.public_exponent.bit(0) {
        return Err(KeyGenerationError::InvalidPublicExponent);
    }
    if c.prime_p <= one {
        return Err(KeyGenerationError::InvalidPrime('p'));
    }
    if c.prime_q <= one {
        return Err(KeyGenerationError::InvalidPrime('q'));
    }
    if &c.prime_p * &c.prime_q != c.modulus {
        return Err(KeyGenerationError::ModulusMismatch);
    }

    let p1 = &c.prime_p - &one;
    let q1 = &c.prime_q - &one;
    let lambda = lcm(&p1, &q1);
    if (&c.private_exponent * &c.public_exponent) % &lambda != one {
        return Err(KeyGenerationError::PrivateExponentMismatch);
    }

    if &c.private_exponent % &p1 != c.prime_exponent_p {
        return Err(KeyGenerationError::CrtExponentMismatch('p'));
    }
    if &c.private_exponent % &q1 != c.prime_exponent_q {
        return Err(KeyGenerationError::CrtExponentMismatch('q'));
    }

    if c.crt_coefficient >= c.prime_p || (&c.crt_coefficient * &c.prime_q) % &c.prime_p != one {
        return Err(KeyGenerationError::CrtCoefficientMismatch);
    }

    if c.certificate.not_before >= c.certificate.not_after {
        return Err(KeyGenerationError::InvalidValidity(
            "not_before must precede not_after".to_string(),
        ));
    }

    Ok(())
}

fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let (mut a, mut b) = (a.clone(), b.clone());
    while b.bits() > 0 {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    a / gcd(a, b) * b
}

/// Encodes the components as a PKCS#1 `RSAPrivateKey`.
fn encode_private_key(c: &KeyComponents) -> Result<Vec<u8>, KeyGenerationError> {
    let n = c.modulus.to_bytes_be();
    let e = c.public_exponent.to_bytes_be();
    let d = c.private_exponent.to_bytes_be();
    let p = c.prime_p.to_bytes_be();
    let q = c.prime_q.to_bytes_be();
    let dp = c.prime_exponent_p.to_bytes_be();
    let dq = c.prime_exponent_q.to_bytes_be();
    let qinv = c.crt_coefficient.to_bytes_be();

    fn uint(bytes: &[u8]) -> Result<pkcs1::UintRef<'_>, KeyGenerationError> {
        pkcs1::UintRef::new(bytes).map_err(|e| KeyGenerationError::Encoding(e.to_string()))
    }

    let private_key = pkcs1::RsaPrivateKey {
        modulus: uint(&n)?,
        public_exponent: uint(&e)?,
        private_exponent: uint(&d)?,
        prime1: uint(&p)?,
        prime2: uint(&q)?,
        exponent1: uint(&dp)?,
        exponent2: uint(&dq)?,
        coefficient: uint(&qinv)?,
        other_prime_infos: None,
    };

    private_key
        .to_der()
        .map_err(|e| KeyGenerationError::Encoding(e.to_string()))
}

/// Wraps a PKCS#1 private key in a PKCS#8 `PrivateKeyInfo`.
fn wrap_pkcs8(pkcs1_der: &[u8]) -> Result<Vec<u8>, KeyGenerationError> {
    let null_param: pkcs8::der::AnyRef<'_> = pkcs8::der::asn1::Null.into();
    let algorithm = spki::AlgorithmIdentifier {
        oid: RSA_OID,
        parameters: Some(null_param),
    };

    pkcs8::PrivateKeyInfo::new(algorithm, pkcs1_der)
        .to_der()
        .map_err(|e| KeyGenerationError::Encoding(e.to_string()))
}
