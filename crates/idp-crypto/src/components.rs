//! Raw RSA key components and certificate metadata.
//!
//! Components arrive as decimal strings (that is how parameter stores and
//! key tooling usually print them) and are held as [`BigUint`]s.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::assembler::KeyGenerationError;

/// The eight integers of an RSA private key in CRT form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyComponents {
    /// `n`.
    #[serde(with = "decimal")]
    pub modulus: BigUint,
    /// `e`.
    #[serde(with = "decimal")]
    pub public_exponent: BigUint,
    /// `d`.
    #[serde(with = "decimal")]
    pub private_exponent: BigUint,
    /// `p`.
    #[serde(with = "decimal")]
    pub prime_p: BigUint,
    /// `q`.
    #[serde(with = "decimal")]
    pub prime_q: BigUint,
    /// `d mod (p - 1)`.
    #[serde(with = "decimal")]
    pub prime_exponent_p: BigUint,
    /// `d mod (q - 1)`.
    #[serde(with = "decimal")]
    pub prime_exponent_q: BigUint,
    /// `q^-1 mod p`.
    #[serde(with = "decimal")]
    pub crt_coefficient: BigUint,
    /// Certificate to build around the key.
    pub certificate: CertificateMetadata,
}

// Private components stay out of logs.
impl fmt::Debug for KeyComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyComponents")
            .field("modulus_bits", &self.modulus.bits())
            .field("public_exponent", &self.public_exponent)
            .field("certificate", &self.certificate)
            .finish_non_exhaustive()
    }
}

/// Metadata for the self-signed certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateMetadata {
    /// Distinguished name used as subject and issuer, e.g.
    /// `CN=AwsConnectStandaloneIdP`.
    pub subject_name: String,
    /// Serial number.
    #[serde(with = "decimal")]
    pub serial: BigUint,
    /// Start of validity.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub not_before: DateTime<Utc>,
    /// End of validity.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub not_after: DateTime<Utc>,
    /// Signature algorithm name, e.g. `SHA256withRSA`.
    #[serde(default = "default_signature_algorithm")]
    pub signature_algorithm: String,
}

fn default_signature_algorithm() -> String {
    "SHA256withRSA".to_string()
}

/// Parses a decimal component, naming it in the error.
///
/// Surrounding whitespace is ignored; signs, separators and empty strings
/// are rejected.
///
/// # Errors
///
/// Returns [`KeyGenerationError::MalformedComponent`].
pub fn parse_decimal(name: &str, value: &str) -> Result<BigUint, KeyGenerationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyGenerationError::MalformedComponent {
            name: name.to_string(),
            reason: "expected a non-negative decimal integer".to_string(),
        });
    }
    BigUint::from_str(trimmed).map_err(|e| KeyGenerationError::MalformedComponent {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Parses epoch milliseconds into a UTC timestamp.
///
/// # Errors
///
/// Returns [`KeyGenerationError::MalformedComponent`] for non-integers and
/// out-of-range values.
pub fn parse_epoch_millis(name: &str, value: &str) -> Result<DateTime<Utc>, KeyGenerationError> {
    let malformed = |reason: &str| KeyGenerationError::MalformedComponent {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    let millis: i64 = value
        .trim()
        .parse()
        .map_err(|_| malformed("expected epoch milliseconds"))?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| malformed("timestamp out of range"))
}

/// Serde helpers for decimal-string big integers.
mod decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_decimal("component", &s).map_err(serde::de::Error::custom)
    }
}
