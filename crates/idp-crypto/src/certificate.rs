//! Self-signed X.509 certificates.
//!
//! Certificates are built with rcgen and inspected with x509-parser. The DER
//! bytes are the source of truth; parsed views are produced on demand.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair, SerialNumber};
use thiserror::Error;
use x509_parser::public_key::PublicKey;

use crate::algorithm::CertificateSignatureAlgorithm;
use crate::assembler::KeyGenerationError;
use crate::components::CertificateMetadata;
use crate::hash::sha256;
use crate::keys::RsaPublicKey;

/// Errors raised while inspecting a certificate.
#[derive(Debug, Error)]
pub enum CertificateError {
    /// The DER could not be parsed.
    #[error("invalid certificate: {0}")]
    Parse(String),

    /// The subject public key is not RSA.
    #[error("certificate does not carry an RSA public key")]
    NotRsa,

    /// A validity timestamp could not be represented.
    #[error("certificate validity out of range")]
    Validity,
}

/// A DER-encoded X.509 certificate.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
}

/// Summary of a certificate's identity fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// Subject DN, e.g. `CN=AwsConnectStandaloneIdP`.
    pub subject: String,
    /// Issuer DN.
    pub issuer: String,
    /// Serial number.
    pub serial: BigUint,
    /// Start of validity.
    pub not_before: DateTime<Utc>,
    /// End of validity.
    pub not_after: DateTime<Utc>,
}

impl Certificate {
    /// Wraps DER bytes after checking they parse.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Parse`] if the bytes are not a certificate.
    pub fn from_der(der: Vec<u8>) -> Result<Self, CertificateError> {
        x509_parser::parse_x509_certificate(&der)
            .map_err(|e| CertificateError::Parse(e.to_string()))?;
        Ok(Self { der })
    }

    /// Decodes a Base64 DER certificate, as carried in `ds:X509Certificate`.
    ///
    /// Whitespace inside the Base64 text is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Parse`] for bad Base64 or DER.
    pub fn from_base64(encoded: &str) -> Result<Self, CertificateError> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let der = STANDARD
            .decode(compact)
            .map_err(|e| CertificateError::Parse(e.to_string()))?;
        Self::from_der(der)
    }

    /// Returns the DER encoding.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Returns the DER encoding as unwrapped standard Base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.der)
    }

    /// Returns the certificate in PEM armour with 64-column lines.
    #[must_use]
    pub fn to_pem(&self) -> String {
        let encoded = self.to_base64();
        let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
        for chunk in encoded.as_bytes().chunks(64) {
            pem.push_str(&String::from_utf8_lossy(chunk));
            pem.push('\n');
        }
        pem.push_str("-----END CERTIFICATE-----\n");
        pem
    }

    /// Returns the SHA-256 fingerprint as colon-separated upper-case hex.
    #[must_use]
    pub fn fingerprint_sha256(&self) -> String {
        sha256(&self.der)
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Extracts the RSA public key from the subject public key info.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::NotRsa`] for non-RSA keys.
    pub fn rsa_public_key(&self) -> Result<RsaPublicKey, CertificateError> {
        let (_, cert) = x509_parser::parse_x509_certificate(&self.der)
            .map_err(|e| CertificateError::Parse(e.to_string()))?;
        match cert.public_key().parsed() {
            Ok(PublicKey::RSA(rsa)) => Ok(RsaPublicKey::new(
                BigUint::from_bytes_be(rsa.modulus),
                BigUint::from_bytes_be(rsa.exponent),
            )),
            _ => Err(CertificateError::NotRsa),
        }
    }

    /// Returns the subject, issuer, serial and validity.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError`] if the certificate cannot be parsed.
    pub fn info(&self) -> Result<CertificateInfo, CertificateError> {
        let (_, cert) = x509_parser::parse_x509_certificate(&self.der)
            .map_err(|e| CertificateError::Parse(e.to_string()))?;
        let validity = cert.validity();
        Ok(CertificateInfo {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial: BigUint::from_bytes_be(cert.raw_serial()),
            not_before: DateTime::from_timestamp(validity.not_before.timestamp(), 0)
                .ok_or(CertificateError::Validity)?,
            not_after: DateTime::from_timestamp(validity.not_after.timestamp(), 0)
                .ok_or(CertificateError::Validity)?,
        })
    }
}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Certificate")
            .field("fingerprint", &self.fingerprint_sha256())
            .finish()
    }
}

/// Self-signs a certificate for the PKCS#8 RSA key.
///
/// Subject and issuer are both `metadata.subject_name`.
pub(crate) fn self_signed(
    pkcs8_der: &[u8],
    metadata: &CertificateMetadata,
    algorithm: CertificateSignatureAlgorithm,
) -> Result<Vec<u8>, KeyGenerationError> {
    let key_pair = match algorithm {
        CertificateSignatureAlgorithm::Sha256WithRsa => KeyPair::try_from(pkcs8_der)
            .map_err(|e| KeyGenerationError::Certificate(e.to_string()))?,
    };

    let mut params = CertificateParams::default();
    params.distinguished_name = parse_distinguished_name(&metadata.subject_name)?;
    params.serial_number = Some(SerialNumber::from_slice(&metadata.serial.to_bytes_be()));
    params.not_before = to_offset_date_time(metadata.not_before)?;
    params.not_after = to_offset_date_time(metadata.not_after)?;

    let cert = params
        .self_signed(&key_pair)
        .map_err(|e| KeyGenerationError::Certificate(e.to_string()))?;

    Ok(cert.der().to_vec())
}

fn to_offset_date_time(ts: DateTime<Utc>) -> Result<time::OffsetDateTime, KeyGenerationError> {
    time::OffsetDateTime::from_unix_timestamp(ts.timestamp())
        .map_err(|e| KeyGenerationError::InvalidValidity(e.to_string()))
}

/// Parses a comma-separated DN such as `CN=Example, O=Org, C=US`.
fn parse_distinguished_name(subject: &str) -> Result<DistinguishedName, KeyGenerationError> {
    let invalid =
        |reason: &str| KeyGenerationError::InvalidSubject(format!("{subject:?}: {reason}"));

    let mut dn = DistinguishedName::new();
    let mut seen = false;
    for part in subject.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| invalid("expected KEY=value"))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(invalid("empty attribute value"));
        }
        let dn_type = match key.trim().to_ascii_uppercase().as_str() {
            "CN" => DnType::CommonName,
            "O" => DnType::OrganizationName,
            "OU" => DnType::OrganizationalUnitName,
            "C" => DnType::CountryName,
            "ST" => DnType::StateOrProvinceName,
            "L" => DnType::LocalityName,
            _ => return Err(invalid("unsupported attribute type")),
        };
        dn.push(dn_type, value.to_string());
        seen = true;
    }

    if !seen {
        return Err(invalid("no attributes"));
    }
    Ok(dn)
}
