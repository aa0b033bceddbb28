//! Enveloped signature validation.
//!
//! Checks the signature this crate produces: one `ds:Signature` as a
//! direct child of the assertion, referencing the assertion by `ID`, with
//! the enveloped-signature and exclusive C14N transforms.

use base64::Engine;
use idp_crypto::{
    hash, rsa_verify, Certificate, CertificateError, HashAlgorithm, RsaSignatureAlgorithm,
    SignatureError,
};
use thiserror::Error;

use super::REFERENCE_TRANSFORMS;
use crate::xml::{self, canonicalize, Element, XmlError, EXCLUSIVE_C14N};

/// Reasons a signed document is rejected.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The document could not be parsed or canonicalized.
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// No assertion carries a signature.
    #[error("no signed assertion found")]
    MissingSignature,

    /// A required signature element is absent.
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    /// An algorithm URI is not accepted.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The reference does not point at the signed assertion.
    #[error("reference URI {found:?} does not match assertion ID {expected:?}")]
    ReferenceMismatch {
        /// `#` followed by the assertion ID.
        expected: String,
        /// The `URI` attribute of the reference.
        found: String,
    },

    /// The transforms differ from enveloped-signature then exclusive C14N.
    #[error("unexpected reference transforms")]
    UnexpectedTransforms,

    /// A Base64 value could not be decoded.
    #[error("invalid Base64 in {0}")]
    InvalidEncoding(&'static str),

    /// The recomputed digest differs from `DigestValue`.
    #[error("digest mismatch")]
    DigestMismatch,

    /// No certificate to verify with.
    #[error("no certificate available for verification")]
    MissingCertificate,

    /// The embedded certificate is not one of the trusted certificates.
    #[error("certificate is not trusted")]
    UntrustedCertificate,

    /// The certificate could not be used.
    #[error("certificate error: {0}")]
    Certificate(#[from] CertificateError),

    /// The public key could not be encoded.
    #[error("key error: {0}")]
    Key(#[from] SignatureError),

    /// The RSA signature does not verify.
    #[error("signature value does not verify")]
    BadSignature,
}

/// Outcome of a successful validation.
#[derive(Debug, Clone)]
pub struct ValidatedSignature {
    /// ID of the signed assertion.
    pub assertion_id: String,
    /// Certificate the signature verified against.
    pub certificate: Certificate,
    /// Signature algorithm.
    pub algorithm: RsaSignatureAlgorithm,
}

/// Validates assertion signatures.
///
/// Without trusted certificates the certificate embedded in `KeyInfo` is
/// used as is, which proves integrity but not origin.
#[derive(Debug, Clone, Default)]
pub struct SignatureValidator {
    trusted: Vec<Certificate>,
}

impl SignatureValidator {
    /// Creates a validator that accepts the embedded certificate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a trusted certificate. Once any is configured, signatures must
    /// verify against one of them.
    #[must_use]
    pub fn trusting(mut self, certificate: Certificate) -> Self {
        self.trusted.push(certificate);
        self
    }

    /// Parses `xml` and validates the first signed assertion in it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] describing the first check that failed.
    pub fn validate(&self, xml: &str) -> Result<ValidatedSignature, ValidationError> {
        let root = xml::parse(xml)?;
        self.validate_element(&root)
    }

    /// Validates the first signed assertion under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] describing the first check that failed.
    pub fn validate_element(&self, root: &Element) -> Result<ValidatedSignature, ValidationError> {
        let (assertion, scope) = root
            .find_with_scope(|e| e.name == "Assertion" && e.child("Signature").is_some())
            .ok_or(ValidationError::MissingSignature)?;
        let signature = assertion
            .child("Signature")
            .ok_or(ValidationError::MissingSignature)?;
        let signed_info = required(signature, "SignedInfo")?;

        let c14n = required(signed_info, "CanonicalizationMethod")?;
        let c14n_uri = algorithm_uri(c14n)?;
        if c14n_uri != EXCLUSIVE_C14N {
            return Err(unsupported(c14n_uri));
        }

        let method_uri = algorithm_uri(required(signed_info, "SignatureMethod")?)?;
        let algorithm = RsaSignatureAlgorithm::from_xml_dsig_uri(method_uri)
            .ok_or_else(|| unsupported(method_uri))?;

        let reference = required(signed_info, "Reference")?;
        let assertion_id = assertion
            .attr("ID")
            .ok_or(ValidationError::MissingElement("Assertion ID"))?;
        let expected = format!("#{assertion_id}");
        let found = reference.attr("URI").unwrap_or_default();
        if found != expected {
            return Err(ValidationError::ReferenceMismatch {
                expected,
                found: found.to_string(),
            });
        }

        let transforms: Vec<&str> = required(reference, "Transforms")?
            .child_elements()
            .filter(|e| e.name == "Transform")
            .map(algorithm_uri)
            .collect::<Result<_, _>>()?;
        if transforms != REFERENCE_TRANSFORMS {
            return Err(ValidationError::UnexpectedTransforms);
        }

        let digest_uri = algorithm_uri(required(reference, "DigestMethod")?)?;
        let digest_alg = HashAlgorithm::from_xml_dsig_uri(digest_uri)
            .map_err(|_| unsupported(digest_uri))?;
        let expected_digest = decode(required(reference, "DigestValue")?, "DigestValue")?;

        let enveloped = assertion.without_children("Signature");
        let canonical = canonicalize(&enveloped, &scope)?;
        if hash(digest_alg, canonical.as_bytes()) != expected_digest {
            tracing::debug!(assertion_id, "digest mismatch");
            return Err(ValidationError::DigestMismatch);
        }

        let signature_value = decode(required(signature, "SignatureValue")?, "SignatureValue")?;
        let info_scope = scope.enter(assertion).enter(signature);
        let canonical_info = canonicalize(signed_info, &info_scope)?;

        let certificate = self.select_certificate(signature)?;
        let public_key = certificate.rsa_public_key()?.to_pkcs1_der()?;
        let signed_bytes = canonical_info.as_bytes();
        if !rsa_verify(&public_key, signed_bytes, &signature_value, algorithm) {
            return Err(ValidationError::BadSignature);
        }

        tracing::debug!(
            assertion_id,
            fingerprint = %certificate.fingerprint_sha256(),
            "assertion signature verified"
        );
        Ok(ValidatedSignature {
            assertion_id: assertion_id.to_string(),
            certificate,
            algorithm,
        })
    }

    fn select_certificate(&self, signature: &Element) -> Result<Certificate, ValidationError> {
        let embedded = signature
            .child("KeyInfo")
            .and_then(|k| k.child("X509Data"))
            .and_then(|x| x.child("X509Certificate"))
            .map(|c| Certificate::from_base64(&c.text()))
            .transpose()?;

        match (embedded, self.trusted.first()) {
            (Some(cert), None) => Ok(cert),
            (Some(cert), Some(_)) if self.trusted.contains(&cert) => Ok(cert),
            (Some(_), Some(_)) => Err(ValidationError::UntrustedCertificate),
            (None, Some(trusted)) => Ok(trusted.clone()),
            (None, None) => Err(ValidationError::MissingCertificate),
        }
    }
}

fn required<'a>(parent: &'a Element, name: &'static str) -> Result<&'a Element, ValidationError> {
    parent
        .child(name)
        .ok_or(ValidationError::MissingElement(name))
}

fn unsupported(uri: &str) -> ValidationError {
    ValidationError::UnsupportedAlgorithm(uri.to_string())
}

fn algorithm_uri(element: &Element) -> Result<&str, ValidationError> {
    element
        .attr("Algorithm")
        .ok_or(ValidationError::MissingElement("Algorithm"))
}

fn decode(element: &Element, what: &'static str) -> Result<Vec<u8>, ValidationError> {
    let text: String = element.text().split_whitespace().collect();
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .map_err(|_| ValidationError::InvalidEncoding(what))
}
