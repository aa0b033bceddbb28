//! Enveloped signature creation.

use std::sync::Arc;

use base64::Engine;
use idp_crypto::{hash, KeyMaterial, RsaSignatureAlgorithm, SignatureError};
use thiserror::Error;

use super::REFERENCE_TRANSFORMS;
use crate::document::{SignedDocument, UnsignedDocument};
use crate::types::{prefixes, XMLDSIG_NS};
use crate::xml::{canonicalize, Element, NamespaceScope, Node, XmlError, EXCLUSIVE_C14N};

/// Errors raised while signing a document.
#[derive(Debug, Error)]
pub enum SigningError {
    /// A required element is absent.
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    /// The assertion has no `ID` attribute to reference.
    #[error("assertion has no ID attribute")]
    MissingId,

    /// The assertion already carries a signature.
    #[error("assertion is already signed")]
    AlreadySigned,

    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] XmlError),

    /// The RSA operation failed.
    #[error("signing failed: {0}")]
    Crypto(#[from] SignatureError),
}

/// Signs assertions with one key.
#[derive(Debug, Clone)]
pub struct XmlSigner {
    key: Arc<KeyMaterial>,
    algorithm: RsaSignatureAlgorithm,
}

impl XmlSigner {
    /// Creates an RSA-SHA256 signer.
    #[must_use]
    pub fn new(key: Arc<KeyMaterial>) -> Self {
        Self {
            key,
            algorithm: RsaSignatureAlgorithm::Rs256,
        }
    }

    /// Selects the signature algorithm. The digest follows it.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: RsaSignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Returns the key used for signing.
    #[must_use]
    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }

    /// Signs the assertion of `document`.
    ///
    /// The signature covers the exclusive canonical form of the assertion
    /// and is inserted right after its `Issuer`. `document` is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError`] when the assertion, its `ID` or its
    /// `Issuer` is missing, when it is already signed, or when
    /// canonicalization or the RSA operation fails.
    pub fn sign(&self, document: &UnsignedDocument) -> Result<SignedDocument, SigningError> {
        sign_with(document, &self.key, self.algorithm)
    }
}

/// Signs the assertion of `document` with RSA-SHA256.
///
/// # Errors
///
/// See [`XmlSigner::sign`].
pub fn sign(
    document: &UnsignedDocument,
    key: &KeyMaterial,
) -> Result<SignedDocument, SigningError> {
    sign_with(document, key, RsaSignatureAlgorithm::Rs256)
}

fn sign_with(
    document: &UnsignedDocument,
    key: &KeyMaterial,
    algorithm: RsaSignatureAlgorithm,
) -> Result<SignedDocument, SigningError> {
    let mut root = document.root().clone();
    let scope = NamespaceScope::default().enter(&root);

    let assertion = root
        .child_mut("Assertion")
        .ok_or(SigningError::MissingElement("Assertion"))?;
    let id = assertion
        .attr("ID")
        .ok_or(SigningError::MissingId)?
        .to_string();
    if assertion.child("Signature").is_some() {
        return Err(SigningError::AlreadySigned);
    }
    let issuer_pos = assertion
        .child_position("Issuer")
        .ok_or(SigningError::MissingElement("Issuer"))?;

    let digest_alg = algorithm.hash_algorithm();
    let canonical = canonicalize(assertion, &scope)?;
    let digest = hash(digest_alg, canonical.as_bytes());

    let signed_info = signed_info(&id, algorithm, &BASE64.encode(digest));
    let signed_info_scope = scope.enter(assertion).with(prefixes::DS, XMLDSIG_NS);
    let canonical_info = canonicalize(&signed_info, &signed_info_scope)?;
    let signature_value = key.sign(canonical_info.as_bytes(), algorithm)?;
    let signature_b64 = BASE64.encode(signature_value);

    let encoded_cert = key.certificate().to_base64();
    let certificate = ds("X509Certificate").with_text(encoded_cert);
    let x509_data = ds("X509Data").with_child(certificate);
    let signature = ds("Signature")
        .with_namespace(prefixes::DS, XMLDSIG_NS)
        .with_child(signed_info)
        .with_child(ds("SignatureValue").with_text(signature_b64))
        .with_child(ds("KeyInfo").with_child(x509_data));
    let signature = Node::Element(signature);
    assertion.children.insert(issuer_pos + 1, signature);

    tracing::debug!(
        assertion_id = %id,
        algorithm = algorithm.xml_dsig_uri(),
        "signed assertion"
    );
    Ok(SignedDocument::new(root, document))
}

const BASE64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

fn ds(name: &str) -> Element {
    Element::prefixed(prefixes::DS, name)
}

fn algorithm_element(name: &str, uri: &str) -> Element {
    ds(name).with_attr("Algorithm", uri)
}

fn signed_info(reference_id: &str, algorithm: RsaSignatureAlgorithm, digest_b64: &str) -> Element {
    let mut transforms = ds("Transforms");
    for uri in REFERENCE_TRANSFORMS {
        transforms = transforms.with_child(algorithm_element("Transform", uri));
    }
    let method_uri = algorithm.xml_dsig_uri();
    let digest_uri = algorithm.hash_algorithm().xml_dsig_uri();

    ds("SignedInfo")
        .with_child(algorithm_element("CanonicalizationMethod", EXCLUSIVE_C14N))
        .with_child(algorithm_element("SignatureMethod", method_uri))
        .with_child(
            ds("Reference")
                .with_attr("URI", format!("#{reference_id}"))
                .with_child(transforms)
                .with_child(algorithm_element("DigestMethod", digest_uri))
                .with_child(ds("DigestValue").with_text(digest_b64)),
        )
}
