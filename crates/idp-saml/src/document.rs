//! Unsigned and signed response documents.
//!
//! A document moves through two types: the builder produces an
//! [`UnsignedDocument`], signing consumes a reference to it and returns a
//! new [`SignedDocument`]. Only the unsigned form can be signed.

use chrono::{DateTime, Utc};
use idp_crypto::KeyMaterial;

use crate::signature::{self, SigningError};
use crate::xml::{writer, Element};

/// A rendered response whose assertion carries no signature yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedDocument {
    root: Element,
    response_id: String,
    assertion_id: String,
    issued_at: DateTime<Utc>,
}

impl UnsignedDocument {
    pub(crate) fn new(
        root: Element,
        response_id: String,
        assertion_id: String,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            root,
            response_id,
            assertion_id,
            issued_at,
        }
    }

    /// The `samlp:Response` element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// Response `ID`.
    #[must_use]
    pub fn response_id(&self) -> &str {
        &self.response_id
    }

    /// Assertion `ID`, the signature reference target.
    #[must_use]
    pub fn assertion_id(&self) -> &str {
        &self.assertion_id
    }

    /// The instant every timestamp in the document derives from.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Serializes the unsigned tree.
    #[must_use]
    pub fn to_xml(&self) -> String {
        writer::to_string(&self.root)
    }

    /// Signs the assertion with RSA-SHA256. See [`signature::sign`].
    ///
    /// # Errors
    ///
    /// Returns [`SigningError`] if the document cannot be signed.
    pub fn sign(&self, key: &KeyMaterial) -> Result<SignedDocument, SigningError> {
        signature::sign(self, key)
    }
}

/// A response whose assertion carries an enveloped signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDocument {
    root: Element,
    response_id: String,
    assertion_id: String,
    issued_at: DateTime<Utc>,
}

impl SignedDocument {
    pub(crate) fn new(root: Element, unsigned: &UnsignedDocument) -> Self {
        Self {
            root,
            response_id: unsigned.response_id.clone(),
            assertion_id: unsigned.assertion_id.clone(),
            issued_at: unsigned.issued_at,
        }
    }

    /// The `samlp:Response` element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// Response `ID`.
    #[must_use]
    pub fn response_id(&self) -> &str {
        &self.response_id
    }

    /// Assertion `ID`.
    #[must_use]
    pub fn assertion_id(&self) -> &str {
        &self.assertion_id
    }

    /// The instant every timestamp in the document derives from.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Serializes the signed tree.
    #[must_use]
    pub fn to_xml(&self) -> String {
        writer::to_string(&self.root)
    }
}
