//! Final encoding of signed responses.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::document::SignedDocument;
use crate::xml::writer;

/// Serializes signed responses for transport.
///
/// The signed tree is written as is: compact, without an XML declaration
/// and without being canonicalized again.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    /// Returns the Base64 (standard alphabet, padded, unwrapped) encoding
    /// of the serialized response.
    #[must_use]
    pub fn encode(document: &SignedDocument) -> String {
        let xml = Self::to_xml(document);
        tracing::trace!(response_id = document.response_id(), %xml, "encoding signed response");
        STANDARD.encode(xml)
    }

    /// Returns the serialized response.
    #[must_use]
    pub fn to_xml(document: &SignedDocument) -> String {
        writer::to_string(document.root())
    }
}
