//! Minimal XML infrastructure: a tree model, a quick-xml parser, a compact
//! writer and exclusive canonicalization.

pub mod c14n;
mod node;
mod parser;
pub mod writer;

pub use c14n::{canonicalize, EXCLUSIVE_C14N};
pub use node::{Attr, Element, NamespaceScope, Node, XML_PREFIX};
pub use parser::parse;

use thiserror::Error;

/// XML processing errors.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The text is not well-formed XML.
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// The document is well-formed but structurally unusable.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// A prefix is used without a namespace declaration in scope.
    #[error("unbound namespace prefix: {0}")]
    UnboundPrefix(String),
}
