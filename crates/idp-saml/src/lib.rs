//! SAML 2.0 response issuing for an identity provider.
//!
//! This crate turns a user request into a signed, Base64 encoded SAML
//! response:
//!
//! - **Document building** - [`builder::AssertionDocumentBuilder`] renders
//!   the unsigned Response and Assertion from a [`idp_core::SamlProfile`]
//! - **XML signature** - [`signature`] applies an enveloped signature over
//!   the exclusive canonical form of the assertion, and validates it
//! - **Encoding** - [`encoder::ResponseEncoder`] serializes and Base64
//!   encodes the signed tree
//! - **HTTP-POST binding** and **IdP metadata** for service provider
//!   integration
//! - **Issuing service** - [`service::SamlIssuer`] drives the whole chain
//!   for a validated request
//!
//! # Example
//!
//! ```rust,ignore
//! use idp_saml::builder::{AssertionDocumentBuilder, AssertionRequest};
//! use idp_saml::encoder::ResponseEncoder;
//!
//! let builder = AssertionDocumentBuilder::new(profile);
//! let unsigned = builder.build(&AssertionRequest::new("alice@example.com", role, "3600"))?;
//! let signed = unsigned.sign(&key_material)?;
//! let encoded = ResponseEncoder::encode(&signed);
//! ```
//!
//! # SAML Specifications
//!
//! - [SAML 2.0 Core](https://docs.oasis-open.org/security/saml/v2.0/saml-core-2.0-os.pdf)
//! - [SAML 2.0 Bindings](https://docs.oasis-open.org/security/saml/v2.0/saml-bindings-2.0-os.pdf)
//! - [XML Signature](https://www.w3.org/TR/xmldsig-core1/)
//! - [Exclusive XML Canonicalization](https://www.w3.org/TR/xml-exc-c14n/)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bindings;
pub mod builder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod metadata;
pub mod service;
pub mod signature;
pub mod types;
pub mod xml;

#[cfg(test)]
mod test_support;

pub use builder::{AssertionBuildError, AssertionDocumentBuilder, AssertionRequest};
pub use document::{SignedDocument, UnsignedDocument};
pub use encoder::ResponseEncoder;
pub use error::{SamlError, SamlResult};
pub use signature::{sign, SignatureValidator, SigningError, ValidationError, XmlSigner};
