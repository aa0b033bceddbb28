//! # idp-core
//!
//! Configuration, error handling and audit events shared by the SAML
//! identity provider crates.
//!
//! The [`SamlProfile`] is the single immutable value carrying every protocol
//! constant (destination, issuer, audience, expiry windows, attribute
//! mappings). It is loaded once and threaded into the assertion builder and
//! signer.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::{
    AttributeMapping, AttributeSource, ExpiryWindows, IdpConfig, KeySourceConfig, LogFormat,
    SamlProfile,
};
pub use error::{Error, Result};
