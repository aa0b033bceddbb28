//! # idp-crypto
//!
//! Key material for the SAML identity provider, built on aws-lc-rs.
//!
//! The entry point is [`KeyMaterialAssembler::assemble`], which turns raw
//! RSA CRT components and certificate metadata into a ready-to-use
//! [`KeyMaterial`]: an aws-lc-rs signing key, the matching public key and a
//! self-signed X.509 certificate.
//!
//! ## Algorithms
//!
//! SAML consumers expect RSA PKCS#1 v1.5 with SHA-256 and SHA-256 digests,
//! so those are what this crate provides. SHA-384/512 variants exist for
//! profiles that ask for them.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod assembler;
pub mod cache;
pub mod certificate;
pub mod components;
pub mod hash;
pub mod keys;
pub mod rsa;
pub mod signature;

pub use algorithm::{CertificateSignatureAlgorithm, HashAlgorithm};
pub use assembler::{KeyGenerationError, KeyMaterialAssembler};
pub use cache::KeyMaterialCache;
pub use certificate::{Certificate, CertificateError, CertificateInfo};
pub use components::{CertificateMetadata, KeyComponents};
pub use hash::{hash, sha256, sha384, sha512};
pub use keys::{KeyMaterial, RsaPublicKey};
pub use rsa::{rsa_sign, rsa_verify, RsaSignatureAlgorithm};
pub use signature::SignatureError;
