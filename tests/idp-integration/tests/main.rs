//! End-to-end tests for the SAML issuing pipeline.
//!
//! Everything runs in process against a fixed RSA key and a pinned clock.

mod common;
mod issuing;
mod key_material;
mod pipeline;
