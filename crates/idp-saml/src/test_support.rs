//! Shared fixtures for unit tests.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, TimeZone, Utc};
use idp_core::SamlProfile;
use idp_crypto::{Certificate, KeyComponents, KeyMaterial, KeyMaterialAssembler};

use crate::builder::{AssertionDocumentBuilder, AssertionRequest, FixedClock, SequenceIdGenerator};
use crate::document::{SignedDocument, UnsignedDocument};

pub const FIXTURE_KEY: &str = include_str!("../../../testdata/fixture-key.toml");

pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_696_197_601_058).unwrap()
}

pub fn key_components() -> KeyComponents {
    toml::from_str(FIXTURE_KEY).unwrap()
}

pub fn key_material() -> Arc<KeyMaterial> {
    static KEY: OnceLock<Arc<KeyMaterial>> = OnceLock::new();
    let key = KEY.get_or_init(|| {
        let material = KeyMaterialAssembler::assemble(&key_components()).unwrap();
        Arc::new(material)
    });
    Arc::clone(key)
}

pub fn unsigned_document() -> UnsignedDocument {
    AssertionDocumentBuilder::new(Arc::new(SamlProfile::default()))
        .with_clock(Arc::new(FixedClock(fixed_now())))
        .with_id_generator(Arc::new(SequenceIdGenerator::default()))
        .build(&AssertionRequest::new(
            "alice@example.com",
            "arn:aws:iam::123456789012:role/Admin,arn:aws:iam::123456789012:saml-provider/Idp",
            "3600",
        ))
        .unwrap()
}

pub fn signed_document() -> SignedDocument {
    unsigned_document().sign(&key_material()).unwrap()
}

/// A certificate for some other, freshly generated key.
pub fn unrelated_certificate() -> Certificate {
    let key_pair = rcgen::KeyPair::generate().unwrap();
    let cert = rcgen::CertificateParams::new(vec!["other.example.com".to_string()])
        .unwrap()
        .self_signed(&key_pair)
        .unwrap();
    Certificate::from_der(cert.der().to_vec()).unwrap()
}
