//! Key material assembly.

use idp_crypto::{KeyGenerationError, KeyMaterialAssembler, RsaSignatureAlgorithm};
use num_bigint::BigUint;

use crate::common;

#[test]
fn certificate_binds_the_assembled_public_key() {
    let material = common::key_material();
    let certificate = material.certificate();

    let embedded = certificate.rsa_public_key().unwrap();
    assert_eq!(&embedded, material.public_key());
    assert_eq!(material.public_key().bits(), 2048);
    assert_eq!(material.signature_len(), 256);
}

#[test]
fn certificate_carries_the_configured_metadata() {
    let material = common::key_material();
    let info = material.certificate().info().unwrap();

    assert_eq!(info.subject, "CN=AwsConnectStandaloneIdP");
    assert_eq!(info.issuer, info.subject);
    assert_eq!(info.serial, BigUint::from(1_696_169_640_002_u64));
    assert_eq!(info.not_before.timestamp(), 1_696_169_540);
    assert_eq!(info.not_after.timestamp(), 2_011_788_840);
}

#[test]
fn assembly_is_reproducible() {
    let first = common::key_material();
    let second = common::key_material();

    assert_eq!(first.certificate(), second.certificate());
    assert_eq!(first.public_key_der(), second.public_key_der());
}

#[test]
fn signatures_verify_against_the_certificate_key() {
    let material = common::key_material();
    let alg = RsaSignatureAlgorithm::Rs256;
    let signature = material.sign(b"payload", alg).unwrap();

    assert!(material.verify(b"payload", &signature, alg));
    assert!(!material.verify(b"other", &signature, alg));
}

#[test]
fn inconsistent_components_are_rejected() {
    let mut components = common::key_components();
    components.prime_q += 2_u32;

    let err = KeyMaterialAssembler::assemble(&components).unwrap_err();
    assert!(matches!(err, KeyGenerationError::ModulusMismatch), "{err}");
}

#[test]
fn unsupported_certificate_algorithm_is_rejected() {
    let mut components = common::key_components();
    components.certificate.signature_algorithm = "SHA1WithDSA".to_string();

    let err = KeyMaterialAssembler::assemble(&components).unwrap_err();
    assert!(
        matches!(err, KeyGenerationError::UnsupportedAlgorithm(_)),
        "{err}"
    );
}
