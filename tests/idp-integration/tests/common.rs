//! Common test utilities and fixtures.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use idp_core::SamlProfile;
use idp_crypto::{KeyComponents, KeyMaterial, KeyMaterialAssembler};
use idp_saml::builder::{FixedClock, SequenceIdGenerator};
use idp_saml::xml::Element;
use idp_saml::{AssertionDocumentBuilder, AssertionRequest};

/// Path of the fixture key, for file based key sources.
pub const FIXTURE_KEY_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../testdata/fixture-key.toml"
);

/// The fixture key as TOML.
pub const FIXTURE_KEY: &str = include_str!("../../../testdata/fixture-key.toml");

/// Role value used by the console federation scenario.
pub const ROLE: &str = "arn:aws:iam::274460373520:role/TempForTesting,\
                        arn:aws:iam::274460373520:saml-provider/TempForTesting";

/// Installs a test subscriber once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("idp_saml=debug,idp_crypto=debug")
        .with_test_writer()
        .try_init();
}

/// 2023-10-01T22:00:01.058Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_696_197_601_058).unwrap()
}

/// Parses the fixture key components.
pub fn key_components() -> KeyComponents {
    toml::from_str(FIXTURE_KEY).unwrap()
}

/// Assembles the fixture key.
pub fn key_material() -> KeyMaterial {
    KeyMaterialAssembler::assemble(&key_components()).unwrap()
}

/// A builder with a pinned clock and sequential IDs.
pub fn pinned_builder(now: DateTime<Utc>) -> AssertionDocumentBuilder {
    pinned_builder_for(SamlProfile::default(), now)
}

/// Like [`pinned_builder`], for a custom profile.
pub fn pinned_builder_for(profile: SamlProfile, now: DateTime<Utc>) -> AssertionDocumentBuilder {
    AssertionDocumentBuilder::new(Arc::new(profile))
        .with_clock(Arc::new(FixedClock(now)))
        .with_id_generator(Arc::new(SequenceIdGenerator::default()))
}

/// The request from the console federation scenario.
pub fn request() -> AssertionRequest {
    AssertionRequest::new("test@test.com", ROLE, "901")
}

/// Returns the `Attribute` with `name` under the assertion.
pub fn attribute<'a>(assertion: &'a Element, name: &str) -> Option<&'a Element> {
    assertion
        .child("AttributeStatement")?
        .child_elements()
        .find(|a| a.attr("Name") == Some(name))
}

/// Counts elements named `name` anywhere under `root`, `root` included.
pub fn count_elements(root: &Element, name: &str) -> usize {
    usize::from(root.name == name)
        + root
            .child_elements()
            .map(|child| count_elements(child, name))
            .sum::<usize>()
}
