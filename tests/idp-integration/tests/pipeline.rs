//! Build, sign, encode and validate.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration, Utc};
use idp_core::{ExpiryWindows, SamlProfile};
use idp_saml::bindings::HttpPostBinding;
use idp_saml::types::parse_instant;
use idp_saml::xml;
use idp_saml::{ResponseEncoder, SignatureValidator, ValidationError};

use crate::common::{self, attribute, count_elements};

fn encoded_response(now: DateTime<Utc>) -> anyhow::Result<String> {
    let unsigned = common::pinned_builder(now).build(&common::request())?;
    let signed = unsigned.sign(&common::key_material())?;
    Ok(ResponseEncoder::encode(&signed))
}

#[test]
fn response_decodes_and_validates() -> anyhow::Result<()> {
    common::init_tracing();
    let material = common::key_material();
    let encoded = encoded_response(common::fixed_now())?;

    let xml = HttpPostBinding::decode(&encoded)?;
    assert!(xml.starts_with("<samlp:Response "), "{xml}");

    let validated = SignatureValidator::new()
        .trusting(material.certificate().clone())
        .validate(&xml)?;
    assert_eq!(validated.assertion_id, "ID_2");
    assert_eq!(&validated.certificate, material.certificate());
    Ok(())
}

#[test]
fn pinned_inputs_give_identical_output() -> anyhow::Result<()> {
    let first = encoded_response(common::fixed_now())?;
    let second = encoded_response(common::fixed_now())?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn different_instants_give_different_responses() -> anyhow::Result<()> {
    let first = encoded_response(common::fixed_now())?;
    let second = encoded_response(common::fixed_now() + Duration::seconds(1))?;
    assert_ne!(first, second);

    for encoded in [first, second] {
        let xml = HttpPostBinding::decode(&encoded)?;
        SignatureValidator::new().validate(&xml)?;
    }
    Ok(())
}

#[test]
fn signature_sits_between_issuer_and_subject() -> anyhow::Result<()> {
    let xml = HttpPostBinding::decode(&encoded_response(common::fixed_now())?)?;
    let root = xml::parse(&xml)?;
    let assertion = root.child("Assertion").expect("assertion");

    let names: Vec<_> = assertion
        .child_elements()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(&names[..3], ["Issuer", "Signature", "Subject"]);
    assert_eq!(count_elements(&root, "Signature"), 1);
    assert!(root.child("Signature").is_none());
    Ok(())
}

#[test]
fn assertion_carries_one_subject_and_three_attributes() -> anyhow::Result<()> {
    let xml = HttpPostBinding::decode(&encoded_response(common::fixed_now())?)?;
    let root = xml::parse(&xml)?;
    let assertion = root.child("Assertion").expect("assertion");

    assert_eq!(count_elements(assertion, "NameID"), 1);
    let name_id = assertion
        .child("Subject")
        .and_then(|s| s.child("NameID"))
        .expect("NameID");
    assert_eq!(name_id.text(), "test@test.com");

    assert_eq!(count_elements(assertion, "Attribute"), 3);
    let value = |name: &str| {
        attribute(assertion, name)
            .and_then(|a| a.child("AttributeValue"))
            .map(xml::Element::text)
    };
    assert_eq!(
        value("https://aws.amazon.com/SAML/Attributes/RoleSessionName").as_deref(),
        Some("test@test.com")
    );
    assert_eq!(
        value("https://aws.amazon.com/SAML/Attributes/SessionDuration").as_deref(),
        Some("901")
    );
    assert_eq!(
        value("https://aws.amazon.com/SAML/Attributes/Role").as_deref(),
        Some(common::ROLE)
    );
    Ok(())
}

fn assert_windows_ordered(root: &xml::Element, now: DateTime<Utc>) {
    let assertion = root.child("Assertion").expect("assertion");
    let instant = |element: Option<&xml::Element>, attr: &str| {
        element
            .and_then(|e| e.attr(attr))
            .and_then(parse_instant)
            .unwrap_or_else(|| panic!("missing {attr}"))
    };

    let issued = instant(Some(root), "IssueInstant");
    assert_eq!(issued, now);
    assert_eq!(instant(Some(assertion), "IssueInstant"), now);

    let conditions = assertion.child("Conditions");
    let not_before = instant(conditions, "NotBefore");
    let not_on_or_after = instant(conditions, "NotOnOrAfter");
    let confirmation = assertion
        .child("Subject")
        .and_then(|s| s.child("SubjectConfirmation"))
        .and_then(|c| c.child("SubjectConfirmationData"));
    let confirmation_expiry = instant(confirmation, "NotOnOrAfter");
    let session_expiry = instant(assertion.child("AuthnStatement"), "SessionNotOnOrAfter");

    assert!(not_before < issued);
    assert!(issued <= not_on_or_after);
    assert!(not_on_or_after <= confirmation_expiry);
    assert!(confirmation_expiry <= session_expiry);
    assert!(not_on_or_after < session_expiry);
}

#[test]
fn validity_windows_are_ordered() -> anyhow::Result<()> {
    let now = common::fixed_now();
    let xml = HttpPostBinding::decode(&encoded_response(now)?)?;
    assert_windows_ordered(&xml::parse(&xml)?, now);
    Ok(())
}

#[test]
fn accepted_custom_windows_stay_ordered() -> anyhow::Result<()> {
    let now = common::fixed_now();
    let profile = SamlProfile::default().with_windows(ExpiryWindows {
        assertion_secs: 120,
        subject_confirmation_secs: 120,
        session_secs: 900,
        clock_skew_secs: 5,
    });
    profile.validate()?;

    let unsigned = common::pinned_builder_for(profile, now).build(&common::request())?;
    let signed = unsigned.sign(&common::key_material())?;
    assert_windows_ordered(&xml::parse(&ResponseEncoder::to_xml(&signed))?, now);
    Ok(())
}

#[test]
fn windows_that_would_break_ordering_are_refused() {
    let zero_skew = ExpiryWindows {
        clock_skew_secs: 0,
        ..ExpiryWindows::default()
    };
    let inverted = ExpiryWindows {
        assertion_secs: 600,
        subject_confirmation_secs: 300,
        session_secs: 120,
        clock_skew_secs: 2,
    };
    for windows in [zero_skew, inverted] {
        assert!(SamlProfile::default()
            .with_windows(windows)
            .validate()
            .is_err());
    }
}

#[test]
fn tampering_is_detected() -> anyhow::Result<()> {
    let xml = HttpPostBinding::decode(&encoded_response(common::fixed_now())?)?;
    let tampered = xml.replace("test@test.com", "mallory@test.com");
    assert_ne!(tampered, xml);

    let err = SignatureValidator::new().validate(&tampered).unwrap_err();
    assert!(matches!(err, ValidationError::DigestMismatch), "{err}");

    let reencoded = STANDARD.encode(&tampered);
    let decoded = HttpPostBinding::decode(&reencoded)?;
    assert!(SignatureValidator::new().validate(&decoded).is_err());
    Ok(())
}

#[test]
fn default_scenario_for_a_new_user() -> anyhow::Result<()> {
    let role = "arn:aws:iam::111111111111:role/X,arn:aws:iam::111111111111:saml-provider/Y";
    let request = idp_saml::AssertionRequest::new("alice@example.com", role, "3600");
    let material = common::key_material();
    let unsigned = common::pinned_builder(common::fixed_now()).build(&request)?;
    let signed = unsigned.sign(&material)?;
    assert_eq!(signed.response_id(), "ID_1");
    assert_eq!(signed.assertion_id(), "ID_2");

    let root = xml::parse(&ResponseEncoder::to_xml(&signed))?;
    let assertion = root.child("Assertion").expect("assertion");
    let value = |name: &str| {
        attribute(assertion, name)
            .and_then(|a| a.child("AttributeValue"))
            .map(xml::Element::text)
    };
    assert_eq!(
        value("https://aws.amazon.com/SAML/Attributes/SessionDuration").as_deref(),
        Some("3600")
    );
    assert_eq!(
        value("https://aws.amazon.com/SAML/Attributes/Role").as_deref(),
        Some(role)
    );
    let name_id = assertion
        .child("Subject")
        .and_then(|s| s.child("NameID"))
        .map(xml::Element::text);
    assert_eq!(name_id.as_deref(), Some("alice@example.com"));
    assert_eq!(
        root.attr("Destination"),
        Some("https://signin.aws.amazon.com/saml")
    );
    assert_eq!(
        root.child("Status")
            .and_then(|s| s.child("StatusCode"))
            .and_then(|c| c.attr("Value")),
        Some("urn:oasis:names:tc:SAML:2.0:status:Success")
    );
    Ok(())
}
