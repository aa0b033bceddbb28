//! The issuing service, wired to file based keys and a YAML group directory.

use std::sync::Arc;

use idp_core::{IdpConfig, KeySourceConfig};
use idp_saml::bindings::HttpPostBinding;
use idp_saml::service::{
    FileKeySource, IssueOutcome, ResponseStatus, SamlIssuer, SamlRequest, StaticGroupDirectory,
};
use idp_saml::SignatureValidator;

use crate::common;

const GROUPS: &str = r#"
Agents:
  relayState: https://console.example.com/connect
  ssoRole: "arn:aws:iam::274460373520:role/TempForTesting,arn:aws:iam::274460373520:saml-provider/TempForTesting"
  owner: contact-center
"#;

fn directory() -> Arc<StaticGroupDirectory> {
    let directory = StaticGroupDirectory::from_yaml(GROUPS)
        .unwrap()
        .with_group(
            "Orphans",
            "relayState: https://console.example.com/connect\n",
        );
    Arc::new(directory)
}

fn issuer() -> SamlIssuer {
    SamlIssuer::new(
        Arc::new(idp_core::SamlProfile::default()),
        directory(),
        Arc::new(FileKeySource::new(common::FIXTURE_KEY_PATH)),
    )
    .with_builder(common::pinned_builder(common::fixed_now()))
}

fn request(group: &str, duration: Option<&str>) -> SamlRequest {
    SamlRequest::new(
        group,
        duration.map(str::to_string),
        "test@test.com",
        vec!["Agents".to_string(), "Orphans".to_string()],
    )
}

#[tokio::test]
async fn member_receives_a_valid_signed_response() -> anyhow::Result<()> {
    common::init_tracing();
    let outcome = issuer().handle(&request("Agents", Some("901"))).await;

    assert_eq!(outcome.status, ResponseStatus::Success);
    assert_eq!(
        outcome.relay_state.as_deref(),
        Some("https://console.example.com/connect")
    );
    assert!(outcome.error.is_none());

    let encoded = outcome.saml_response.expect("response");
    let xml = HttpPostBinding::decode(&encoded)?;
    let validated = SignatureValidator::new()
        .trusting(common::key_material().certificate().clone())
        .validate(&xml)?;
    assert_eq!(validated.assertion_id, "ID_2");
    assert!(xml.contains(">901<"));
    Ok(())
}

#[tokio::test]
async fn outcome_serializes_for_the_caller() -> anyhow::Result<()> {
    let outcome = issuer().handle(&request("Agents", None)).await;
    let json = serde_json::to_value(&outcome)?;

    assert_eq!(json["status"], "SUCCESS");
    assert_eq!(json["relayState"], "https://console.example.com/connect");
    assert_eq!(json["error"], "");
    let response = json["samlResponse"].as_str().unwrap_or_default();
    assert!(!response.is_empty());
    Ok(())
}

#[tokio::test]
async fn out_of_range_duration_is_an_input_error() {
    let outcome: IssueOutcome = issuer().handle(&request("Agents", Some("899"))).await;
    assert_eq!(outcome.status, ResponseStatus::InputError);
    assert!(outcome.saml_response.is_none());
    let error = outcome.error.unwrap_or_default();
    assert!(error.contains("between 900 and 43200"));
}

#[tokio::test]
async fn group_outside_the_users_groups_is_denied() {
    let mut request = request("Agents", None);
    request.user_groups = vec!["Supervisors".to_string()];

    let outcome = issuer().handle(&request).await;
    assert_eq!(outcome.status, ResponseStatus::InputError);
    assert_eq!(outcome.error.as_deref(), Some("access denied"));
}

#[tokio::test]
async fn group_without_a_role_is_a_system_error() {
    let outcome = issuer().handle(&request("Orphans", None)).await;
    assert_eq!(outcome.status, ResponseStatus::SystemError);
    assert_eq!(
        outcome.error.as_deref(),
        Some("upstream service unavailable")
    );
}

#[tokio::test]
async fn issuer_built_from_configuration_uses_the_key_file() -> anyhow::Result<()> {
    let config = IdpConfig {
        key_source: KeySourceConfig::File {
            path: common::FIXTURE_KEY_PATH.into(),
        },
        default_session_duration: 7200,
        ..IdpConfig::default()
    };
    let issuer = SamlIssuer::from_config(&config, directory());

    let issued = issuer.issue(&request("Agents", None)).await?;
    let xml = HttpPostBinding::decode(&issued.saml_response)?;
    SignatureValidator::new().validate(&xml)?;
    assert!(xml.contains(">7200<"));

    let material = issuer.key_material().await?;
    assert_eq!(material.certificate(), common::key_material().certificate());
    assert!(issuer.invalidate_keys());
    assert!(!issuer.invalidate_keys());
    Ok(())
}
