//! Command implementations.

pub mod certificate;
pub mod generate;
pub mod issue;
pub mod metadata;
pub mod verify;

pub use certificate::run_certificate;
pub use generate::run_generate;
pub use issue::run_issue;
pub use metadata::run_metadata;
pub use verify::run_verify;

use idp_core::IdpConfig;
use idp_crypto::{KeyMaterial, KeyMaterialAssembler};
use idp_saml::service::source_from_config;
use idp_saml::SamlError;

/// Loads the configured key components and assembles the key material.
pub async fn load_key_material(config: &IdpConfig) -> crate::CliResult<KeyMaterial> {
    let components = source_from_config(&config.key_source).load().await?;
    let material = KeyMaterialAssembler::assemble(&components).map_err(SamlError::from)?;
    tracing::debug!(
        fingerprint = %material.certificate().fingerprint_sha256(),
        "key material assembled"
    );
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idp_core::KeySourceConfig;
    use std::path::Path;

    fn fixture_config() -> IdpConfig {
        IdpConfig {
            key_source: KeySourceConfig::File {
                path: Path::new(env!("CARGO_MANIFEST_DIR")).join("../../testdata/fixture-key.toml"),
            },
            ..IdpConfig::default()
        }
    }

    #[tokio::test]
    async fn loads_key_material_from_file() {
        let material = load_key_material(&fixture_config()).await.unwrap();
        let info = material.certificate().info().unwrap();
        assert_eq!(info.subject, "CN=AwsConnectStandaloneIdP");
        assert_eq!(info.subject, info.issuer);
    }

    #[tokio::test]
    async fn missing_key_file_is_a_key_source_error() {
        let config = IdpConfig {
            key_source: KeySourceConfig::File {
                path: "/nonexistent/keys.toml".into(),
            },
            ..IdpConfig::default()
        };
        let err = load_key_material(&config).await.unwrap_err();
        assert!(matches!(err, crate::CliError::KeySource(_)));
    }

    #[tokio::test]
    async fn generate_and_metadata_succeed_with_fixture_keys() {
        let config = fixture_config();
        let args = crate::cli::GenerateArgs {
            email: "alice@example.com".to_string(),
            role: "arn:aws:iam::1:role/R,arn:aws:iam::1:saml-provider/P".to_string(),
            duration: "3600".to_string(),
            relay_state: None,
            form: true,
        };
        run_generate(args, &config).await.unwrap();
        run_metadata("https://idp.example.com/sso", &config)
            .await
            .unwrap();
    }
}
