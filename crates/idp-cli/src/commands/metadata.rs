//! `idp metadata`.

use idp_core::IdpConfig;
use idp_saml::metadata::IdpMetadata;

use crate::output::result;

/// Prints the IdP metadata document.
pub async fn run_metadata(sso_url: &str, config: &IdpConfig) -> crate::CliResult<()> {
    let key = super::load_key_material(config).await?;
    result(&IdpMetadata::render(&config.profile, &key, sso_url));
    Ok(())
}
