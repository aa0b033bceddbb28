//! `idp certificate`.

use idp_core::IdpConfig;
use idp_saml::SamlError;

use crate::output::{field, result};

/// Prints the signing certificate and its details.
pub async fn run_certificate(pem: bool, config: &IdpConfig) -> crate::CliResult<()> {
    let key = super::load_key_material(config).await?;
    let certificate = key.certificate();

    if pem {
        result(certificate.to_pem().trim_end());
    } else {
        result(&certificate.to_base64());
    }

    let info = certificate.info().map_err(SamlError::from)?;
    field("Subject", &info.subject);
    field("Serial", &info.serial);
    field("Not before", info.not_before.to_rfc3339());
    field("Not after", info.not_after.to_rfc3339());
    field("SHA-256", certificate.fingerprint_sha256());
    Ok(())
}
