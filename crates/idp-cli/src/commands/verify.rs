//! `idp verify`.

use idp_core::IdpConfig;
use idp_saml::bindings::HttpPostBinding;
use idp_saml::{SamlError, SignatureValidator};
use tokio::io::AsyncReadExt;

use crate::cli::VerifyArgs;
use crate::output::{field, success, warning};

/// Decodes a Base64 response and validates the assertion signature.
pub async fn run_verify(args: VerifyArgs, config: &IdpConfig) -> crate::CliResult<()> {
    let encoded = match &args.file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            input
        }
    };
    let xml = HttpPostBinding::decode(&encoded)?;

    let validator = if args.trust_configured {
        let key = super::load_key_material(config).await?;
        SignatureValidator::new().trusting(key.certificate().clone())
    } else {
        warning("Trusting the embedded certificate: integrity only");
        SignatureValidator::new()
    };

    let validated = validator.validate(&xml).map_err(SamlError::from)?;

    success("Signature is valid");
    field("Assertion", &validated.assertion_id);
    field("Algorithm", validated.algorithm.xml_dsig_uri());
    field("Signer", validated.certificate.fingerprint_sha256());
    Ok(())
}
