//! `idp generate`.

use std::sync::Arc;

use idp_core::IdpConfig;
use idp_saml::bindings::HttpPostBinding;
use idp_saml::{AssertionDocumentBuilder, AssertionRequest, ResponseEncoder, SamlError};

use crate::cli::GenerateArgs;
use crate::output::{field, result, success};

/// Builds, signs and prints a response.
pub async fn run_generate(args: GenerateArgs, config: &IdpConfig) -> crate::CliResult<()> {
    let key = super::load_key_material(config).await?;
    let builder = AssertionDocumentBuilder::new(Arc::new(config.profile.clone()));

    let unsigned = builder
        .build(&AssertionRequest::new(
            args.email.as_str(),
            args.role.as_str(),
            args.duration.as_str(),
        ))
        .map_err(SamlError::from)?;
    let signed = unsigned.sign(&key).map_err(SamlError::from)?;
    let encoded = ResponseEncoder::encode(&signed);

    if args.form {
        result(&HttpPostBinding::encode_response(
            &encoded,
            &config.profile.destination,
            args.relay_state.as_deref(),
        ));
    } else {
        result(&encoded);
    }

    success("Signed response generated");
    field("Response", signed.response_id());
    field("Assertion", signed.assertion_id());
    field("Subject", &args.email);
    Ok(())
}
