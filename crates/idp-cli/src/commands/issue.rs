//! `idp issue`.

use std::sync::Arc;

use idp_core::IdpConfig;
use idp_saml::service::{
    parse_groups_claim, ResponseStatus, SamlIssuer, SamlRequest, StaticGroupDirectory,
};

use crate::cli::IssueArgs;
use crate::output::result;

/// Runs the issuing service for one request and prints the outcome as
/// JSON.
pub async fn run_issue(args: IssueArgs, config: &IdpConfig) -> crate::CliResult<()> {
    let yaml = tokio::fs::read_to_string(&args.groups).await?;
    let groups = StaticGroupDirectory::from_yaml(&yaml)?;
    let issuer = SamlIssuer::from_config(config, Arc::new(groups));

    let request = SamlRequest::new(
        args.group,
        args.duration,
        args.email,
        user_groups(&args.user_groups),
    );
    let outcome = issuer.handle(&request).await;
    result(&serde_json::to_string_pretty(&outcome)?);

    match outcome.status {
        ResponseStatus::Success => Ok(()),
        _ => Err(crate::CliError::Issue(outcome.error.unwrap_or_default())),
    }
}

/// Accepts either a bracketed claim or a comma separated list.
fn user_groups(value: &str) -> Vec<String> {
    parse_groups_claim(&value.replace(',', " "))
}
