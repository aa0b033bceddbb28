//! # idp
//!
//! Issues and checks signed SAML responses from the command line.

#![forbid(unsafe_code)]

use clap::Parser;
use idp_cli::{
    cli::{Cli, Command},
    commands::{run_certificate, run_generate, run_issue, run_metadata, run_verify},
    logging,
    output::error,
};
use idp_core::IdpConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match IdpConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };
    logging::init(config.log_format, cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args, &config).await,
        Command::Issue(args) => run_issue(args, &config).await,
        Command::Verify(args) => run_verify(args, &config).await,
        Command::Certificate { pem } => run_certificate(pem, &config).await,
        Command::Metadata { sso_url } => run_metadata(&sso_url, &config).await,
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
