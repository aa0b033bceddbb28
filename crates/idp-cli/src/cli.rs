//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// idp - issue and check signed SAML responses.
#[derive(Debug, Parser)]
#[command(name = "idp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long, global = true, env = "IDP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a signed SAML response for a subject and role.
    Generate(GenerateArgs),

    /// Issue a response for a group member, as the service does.
    Issue(IssueArgs),

    /// Decode a SAML response and validate its signature.
    Verify(VerifyArgs),

    /// Print the signing certificate.
    Certificate {
        /// Print PEM instead of Base64 DER.
        #[arg(long)]
        pem: bool,
    },

    /// Print IdP metadata.
    Metadata {
        /// Single sign-on URL advertised to service providers.
        #[arg(long)]
        sso_url: String,
    },
}

/// Arguments for `generate`.
#[derive(Debug, Clone, clap::Args)]
pub struct GenerateArgs {
    /// Subject email address.
    #[arg(long)]
    pub email: String,

    /// Role value: "<role ARN>,<provider ARN>".
    #[arg(long)]
    pub role: String,

    /// Session duration in seconds.
    #[arg(long, default_value = "3600")]
    pub duration: String,

    /// Relay state for the POST form.
    #[arg(long)]
    pub relay_state: Option<String>,

    /// Print an auto-submitting HTML form instead of the bare response.
    #[arg(long)]
    pub form: bool,
}

/// Arguments for `issue`.
#[derive(Debug, Clone, clap::Args)]
pub struct IssueArgs {
    /// Group directory (YAML map of group name to description).
    #[arg(long)]
    pub groups: PathBuf,

    /// Group whose role is assumed.
    #[arg(long)]
    pub group: String,

    /// Authenticated user's email address.
    #[arg(long)]
    pub email: String,

    /// Groups the user belongs to, comma separated or as a bracketed claim.
    #[arg(long)]
    pub user_groups: String,

    /// Session duration in seconds.
    #[arg(long)]
    pub duration: Option<String>,
}

/// Arguments for `verify`.
#[derive(Debug, Clone, clap::Args)]
pub struct VerifyArgs {
    /// File holding the Base64 response; stdin when omitted.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Only trust the configured signing certificate.
    #[arg(long)]
    pub trust_configured: bool,
}
