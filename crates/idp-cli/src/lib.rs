//! # idp-cli
//!
//! Command-line front end for the SAML issuing pipeline:
//! - Generate signed responses for a subject and role
//! - Issue responses for group members, as the service does
//! - Validate received responses
//! - Print the signing certificate and IdP metadata

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
