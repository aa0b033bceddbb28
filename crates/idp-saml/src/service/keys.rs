//! Sources of raw key components.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use idp_core::KeySourceConfig;
use idp_crypto::components::{parse_decimal, parse_epoch_millis};
use idp_crypto::{CertificateMetadata, KeyComponents, KeyGenerationError};
use num_bigint::BigUint;
use thiserror::Error;

/// Environment variable names, in the order they are read.
pub mod env_vars {
    /// RSA modulus.
    pub const MODULUS: &str = "KEY_MODULUS";
    /// Public exponent.
    pub const PUBLIC_EXPONENT: &str = "KEY_PUBLIC_EXPONENT";
    /// Private exponent.
    pub const PRIVATE_EXPONENT: &str = "KEY_PRIVATE_EXPONENT";
    /// First prime.
    pub const PRIME_P: &str = "KEY_PRIME_P";
    /// Second prime.
    pub const PRIME_Q: &str = "KEY_PRIME_Q";
    /// `d mod (p - 1)`.
    pub const PRIME_EXPONENT_P: &str = "KEY_PRIME_EXPONENT_P";
    /// `d mod (q - 1)`.
    pub const PRIME_EXPONENT_Q: &str = "KEY_PRIME_EXPONENT_Q";
    /// `q^-1 mod p`.
    pub const CRT_COEFFICIENT: &str = "KEY_CRT_COEFFICIENT";
    /// Certificate subject DN.
    pub const CERT_SUBJECT: &str = "CERT_SUBJECT";
    /// Certificate serial number.
    pub const CERT_SERIAL: &str = "CERT_SERIAL";
    /// Certificate validity start, epoch milliseconds.
    pub const CERT_NOT_BEFORE: &str = "CERT_NOT_BEFORE";
    /// Certificate validity end, epoch milliseconds.
    pub const CERT_NOT_AFTER: &str = "CERT_NOT_AFTER";
    /// Certificate signature algorithm name.
    pub const CERT_SIGNATURE_ALGORITHM: &str = "CERT_SIGNATURE_ALGORITHM";
}

/// Errors raised while loading key components.
#[derive(Debug, Error)]
pub enum KeySourceError {
    /// A required value is not set.
    #[error("missing key component: {0}")]
    Missing(&'static str),

    /// A value is set but unusable.
    #[error(transparent)]
    Malformed(#[from] KeyGenerationError),

    /// The backing store could not be read.
    #[error("failed to read key components: {0}")]
    Io(String),

    /// The backing store's content is malformed.
    #[error("failed to parse key components: {0}")]
    Parse(String),
}

/// Provides the raw components the key material is assembled from.
#[async_trait]
pub trait KeyComponentSource: Send + Sync + fmt::Debug {
    /// Loads the components.
    async fn load(&self) -> Result<KeyComponents, KeySourceError>;
}

/// Builds the source described by `config`.
#[must_use]
pub fn source_from_config(config: &KeySourceConfig) -> Arc<dyn KeyComponentSource> {
    match config {
        KeySourceConfig::Env => Arc::new(EnvKeySource::new()),
        KeySourceConfig::File { path } => Arc::new(FileKeySource::new(path.clone())),
    }
}

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Reads components from environment variables (see [`env_vars`]).
#[derive(Clone)]
pub struct EnvKeySource {
    lookup: Arc<Lookup>,
}

impl EnvKeySource {
    /// Reads the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Reads variables through `lookup`.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    fn required(&self, name: &'static str) -> Result<String, KeySourceError> {
        (self.lookup)(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or(KeySourceError::Missing(name))
    }

    fn decimal(&self, name: &'static str) -> Result<BigUint, KeySourceError> {
        Ok(parse_decimal(name, &self.required(name)?)?)
    }

    fn epoch_millis(&self, name: &'static str) -> Result<DateTime<Utc>, KeySourceError> {
        Ok(parse_epoch_millis(name, &self.required(name)?)?)
    }

    fn read(&self) -> Result<KeyComponents, KeySourceError> {
        use env_vars as v;

        let certificate = CertificateMetadata {
            subject_name: self.required(v::CERT_SUBJECT)?,
            serial: self.decimal(v::CERT_SERIAL)?,
            not_before: self.epoch_millis(v::CERT_NOT_BEFORE)?,
            not_after: self.epoch_millis(v::CERT_NOT_AFTER)?,
            signature_algorithm: (self.lookup)(v::CERT_SIGNATURE_ALGORITHM)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "SHA256withRSA".to_string()),
        };

        Ok(KeyComponents {
            modulus: self.decimal(v::MODULUS)?,
            public_exponent: self.decimal(v::PUBLIC_EXPONENT)?,
            private_exponent: self.decimal(v::PRIVATE_EXPONENT)?,
            prime_p: self.decimal(v::PRIME_P)?,
            prime_q: self.decimal(v::PRIME_Q)?,
            prime_exponent_p: self.decimal(v::PRIME_EXPONENT_P)?,
            prime_exponent_q: self.decimal(v::PRIME_EXPONENT_Q)?,
            crt_coefficient: self.decimal(v::CRT_COEFFICIENT)?,
            certificate,
        })
    }
}

impl Default for EnvKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvKeySource").finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyComponentSource for EnvKeySource {
    async fn load(&self) -> Result<KeyComponents, KeySourceError> {
        self.read()
    }
}

/// Reads components from a TOML file with decimal string values.
#[derive(Debug, Clone)]
pub struct FileKeySource {
    path: PathBuf,
}

impl FileKeySource {
    /// Creates a source for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl KeyComponentSource for FileKeySource {
    async fn load(&self) -> Result<KeyComponents, KeySourceError> {
        let path = self.path.display();
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| KeySourceError::Io(format!("{path}: {e}")))?;
        toml::from_str(&content).map_err(|e| KeySourceError::Parse(e.to_string()))
    }
}
