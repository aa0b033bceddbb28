//! Configuration management for the identity provider.
//!
//! Configuration is layered: compiled-in defaults, then an optional TOML
//! file, then environment variables (a `.env` file is honoured through
//! `dotenvy`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default SAML consumer endpoint.
pub const DEFAULT_DESTINATION: &str = "https://signin.aws.amazon.com/saml";

/// Default issuer of responses and assertions.
pub const DEFAULT_ISSUER: &str = "https://innovation.nj.gov/realms/AwsConnectStandaloneIdP";

/// Default audience restriction.
pub const DEFAULT_AUDIENCE: &str = "urn:amazon:webservices";

/// Default NameID format.
pub const DEFAULT_NAME_ID_FORMAT: &str = "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified";

/// Default authentication context class.
pub const DEFAULT_AUTHN_CONTEXT: &str = "urn:oasis:names:tc:SAML:2.0:ac:classes:unspecified";

/// Default requested session duration in seconds.
pub const DEFAULT_SESSION_DURATION: u32 = 3600;

/// Smallest session duration a caller may request.
pub const MIN_SESSION_DURATION: u32 = 900;

/// Largest session duration a caller may request.
pub const MAX_SESSION_DURATION: u32 = 43_200;

/// Where an attribute value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeSource {
    /// The opaque role value of the request.
    Role,
    /// The subject identifier (NameID value).
    SubjectIdentifier,
    /// The requested session duration.
    SessionDuration,
}

/// Maps a request value onto a SAML attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMapping {
    /// Value source.
    pub source: AttributeSource,
    /// Attribute `Name`.
    pub name: String,
    /// Attribute `FriendlyName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Name format, either a URN or one of the aliases `Basic`,
    /// `URI Reference` and `Unspecified`.
    #[serde(default = "default_name_format")]
    pub name_format: String,
}

fn default_name_format() -> String {
    "Basic".to_string()
}

impl AttributeMapping {
    /// Creates a mapping with the `Basic` name format.
    pub fn new(source: AttributeSource, name: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
            friendly_name: None,
            name_format: default_name_format(),
        }
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    /// Sets the name format.
    #[must_use]
    pub fn with_name_format(mut self, name_format: impl Into<String>) -> Self {
        self.name_format = name_format.into();
        self
    }
}

/// Validity windows, in seconds, measured from the issue instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpiryWindows {
    /// `Conditions/@NotOnOrAfter` offset.
    pub assertion_secs: u32,
    /// `SubjectConfirmationData/@NotOnOrAfter` offset.
    pub subject_confirmation_secs: u32,
    /// `AuthnStatement/@SessionNotOnOrAfter` offset.
    pub session_secs: u32,
    /// How far `Conditions/@NotBefore` lies before the issue instant.
    pub clock_skew_secs: u32,
}

impl Default for ExpiryWindows {
    fn default() -> Self {
        Self {
            assertion_secs: 60,
            subject_confirmation_secs: 300,
            session_secs: 36_000,
            clock_skew_secs: 2,
        }
    }
}

/// Immutable issuing profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamlProfile {
    /// Response `Destination` and confirmation `Recipient`.
    pub destination: String,
    /// Issuer of the response and the assertion.
    pub issuer: String,
    /// Audience restriction.
    pub audience: String,
    /// NameID format.
    pub name_id_format: String,
    /// Authentication context class reference.
    pub authn_context_class: String,
    /// Validity windows.
    pub windows: ExpiryWindows,
    /// Attribute mappings, in document order.
    pub attributes: Vec<AttributeMapping>,
}

impl Default for SamlProfile {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION.to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            name_id_format: DEFAULT_NAME_ID_FORMAT.to_string(),
            authn_context_class: DEFAULT_AUTHN_CONTEXT.to_string(),
            windows: ExpiryWindows::default(),
            attributes: default_attribute_mappings(),
        }
    }
}

/// The three attributes the console federation endpoint expects.
///
/// RoleSessionName and SessionDuration come first and Role last, matching
/// the order the consumer has been validated against.
#[must_use]
pub fn default_attribute_mappings() -> Vec<AttributeMapping> {
    vec![
        AttributeMapping::new(
            AttributeSource::SubjectIdentifier,
            "https://aws.amazon.com/SAML/Attributes/RoleSessionName",
        )
        .with_friendly_name("Session Name"),
        AttributeMapping::new(
            AttributeSource::SessionDuration,
            "https://aws.amazon.com/SAML/Attributes/SessionDuration",
        )
        .with_friendly_name("Session Duration"),
        AttributeMapping::new(
            AttributeSource::Role,
            "https://aws.amazon.com/SAML/Attributes/Role",
        )
        .with_friendly_name("Session Role"),
    ]
}

impl SamlProfile {
    /// Sets the destination.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    /// Sets the issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Sets the expiry windows.
    #[must_use]
    pub const fn with_windows(mut self, windows: ExpiryWindows) -> Self {
        self.windows = windows;
        self
    }

    /// Replaces the attribute mappings.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<AttributeMapping>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Checks the profile for values that cannot produce a usable assertion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("destination", &self.destination),
            ("issuer", &self.issuer),
            ("audience", &self.audience),
            ("name_id_format", &self.name_id_format),
            ("authn_context_class", &self.authn_context_class),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("profile.{field} must not be empty")));
            }
        }

        let w = &self.windows;
        if w.assertion_secs == 0 || w.subject_confirmation_secs == 0 || w.session_secs == 0 {
            return Err(Error::Config("expiry windows must be positive".to_string()));
        }
        if w.clock_skew_secs == 0 {
            return Err(Error::Config("clock skew must be positive".to_string()));
        }
        if w.assertion_secs > w.subject_confirmation_secs
            || w.subject_confirmation_secs > w.session_secs
            || w.assertion_secs >= w.session_secs
        {
            return Err(Error::Config(
                "expiry windows must satisfy assertion <= subject confirmation <= session, \
                 with assertion < session"
                    .to_string(),
            ));
        }
        if w.clock_skew_secs >= w.assertion_secs {
            return Err(Error::Config(
                "clock skew must be shorter than the assertion window".to_string(),
            ));
        }

        if self.attributes.iter().any(|m| m.name.trim().is_empty()) {
            return Err(Error::Config(
                "attribute names must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Where raw key components are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KeySourceConfig {
    /// Process environment (`KEY_MODULUS`, `CERT_SUBJECT`, ...).
    #[default]
    Env,
    /// A TOML file holding the components as decimal strings.
    File {
        /// Path to the file.
        path: PathBuf,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdpConfig {
    /// Issuing profile.
    pub profile: SamlProfile,
    /// Key component source.
    pub key_source: KeySourceConfig,
    /// Session duration used when a request does not name one.
    pub default_session_duration: u32,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for IdpConfig {
    fn default() -> Self {
        Self {
            profile: SamlProfile::default(),
            key_source: KeySourceConfig::default(),
            default_session_duration: DEFAULT_SESSION_DURATION,
            log_format: LogFormat::default(),
        }
    }
}

impl IdpConfig {
    /// Loads configuration from `.env`, an optional TOML file and the
    /// process environment.
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed, or if
    /// an override or the resulting profile is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // .env is optional
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("failed to read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&content)?
            }
            _ => Self::default(),
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;

        tracing::debug!(
            destination = %config.profile.destination,
            issuer = %config.profile.issuer,
            key_source = ?config.key_source,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Applies environment overrides using `lookup` to read variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `DEFAULT_SESSION_DURATION` is not an
    /// integer.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("IDP_DESTINATION") {
            self.profile.destination = value;
        }
        if let Some(value) = lookup("IDP_ISSUER") {
            self.profile.issuer = value;
        }
        if let Some(value) = lookup("IDP_AUDIENCE") {
            self.profile.audience = value;
        }
        if let Some(value) = lookup("DEFAULT_SESSION_DURATION") {
            self.default_session_duration = value.trim().parse().map_err(|_| {
                Error::Config(format!("invalid DEFAULT_SESSION_DURATION: {value}"))
            })?;
        }
        if let Some(value) = lookup("IDP_LOG_FORMAT") {
            self.log_format = match value.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Text,
            };
        }
        Ok(())
    }

    /// Validates the profile and the default session duration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the problem.
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        if !(MIN_SESSION_DURATION..=MAX_SESSION_DURATION).contains(&self.default_session_duration)
        {
            return Err(Error::Config(format!(
                "default_session_duration must be between {MIN_SESSION_DURATION} and {MAX_SESSION_DURATION}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_uses_console_federation_constants() {
        let profile = SamlProfile::default();

        assert_eq!(profile.destination, "https://signin.aws.amazon.com/saml");
        assert_eq!(profile.audience, "urn:amazon:webservices");
        assert_eq!(profile.windows.assertion_secs, 60);
        assert_eq!(profile.windows.subject_confirmation_secs, 300);
        assert_eq!(profile.windows.session_secs, 36_000);
        assert_eq!(profile.attributes.len(), 3);
        assert_eq!(profile.attributes[2].source, AttributeSource::Role);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = IdpConfig::from_toml_str(
            r#"
            default_session_duration = 7200

            [profile]
            destination = "https://sp.example.com/acs"

            [profile.windows]
            session_secs = 3600
            "#,
        )
        .unwrap();

        assert_eq!(config.default_session_duration, 7200);
        assert_eq!(config.profile.destination, "https://sp.example.com/acs");
        assert_eq!(config.profile.issuer, DEFAULT_ISSUER);
        assert_eq!(config.profile.windows.session_secs, 3600);
        assert_eq!(config.profile.windows.assertion_secs, 60);
        assert_eq!(config.key_source, KeySourceConfig::Env);
    }

    #[test]
    fn file_key_source_parses() {
        let config = IdpConfig::from_toml_str(
            r#"
            [key_source]
            kind = "file"
            path = "/etc/idp/keys.toml"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.key_source,
            KeySourceConfig::File {
                path: PathBuf::from("/etc/idp/keys.toml")
            }
        );
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = IdpConfig::default();
        config
            .apply_env_overrides(|name| match name {
                "IDP_ISSUER" => Some("https://idp.example.com".to_string()),
                "DEFAULT_SESSION_DURATION" => Some("1800".to_string()),
                "IDP_LOG_FORMAT" => Some("JSON".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.profile.issuer, "https://idp.example.com");
        assert_eq!(config.default_session_duration, 1800);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn non_numeric_default_duration_is_rejected() {
        let mut config = IdpConfig::default();
        let result = config.apply_env_overrides(|name| {
            (name == "DEFAULT_SESSION_DURATION").then(|| "one hour".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn out_of_range_default_duration_is_rejected() {
        let config = IdpConfig {
            default_session_duration: 60,
            ..IdpConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn skew_longer_than_assertion_window_is_rejected() {
        let profile = SamlProfile::default().with_windows(ExpiryWindows {
            clock_skew_secs: 120,
            ..ExpiryWindows::default()
        });
        assert!(profile.validate().is_err());
    }

    #[test]
    fn zero_clock_skew_is_rejected() {
        let profile = SamlProfile::default().with_windows(ExpiryWindows {
            clock_skew_secs: 0,
            ..ExpiryWindows::default()
        });
        assert!(profile.validate().is_err());
    }

    #[test]
    fn windows_must_nest() {
        let inverted = ExpiryWindows {
            assertion_secs: 600,
            subject_confirmation_secs: 300,
            session_secs: 120,
            clock_skew_secs: 2,
        };
        assert!(SamlProfile::default()
            .with_windows(inverted)
            .validate()
            .is_err());

        let confirmation_past_session = ExpiryWindows {
            subject_confirmation_secs: 40_000,
            ..ExpiryWindows::default()
        };
        assert!(SamlProfile::default()
            .with_windows(confirmation_past_session)
            .validate()
            .is_err());

        let all_equal = ExpiryWindows {
            assertion_secs: 300,
            subject_confirmation_secs: 300,
            session_secs: 300,
            clock_skew_secs: 2,
        };
        assert!(SamlProfile::default()
            .with_windows(all_equal)
            .validate()
            .is_err());

        let tight = ExpiryWindows {
            assertion_secs: 120,
            subject_confirmation_secs: 120,
            session_secs: 900,
            clock_skew_secs: 5,
        };
        assert!(SamlProfile::default()
            .with_windows(tight)
            .validate()
            .is_ok());
    }

    #[test]
    fn blank_issuer_is_rejected() {
        let profile = SamlProfile::default().with_issuer("  ");
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("issuer"));
    }
}
