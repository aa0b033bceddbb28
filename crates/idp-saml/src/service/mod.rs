//! Request handling: from a validated user request to an encoded response.
//!
//! [`SamlIssuer`] validates the request, looks up the group's metadata,
//! obtains key material (assembled once and cached), then builds, signs
//! and encodes the response. Failures are split into input errors, whose
//! message goes back to the caller, and system errors, which are logged
//! and answered with a generic message.

mod group;
mod keys;
mod request;

pub use group::{GroupDirectory, GroupError, GroupMetadata, StaticGroupDirectory};
pub use keys::{
    env_vars, source_from_config, EnvKeySource, FileKeySource, KeyComponentSource, KeySourceError,
};
pub use request::{parse_groups_claim, RequestError, SamlRequest, ValidatedRequest};

use std::sync::Arc;

use idp_core::config::DEFAULT_SESSION_DURATION;
use idp_core::event::{Event, EventType};
use idp_core::{Error, IdpConfig, SamlProfile};
use idp_crypto::{KeyMaterial, KeyMaterialAssembler, KeyMaterialCache};
use serde::{Deserialize, Serialize, Serializer};
use tokio::sync::Mutex;

use crate::builder::{AssertionDocumentBuilder, AssertionRequest};
use crate::encoder::ResponseEncoder;
use crate::error::SamlError;
use crate::signature::XmlSigner;

/// Overall result of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// A signed response was produced.
    Success,
    /// The request was rejected.
    InputError,
    /// The request was valid but could not be served.
    SystemError,
}

/// What the caller receives. Absent values serialize as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueOutcome {
    /// Outcome.
    pub status: ResponseStatus,
    /// Base64 encoded signed response.
    #[serde(serialize_with = "empty_if_none")]
    pub saml_response: Option<String>,
    /// Where the service provider should send the user.
    #[serde(serialize_with = "empty_if_none")]
    pub relay_state: Option<String>,
    /// Error message for the caller.
    #[serde(serialize_with = "empty_if_none")]
    pub error: Option<String>,
}

impl IssueOutcome {
    fn success(issued: Issued) -> Self {
        Self {
            status: ResponseStatus::Success,
            saml_response: Some(issued.saml_response),
            relay_state: Some(issued.relay_state),
            error: None,
        }
    }

    fn failure(status: ResponseStatus, message: String) -> Self {
        Self {
            status,
            saml_response: None,
            relay_state: None,
            error: Some(message),
        }
    }
}

fn empty_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

/// A successfully issued response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issued {
    /// Base64 encoded signed response.
    pub saml_response: String,
    /// Relay state from the group metadata.
    pub relay_state: String,
    /// ID of the response.
    pub response_id: String,
}

/// Issues signed responses for group members.
#[derive(Clone)]
pub struct SamlIssuer {
    builder: AssertionDocumentBuilder,
    default_duration: u32,
    groups: Arc<dyn GroupDirectory>,
    key_source: Arc<dyn KeyComponentSource>,
    keys: Arc<KeyMaterialCache>,
    loading: Arc<Mutex<()>>,
}

impl std::fmt::Debug for SamlIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamlIssuer")
            .field("builder", &self.builder)
            .field("default_duration", &self.default_duration)
            .field("key_source", &self.key_source)
            .finish_non_exhaustive()
    }
}

impl SamlIssuer {
    /// Creates an issuer for `profile`.
    pub fn new(
        profile: Arc<SamlProfile>,
        groups: Arc<dyn GroupDirectory>,
        key_source: Arc<dyn KeyComponentSource>,
    ) -> Self {
        Self {
            builder: AssertionDocumentBuilder::new(profile),
            default_duration: DEFAULT_SESSION_DURATION,
            groups,
            key_source,
            keys: Arc::new(KeyMaterialCache::new()),
            loading: Arc::new(Mutex::new(())),
        }
    }

    /// Creates an issuer from application configuration.
    pub fn from_config(config: &IdpConfig, groups: Arc<dyn GroupDirectory>) -> Self {
        Self::new(
            Arc::new(config.profile.clone()),
            groups,
            source_from_config(&config.key_source),
        )
        .with_default_duration(config.default_session_duration)
    }

    /// Sets the duration used when a request names none.
    #[must_use]
    pub const fn with_default_duration(mut self, seconds: u32) -> Self {
        self.default_duration = seconds;
        self
    }

    /// Replaces the document builder, e.g. to pin the clock.
    #[must_use]
    pub fn with_builder(mut self, builder: AssertionDocumentBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Shares a key cache with other issuers.
    #[must_use]
    pub fn with_key_cache(mut self, keys: Arc<KeyMaterialCache>) -> Self {
        self.keys = keys;
        self
    }

    /// Returns the key material, loading and assembling it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeySource`] if the components cannot be loaded and
    /// [`Error::Crypto`] if they do not form a usable key.
    pub async fn key_material(&self) -> Result<Arc<KeyMaterial>, Error> {
        if let Some(material) = self.keys.get() {
            return Ok(material);
        }

        let _loading = self.loading.lock().await;
        if let Some(material) = self.keys.get() {
            return Ok(material);
        }

        let components = self
            .key_source
            .load()
            .await
            .map_err(|e| Error::KeySource(e.to_string()))?;
        let mut assembled = false;
        let material = self
            .keys
            .get_or_try_insert_with(|| {
                assembled = true;
                KeyMaterialAssembler::assemble(&components)
            })
            .map_err(|e| Error::Crypto(e.to_string()))?;

        if assembled {
            Event::builder(EventType::KeyMaterialLoaded)
                .success()
                .detail("fingerprint", material.certificate().fingerprint_sha256())
                .build()
                .emit();
        }
        Ok(material)
    }

    /// Drops cached key material so the next request reloads it.
    pub fn invalidate_keys(&self) -> bool {
        let had_keys = self.keys.invalidate();
        if had_keys {
            Event::builder(EventType::KeyMaterialInvalidated)
                .success()
                .build()
                .emit();
        }
        had_keys
    }

    /// Runs the whole pipeline for `request`.
    ///
    /// # Errors
    ///
    /// Client errors ([`Error::Validation`], [`Error::Authorization`]) for
    /// rejected requests; server errors for everything else.
    pub async fn issue(&self, request: &SamlRequest) -> Result<Issued, Error> {
        let validated = request.validate(self.default_duration).map_err(|e| match &e {
            RequestError::NotInGroup { .. } => {
                tracing::warn!(error = %e, "group membership check failed");
                Error::Authorization
            }
            other => Error::Validation(other.to_string()),
        })?;

        let group_name = &validated.group_name;
        let description = self
            .groups
            .describe_group(group_name)
            .await
            .map_err(|e| Error::Upstream(format!("group {group_name}: {e}")))?;
        let metadata = GroupMetadata::from_description(&description)
            .map_err(|e| Error::Upstream(format!("group {group_name}: {e}")))?;

        let key = self.key_material().await?;

        let assertion_request = AssertionRequest::new(
            validated.email.as_str(),
            metadata.sso_role.as_str(),
            validated.duration.as_str(),
        );
        let unsigned = self
            .builder
            .build(&assertion_request)
            .map_err(SamlError::from)?;
        let signed = XmlSigner::new(key)
            .sign(&unsigned)
            .map_err(SamlError::from)?;
        let saml_response = ResponseEncoder::encode(&signed);

        tracing::info!(
            subject = %validated.email,
            role = %metadata.sso_role,
            duration = %validated.duration,
            response_id = signed.response_id(),
            "generated SAML response"
        );

        Ok(Issued {
            saml_response,
            relay_state: metadata.relay_state,
            response_id: signed.response_id().to_string(),
        })
    }

    /// Runs the pipeline and folds the result into an [`IssueOutcome`].
    pub async fn handle(&self, request: &SamlRequest) -> IssueOutcome {
        match self.issue(request).await {
            Ok(issued) => {
                Event::builder(EventType::SamlResponseIssued)
                    .success()
                    .subject(request.email.as_str())
                    .group(request.group_name.as_str())
                    .response_id(issued.response_id.as_str())
                    .build()
                    .emit();
                IssueOutcome::success(issued)
            }
            Err(error) => {
                Event::builder(EventType::SamlResponseError)
                    .failure(error.to_string())
                    .subject(request.email.as_str())
                    .group(request.group_name.as_str())
                    .build()
                    .emit();

                if error.is_client_error() {
                    let message = error
                        .detail()
                        .map_or_else(|| error.to_string(), str::to_string);
                    IssueOutcome::failure(ResponseStatus::InputError, message)
                } else {
                    tracing::error!(
                        error = %error,
                        detail = error.detail(),
                        "failed to issue SAML response"
                    );
                    IssueOutcome::failure(ResponseStatus::SystemError, error.to_string())
                }
            }
        }
    }
}

impl From<SamlError> for Error {
    fn from(err: SamlError) -> Self {
        match err {
            SamlError::Build(e) => Self::Config(e.to_string()),
            SamlError::Signing(_) | SamlError::KeyGeneration(_) | SamlError::Certificate(_) => {
                Self::Crypto(err.to_string())
            }
            SamlError::Validation(_)
            | SamlError::Base64Decode(_)
            | SamlError::InvalidMessage(_)
            | SamlError::Xml(_) => Self::Validation(err.to_string()),
        }
    }
}
