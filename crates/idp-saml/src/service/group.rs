//! Group metadata: where a group's users land and which role they assume.
//!
//! A group's description is a small YAML document:
//!
//! ```yaml
//! relayState: https://console.aws.amazon.com/connect/federate/instance-id
//! ssoRole: arn:aws:iam::123456789012:role/Agent,arn:aws:iam::123456789012:saml-provider/Idp
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while looking up or parsing group metadata.
#[derive(Debug, Error)]
pub enum GroupError {
    /// The directory has no such group.
    #[error("group not found: {0}")]
    NotFound(String),

    /// The description is blank.
    #[error("group description is empty")]
    Empty,

    /// The description is not valid metadata YAML.
    #[error("invalid group description: {0}")]
    Parse(String),

    /// The directory backend failed.
    #[error("group directory error: {0}")]
    Directory(String),
}

/// Metadata carried in a group description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetadata {
    /// Where the service provider sends the user after sign-in.
    #[serde(
        rename = "relayState",
        alias = "RelayState",
        alias = "RELAYSTATE",
        alias = "relaystate"
    )]
    pub relay_state: String,

    /// Role value placed in the assertion, `roleArn,providerArn`.
    #[serde(
        rename = "ssoRole",
        alias = "SsoRole",
        alias = "SSORole",
        alias = "SSOROLE",
        alias = "ssorole"
    )]
    pub sso_role: String,
}

impl GroupMetadata {
    /// Parses a group description. Keys other than the relay state and the
    /// role are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::Empty`] for blank input and
    /// [`GroupError::Parse`] when either key is missing or the YAML is
    /// malformed.
    pub fn from_description(description: &str) -> Result<Self, GroupError> {
        if description.trim().is_empty() {
            return Err(GroupError::Empty);
        }
        serde_yaml::from_str(description).map_err(|e| GroupError::Parse(e.to_string()))
    }
}

/// Source of group descriptions.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// Returns the raw description of `group`.
    async fn describe_group(&self, group: &str) -> Result<String, GroupError>;
}

/// In-memory group directory.
#[derive(Debug, Clone, Default)]
pub struct StaticGroupDirectory {
    groups: HashMap<String, String>,
}

impl StaticGroupDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group with its description.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.groups.insert(name.into(), description.into());
        self
    }

    /// Builds a directory from a YAML map of group name to metadata.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::Parse`] for malformed YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, GroupError> {
        let groups: HashMap<String, GroupMetadata> =
            serde_yaml::from_str(yaml).map_err(|e| GroupError::Parse(e.to_string()))?;
        groups
            .into_iter()
            .try_fold(Self::new(), |dir, (name, metadata)| {
                let description =
                    serde_yaml::to_string(&metadata).map_err(|e| GroupError::Parse(e.to_string()))?;
                Ok(dir.with_group(name, description))
            })
    }
}

#[async_trait]
impl GroupDirectory for StaticGroupDirectory {
    async fn describe_group(&self, group: &str) -> Result<String, GroupError> {
        self.groups
            .get(group)
            .cloned()
            .ok_or_else(|| GroupError::NotFound(group.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_keys() {
        let metadata = GroupMetadata::from_description(
            "relayState: https://console.example.com\nssoRole: arn:role,arn:provider\n",
        )
        .unwrap();
        assert_eq!(metadata.relay_state, "https://console.example.com");
        assert_eq!(metadata.sso_role, "arn:role,arn:provider");
    }

    #[test]
    fn accepts_key_case_variants() {
        for (relay, role) in [
            ("RelayState", "SsoRole"),
            ("RELAYSTATE", "SSOROLE"),
            ("relaystate", "ssorole"),
            ("relayState", "SSORole"),
        ] {
            let yaml = format!("{relay}: r\n{role}: s\n");
            let metadata = GroupMetadata::from_description(&yaml).unwrap();
            let pair = (metadata.relay_state.as_str(), metadata.sso_role.as_str());
            assert_eq!(pair, ("r", "s"));
        }
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let metadata =
            GroupMetadata::from_description("relayState: r\nssoRole: s\nowner: ops\n").unwrap();
        assert_eq!(metadata.sso_role, "s");
    }

    #[test]
    fn both_keys_are_required() {
        assert!(matches!(
            GroupMetadata::from_description("relayState: r\n"),
            Err(GroupError::Parse(_))
        ));
        assert!(matches!(
            GroupMetadata::from_description("   \n"),
            Err(GroupError::Empty)
        ));
    }

    #[tokio::test]
    async fn static_directory_lookup() {
        let dir = StaticGroupDirectory::from_yaml(
            "Admins:\n  relayState: https://console.example.com\n  ssoRole: arn:role,arn:provider\n",
        )
        .unwrap();

        let description = dir.describe_group("Admins").await.unwrap();
        let metadata = GroupMetadata::from_description(&description).unwrap();
        assert_eq!(metadata.relay_state, "https://console.example.com");

        assert!(matches!(
            dir.describe_group("Nobody").await,
            Err(GroupError::NotFound(_))
        ));
    }
}
