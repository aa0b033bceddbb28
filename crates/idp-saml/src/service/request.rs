//! Issue requests and their validation.

use idp_core::config::{MAX_SESSION_DURATION, MIN_SESSION_DURATION};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A request for a signed response, as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamlRequest {
    /// Group whose role the user assumes.
    pub group_name: String,
    /// Requested session duration in seconds; the configured default when
    /// absent.
    #[serde(default)]
    pub duration: Option<String>,
    /// Authenticated user's email address.
    pub email: String,
    /// Groups the user belongs to.
    #[serde(default)]
    pub user_groups: Vec<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Group name.
    pub group_name: String,
    /// Session duration in seconds, as given.
    pub duration: String,
    /// User email.
    pub email: String,
}

/// Why a request was rejected. Messages are safe to return to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// No group name.
    #[error("groupName must be provided")]
    MissingGroup,

    /// Duration is not an integer in range.
    #[error("invalid duration {0:?}: must be an integer between 900 and 43200")]
    InvalidDuration(String),

    /// No email.
    #[error("email for the user session must be provided")]
    MissingEmail,

    /// The user is not a member of the group.
    #[error("user {email} does not belong to a group named {group}")]
    NotInGroup {
        /// User email.
        email: String,
        /// Requested group.
        group: String,
    },
}

impl SamlRequest {
    /// Creates a request with an explicit duration.
    pub fn new(
        group_name: impl Into<String>,
        duration: Option<String>,
        email: impl Into<String>,
        user_groups: Vec<String>,
    ) -> Self {
        Self {
            group_name: group_name.into(),
            duration,
            email: email.into(),
            user_groups,
        }
    }

    /// Validates the request, filling in `default_duration` when no
    /// duration was given.
    ///
    /// Checks run in order: group name, duration, email, membership.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] of the first failing check.
    pub fn validate(&self, default_duration: u32) -> Result<ValidatedRequest, RequestError> {
        if self.group_name.trim().is_empty() {
            return Err(RequestError::MissingGroup);
        }

        let duration = self
            .duration
            .clone()
            .unwrap_or_else(|| default_duration.to_string());
        if !is_valid_duration(&duration) {
            return Err(RequestError::InvalidDuration(duration));
        }

        if self.email.trim().is_empty() {
            return Err(RequestError::MissingEmail);
        }

        if !self.user_groups.iter().any(|g| g == &self.group_name) {
            return Err(RequestError::NotInGroup {
                email: self.email.clone(),
                group: self.group_name.clone(),
            });
        }

        Ok(ValidatedRequest {
            group_name: self.group_name.clone(),
            duration,
            email: self.email.clone(),
        })
    }
}

fn is_valid_duration(value: &str) -> bool {
    let range = MIN_SESSION_DURATION..=MAX_SESSION_DURATION;
    !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && value.parse::<u32>().is_ok_and(|d| range.contains(&d))
}

/// Parses a groups claim of the form `[G1 G2 G3]`.
///
/// One pair of surrounding brackets is removed; names are split on
/// whitespace.
#[must_use]
pub fn parse_groups_claim(claim: &str) -> Vec<String> {
    let trimmed = claim.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);
    inner.split_whitespace().map(str::to_string).collect()
}
