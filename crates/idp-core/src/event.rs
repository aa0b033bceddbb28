//! Audit events for assertion issuance.
//!
//! Every issued or refused response produces one [`Event`]. Events are
//! emitted through `tracing` on the `audit` target so that a subscriber can
//! route them separately from diagnostic logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A signed SAML response was issued.
    SamlResponseIssued,
    /// Issuing a SAML response failed.
    SamlResponseError,
    /// Key material was assembled from components.
    KeyMaterialLoaded,
    /// Cached key material was discarded.
    KeyMaterialInvalidated,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// An audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Subject identifier (NameID) involved.
    pub subject: Option<String>,

    /// Group the request was made for.
    pub group: Option<String>,

    /// ID of the issued response.
    pub response_id: Option<String>,

    /// Error message (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    /// Emits the event on the `audit` tracing target.
    pub fn emit(&self) {
        let payload = serde_json::to_string(self).unwrap_or_default();
        match self.outcome {
            EventOutcome::Success => {
                tracing::info!(target: "audit", event_type = ?self.event_type, event = %payload);
            }
            EventOutcome::Failure => {
                tracing::warn!(target: "audit", event_type = ?self.event_type, event = %payload);
            }
        }
    }
}

/// Builder for creating events.
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    subject: Option<String>,
    group: Option<String>,
    response_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            subject: None,
            group: None,
            response_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the group.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the response ID.
    #[must_use]
    pub fn response_id(mut self, response_id: impl Into<String>) -> Self {
        self.response_id = Some(response_id.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            subject: self.subject,
            group: self.group,
            response_id: self.response_id,
            error: self.error,
            details: self.details,
        }
    }
}
