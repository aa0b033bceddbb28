//! SAML Status types.

use serde::{Deserialize, Serialize};

use super::{prefixes, status_codes};
use crate::xml::Element;

/// SAML protocol status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// The status code URI.
    pub status_code: String,

    /// Optional status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl Status {
    /// Creates a success status.
    #[must_use]
    pub fn success() -> Self {
        Self {
            status_code: status_codes::SUCCESS.to_string(),
            status_message: None,
        }
    }

    /// Creates a responder error status.
    #[must_use]
    pub fn responder_error(message: impl Into<String>) -> Self {
        Self {
            status_code: status_codes::RESPONDER.to_string(),
            status_message: Some(message.into()),
        }
    }

    /// Returns true if this status indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == status_codes::SUCCESS
    }

    /// Renders `samlp:Status`.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let code = Element::prefixed(prefixes::SAMLP, "StatusCode")
            .with_attr("Value", self.status_code.as_str());
        let mut element = Element::prefixed(prefixes::SAMLP, "Status").with_child(code);
        if let Some(message) = &self.status_message {
            let message = Element::prefixed(prefixes::SAMLP, "StatusMessage")
                .with_text(message.as_str());
            element = element.with_child(message);
        }
        element
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::success()
    }
}
