//! SAML Response types.
//!
//! Response messages sent by an identity provider to a service provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    format_instant, issuer_element, prefixes, Assertion, Status, SAMLP_NS, SAML_NS, SAML_VERSION,
};
use crate::xml::Element;

/// SAML Response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Unique identifier for this response.
    pub id: String,

    /// Timestamp when this response was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the identity provider that issued this response.
    pub issuer: String,

    /// The URL where this response is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// The status of the response.
    pub status: Status,

    /// The assertion carried by this response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion: Option<Assertion>,
}

impl Response {
    /// Creates a new success response.
    #[must_use]
    pub fn success(
        id: impl Into<String>,
        issue_instant: DateTime<Utc>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            issue_instant,
            issuer: issuer.into(),
            destination: None,
            status: Status::success(),
            assertion: None,
        }
    }

    /// Sets the destination URL.
    #[must_use]
    pub fn with_destination(mut self, url: impl Into<String>) -> Self {
        self.destination = Some(url.into());
        self
    }

    /// Sets the assertion.
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertion = Some(assertion);
        self
    }

    /// Returns true if the status is success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Renders `samlp:Response`, declaring the protocol and assertion
    /// namespaces for the whole document.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::prefixed(prefixes::SAMLP, "Response")
            .with_namespace(prefixes::SAMLP, SAMLP_NS)
            .with_namespace(prefixes::SAML, SAML_NS);
        if let Some(destination) = &self.destination {
            element.set_attr("Destination", destination.as_str());
        }
        element.set_attr("ID", self.id.as_str());
        element.set_attr("IssueInstant", format_instant(self.issue_instant));
        element.set_attr("Version", SAML_VERSION);

        element = element
            .with_child(issuer_element(&self.issuer))
            .with_child(self.status.to_element());
        if let Some(assertion) = &self.assertion {
            element = element.with_child(assertion.to_element());
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::writer;
    use chrono::TimeZone;

    #[test]
    fn response_declares_document_namespaces() {
        let instant = Utc.with_ymd_and_hms(2023, 10, 1, 22, 0, 1).unwrap();
        let response = Response::success("ID_r", instant, "https://idp.example.com")
            .with_destination("https://sp.example.com/acs");

        assert!(response.is_success());
        assert_eq!(
            writer::to_string(&response.to_element()),
            concat!(
                r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" "#,
                r#"xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" "#,
                r#"Destination="https://sp.example.com/acs" ID="ID_r" "#,
                r#"IssueInstant="2023-10-01T22:00:01.000Z" Version="2.0">"#,
                "<saml:Issuer>https://idp.example.com</saml:Issuer>",
                "<samlp:Status>",
                r#"<samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Success"/>"#,
                "</samlp:Status>",
                "</samlp:Response>"
            )
        );
    }
}
