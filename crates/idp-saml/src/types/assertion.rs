//! SAML Assertion types.
//!
//! Assertions contain statements about a subject made by an issuer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    confirmation_methods, format_instant, prefixes, NameId, SAML_VERSION, XSI_NS, XS_NS,
};
use crate::xml::Element;

/// SAML Assertion.
///
/// A package of information that supplies one or more statements made
/// by a SAML authority (the issuer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// Unique identifier for this assertion.
    pub id: String,

    /// Timestamp when this assertion was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the identity provider that issued this assertion.
    pub issuer: String,

    /// The subject of this assertion.
    pub subject: Subject,

    /// Conditions that must be evaluated for the assertion to be valid.
    pub conditions: Conditions,

    /// Authentication statement describing how the subject authenticated.
    pub authn_statement: AuthnStatement,

    /// Attribute statement; omitted when no attribute was produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_statement: Option<AttributeStatement>,
}

impl Assertion {
    /// Renders `saml:Assertion`. Namespace declarations are left to the
    /// enclosing response.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::prefixed(prefixes::SAML, "Assertion")
            .with_attr("ID", self.id.as_str())
            .with_attr("IssueInstant", format_instant(self.issue_instant))
            .with_attr("Version", SAML_VERSION)
            .with_child(issuer_element(&self.issuer))
            .with_child(self.subject.to_element())
            .with_child(self.conditions.to_element())
            .with_child(self.authn_statement.to_element());

        if let Some(statement) = &self.attribute_statement {
            element = element.with_child(statement.to_element());
        }
        element
    }
}

/// Renders `saml:Issuer`.
#[must_use]
pub fn issuer_element(issuer: &str) -> Element {
    Element::prefixed(prefixes::SAML, "Issuer").with_text(issuer)
}

/// Subject of an assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// The name identifier for the subject.
    pub name_id: NameId,

    /// Subject confirmations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_confirmations: Vec<SubjectConfirmation>,
}

impl Subject {
    /// Creates a new subject with a name ID.
    #[must_use]
    pub fn new(name_id: NameId) -> Self {
        Self {
            name_id,
            subject_confirmations: Vec::new(),
        }
    }

    /// Adds a subject confirmation.
    #[must_use]
    pub fn with_confirmation(mut self, confirmation: SubjectConfirmation) -> Self {
        self.subject_confirmations.push(confirmation);
        self
    }

    fn to_element(&self) -> Element {
        self.subject_confirmations.iter().fold(
            Element::prefixed(prefixes::SAML, "Subject").with_child(self.name_id.to_element()),
            |element, confirmation| element.with_child(confirmation.to_element()),
        )
    }
}

/// Subject confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectConfirmation {
    /// The confirmation method.
    pub method: String,

    /// Additional confirmation data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_confirmation_data: Option<SubjectConfirmationData>,
}

impl SubjectConfirmation {
    /// Creates a bearer confirmation.
    #[must_use]
    pub fn bearer() -> Self {
        Self {
            method: confirmation_methods::BEARER.to_string(),
            subject_confirmation_data: None,
        }
    }

    /// Sets the confirmation data.
    #[must_use]
    pub fn with_data(mut self, data: SubjectConfirmationData) -> Self {
        self.subject_confirmation_data = Some(data);
        self
    }

    fn to_element(&self) -> Element {
        let element = Element::prefixed(prefixes::SAML, "SubjectConfirmation")
            .with_attr("Method", self.method.as_str());
        match &self.subject_confirmation_data {
            Some(data) => element.with_child(data.to_element()),
            None => element,
        }
    }
}

/// Subject confirmation data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectConfirmationData {
    /// Time after which the subject can no longer be confirmed.
    pub not_on_or_after: DateTime<Utc>,

    /// The location to which the assertion can be presented.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

impl SubjectConfirmationData {
    fn to_element(&self) -> Element {
        let mut element = Element::prefixed(prefixes::SAML, "SubjectConfirmationData")
            .with_attr("NotOnOrAfter", format_instant(self.not_on_or_after));
        if let Some(recipient) = &self.recipient {
            element.set_attr("Recipient", recipient.as_str());
        }
        element
    }
}

/// Conditions for assertion validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    /// Time before which the assertion is not valid.
    pub not_before: DateTime<Utc>,

    /// Time at or after which the assertion is not valid.
    pub not_on_or_after: DateTime<Utc>,

    /// Audience restriction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audiences: Vec<String>,
}

impl Conditions {
    /// Adds an audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audiences.push(audience.into());
        self
    }

    fn to_element(&self) -> Element {
        let mut element = Element::prefixed(prefixes::SAML, "Conditions")
            .with_attr("NotBefore", format_instant(self.not_before))
            .with_attr("NotOnOrAfter", format_instant(self.not_on_or_after));
        if !self.audiences.is_empty() {
            let mut restriction = Element::prefixed(prefixes::SAML, "AudienceRestriction");
            for audience in &self.audiences {
                let audience = Element::prefixed(prefixes::SAML, "Audience")
                    .with_text(audience.as_str());
                restriction = restriction.with_child(audience);
            }
            element = element.with_child(restriction);
        }
        element
    }
}

/// Authentication statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthnStatement {
    /// The time of authentication.
    pub authn_instant: DateTime<Utc>,

    /// The session index.
    pub session_index: String,

    /// Time at which the session ends.
    pub session_not_on_or_after: DateTime<Utc>,

    /// Authentication context class reference.
    pub authn_context_class_ref: String,
}

impl AuthnStatement {
    fn to_element(&self) -> Element {
        Element::prefixed(prefixes::SAML, "AuthnStatement")
            .with_attr("AuthnInstant", format_instant(self.authn_instant))
            .with_attr("SessionIndex", self.session_index.as_str())
            .with_attr(
                "SessionNotOnOrAfter",
                format_instant(self.session_not_on_or_after),
            )
            .with_child(
                Element::prefixed(prefixes::SAML, "AuthnContext").with_child(
                    Element::prefixed(prefixes::SAML, "AuthnContextClassRef")
                        .with_text(self.authn_context_class_ref.as_str()),
                ),
            )
    }
}

/// Attribute statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStatement {
    /// List of attributes.
    pub attributes: Vec<Attribute>,
}

impl AttributeStatement {
    /// Creates a new empty attribute statement.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Returns true if no attribute has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn to_element(&self) -> Element {
        self.attributes.iter().fold(
            Element::prefixed(prefixes::SAML, "AttributeStatement"),
            |element, attr| element.with_child(attr.to_element()),
        )
    }
}

/// SAML Attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// The attribute name (typically a URI).
    pub name: String,

    /// The format URI of the attribute name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_format: Option<String>,

    /// A human-readable name for the attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    /// The attribute values, rendered as `xs:string`.
    pub values: Vec<String>,
}

impl Attribute {
    /// Creates a new attribute with a single value.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_format: None,
            friendly_name: None,
            values: vec![value.into()],
        }
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the name format URI.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.name_format = Some(format.into());
        self
    }

    fn to_element(&self) -> Element {
        let mut element = Element::prefixed(prefixes::SAML, "Attribute");
        if let Some(friendly_name) = &self.friendly_name {
            element.set_attr("FriendlyName", friendly_name.as_str());
        }
        element.set_attr("Name", self.name.as_str());
        if let Some(format) = &self.name_format {
            element.set_attr("NameFormat", format.as_str());
        }

        self.values.iter().fold(element, |element, value| {
            element.with_child(
                Element::prefixed(prefixes::SAML, "AttributeValue")
                    .with_namespace(prefixes::XS, XS_NS)
                    .with_namespace(prefixes::XSI, XSI_NS)
                    .with_prefixed_attr(prefixes::XSI, "type", "xs:string")
                    .with_text(value.as_str()),
            )
        })
    }
}
