//! SAML Name ID types.

use serde::{Deserialize, Serialize};

use super::{prefixes, NameIdFormat};
use crate::xml::Element;

/// SAML Name ID.
///
/// Represents the identifier of a subject in a SAML assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameId {
    /// The actual identifier value.
    pub value: String,

    /// The format URI of the name identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl NameId {
    /// Creates a new name ID with the given value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: None,
        }
    }

    /// Creates a new email name ID.
    #[must_use]
    pub fn email(email: impl Into<String>) -> Self {
        Self::new(email).with_format_uri(NameIdFormat::Email.uri())
    }

    /// Sets the format URI.
    #[must_use]
    pub fn with_format_uri(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Returns the parsed name ID format, defaulting to unspecified.
    #[must_use]
    pub fn parsed_format(&self) -> NameIdFormat {
        self.format
            .as_deref()
            .and_then(NameIdFormat::from_uri)
            .unwrap_or_default()
    }

    /// Renders `saml:NameID`.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::prefixed(prefixes::SAML, "NameID");
        if let Some(format) = &self.format {
            element.set_attr("Format", format.as_str());
        }
        element.with_text(self.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::writer;

    #[test]
    fn renders_format_and_value() {
        let format = NameIdFormat::Unspecified.uri();
        let name_id = NameId::new("alice@example.com").with_format_uri(format);
        assert_eq!(
            writer::to_string(&name_id.to_element()),
            r#"<saml:NameID Format="urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified">alice@example.com</saml:NameID>"#
        );
    }

    #[test]
    fn unknown_format_defaults_to_unspecified() {
        let name_id = NameId::new("x").with_format_uri("urn:example:custom");
        assert_eq!(name_id.parsed_format(), NameIdFormat::Unspecified);
        assert_eq!(NameId::email("a@b.c").parsed_format(), NameIdFormat::Email);
    }
}
