//! Attribute mapping: turns request values into SAML attributes.

use std::collections::HashSet;

use idp_core::{AttributeMapping, AttributeSource};

use super::{AssertionBuildError, AssertionRequest};
use crate::types::{Attribute, AttributeNameFormat};

/// Applies `mappings` to `request`, in order.
///
/// Mappings whose source value is empty produce no attribute.
///
/// # Errors
///
/// Returns [`AssertionBuildError::Mapping`] for a blank attribute name, an
/// unknown name format or a repeated attribute name.
pub fn map_attributes(
    mappings: &[AttributeMapping],
    request: &AssertionRequest,
) -> Result<Vec<Attribute>, AssertionBuildError> {
    let mut seen = HashSet::new();
    let mut attributes = Vec::with_capacity(mappings.len());

    for mapping in mappings {
        let name = mapping.name.trim();
        if name.is_empty() {
            return Err(AssertionBuildError::Mapping(
                "attribute name must not be empty".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(AssertionBuildError::Mapping(format!(
                "attribute {name} is mapped more than once"
            )));
        }
        let format = AttributeNameFormat::from_alias(&mapping.name_format).ok_or_else(|| {
            AssertionBuildError::Mapping(format!(
                "unknown name format {:?} for attribute {name}",
                mapping.name_format
            ))
        })?;

        let value = match mapping.source {
            AttributeSource::Role => &request.role_value,
            AttributeSource::SubjectIdentifier => &request.subject_identifier,
            AttributeSource::SessionDuration => &request.session_duration,
        };
        if value.is_empty() {
            tracing::trace!(attribute = name, "mapping produced no value");
            continue;
        }

        let mut attribute = Attribute::single(name, value.as_str()).with_format(format.uri());
        if let Some(friendly_name) = &mapping.friendly_name {
            attribute = attribute.with_friendly_name(friendly_name.as_str());
        }
        attributes.push(attribute);
    }

    Ok(attributes)
}
