//! Construction of unsigned SAML responses.
//!
//! [`AssertionDocumentBuilder`] turns an [`AssertionRequest`] into an
//! [`UnsignedDocument`] using the immutable [`SamlProfile`] it was created
//! with. Time and identifiers come from injectable sources so tests can
//! pin them.

mod clock;
mod ids;
mod mapper;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{IdGenerator, SequenceIdGenerator, UuidIdGenerator, ID_PREFIX};
pub use mapper::map_attributes;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use idp_core::SamlProfile;
use thiserror::Error;

use crate::document::UnsignedDocument;
use crate::types::{
    Assertion, AttributeStatement, AuthnStatement, Conditions, NameId, Response, Subject,
    SubjectConfirmation, SubjectConfirmationData,
};

/// Errors raised while building the unsigned document.
#[derive(Debug, Error)]
pub enum AssertionBuildError {
    /// An attribute mapping is unusable.
    #[error("attribute mapping error: {0}")]
    Mapping(String),

    /// A required request value is blank.
    #[error("missing value: {0}")]
    MissingValue(&'static str),

    /// A timestamp offset overflowed the representable range.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),
}

/// Input for one assertion: exactly one subject, role and session duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionRequest {
    /// NameID value, usually an email address.
    pub subject_identifier: String,
    /// Role value passed through verbatim, typically `roleArn,providerArn`.
    pub role_value: String,
    /// Session duration in seconds, as a decimal string.
    pub session_duration: String,
}

impl AssertionRequest {
    /// Creates a request.
    pub fn new(
        subject_identifier: impl Into<String>,
        role_value: impl Into<String>,
        session_duration: impl Into<String>,
    ) -> Self {
        Self {
            subject_identifier: subject_identifier.into(),
            role_value: role_value.into(),
            session_duration: session_duration.into(),
        }
    }
}

/// Builds unsigned response documents for one profile.
#[derive(Debug, Clone)]
pub struct AssertionDocumentBuilder {
    profile: Arc<SamlProfile>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl AssertionDocumentBuilder {
    /// Creates a builder using the wall clock and random UUID identifiers.
    #[must_use]
    pub fn new(profile: Arc<SamlProfile>) -> Self {
        Self {
            profile,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidIdGenerator),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the identifier source.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// The profile documents are built against.
    #[must_use]
    pub fn profile(&self) -> &SamlProfile {
        &self.profile
    }

    /// Builds the unsigned response for `request`.
    ///
    /// The clock is read once; every timestamp in the document is a fixed
    /// offset from that instant.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionBuildError`] for blank request values, unusable
    /// attribute mappings or timestamp overflow.
    pub fn build(
        &self,
        request: &AssertionRequest,
    ) -> Result<UnsignedDocument, AssertionBuildError> {
        if request.subject_identifier.trim().is_empty() {
            return Err(AssertionBuildError::MissingValue("subject identifier"));
        }
        if request.role_value.trim().is_empty() {
            return Err(AssertionBuildError::MissingValue("role"));
        }

        let profile = &*self.profile;
        let windows = &profile.windows;
        let attributes = map_attributes(&profile.attributes, request)?;

        let now = self.clock.now();
        let not_before = offset(now, -i64::from(windows.clock_skew_secs))?;
        let assertion_expiry = offset(now, i64::from(windows.assertion_secs))?;
        let subject_expiry = offset(now, i64::from(windows.subject_confirmation_secs))?;
        let session_expiry = offset(now, i64::from(windows.session_secs))?;

        let response_id = self.ids.next_id();
        let assertion_id = self.ids.next_id();

        let name_id = NameId::new(request.subject_identifier.as_str())
            .with_format_uri(profile.name_id_format.as_str());
        let confirmation_data = SubjectConfirmationData {
            not_on_or_after: subject_expiry,
            recipient: Some(profile.destination.clone()),
        };
        let subject = Subject::new(name_id)
            .with_confirmation(SubjectConfirmation::bearer().with_data(confirmation_data));

        let conditions = Conditions {
            not_before,
            not_on_or_after: assertion_expiry,
            audiences: Vec::new(),
        }
        .with_audience(profile.audience.as_str());

        let authn_statement = AuthnStatement {
            authn_instant: now,
            session_index: assertion_id.clone(),
            session_not_on_or_after: session_expiry,
            authn_context_class_ref: profile.authn_context_class.clone(),
        };

        let mut statement = AttributeStatement::new();
        for attribute in attributes {
            statement = statement.with_attribute(attribute);
        }

        let assertion = Assertion {
            id: assertion_id.clone(),
            issue_instant: now,
            issuer: profile.issuer.clone(),
            subject,
            conditions,
            authn_statement,
            attribute_statement: (!statement.is_empty()).then_some(statement),
        };

        let response = Response::success(response_id.as_str(), now, profile.issuer.as_str())
            .with_destination(profile.destination.as_str())
            .with_assertion(assertion);

        tracing::debug!(
            response_id = %response_id,
            assertion_id = %assertion_id,
            issued_at = %now,
            "built unsigned response"
        );

        let document = UnsignedDocument::new(response.to_element(), response_id, assertion_id, now);
        Ok(document)
    }
}

fn offset(instant: DateTime<Utc>, seconds: i64) -> Result<DateTime<Utc>, AssertionBuildError> {
    let message = || format!("{instant} offset by {seconds}s is out of range");
    instant
        .checked_add_signed(Duration::seconds(seconds))
        .ok_or_else(|| AssertionBuildError::Timestamp(message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{format_instant, parse_instant};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_696_197_601_058).unwrap()
    }

    fn builder() -> AssertionDocumentBuilder {
        AssertionDocumentBuilder::new(Arc::new(SamlProfile::default()))
            .with_clock(Arc::new(FixedClock(fixed_now())))
            .with_id_generator(Arc::new(SequenceIdGenerator::new("ID_test_")))
    }

    fn request() -> AssertionRequest {
        AssertionRequest::new("alice@example.com", "arn:role,arn:provider", "3600")
    }

    #[test]
    fn builds_response_with_assertion() {
        let doc = builder().build(&request()).unwrap();
        assert_eq!(doc.response_id(), "ID_test_1");
        assert_eq!(doc.assertion_id(), "ID_test_2");
        assert_eq!(doc.issued_at(), fixed_now());

        let root = doc.root();
        assert_eq!(root.qualified_name(), "samlp:Response");
        assert_eq!(
            root.attr("Destination"),
            Some("https://signin.aws.amazon.com/saml")
        );

        let assertion = root.child("Assertion").unwrap();
        assert_eq!(assertion.attr("ID"), Some("ID_test_2"));
        let names: Vec<_> = assertion
            .child_elements()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "Issuer",
                "Subject",
                "Conditions",
                "AuthnStatement",
                "AttributeStatement",
            ]
        );
        assert!(assertion.child("Signature").is_none());
    }

    #[test]
    fn timestamps_are_offsets_of_one_instant() {
        let doc = builder().build(&request()).unwrap();
        let assertion = doc.root().child("Assertion").unwrap();

        let conditions = assertion.child("Conditions").unwrap();
        assert_eq!(
            conditions.attr("NotBefore"),
            Some("2023-10-01T21:59:59.058Z")
        );
        assert_eq!(
            conditions.attr("NotOnOrAfter"),
            Some("2023-10-01T22:01:01.058Z")
        );

        let authn = assertion.child("AuthnStatement").unwrap();
        let instant = format_instant(fixed_now());
        assert_eq!(authn.attr("AuthnInstant"), Some(instant.as_str()));
        assert_eq!(authn.attr("SessionIndex"), Some("ID_test_2"));
        let session = parse_instant(authn.attr("SessionNotOnOrAfter").unwrap()).unwrap();
        assert_eq!(session - fixed_now(), Duration::seconds(36_000));

        let data = assertion
            .child("Subject")
            .and_then(|s| s.child("SubjectConfirmation"))
            .and_then(|c| c.child("SubjectConfirmationData"))
            .unwrap();
        assert_eq!(data.attr("NotOnOrAfter"), Some("2023-10-01T22:05:01.058Z"));
        assert_eq!(
            data.attr("Recipient"),
            Some("https://signin.aws.amazon.com/saml")
        );
    }

    #[test]
    fn blank_subject_or_role_is_rejected() {
        let mut req = request();
        req.subject_identifier = "  ".to_string();
        assert!(matches!(
            builder().build(&req),
            Err(AssertionBuildError::MissingValue("subject identifier"))
        ));

        let mut req = request();
        req.role_value = String::new();
        assert!(matches!(
            builder().build(&req),
            Err(AssertionBuildError::MissingValue("role"))
        ));
    }

    #[test]
    fn empty_attribute_statement_is_omitted() {
        let profile = SamlProfile::default().with_attributes(Vec::new());
        let doc = AssertionDocumentBuilder::new(Arc::new(profile))
            .with_clock(Arc::new(FixedClock(fixed_now())))
            .build(&request())
            .unwrap();
        let assertion = doc.root().child("Assertion").unwrap();
        assert!(assertion.child("AttributeStatement").is_none());
    }

    #[test]
    fn overflowing_window_is_a_timestamp_error() {
        let late = DateTime::<Utc>::MAX_UTC;
        let result = AssertionDocumentBuilder::new(Arc::new(SamlProfile::default()))
            .with_clock(Arc::new(FixedClock(late)))
            .build(&request());
        assert!(matches!(result, Err(AssertionBuildError::Timestamp(_))));
    }
}
