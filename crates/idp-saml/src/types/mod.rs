//! SAML 2.0 types and data structures.
//!
//! The typed model of a response and its assertion. Each type renders
//! itself into an [`Element`](crate::xml::Element) tree.

mod assertion;
mod constants;
mod name_id;
mod response;
mod status;

pub use assertion::*;
pub use constants::*;
pub use name_id::*;
pub use response::*;
pub use status::*;

use chrono::{DateTime, NaiveDateTime, Utc};

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats an instant as `xs:dateTime` in UTC with millisecond precision.
#[must_use]
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

/// Parses an `xs:dateTime` rendered by [`format_instant`] or any RFC 3339
/// timestamp.
#[must_use]
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, INSTANT_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}
