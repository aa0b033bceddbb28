//! SAML bindings.
//!
//! Only the HTTP-POST binding is provided: the response travels to the
//! service provider as a Base64 form field.

mod post;

pub use post::*;

/// Form parameter carrying a SAML response.
pub const SAML_RESPONSE_PARAM: &str = "SAMLResponse";

/// Form parameter carrying the relay state.
pub const RELAY_STATE_PARAM: &str = "RelayState";
