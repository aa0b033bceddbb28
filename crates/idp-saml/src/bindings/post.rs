//! HTTP-POST binding.
//!
//! Wraps an encoded response in an HTML form that submits itself to the
//! service provider's assertion consumer service.

use base64::Engine;

use super::{RELAY_STATE_PARAM, SAML_RESPONSE_PARAM};
use crate::error::{SamlError, SamlResult};

/// HTTP-POST binding encoder/decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpPostBinding;

impl HttpPostBinding {
    /// Returns an auto-submitting HTML form posting `saml_response`, which
    /// must already be Base64 encoded, to `destination`.
    #[must_use]
    pub fn encode_response(
        saml_response: &str,
        destination: &str,
        relay_state: Option<&str>,
    ) -> String {
        let relay_state_input = relay_state
            .map(|rs| {
                format!(
                    r#"<input type="hidden" name="{RELAY_STATE_PARAM}" value="{}"/>"#,
                    html_escape(rs)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Signing in</title>
</head>
<body onload="document.forms[0].submit()">
    <noscript>
        <p>JavaScript is disabled. Click the button below to continue.</p>
    </noscript>
    <form method="post" action="{}">
        <input type="hidden" name="{SAML_RESPONSE_PARAM}" value="{}"/>
        {}
        <noscript>
            <input type="submit" value="Continue"/>
        </noscript>
    </form>
</body>
</html>"#,
            html_escape(destination),
            html_escape(saml_response),
            relay_state_input
        )
    }

    /// Decodes a `SAMLResponse` form value back into XML.
    ///
    /// Whitespace inside the value is ignored, as some senders wrap lines.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Base64Decode`] for invalid Base64 and
    /// [`SamlError::InvalidMessage`] for non-UTF-8 content.
    pub fn decode(saml_response: &str) -> SamlResult<String> {
        let compact: String = saml_response.split_whitespace().collect();
        let decoded = base64::engine::general_purpose::STANDARD.decode(compact)?;
        String::from_utf8(decoded)
            .map_err(|e| SamlError::InvalidMessage(format!("not UTF-8: {e}")))
    }
}

/// Escapes HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_value<'a>(html: &'a str, name: &str) -> &'a str {
        let marker = format!("name=\"{name}\" value=\"");
        let start = html.find(&marker).unwrap() + marker.len();
        let end = html[start..].find('"').unwrap();
        &html[start..start + end]
    }

    #[test]
    fn form_carries_response_and_relay_state() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("<samlp:Response/>");
        let html = HttpPostBinding::encode_response(
            &encoded,
            "https://signin.aws.amazon.com/saml",
            Some("https://console.aws.amazon.com/connect?a=1&b=2"),
        );

        let action = r#"action="https://signin.aws.amazon.com/saml""#;
        assert!(html.contains(action));
        assert_eq!(field_value(&html, "SAMLResponse"), encoded);
        assert_eq!(
            field_value(&html, "RelayState"),
            "https://console.aws.amazon.com/connect?a=1&amp;b=2"
        );
        assert_eq!(
            HttpPostBinding::decode(field_value(&html, "SAMLResponse")).unwrap(),
            "<samlp:Response/>"
        );
    }

    #[test]
    fn relay_state_is_optional() {
        let html = HttpPostBinding::encode_response("UEs=", "https://sp.example.com", None);
        assert!(!html.contains("RelayState"));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            HttpPostBinding::decode("not base64!"),
            Err(SamlError::Base64Decode(_))
        ));
        assert!(matches!(
            HttpPostBinding::decode("/w=="),
            Err(SamlError::InvalidMessage(_))
        ));
    }

    #[test]
    fn decode_ignores_line_breaks() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("<a>text</a>");
        let wrapped = format!("{}\n{}", &encoded[..8], &encoded[8..]);
        assert_eq!(HttpPostBinding::decode(&wrapped).unwrap(), "<a>text</a>");
    }

    #[test]
    fn html_escape_special_chars() {
        let escaped = html_escape(r#"<script>alert("xss")</script>"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(!escaped.contains('"'));
    }
}
