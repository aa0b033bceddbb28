//! IdP metadata.
//!
//! Generates the static SAML 2.0 metadata document used to register this
//! identity provider with a service provider.

use idp_core::SamlProfile;
use idp_crypto::KeyMaterial;

use crate::types::{prefixes, SamlBinding, MD_NS, SAMLP_NS, XMLDSIG_NS};
use crate::xml::{writer, Element};

/// IdP metadata renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdpMetadata;

impl IdpMetadata {
    /// Builds the `md:EntityDescriptor` for `profile`.
    ///
    /// `sso_url` is where the service provider sends users to sign in.
    #[must_use]
    pub fn element(profile: &SamlProfile, key: &KeyMaterial, sso_url: &str) -> Element {
        let key_descriptor = md("KeyDescriptor").with_attr("use", "signing").with_child(
            Element::prefixed(prefixes::DS, "KeyInfo")
                .with_namespace(prefixes::DS, XMLDSIG_NS)
                .with_child(
                    Element::prefixed(prefixes::DS, "X509Data").with_child(
                        Element::prefixed(prefixes::DS, "X509Certificate")
                            .with_text(key.certificate().to_base64()),
                    ),
                ),
        );

        let name_id_format = profile.name_id_format.as_str();
        let descriptor = md("IDPSSODescriptor")
            .with_attr("WantAuthnRequestsSigned", "false")
            .with_attr("protocolSupportEnumeration", SAMLP_NS)
            .with_child(key_descriptor)
            .with_child(md("NameIDFormat").with_text(name_id_format))
            .with_child(
                md("SingleSignOnService")
                    .with_attr("Binding", SamlBinding::HttpPost.uri())
                    .with_attr("Location", sso_url),
            );

        md("EntityDescriptor")
            .with_namespace(prefixes::MD, MD_NS)
            .with_attr("entityID", profile.issuer.as_str())
            .with_child(descriptor)
    }

    /// Renders the metadata document, with an XML declaration.
    #[must_use]
    pub fn render(profile: &SamlProfile, key: &KeyMaterial, sso_url: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
            writer::to_string(&Self::element(profile, key, sso_url))
        )
    }
}

fn md(name: &str) -> Element {
    Element::prefixed(prefixes::MD, name)
}
