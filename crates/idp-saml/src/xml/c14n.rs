//! Exclusive XML Canonicalization 1.0, without comments.
//!
//! Only the namespace declarations an element visibly uses are rendered,
//! and only when the nearest rendered ancestor did not already render the
//! same binding. Attributes are ordered by namespace URI, then local name.
//! Empty elements are written as start/end pairs.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::node::{Element, NamespaceScope, Node, XML_PREFIX};
use super::XmlError;

/// Exclusive C14N algorithm URI.
pub const EXCLUSIVE_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// Canonicalizes `element` as the apex of a document subset.
///
/// `inherited` holds the bindings in scope at the element's parent, so
/// prefixes declared on ancestors still resolve.
///
/// # Errors
///
/// Returns [`XmlError::UnboundPrefix`] when a used prefix has no binding.
pub fn canonicalize(element: &Element, inherited: &NamespaceScope) -> Result<String, XmlError> {
    let mut out = String::new();
    render(element, inherited, &NamespaceScope::default(), &mut out)?;
    Ok(out)
}

fn render(
    element: &Element,
    inherited: &NamespaceScope,
    rendered: &NamespaceScope,
    out: &mut String,
) -> Result<(), XmlError> {
    let scope = inherited.enter(element);

    let mut used = BTreeSet::new();
    used.insert(element.prefix.clone().unwrap_or_default());
    for attr in &element.attributes {
        if let Some(prefix) = &attr.prefix {
            used.insert(prefix.clone());
        }
    }

    let mut now_rendered = rendered.clone();
    let mut declarations = Vec::new();
    for prefix in used {
        if prefix == XML_PREFIX {
            continue;
        }
        let uri = scope.resolve(Some(prefix.as_str()))?.to_string();
        let previous = rendered.get(&prefix).unwrap_or("");
        if prefix.is_empty() {
            // xmlns="" only undoes a rendered non-empty default.
            if uri != previous {
                declarations.push((prefix.clone(), uri.clone()));
                now_rendered = now_rendered.with(prefix, uri);
            }
        } else if rendered.get(&prefix) != Some(uri.as_str()) {
            declarations.push((prefix.clone(), uri.clone()));
            now_rendered = now_rendered.with(prefix, uri);
        }
    }

    let mut attrs = Vec::with_capacity(element.attributes.len());
    for attr in &element.attributes {
        let uri = match attr.prefix.as_deref() {
            None => "",
            Some(XML_PREFIX) => "http://www.w3.org/XML/1998/namespace",
            Some(p) => scope.resolve(Some(p))?,
        };
        attrs.push((
            uri,
            attr.name.as_str(),
            attr.qualified_name(),
            attr.value.as_str(),
        ));
    }
    attrs.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    let qname = element.qualified_name();
    out.push('<');
    out.push_str(&qname);
    for (prefix, uri) in &declarations {
        if prefix.is_empty() {
            let _ = write!(out, " xmlns=\"{}\"", escape_attr(uri));
        } else {
            let _ = write!(out, " xmlns:{prefix}=\"{}\"", escape_attr(uri));
        }
    }
    for (_, _, name, value) in &attrs {
        let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
    }
    out.push('>');

    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(e) => render(e, &scope, &now_rendered, out)?,
        }
    }

    out.push_str("</");
    out.push_str(&qname);
    out.push('>');
    Ok(())
}

/// Escapes character data.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes an attribute value.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_declarations_are_dropped() {
        let e = Element::prefixed("a", "Root")
            .with_namespace("a", "urn:a")
            .with_namespace("b", "urn:b")
            .with_child(Element::prefixed("a", "Child"));
        assert_eq!(
            canonicalize(&e, &NamespaceScope::default()).unwrap(),
            r#"<a:Root xmlns:a="urn:a"><a:Child></a:Child></a:Root>"#
        );
    }

    #[test]
    fn inherited_prefix_is_declared_on_apex() {
        let scope = NamespaceScope::default().with("saml", "urn:saml");
        let e = Element::prefixed("saml", "Issuer").with_text("me");
        assert_eq!(
            canonicalize(&e, &scope).unwrap(),
            r#"<saml:Issuer xmlns:saml="urn:saml">me</saml:Issuer>"#
        );
    }

    #[test]
    fn declaration_moves_to_first_visible_use() {
        let e = Element::prefixed("a", "Root")
            .with_namespace("a", "urn:a")
            .with_namespace("b", "urn:b")
            .with_child(Element::prefixed("b", "X"))
            .with_child(Element::prefixed("b", "Y"));
        assert_eq!(
            canonicalize(&e, &NamespaceScope::default()).unwrap(),
            concat!(
                r#"<a:Root xmlns:a="urn:a">"#,
                r#"<b:X xmlns:b="urn:b"></b:X>"#,
                r#"<b:Y xmlns:b="urn:b"></b:Y>"#,
                "</a:Root>"
            )
        );
    }

    #[test]
    fn attributes_sort_by_namespace_then_name() {
        let e = Element::new("e")
            .with_namespace("z", "urn:a")
            .with_namespace("y", "urn:b")
            .with_prefixed_attr("y", "attr", "3")
            .with_prefixed_attr("z", "attr", "2")
            .with_attr("b", "1")
            .with_attr("a", "0");
        assert_eq!(
            canonicalize(&e, &NamespaceScope::default()).unwrap(),
            r#"<e xmlns:y="urn:b" xmlns:z="urn:a" a="0" b="1" z:attr="2" y:attr="3"></e>"#
        );
    }

    #[test]
    fn prefix_used_only_in_attribute_value_is_not_rendered() {
        let e = Element::prefixed("saml", "AttributeValue")
            .with_namespace("saml", "urn:saml")
            .with_namespace("xs", "http://www.w3.org/2001/XMLSchema")
            .with_namespace("xsi", "http://www.w3.org/2001/XMLSchema-instance")
            .with_prefixed_attr("xsi", "type", "xs:string")
            .with_text("v");
        assert_eq!(
            canonicalize(&e, &NamespaceScope::default()).unwrap(),
            concat!(
                r#"<saml:AttributeValue xmlns:saml="urn:saml" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="xs:string">"#,
                "v</saml:AttributeValue>"
            )
        );
    }

    #[test]
    fn default_namespace_is_undone_only_when_rendered() {
        let e = Element::new("outer")
            .with_namespace("", "urn:d")
            .with_child(Element::new("inner").with_namespace("", ""));
        assert_eq!(
            canonicalize(&e, &NamespaceScope::default()).unwrap(),
            r#"<outer xmlns="urn:d"><inner xmlns=""></inner></outer>"#
        );

        let plain = Element::new("outer").with_child(Element::new("inner"));
        assert_eq!(
            canonicalize(&plain, &NamespaceScope::default()).unwrap(),
            "<outer><inner></inner></outer>"
        );
    }

    #[test]
    fn special_characters_are_escaped() {
        let e = Element::new("e")
            .with_attr("v", "a<b&\"c\"\t\n")
            .with_text("x > y & z\r");
        assert_eq!(
            canonicalize(&e, &NamespaceScope::default()).unwrap(),
            r#"<e v="a&lt;b&amp;&quot;c&quot;&#x9;&#xA;">x &gt; y &amp; z&#xD;</e>"#
        );
    }

    #[test]
    fn unbound_prefix_is_an_error() {
        let e = Element::prefixed("nope", "E");
        assert!(matches!(
            canonicalize(&e, &NamespaceScope::default()),
            Err(XmlError::UnboundPrefix(p)) if p == "nope"
        ));
    }
}
