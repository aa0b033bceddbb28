//! Compact serialization of an element tree.

use super::c14n::{escape_attr, escape_text};
use super::node::{Element, Node};

/// Serializes `element` without an XML declaration or added whitespace.
///
/// Declarations and attributes keep their tree order. Childless elements
/// are self-closed.
#[must_use]
pub fn to_string(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_element(element: &Element, out: &mut String) {
    let qname = element.qualified_name();
    out.push('<');
    out.push_str(&qname);

    for (prefix, uri) in &element.namespaces {
        out.push_str(" xmlns");
        if !prefix.is_empty() {
            out.push(':');
            out.push_str(prefix);
        }
        out.push_str("=\"");
        out.push_str(&escape_attr(uri));
        out.push('"');
    }
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.qualified_name());
        out.push_str("=\"");
        out.push_str(&escape_attr(&attr.value));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(e) => write_element(e, out),
        }
    }

    out.push_str("</");
    out.push_str(&qname);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_compact_markup() {
        let digest_method = Element::prefixed("ds", "DigestMethod")
            .with_attr("Algorithm", "urn:sha");
        let e = Element::prefixed("ds", "Reference")
            .with_namespace("ds", "urn:ds")
            .with_attr("URI", "#ID_1")
            .with_child(digest_method)
            .with_child(Element::prefixed("ds", "DigestValue").with_text("a+b="));
        assert_eq!(
            to_string(&e),
            concat!(
                r##"<ds:Reference xmlns:ds="urn:ds" URI="#ID_1">"##,
                r#"<ds:DigestMethod Algorithm="urn:sha"/>"#,
                "<ds:DigestValue>a+b=</ds:DigestValue>",
                "</ds:Reference>"
            )
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let e = Element::new("n").with_attr("a", "\"&").with_text("<&>");
        assert_eq!(to_string(&e), r#"<n a="&quot;&amp;">&lt;&amp;&gt;</n>"#);
    }
}
