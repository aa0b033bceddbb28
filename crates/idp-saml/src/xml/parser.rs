//! Parses XML text into an [`Element`] tree with quick-xml.
//!
//! Comments, processing instructions and the XML declaration are dropped;
//! they play no part in exclusive canonicalization without comments.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::node::{Attr, Element, Node};
use super::XmlError;

/// Parses a document and returns its root element.
///
/// # Errors
///
/// Returns [`XmlError::Parse`] for syntax errors and
/// [`XmlError::Malformed`] for structural problems such as a missing root.
pub fn parse(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Parse(e.to_string()))?;
        match event {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unexpected end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| XmlError::Parse(e.to_string()))?;
                push_text(&mut stack, text)?;
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                let text = std::str::from_utf8(&raw)
                    .map_err(|e| XmlError::Parse(e.to_string()))?
                    .to_string();
                push_text(&mut stack, Cow::Owned(text))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Malformed("unclosed element".to_string()));
    }
    root.ok_or_else(|| XmlError::Malformed("no root element".to_string()))
}

fn start_element(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let qname = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| XmlError::Parse(e.to_string()))?
        .to_string();
    let (prefix, name) = split_qname(&qname);
    let mut element = Element {
        prefix,
        name,
        namespaces: Vec::new(),
        attributes: Vec::new(),
        children: Vec::new(),
    };

    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Parse(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| XmlError::Parse(e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Parse(e.to_string()))?
            .into_owned();

        if key == "xmlns" {
            element.namespaces.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            element.namespaces.push((prefix.to_string(), value));
        } else {
            let (prefix, name) = split_qname(&key);
            element.attributes.push(Attr {
                prefix,
                name,
                value,
            });
        }
    }

    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_some() {
        return Err(XmlError::Malformed("multiple root elements".to_string()));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: Cow<'_, str>) -> Result<(), XmlError> {
    let Some(parent) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(XmlError::Malformed(
            "text outside the root element".to_string(),
        ));
    };
    if let Some(Node::Text(existing)) = parent.children.last_mut() {
        existing.push_str(&text);
    } else {
        parent.children.push(Node::Text(text.into_owned()));
    }
    Ok(())
}

fn split_qname(qname: &str) -> (Option<String>, String) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
        None => (None, qname.to_string()),
    }
}
