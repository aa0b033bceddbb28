//! In-memory XML tree.
//!
//! Elements keep their namespace declarations separate from ordinary
//! attributes so canonicalization can decide which declarations to render.

use std::collections::BTreeMap;

use super::XmlError;

/// Namespace prefix reserved by XML itself.
pub const XML_PREFIX: &str = "xml";

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data, unescaped.
    Text(String),
}

/// An attribute other than a namespace declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Prefix, if the attribute is namespace qualified.
    pub prefix: Option<String>,
    /// Local name.
    pub name: String,
    /// Unescaped value.
    pub value: String,
}

impl Attr {
    /// Returns `prefix:name` or `name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.name)
    }
}

/// An XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Prefix, if any.
    pub prefix: Option<String>,
    /// Local name.
    pub name: String,
    /// Namespace declarations made on this element, as `(prefix, uri)`.
    /// The default namespace uses the empty prefix.
    pub namespaces: Vec<(String, String)>,
    /// Attributes in document order.
    pub attributes: Vec<Attr>,
    /// Children in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with a prefix, e.g. `saml:Issuer`.
    pub fn prefixed(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new(name)
        }
    }

    /// Creates an unprefixed element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            prefix: None,
            name: name.into(),
            namespaces: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Declares a namespace on this element.
    #[must_use]
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.push((prefix.into(), uri.into()));
        self
    }

    /// Adds an unprefixed attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Adds an attribute with a prefix, e.g. `xsi:type`.
    #[must_use]
    pub fn with_prefixed_attr(
        mut self,
        prefix: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.push(Attr {
            prefix: Some(prefix.into()),
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Appends a text node.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Sets an unprefixed attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.prefix.is_none() && a.name == name)
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attr {
                prefix: None,
                name,
                value,
            }),
        }
    }

    /// Returns `prefix:name` or `name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.name)
    }

    /// Returns the value of an unprefixed attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.prefix.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Iterates over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Returns the first child element with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.name == name)
    }

    /// Returns the first child element with the given local name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    /// Returns the index in `children` of the first element with the given
    /// local name.
    #[must_use]
    pub fn child_position(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if e.name == name))
    }

    /// Concatenated text of the direct text children.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Returns a copy without the child elements matching `name`.
    #[must_use]
    pub fn without_children(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.children
            .retain(|n| !matches!(n, Node::Element(e) if e.name == name));
        copy
    }

    /// Depth-first search for the first element satisfying `pred`, returning
    /// it together with the namespaces in scope at its parent.
    #[must_use]
    pub fn find_with_scope<F>(&self, pred: F) -> Option<(&Element, NamespaceScope)>
    where
        F: Fn(&Element) -> bool + Copy,
    {
        self.find_inner(&NamespaceScope::default(), pred)
    }

    fn find_inner<F>(
        &self,
        inherited: &NamespaceScope,
        pred: F,
    ) -> Option<(&Element, NamespaceScope)>
    where
        F: Fn(&Element) -> bool + Copy,
    {
        if pred(self) {
            return Some((self, inherited.clone()));
        }
        let scope = inherited.enter(self);
        self.child_elements()
            .find_map(|child| child.find_inner(&scope, pred))
    }
}

/// Namespace bindings visible at some point in a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceScope {
    bindings: BTreeMap<String, String>,
}

impl NamespaceScope {
    /// Returns the scope inside `element`: this scope plus its declarations.
    #[must_use]
    pub fn enter(&self, element: &Element) -> Self {
        let mut next = self.clone();
        for (prefix, uri) in &element.namespaces {
            next.bindings.insert(prefix.clone(), uri.clone());
        }
        next
    }

    /// Adds a binding.
    #[must_use]
    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.bindings.insert(prefix.into(), uri.into());
        self
    }

    /// Resolves a prefix; `None` or `""` means the default namespace, which
    /// resolves to `""` when undeclared.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::UnboundPrefix`] for undeclared prefixes.
    pub fn resolve(&self, prefix: Option<&str>) -> Result<&str, XmlError> {
        match prefix {
            None | Some("") => Ok(self.bindings.get("").map_or("", String::as_str)),
            Some(p) => self
                .bindings
                .get(p)
                .map(String::as_str)
                .ok_or_else(|| XmlError::UnboundPrefix(p.to_string())),
        }
    }

    /// Returns the binding for `prefix`, if declared.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }
}

fn qualify(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}:{name}"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::prefixed("p", "Root")
            .with_namespace("p", "urn:p")
            .with_child(
                Element::prefixed("q", "Middle")
                    .with_namespace("q", "urn:q")
                    .with_child(Element::prefixed("q", "Leaf").with_attr("ID", "leaf")),
            )
    }

    #[test]
    fn find_with_scope_reports_inherited_bindings() {
        let root = sample();
        let (leaf, scope) = root
            .find_with_scope(|e| e.attr("ID") == Some("leaf"))
            .unwrap();
        assert_eq!(leaf.name, "Leaf");
        assert_eq!(scope.resolve(Some("p")).unwrap(), "urn:p");
        assert_eq!(scope.resolve(Some("q")).unwrap(), "urn:q");
        assert!(scope.resolve(Some("r")).is_err());
        assert_eq!(scope.resolve(None).unwrap(), "");
    }

    #[test]
    fn set_attr_replaces_existing_value() {
        let mut e = Element::new("a").with_attr("x", "1");
        e.set_attr("x", "2");
        assert_eq!(e.attributes.len(), 1);
        assert_eq!(e.attr("x"), Some("2"));
    }

    #[test]
    fn without_children_leaves_original_untouched() {
        let root = Element::new("a")
            .with_child(Element::new("b"))
            .with_text("t")
            .with_child(Element::new("c"));
        let pruned = root.without_children("b");
        assert_eq!(pruned.child_elements().count(), 1);
        assert_eq!(root.child_elements().count(), 2);
        assert_eq!(root.child_position("c"), Some(2));
    }
}
