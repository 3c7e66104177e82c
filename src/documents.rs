//! XML element tree
//!
//! This module provides the owned element tree that element classes are
//! layered on: attribute get/set/delete, child lookup by prefixed tag,
//! positional insertion and removal, parsing from text and pretty
//! serialization. A child is owned by exactly one parent; moving it to
//! another parent means removing it first.

use crate::comparison::XmlString;
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::split_qname;
use crate::namespaces::{namespace_for_prefix, prefix_for_namespace, qn, NamespaceContext, QName};
use crate::registry::lookup_element_cls;
use crate::xmlchemy::ElementClass;
use crate::XML_NAMESPACE;
use indexmap::IndexMap;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// True when `qname` is the name spelled by the prefixed `tag`
///
/// A prefix missing from the well-known namespace table matches nothing.
pub(crate) fn tag_matches(qname: &QName, tag: &str) -> bool {
    match split_qname(tag) {
        (Some(prefix), local) => {
            qname.local_name == local
                && namespace_for_prefix(prefix).is_some_and(|uri| qname.namespace() == Some(uri))
        }
        (None, local) => qname.namespace.is_none() && qname.local_name == local,
    }
}

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element qualified name
    qname: QName,
    /// Element attributes, in document order
    attributes: IndexMap<QName, String>,
    /// Text content (if any)
    text: Option<String>,
    /// Text following this element inside its parent (if any)
    tail: Option<String>,
    /// Child elements
    children: Vec<Element>,
    /// Namespace declarations made on this element
    namespaces: NamespaceContext,
    /// Element class registered for the tag when this element was created
    class: Option<&'static ElementClass>,
}

impl Element {
    /// Create a new element, typed by the registry if its tag is registered
    pub fn new(qname: QName) -> Self {
        let class = lookup_element_cls(&qname);
        Self {
            qname,
            attributes: IndexMap::new(),
            text: None,
            tail: None,
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
            class,
        }
    }

    /// Create a new element declaring `namespaces`
    pub fn with_namespaces(qname: QName, namespaces: NamespaceContext) -> Self {
        let mut element = Self::new(qname);
        element.namespaces = namespaces;
        element
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Element qualified name
    pub fn tag(&self) -> &QName {
        &self.qname
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace()
    }

    /// True when this element's tag is the prefixed `tag`, e.g. `"a:off"`
    pub fn is(&self, tag: &str) -> bool {
        tag_matches(&self.qname, tag)
    }

    /// Namespace declarations made on this element
    pub fn namespaces(&self) -> &NamespaceContext {
        &self.namespaces
    }

    /// Element class this element was created as, if its tag is registered
    pub fn class(&self) -> Option<&'static ElementClass> {
        self.class
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Get an attribute value by prefixed or local name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(qname, _)| tag_matches(qname, name))
            .map(|(_, value)| value.as_str())
    }

    /// Get an attribute value by qualified name
    pub fn get_qname(&self, qname: &QName) -> Option<&str> {
        self.attributes.get(qname).map(|s| s.as_str())
    }

    /// Set an attribute by prefixed or local name
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let qname = qn(name)?;
        self.set_qname(qname, value);
        Ok(())
    }

    /// Set an attribute by qualified name
    pub fn set_qname(&mut self, qname: QName, value: impl Into<String>) {
        self.attributes.insert(qname, value.into());
    }

    /// Remove an attribute, returning its former value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let key = self
            .attributes
            .keys()
            .find(|qname| tag_matches(qname, name))
            .cloned()?;
        self.attributes.shift_remove(&key)
    }

    /// True when the attribute is present
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&QName, &str)> {
        self.attributes.iter().map(|(k, v)| (k, v.as_str()))
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Text content, if any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Clear text content
    pub fn clear_text(&mut self) {
        self.text = None;
    }

    /// Text following this element, before its next sibling
    pub fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    /// Set the text following this element
    pub fn set_tail(&mut self, tail: impl Into<String>) {
        self.tail = Some(tail.into());
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Child elements in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Child elements in document order, mutably
    pub fn children_mut(&mut self) -> &mut [Element] {
        &mut self.children
    }

    /// Append a child, returning it
    pub fn append(&mut self, child: Element) -> &mut Element {
        let index = self.children.len();
        self.insert(index, child)
    }

    /// Insert a child at `index` (clamped to the child count), returning it
    pub fn insert(&mut self, index: usize, child: Element) -> &mut Element {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        &mut self.children[index]
    }

    /// Detach and return the child at `index`
    pub fn remove(&mut self, index: usize) -> Option<Element> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// First child with the prefixed `tag`
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.is(tag))
    }

    /// First child with the prefixed `tag`, mutably
    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|child| child.is(tag))
    }

    /// Every child with the prefixed `tag`, in document order
    pub fn findall(&self, tag: &str) -> Vec<&Element> {
        self.children.iter().filter(|child| child.is(tag)).collect()
    }

    /// Every child with the prefixed `tag`, mutably
    pub fn findall_mut(&mut self, tag: &str) -> Vec<&mut Element> {
        self.children.iter_mut().filter(|child| child.is(tag)).collect()
    }

    /// Index of the first child with the prefixed `tag`
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.children.iter().position(|child| child.is(tag))
    }

    // =========================================================================
    // Element class primitives
    // =========================================================================

    /// First child, in document order, whose tag is any of `tags`
    pub fn first_child_found_in(&self, tags: &[&str]) -> Option<&Element> {
        self.first_index_found_in(tags).map(|i| &self.children[i])
    }

    fn first_index_found_in(&self, tags: &[&str]) -> Option<usize> {
        self.children
            .iter()
            .position(|child| tags.iter().any(|tag| child.is(tag)))
    }

    /// Insert `elm` before the first child found in `tags`, or append it
    /// when there is none. Returns the inserted element.
    pub fn insert_element_before(&mut self, elm: Element, tags: &[&str]) -> &mut Element {
        match self.first_index_found_in(tags) {
            Some(index) => {
                tracing::trace!(
                    parent = %self.qname,
                    child = %elm.qname,
                    index,
                    "inserting before successor"
                );
                self.insert(index, elm)
            }
            None => self.append(elm),
        }
    }

    /// Remove all child elements having the prefixed `tag`
    pub fn remove_all(&mut self, tag: &str) {
        self.children.retain(|child| !child.is(tag));
    }

    /// For each tag in `tags`, remove the first child having it, if any
    pub fn remove_if_present(&mut self, tags: &[&str]) {
        for tag in tags {
            if let Some(index) = self.position(tag) {
                self.children.remove(index);
            }
        }
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize to XML text, pretty printed, without an XML declaration
    pub fn serialize(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        let mut scope = Scope::default();
        self.write_to(&mut writer, &mut scope)?;
        let mut xml = String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| Error::Xml(format!("Serialized XML is not UTF-8: {}", e)))?;
        xml.push('\n');
        Ok(xml)
    }

    /// XML text for this element, suitable for testing and diagnostics
    pub fn xml(&self) -> Result<XmlString> {
        self.serialize().map(XmlString::from)
    }

    fn write_to(&self, writer: &mut Writer<Cursor<Vec<u8>>>, scope: &mut Scope) -> Result<()> {
        let mut decls: Vec<(Option<String>, String)> = Vec::new();
        if let Some(uri) = self.namespaces.get_default_namespace() {
            if scope.lookup(None) != Some(uri) {
                decls.push((None, uri.to_string()));
            }
        }
        for (prefix, uri) in self.namespaces.prefixes() {
            if prefix != "xml" && scope.lookup(Some(prefix)) != Some(uri) {
                decls.push((Some(prefix.to_string()), uri.to_string()));
            }
        }
        let mark = scope.push(&decls);

        let name = scope.element_name(&self.qname, &mut decls);
        let mut attrs = Vec::with_capacity(self.attributes.len());
        for (qname, value) in &self.attributes {
            attrs.push((scope.attribute_name(qname, &mut decls), value.as_str()));
        }

        let mut start = BytesStart::new(name.as_str());
        for (prefix, uri) in &decls {
            match prefix {
                Some(prefix) => start.push_attribute((format!("xmlns:{}", prefix).as_str(), uri.as_str())),
                None => start.push_attribute(("xmlns", uri.as_str())),
            }
        }
        for (attr_name, value) in &attrs {
            start.push_attribute((attr_name.as_str(), *value));
        }

        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            if let Some(text) = &self.text {
                writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
            }
            for child in &self.children {
                child.write_to(writer, scope)?;
                if let Some(tail) = &child.tail {
                    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(tail))))?;
                }
            }
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }

        scope.truncate(mark);
        Ok(())
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Parse XML text into an element tree using the default limits
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse XML text into an element tree
    pub fn parse_with_limits(xml: &str, limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;
        let doc = roxmltree::Document::parse(xml)?;
        Self::from_node(doc.root_element(), None, limits, 1)
    }

    fn from_node(
        node: roxmltree::Node<'_, '_>,
        parent: Option<roxmltree::Node<'_, '_>>,
        limits: &Limits,
        depth: usize,
    ) -> Result<Self> {
        limits.check_xml_depth(depth)?;

        let tag = node.tag_name();
        let mut element = Element::new(QName::new(tag.namespace(), tag.name()));

        for ns in node.namespaces() {
            if ns.name() == Some("xml") {
                continue;
            }
            let inherited = parent.is_some_and(|p| {
                p.namespaces()
                    .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
            });
            if inherited {
                continue;
            }
            match ns.name() {
                Some(prefix) => element.namespaces.add_prefix(prefix, ns.uri()),
                None => element.namespaces.set_default_namespace(ns.uri()),
            }
        }

        let attributes: Vec<_> = node.attributes().collect();
        limits.check_attributes(attributes.len())?;
        for attr in attributes {
            element.set_qname(QName::new(attr.namespace(), attr.name()), attr.value());
        }

        let mut text = String::new();
        for child in node.children() {
            if child.is_element() {
                let child = Self::from_node(child, Some(node), limits, depth + 1)?;
                element.children.push(child);
            } else if child.is_text() {
                let chunk = child.text().unwrap_or_default();
                match element.children.last_mut() {
                    Some(prev) => prev.tail.get_or_insert_with(String::new).push_str(chunk),
                    None => text.push_str(chunk),
                }
            }
        }
        element.text = Self::kept_text(text, limits);
        for child in &mut element.children {
            child.tail = child.tail.take().and_then(|tail| Self::kept_text(tail, limits));
        }

        Ok(element)
    }

    fn kept_text(text: String, limits: &Limits) -> Option<String> {
        let blank = limits.remove_blank_text && text.trim().is_empty();
        (!text.is_empty() && !blank).then_some(text)
    }
}

impl AsRef<Element> for Element {
    fn as_ref(&self) -> &Element {
        self
    }
}

impl AsMut<Element> for Element {
    fn as_mut(&mut self) -> &mut Element {
        self
    }
}

/// In-scope namespace bindings while serializing
#[derive(Debug, Default)]
struct Scope {
    bindings: Vec<(Option<String>, String)>,
}

impl Scope {
    fn push(&mut self, decls: &[(Option<String>, String)]) -> usize {
        let mark = self.bindings.len();
        self.bindings.extend(decls.iter().cloned());
        mark
    }

    fn truncate(&mut self, mark: usize) {
        self.bindings.truncate(mark);
    }

    fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(pfx, _)| pfx.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Prefix bound to `uri` that is not shadowed by a later binding
    fn prefix_for(&self, uri: &str, allow_default: bool) -> Option<Option<&str>> {
        self.bindings
            .iter()
            .rev()
            .filter(|(pfx, _)| allow_default || pfx.is_some())
            .find(|(pfx, bound)| bound == uri && self.lookup(pfx.as_deref()) == Some(uri))
            .map(|(pfx, _)| pfx.as_deref())
    }

    /// Bind a prefix for `uri`, recording the new declaration
    fn declare(&mut self, uri: &str, decls: &mut Vec<(Option<String>, String)>) -> String {
        let prefix = match prefix_for_namespace(uri) {
            Some(pfx) if self.lookup(Some(pfx)).is_none() => pfx.to_string(),
            _ => {
                let mut n = 0;
                loop {
                    let candidate = format!("ns{}", n);
                    if self.lookup(Some(&candidate)).is_none() {
                        break candidate;
                    }
                    n += 1;
                }
            }
        };
        self.bindings.push((Some(prefix.clone()), uri.to_string()));
        decls.push((Some(prefix.clone()), uri.to_string()));
        prefix
    }

    fn element_name(&mut self, qname: &QName, decls: &mut Vec<(Option<String>, String)>) -> String {
        let Some(uri) = qname.namespace() else {
            return qname.local_name.clone();
        };
        match self.prefix_for(uri, true) {
            Some(Some(prefix)) => format!("{}:{}", prefix, qname.local_name),
            Some(None) => qname.local_name.clone(),
            None => {
                let prefix = self.declare(uri, decls);
                format!("{}:{}", prefix, qname.local_name)
            }
        }
    }

    fn attribute_name(&mut self, qname: &QName, decls: &mut Vec<(Option<String>, String)>) -> String {
        let Some(uri) = qname.namespace() else {
            return qname.local_name.clone();
        };
        if uri == XML_NAMESPACE {
            return format!("xml:{}", qname.local_name);
        }
        match self.prefix_for(uri, false) {
            Some(Some(prefix)) => format!("{}:{}", prefix, qname.local_name),
            _ => {
                let prefix = self.declare(uri, decls);
                format!("{}:{}", prefix, qname.local_name)
            }
        }
    }
}
