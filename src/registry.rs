//! Element class registry
//!
//! Process-wide mapping from qualified tag to the element class that
//! elements with that tag are created as. It is populated at start-up and
//! read afterwards; every element constructor consults it, so parsed and
//! newly created elements alike carry their richer class.

use crate::documents::Element;
use crate::error::Result;
use crate::limits::Limits;
use crate::namespaces::{NamespaceContext, NamespacePrefixedTag, QName};
use crate::xmlchemy::ElementClass;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;

static REGISTRY: Lazy<RwLock<HashMap<QName, &'static ElementClass>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register `cls` as the class for elements tagged `nsptag`, e.g. `"a:xfrm"`
///
/// Registering the same class again is a no-op; registering a different
/// class replaces the earlier one.
pub fn register_element_cls(nsptag: &str, cls: &'static ElementClass) -> Result<()> {
    let qname = NamespacePrefixedTag::new(nsptag)?.clark_name();
    let mut registry = REGISTRY.write();
    match registry.insert(qname, cls) {
        Some(previous) if !std::ptr::eq(previous, cls) => {
            tracing::warn!(
                tag = nsptag,
                previous = previous.name(),
                class = cls.name(),
                "element class registration replaced"
            );
        }
        Some(_) => {}
        None => tracing::debug!(tag = nsptag, class = cls.name(), "element class registered"),
    }
    Ok(())
}

/// Class registered for `qname`, if any
pub fn lookup_element_cls(qname: &QName) -> Option<&'static ElementClass> {
    REGISTRY.read().get(qname).copied()
}

/// Qualified tags that currently have a registered class
pub fn registered_tags() -> Vec<QName> {
    REGISTRY.read().keys().cloned().collect()
}

/// A "loose" element tagged `nsptag`, declaring the tag's own prefix
///
/// The element is created as the registered class for the tag, if any.
pub fn oxml_element(nsptag: &str) -> Result<Element> {
    let tag = NamespacePrefixedTag::new(nsptag)?;
    Ok(Element::with_namespaces(tag.clark_name(), tag.nsmap()))
}

/// A "loose" element tagged `nsptag`, declaring `nsmap` instead of the
/// tag's own prefix
pub fn oxml_element_with_nsmap(nsptag: &str, nsmap: NamespaceContext) -> Result<Element> {
    let tag = NamespacePrefixedTag::new(nsptag)?;
    Ok(Element::with_namespaces(tag.clark_name(), nsmap))
}

/// Parse XML text into a tree whose elements carry their registered classes
pub fn parse_xml(xml: &str) -> Result<Element> {
    Element::parse(xml)
}

/// [`parse_xml`] with explicit parser limits
pub fn parse_xml_with_limits(xml: &str, limits: &Limits) -> Result<Element> {
    Element::parse_with_limits(xml, limits)
}
