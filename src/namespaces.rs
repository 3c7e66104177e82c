//! XML namespace handling
//!
//! This module provides qualified names (QNames), namespace prefix mappings,
//! and the table of well-known Office Open XML prefixes that element and
//! attribute declarations are written against (`"p:sp"`, `"a:xfrm"`,
//! `"r:id"`).

use crate::error::{Error, Result};
use crate::names::{split_qname, validate_qname};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

lazy_static::lazy_static! {
    /// Well-known namespace prefixes used in Office Open XML parts
    pub static ref NSMAP: IndexMap<&'static str, &'static str> = {
        let mut m = IndexMap::new();
        m.insert("a", "http://schemas.openxmlformats.org/drawingml/2006/main");
        m.insert("c", "http://schemas.openxmlformats.org/drawingml/2006/chart");
        m.insert("cp", "http://schemas.openxmlformats.org/package/2006/metadata/core-properties");
        m.insert("ct", "http://schemas.openxmlformats.org/package/2006/content-types");
        m.insert("dc", "http://purl.org/dc/elements/1.1/");
        m.insert("dcmitype", "http://purl.org/dc/dcmitype/");
        m.insert("dcterms", "http://purl.org/dc/terms/");
        m.insert("ep", "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties");
        m.insert("i", "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image");
        m.insert("m", "http://schemas.openxmlformats.org/officeDocument/2006/math");
        m.insert("mo", "http://schemas.microsoft.com/office/mac/office/2008/main");
        m.insert("mv", "urn:schemas-microsoft-com:mac:vml");
        m.insert("o", "urn:schemas-microsoft-com:office:office");
        m.insert("p", "http://schemas.openxmlformats.org/presentationml/2006/main");
        m.insert("pd", "http://schemas.openxmlformats.org/drawingml/2006/presentationDrawing");
        m.insert("pic", "http://schemas.openxmlformats.org/drawingml/2006/picture");
        m.insert("pr", "http://schemas.openxmlformats.org/package/2006/relationships");
        m.insert("r", "http://schemas.openxmlformats.org/officeDocument/2006/relationships");
        m.insert("sl", "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout");
        m.insert("vt", "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes");
        m.insert("w", "http://schemas.openxmlformats.org/wordprocessingml/2006/main");
        m.insert("xml", "http://www.w3.org/XML/1998/namespace");
        m.insert("xsi", "http://www.w3.org/2001/XMLSchema-instance");
        m
    };

    /// Reverse of [`NSMAP`], namespace URI to its conventional prefix
    pub static ref PFXMAP: HashMap<&'static str, &'static str> =
        NSMAP.iter().map(|(pfx, uri)| (*uri, *pfx)).collect();
}

/// Namespace URI registered for a well-known prefix
pub fn namespace_for_prefix(prefix: &str) -> Option<&'static str> {
    NSMAP.get(prefix).copied()
}

/// Conventional prefix for a well-known namespace URI
pub fn prefix_for_namespace(uri: &str) -> Option<&'static str> {
    PFXMAP.get(uri).copied()
}

/// Qualified name (QName) - combination of namespace and local name
///
/// This is the single comparable token for a tag or attribute name. It
/// displays in Clark notation, `{uri}local`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Parse a Clark-notation name, `{uri}local` or `local`
    pub fn from_clark(clark: &str) -> Result<Self> {
        match clark.strip_prefix('{') {
            Some(rest) => {
                let (uri, local) = rest
                    .split_once('}')
                    .ok_or_else(|| Error::Name(format!("Invalid Clark name: '{}'", clark)))?;
                Ok(Self::namespaced(uri, local))
            }
            None => Ok(Self::local(clark)),
        }
    }

    /// Get the namespace URI, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Resolve a prefixed name such as `"p:sp"` or `"optAttr"` to a QName.
///
/// Unprefixed names resolve to a QName with no namespace, which is what
/// unqualified attribute names need.
pub fn qn(name: &str) -> Result<QName> {
    match split_qname(name) {
        (Some(_), _) => Ok(NamespacePrefixedTag::new(name)?.clark_name()),
        (None, local) => {
            validate_qname(local)?;
            Ok(QName::local(local))
        }
    }
}

/// Namespace declarations for `prefixes`, in the form used inside a start tag
///
/// `nsdecls(&["p", "a"])` gives `xmlns:p="..." xmlns:a="..."`.
pub fn nsdecls(prefixes: &[&str]) -> Result<String> {
    let decls = prefixes
        .iter()
        .map(|pfx| {
            namespace_for_prefix(pfx)
                .map(|uri| format!("xmlns:{}=\"{}\"", pfx, uri))
                .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", pfx)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(decls.join(" "))
}

/// A namespace-prefixed tag name such as `"a:xfrm"`, resolved against the
/// well-known prefix table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePrefixedTag {
    prefix: String,
    local_part: String,
    nsuri: String,
}

impl NamespacePrefixedTag {
    /// Parse a `prefix:local` tag
    pub fn new(nstag: &str) -> Result<Self> {
        validate_qname(nstag)?;
        let (prefix, local) = match split_qname(nstag) {
            (Some(prefix), local) => (prefix, local),
            (None, _) => {
                return Err(Error::Name(format!(
                    "Tag '{}' has no namespace prefix",
                    nstag
                )))
            }
        };
        let nsuri = namespace_for_prefix(prefix)
            .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
        Ok(Self {
            prefix: prefix.to_string(),
            local_part: local.to_string(),
            nsuri: nsuri.to_string(),
        })
    }

    /// Build from a Clark-notation name whose namespace is well known
    pub fn from_clark_name(clark: &str) -> Result<Self> {
        let qname = QName::from_clark(clark)?;
        let nsuri = qname
            .namespace
            .ok_or_else(|| Error::Namespace(format!("No namespace in '{}'", clark)))?;
        let prefix = prefix_for_namespace(&nsuri)
            .ok_or_else(|| Error::Namespace(format!("Unknown namespace: {}", nsuri)))?;
        Ok(Self {
            prefix: prefix.to_string(),
            local_part: qname.local_name,
            nsuri,
        })
    }

    /// The namespace prefix, e.g. `"a"`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The local part, e.g. `"xfrm"`
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// The namespace URI the prefix maps to
    pub fn nsuri(&self) -> &str {
        &self.nsuri
    }

    /// The comparable qualified name
    pub fn clark_name(&self) -> QName {
        QName::namespaced(self.nsuri.clone(), self.local_part.clone())
    }

    /// Single-entry namespace map declaring this tag's prefix
    pub fn nsmap(&self) -> NamespaceContext {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix(self.prefix.clone(), self.nsuri.clone());
        ctx
    }
}

impl fmt::Display for NamespacePrefixedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local_part)
    }
}

/// Namespace declarations made on one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI, in declaration order
    prefixes: IndexMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context declaring the well-known URI for each of `prefixes`
    pub fn from_prefixes(prefixes: &[&str]) -> Result<Self> {
        let mut ctx = Self::new();
        for pfx in prefixes {
            let uri = namespace_for_prefix(pfx)
                .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", pfx)))?;
            ctx.add_prefix(*pfx, uri);
        }
        Ok(ctx)
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// First prefix declared for `namespace`
    pub fn prefix_of(&self, namespace: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, uri)| uri.as_str() == namespace)
            .map(|(pfx, _)| pfx.as_str())
    }

    /// Declared prefixes in declaration order
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// True when nothing is declared
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }

    /// Resolve a prefixed name to a QName
    pub fn resolve(&self, prefixed_name: &str) -> Result<QName> {
        if let Some((prefix, local)) = prefixed_name.split_once(':') {
            let namespace = self
                .get_namespace(prefix)
                .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
            Ok(QName::namespaced(namespace, local))
        } else {
            Ok(QName::new(self.default_namespace.clone(), prefixed_name))
        }
    }
}
