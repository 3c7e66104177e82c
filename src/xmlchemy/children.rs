//! Child element descriptors
//!
//! A child descriptor names a child tag and the tags that must stay after
//! it, so that children added through the descriptor land in schema
//! sequence order.

use crate::documents::Element;
use crate::error::Result;
use crate::registry::oxml_element;
use crate::simple_types::XsdValue;

/// Behavior shared by every child descriptor
pub trait ChildDescriptor {
    /// Namespace-prefixed child tag, e.g. `"a:off"`
    fn nsptagname(&self) -> &'static str;

    /// Tags of the siblings that follow this child in sequence
    fn successors(&self) -> &'static [&'static str];

    /// A "loose" child element with no attributes, text, or children
    fn new_child(&self) -> Result<Element> {
        oxml_element(self.nsptagname())
    }

    /// Insert `child` into `parent` before the first successor present,
    /// appending when there is none
    fn insert<'a>(&self, parent: &'a mut Element, child: Element) -> &'a mut Element {
        parent.insert_element_before(child, self.successors())
    }

    /// Add a new child unconditionally
    fn add<'a>(&self, parent: &'a mut Element) -> Result<&'a mut Element> {
        self.add_with(parent, &[])
    }

    /// Add a new child after assigning each `(property, value)` pair to it
    ///
    /// Assignment happens before insertion, so a failure leaves `parent`
    /// unchanged.
    fn add_with<'a>(
        &self,
        parent: &'a mut Element,
        attrs: &[(&str, XsdValue)],
    ) -> Result<&'a mut Element> {
        let mut child = self.new_child()?;
        for (name, value) in attrs {
            child.set_property(name, value)?;
        }
        Ok(self.insert(parent, child))
    }

    /// Docstring of the generated `new_x` method
    fn creator_doc(&self) -> String {
        format!(
            "Return a \"loose\", newly created ``<{}>`` element having no attributes, text, or \
             children.",
            self.nsptagname()
        )
    }

    /// Docstring of the generated `insert_x` method
    fn inserter_doc(&self) -> String {
        format!(
            "Insert the passed ``<{}>`` element as a child in the correct sequence.",
            self.nsptagname()
        )
    }

    /// Docstring of the generated `add_x` method
    fn adder_doc(&self) -> String {
        format!(
            "Add a new ``<{}>`` child element unconditionally, inserted in the correct sequence.",
            self.nsptagname()
        )
    }
}

// =============================================================================
// ZeroOrOne
// =============================================================================

/// An optional child element, at most one per parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroOrOne {
    nsptagname: &'static str,
    successors: &'static [&'static str],
}

impl ZeroOrOne {
    /// Descriptor for child `nsptagname`, kept before `successors`
    pub const fn new(nsptagname: &'static str, successors: &'static [&'static str]) -> Self {
        Self {
            nsptagname,
            successors,
        }
    }

    /// First matching child, if present
    pub fn get<'a>(&self, parent: &'a Element) -> Option<&'a Element> {
        parent.find(self.nsptagname)
    }

    /// First matching child, mutably
    pub fn get_mut<'a>(&self, parent: &'a mut Element) -> Option<&'a mut Element> {
        parent.find_mut(self.nsptagname)
    }

    /// The existing child, or a newly added one
    pub fn get_or_add<'a>(&self, parent: &'a mut Element) -> Result<&'a mut Element> {
        match parent.position(self.nsptagname) {
            Some(index) => Ok(&mut parent.children_mut()[index]),
            None => self.add(parent),
        }
    }

    /// Remove every matching child; no-op when there is none
    pub fn remove(&self, parent: &mut Element) {
        parent.remove_all(self.nsptagname);
    }

    /// Docstring of the generated getter
    pub fn getter_doc(&self) -> String {
        format!(
            "``<{}>`` child element or |None| if not present.",
            self.nsptagname
        )
    }

    /// Docstring of the generated `get_or_add_x` method
    pub fn get_or_adder_doc(&self) -> String {
        format!(
            "Return the ``<{}>`` child element, newly added if not present.",
            self.nsptagname
        )
    }

    /// Docstring of the generated `remove_x` method
    pub fn remover_doc(&self) -> String {
        format!("Remove all ``<{}>`` child elements.", self.nsptagname)
    }
}

impl ChildDescriptor for ZeroOrOne {
    fn nsptagname(&self) -> &'static str {
        self.nsptagname
    }

    fn successors(&self) -> &'static [&'static str] {
        self.successors
    }
}

// =============================================================================
// ZeroOrMore
// =============================================================================

/// A repeating child element, any number per parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroOrMore {
    nsptagname: &'static str,
    successors: &'static [&'static str],
}

impl ZeroOrMore {
    /// Descriptor for child `nsptagname`, kept before `successors`
    pub const fn new(nsptagname: &'static str, successors: &'static [&'static str]) -> Self {
        Self {
            nsptagname,
            successors,
        }
    }

    /// Matching children in document order
    pub fn list<'a>(&self, parent: &'a Element) -> Vec<&'a Element> {
        parent.findall(self.nsptagname)
    }

    /// Matching children in document order, mutably
    pub fn list_mut<'a>(&self, parent: &'a mut Element) -> Vec<&'a mut Element> {
        parent.findall_mut(self.nsptagname)
    }

    /// Docstring of the generated `x_lst` getter
    pub fn list_getter_doc(&self) -> String {
        format!(
            "A list containing each of the ``<{}>`` child elements, in the order they appear.",
            self.nsptagname
        )
    }
}

impl ChildDescriptor for ZeroOrMore {
    fn nsptagname(&self) -> &'static str {
        self.nsptagname
    }

    fn successors(&self) -> &'static [&'static str] {
        self.successors
    }
}
