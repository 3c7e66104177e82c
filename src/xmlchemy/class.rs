//! Element classes
//!
//! An [`ElementClass`] is the runtime half of an element type: the table of
//! members installed from its declared descriptors, built once per type.
//! The typed accessors themselves are generated at compile time by
//! [`define_element!`](crate::define_element); the table backs name-based
//! property access, class identity checks and introspection.

use super::attributes::{AttributeDescriptor, OptionalAttribute, RequiredAttribute};
use super::children::{ChildDescriptor, ZeroOrMore, ZeroOrOne};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::registry::{oxml_element, register_element_cls};
use crate::simple_types::{SimpleType, XsdValue};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A descriptor as declared on an element type
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// Optional or required attribute
    Attribute(Arc<dyn AttributeDescriptor>),
    /// Zero-or-one child element
    ZeroOrOne(ZeroOrOne),
    /// Zero-or-more child element
    ZeroOrMore(ZeroOrMore),
}

impl<T: SimpleType> From<OptionalAttribute<T>> for Descriptor {
    fn from(attribute: OptionalAttribute<T>) -> Self {
        Descriptor::Attribute(Arc::new(attribute))
    }
}

impl<T: SimpleType> From<RequiredAttribute<T>> for Descriptor {
    fn from(attribute: RequiredAttribute<T>) -> Self {
        Descriptor::Attribute(Arc::new(attribute))
    }
}

impl From<ZeroOrOne> for Descriptor {
    fn from(child: ZeroOrOne) -> Self {
        Descriptor::ZeroOrOne(child)
    }
}

impl From<ZeroOrMore> for Descriptor {
    fn from(child: ZeroOrMore) -> Self {
        Descriptor::ZeroOrMore(child)
    }
}

impl Descriptor {
    /// Install the members this descriptor generates under `prop_name`
    fn populate_class_members(&self, cls: &mut ElementClass, prop_name: &str) {
        match self {
            Descriptor::Attribute(attribute) => {
                cls.members.insert(
                    prop_name.to_string(),
                    Member::property(attribute.docstring(), Arc::clone(attribute)),
                );
            }
            Descriptor::ZeroOrOne(child) => {
                if cls.member(prop_name).map(Member::kind) != Some(MemberKind::Explicit) {
                    cls.members.insert(
                        prop_name.to_string(),
                        Member::new(MemberKind::ReadOnlyProperty, child.getter_doc()),
                    );
                }
                add_child_methods(cls, prop_name, child);
                cls.add_to_class(
                    format!("get_or_add_{}", prop_name),
                    Member::new(MemberKind::Method, child.get_or_adder_doc()),
                );
                cls.add_to_class(
                    format!("remove_{}", prop_name),
                    Member::new(MemberKind::Method, child.remover_doc()),
                );
            }
            Descriptor::ZeroOrMore(child) => {
                cls.add_to_class(
                    format!("{}_lst", prop_name),
                    Member::new(MemberKind::ReadOnlyProperty, child.list_getter_doc()),
                );
                add_child_methods(cls, prop_name, child);
                cls.members.shift_remove(prop_name);
            }
        }
    }
}

fn add_child_methods(cls: &mut ElementClass, prop_name: &str, child: &dyn ChildDescriptor) {
    cls.add_to_class(
        format!("new_{}", prop_name),
        Member::new(MemberKind::Method, child.creator_doc()),
    );
    cls.add_to_class(
        format!("insert_{}", prop_name),
        Member::new(MemberKind::Method, child.inserter_doc()),
    );
    cls.add_to_class(
        format!("add_{}", prop_name),
        Member::new(MemberKind::Method, child.adder_doc()),
    );
}

/// What an installed member is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Descriptor not yet expanded
    Declaration,
    /// Read/write attribute property
    Property,
    /// Read-only child getter
    ReadOnlyProperty,
    /// Generated child method
    Method,
    /// Written by hand on the element type
    Explicit,
}

/// One entry of a class's member table
#[derive(Clone)]
pub struct Member {
    kind: MemberKind,
    doc: String,
    attribute: Option<Arc<dyn AttributeDescriptor>>,
}

impl Member {
    fn new(kind: MemberKind, doc: String) -> Self {
        Self {
            kind,
            doc,
            attribute: None,
        }
    }

    fn property(doc: String, attribute: Arc<dyn AttributeDescriptor>) -> Self {
        Self {
            kind: MemberKind::Property,
            doc,
            attribute: Some(attribute),
        }
    }

    /// Member kind
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Documentation of the member; empty for explicit members
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Attribute descriptor behind a property member
    pub fn attribute(&self) -> Option<&dyn AttributeDescriptor> {
        self.attribute.as_deref()
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("kind", &self.kind)
            .field("attribute", &self.attribute.as_ref().map(|a| a.attr_name()))
            .finish()
    }
}

// =============================================================================
// ElementClass
// =============================================================================

/// The installed-member table of one element type
#[derive(Debug)]
pub struct ElementClass {
    name: &'static str,
    nsptag: &'static str,
    declared: Vec<(&'static str, Descriptor)>,
    members: IndexMap<String, Member>,
}

impl ElementClass {
    /// Build the class of element type `name` for tag `nsptag`
    ///
    /// `explicit` lists members written by hand on the type; generated
    /// child methods and getters never replace them. Attribute properties
    /// replace any member of the same name, and a zero-or-more child leaves
    /// no member under its bare name.
    pub fn build(
        name: &'static str,
        nsptag: &'static str,
        declared: Vec<(&'static str, Descriptor)>,
        explicit: &[&'static str],
    ) -> Self {
        let mut cls = Self {
            name,
            nsptag,
            declared: Vec::new(),
            members: IndexMap::new(),
        };
        for member in explicit {
            cls.members
                .insert(member.to_string(), Member::new(MemberKind::Explicit, String::new()));
        }
        for (prop_name, _) in &declared {
            cls.members
                .entry(prop_name.to_string())
                .or_insert_with(|| Member::new(MemberKind::Declaration, String::new()));
        }
        for (prop_name, descriptor) in &declared {
            descriptor.populate_class_members(&mut cls, prop_name);
        }
        cls.declared = declared;
        tracing::debug!(
            class = name,
            tag = nsptag,
            members = cls.members.len(),
            "element class built"
        );
        cls
    }

    fn add_to_class(&mut self, name: String, member: Member) {
        if !self.members.contains_key(&name) {
            self.members.insert(name, member);
        }
    }

    /// Element type name, e.g. `"CT_Transform2D"`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Namespace-prefixed tag, e.g. `"a:xfrm"`
    pub fn nsptag(&self) -> &'static str {
        self.nsptag
    }

    /// Descriptors in declaration order
    pub fn descriptors(&self) -> &[(&'static str, Descriptor)] {
        &self.declared
    }

    /// True when `name` is an installed member
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Installed member `name`
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Installed member names, in installation order
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Attribute descriptor behind property `name`
    pub fn attribute(&self, name: &str) -> Option<&dyn AttributeDescriptor> {
        self.members.get(name).and_then(Member::attribute)
    }
}

// =============================================================================
// ElementType
// =============================================================================

/// A Rust type standing for one XML tag
///
/// Implemented by [`define_element!`](crate::define_element).
pub trait ElementType {
    /// Namespace-prefixed tag, e.g. `"a:xfrm"`
    const NSPTAG: &'static str;

    /// The type's class, built on first use
    fn class() -> &'static ElementClass;

    /// Register the class for [`Self::NSPTAG`]
    fn register() -> Result<()> {
        register_element_cls(Self::NSPTAG, Self::class())
    }

    /// True when `element` was created as this type
    fn is_instance(element: &Element) -> bool {
        element
            .class()
            .is_some_and(|cls| std::ptr::eq(cls, Self::class()))
    }

    /// Fail with [`Error::Type`] unless `element` is of this type
    ///
    /// An element qualifies when it was created as this type or carries
    /// [`Self::NSPTAG`]. Every generated accessor checks this first.
    fn check_instance(element: &Element) -> Result<()> {
        if Self::is_instance(element) || element.is(Self::NSPTAG) {
            return Ok(());
        }
        Err(Error::Type(format!(
            "{} accessors do not apply to element {}",
            Self::class().name(),
            element.tag()
        )))
    }

    /// A "loose" element of this type
    fn new_element() -> Result<Element> {
        oxml_element(Self::NSPTAG)
    }
}

// =============================================================================
// Name-based property access
// =============================================================================

impl Element {
    fn property(&self, name: &str) -> Result<&'static dyn AttributeDescriptor> {
        self.class()
            .and_then(|cls| cls.attribute(name))
            .ok_or_else(|| {
                Error::Key(format!(
                    "element {} has no property '{}'",
                    self.tag(),
                    name
                ))
            })
    }

    /// Read attribute property `name` of this element's class
    pub fn get_property(&self, name: &str) -> Result<XsdValue> {
        self.property(name)?.get_value(self)
    }

    /// Assign attribute property `name` of this element's class
    pub fn set_property(&mut self, name: &str, value: &XsdValue) -> Result<()> {
        self.property(name)?.set_value(self, value)
    }

    /// True when this element was created as element type `T`
    pub fn is_instance<T: ElementType>(&self) -> bool {
        T::is_instance(self)
    }
}
