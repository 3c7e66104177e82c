//! Declarative element types
//!
//! Element types declare attribute and child descriptors; a one-time build
//! step turns those declarations into typed accessors that enforce
//! cardinality and keep children in schema sequence order.
//!
//! The pieces:
//!
//! - [`OptionalAttribute`] and [`RequiredAttribute`] convert one attribute
//!   through a [`SimpleType`](crate::simple_types::SimpleType)
//! - [`ZeroOrOne`] and [`ZeroOrMore`] manage one child tag and the
//!   successor tags it is kept in front of
//! - [`ElementClass`] is the member table built once per element type
//! - [`define_element!`](crate::define_element) generates the typed
//!   accessor trait and the [`ElementType`] impl

mod attributes;
mod children;
mod class;
mod macros;

pub use attributes::{AttributeDescriptor, OptionalAttribute, RequiredAttribute};
pub use children::{ChildDescriptor, ZeroOrMore, ZeroOrOne};
pub use class::{Descriptor, ElementClass, ElementType, Member, MemberKind};

#[doc(hidden)]
pub use macros::assert_accessor_names;
