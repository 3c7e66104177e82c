//! # oxml
//!
//! Declarative, typed accessors over the XML element trees of Office Open XML
//! package parts.
//!
//! An element type declares its attributes and child elements once; the
//! [`define_element!`] macro and the class registrar turn that declaration
//! into typed getters and setters, child creators, inserters and removers
//! that enforce cardinality and keep children in schema sequence order.
//!
//! ## Features
//!
//! - Optional and required attributes converted through simple types
//! - Zero-or-one and zero-or-more child elements kept in sequence order
//! - Tag-to-class registry consulted by parsing and element creation
//! - Pretty-printed serialization with namespace declarations where needed
//! - Protection against oversized or deeply nested input
//!
//! ## Example
//!
//! ```rust
//! use oxml::drawing::{register_default_classes, CtPoint2DExt, CtTransform2DExt};
//! use oxml::parse_xml;
//!
//! # fn main() -> oxml::Result<()> {
//! register_default_classes()?;
//! let mut xfrm = parse_xml(
//!     r#"<a:xfrm xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"/>"#,
//! )?;
//! xfrm.get_or_add_off()?.set_x(914400)?;
//! assert_eq!(xfrm.off()?.map(|off| off.x()).transpose()?, Some(914400));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules - foundation
pub mod error;
pub mod limits;

// Core modules - names and namespaces
pub mod names;
pub mod namespaces;

// Element tree and class lookup
pub mod documents;
pub mod registry;

// Descriptor framework
pub mod simple_types;
pub mod xmlchemy;

// Element types
pub mod drawing;

// Testing support
pub mod comparison;

// Re-exports for convenience
pub use comparison::XmlString;
pub use documents::Element;
pub use error::{Error, Result};
pub use namespaces::{nsdecls, qn, NamespacePrefixedTag, QName};
pub use registry::{oxml_element, parse_xml, register_element_cls};
pub use xmlchemy::{ElementClass, ElementType};

#[doc(hidden)]
pub mod __private {
    pub use crate::xmlchemy::assert_accessor_names;
    pub use once_cell;
    pub use paste;
}

/// Version of the oxml library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
