//! Comparison support for tests
//!
//! Serialized element trees are compared line by line with attribute order
//! ignored, since attribute order carries no meaning in XML.

pub mod xml_string;

pub use xml_string::XmlString;
