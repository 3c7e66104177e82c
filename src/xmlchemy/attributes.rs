//! Attribute descriptors
//!
//! An attribute descriptor binds an attribute name to a simple type and
//! yields the typed property installed on an element class. Descriptors are
//! `const` values holding only configuration; every access takes the
//! element explicitly.

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::simple_types::{SimpleType, XsdValue};
use std::fmt;
use std::marker::PhantomData;

/// Type-erased view of an attribute descriptor, used when properties are
/// read or assigned by name
pub trait AttributeDescriptor: fmt::Debug + Send + Sync {
    /// Attribute name as declared, e.g. `"flipH"` or `"r:id"`
    fn attr_name(&self) -> &'static str;

    /// Name of the simple type converting this attribute
    fn type_name(&self) -> &'static str;

    /// True for a required attribute
    fn is_required(&self) -> bool;

    /// Documentation of the generated property
    fn docstring(&self) -> String;

    /// Current value in dynamic form
    fn get_value(&self, elm: &Element) -> Result<XsdValue>;

    /// Assign a dynamic value
    fn set_value(&self, elm: &mut Element, value: &XsdValue) -> Result<()>;
}

// =============================================================================
// Optional Attribute
// =============================================================================

/// An optional attribute: reads as its default when absent, and assigning
/// `None` or the default removes it
///
/// A value equal to the default is never written, so "explicitly set to
/// the default" and "absent" are the same document.
pub struct OptionalAttribute<T: SimpleType> {
    attr_name: &'static str,
    default: Option<T::Value>,
    _type: PhantomData<fn() -> T>,
}

impl<T: SimpleType> OptionalAttribute<T> {
    /// Optional attribute with no default
    pub const fn new(attr_name: &'static str) -> Self {
        Self {
            attr_name,
            default: None,
            _type: PhantomData,
        }
    }

    /// Optional attribute reading as `default` when absent
    pub const fn with_default(attr_name: &'static str, default: T::Value) -> Self {
        Self {
            attr_name,
            default: Some(default),
            _type: PhantomData,
        }
    }

    /// Attribute name as declared
    pub fn attr_name(&self) -> &'static str {
        self.attr_name
    }

    /// Configured default, if any
    pub fn default_value(&self) -> Option<&T::Value> {
        self.default.as_ref()
    }

    /// Converted attribute value, or the default when absent
    pub fn get(&self, elm: &Element) -> Result<Option<T::Value>> {
        match elm.get(self.attr_name) {
            None => Ok(self.default.clone()),
            Some(text) => T::from_xml(text).map(Some),
        }
    }

    /// Write `value`, or remove the attribute for `None` or the default
    pub fn set(&self, elm: &mut Element, value: impl Into<Option<T::Value>>) -> Result<()> {
        let value = match value.into() {
            Some(value) if self.default.as_ref() != Some(&value) => value,
            _ => {
                if elm.remove_attribute(self.attr_name).is_some() {
                    tracing::trace!(attr = self.attr_name, tag = %elm.tag(), "attribute cleared");
                }
                return Ok(());
            }
        };
        let text = T::to_xml(&value)?;
        elm.set(self.attr_name, text)
    }
}

impl<T: SimpleType> fmt::Debug for OptionalAttribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalAttribute")
            .field("attr_name", &self.attr_name)
            .field("simple_type", &T::NAME)
            .field("default", &self.default)
            .finish()
    }
}

impl<T: SimpleType> AttributeDescriptor for OptionalAttribute<T> {
    fn attr_name(&self) -> &'static str {
        self.attr_name
    }

    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn is_required(&self) -> bool {
        false
    }

    fn docstring(&self) -> String {
        format!(
            "{} type-converted value of ``{}`` attribute, or |None| (or specified default value) \
             if not present. Assigning the default value causes the attribute to be removed from \
             the element.",
            T::NAME,
            self.attr_name
        )
    }

    fn get_value(&self, elm: &Element) -> Result<XsdValue> {
        Ok(self
            .get(elm)?
            .map_or(XsdValue::Null, |value| T::to_xsd_value(&value)))
    }

    fn set_value(&self, elm: &mut Element, value: &XsdValue) -> Result<()> {
        if value.is_null() {
            return self.set(elm, None::<T::Value>);
        }
        self.set(elm, T::coerce(value)?)
    }
}

// =============================================================================
// Required Attribute
// =============================================================================

/// A required attribute: reading it when absent means the document is
/// invalid, and assignment is never a removal
pub struct RequiredAttribute<T: SimpleType> {
    attr_name: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T: SimpleType> RequiredAttribute<T> {
    /// Required attribute named `attr_name`
    pub const fn new(attr_name: &'static str) -> Self {
        Self {
            attr_name,
            _type: PhantomData,
        }
    }

    /// Attribute name as declared
    pub fn attr_name(&self) -> &'static str {
        self.attr_name
    }

    /// Converted attribute value; `InvalidXml` when absent
    pub fn get(&self, elm: &Element) -> Result<T::Value> {
        let text = elm.get(self.attr_name).ok_or_else(|| {
            Error::InvalidXml(format!(
                "required '{}' attribute not present on element {}",
                self.attr_name,
                elm.tag()
            ))
        })?;
        T::from_xml(text)
    }

    /// Validate and write `value`
    pub fn set(&self, elm: &mut Element, value: T::Value) -> Result<()> {
        let text = T::to_xml(&value)?;
        elm.set(self.attr_name, text)
    }
}

impl<T: SimpleType> fmt::Debug for RequiredAttribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequiredAttribute")
            .field("attr_name", &self.attr_name)
            .field("simple_type", &T::NAME)
            .finish()
    }
}

impl<T: SimpleType> AttributeDescriptor for RequiredAttribute<T> {
    fn attr_name(&self) -> &'static str {
        self.attr_name
    }

    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn is_required(&self) -> bool {
        true
    }

    fn docstring(&self) -> String {
        format!(
            "{} type-converted value of ``{}`` attribute.",
            T::NAME,
            self.attr_name
        )
    }

    fn get_value(&self, elm: &Element) -> Result<XsdValue> {
        self.get(elm).map(|value| T::to_xsd_value(&value))
    }

    fn set_value(&self, elm: &mut Element, value: &XsdValue) -> Result<()> {
        self.set(elm, T::coerce(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::qn;
    use crate::simple_types::{BaseIntType, XsdBoolean, XsdString};

    struct Small;

    impl BaseIntType for Small {
        const NAME: &'static str = "Small";

        fn validate(value: i64) -> Result<()> {
            crate::simple_types::validate_int_in_range(value, 1, 9)
        }
    }

    const SIZE: OptionalAttribute<Small> = OptionalAttribute::new("sz");
    const HIDDEN: OptionalAttribute<XsdBoolean> = OptionalAttribute::with_default("hidden", false);
    const ID: RequiredAttribute<Small> = RequiredAttribute::new("id");
    const REL: OptionalAttribute<XsdString> = OptionalAttribute::new("r:id");

    fn element() -> Element {
        Element::new(qn("p:sample").unwrap())
    }

    #[test]
    fn test_optional_absent_reads_default() {
        let elm = element();
        assert_eq!(SIZE.get(&elm).unwrap(), None);
        assert_eq!(HIDDEN.get(&elm).unwrap(), Some(false));
    }

    #[test]
    fn test_optional_set_and_clear() {
        let mut elm = element();
        SIZE.set(&mut elm, 3).unwrap();
        assert_eq!(elm.get("sz"), Some("3"));
        SIZE.set(&mut elm, None).unwrap();
        assert!(!elm.has_attribute("sz"));
        SIZE.set(&mut elm, None).unwrap();
    }

    #[test]
    fn test_optional_assigning_default_removes() {
        let mut elm = element();
        HIDDEN.set(&mut elm, true).unwrap();
        assert_eq!(elm.get("hidden"), Some("1"));
        HIDDEN.set(&mut elm, false).unwrap();
        assert!(!elm.has_attribute("hidden"));
    }

    #[test]
    fn test_optional_malformed_text_is_value_error() {
        let mut elm = element();
        elm.set("sz", "big").unwrap();
        assert!(matches!(SIZE.get(&elm), Err(Error::Value(_))));
    }

    #[test]
    fn test_optional_invalid_value_leaves_element() {
        let mut elm = element();
        SIZE.set(&mut elm, 4).unwrap();
        assert!(matches!(SIZE.set(&mut elm, 10), Err(Error::Value(_))));
        assert_eq!(elm.get("sz"), Some("4"));
    }

    #[test]
    fn test_prefixed_attribute_name() {
        let mut elm = element();
        REL.set(&mut elm, "rId3".to_string()).unwrap();
        assert_eq!(elm.get_qname(&qn("r:id").unwrap()), Some("rId3"));
        assert_eq!(REL.get(&elm).unwrap().as_deref(), Some("rId3"));
    }

    #[test]
    fn test_required_missing_is_invalid_xml() {
        let err = ID.get(&element()).unwrap_err();
        assert!(err.is_malformed_document());
        assert!(err.to_string().contains("required 'id' attribute not present"));
    }

    #[test]
    fn test_required_set_validates_first() {
        let mut elm = element();
        ID.set(&mut elm, 2).unwrap();
        assert!(matches!(ID.set(&mut elm, -4), Err(Error::Value(_))));
        assert_eq!(ID.get(&elm).unwrap(), 2);
    }

    #[test]
    fn test_dynamic_assignment() {
        let mut elm = element();
        ID.set_value(&mut elm, &XsdValue::Integer(5)).unwrap();
        assert_eq!(ID.get_value(&elm).unwrap(), XsdValue::Integer(5));
        assert!(matches!(
            ID.set_value(&mut elm, &XsdValue::Null),
            Err(Error::Type(_))
        ));
        assert!(matches!(
            ID.set_value(&mut elm, &"2".into()),
            Err(Error::Type(_))
        ));
        SIZE.set_value(&mut elm, &XsdValue::Integer(7)).unwrap();
        SIZE.set_value(&mut elm, &XsdValue::Null).unwrap();
        assert_eq!(SIZE.get_value(&elm).unwrap(), XsdValue::Null);
        assert_eq!(ID.get(&elm).unwrap(), 5);
    }

    #[test]
    fn test_docstrings() {
        assert!(SIZE.docstring().starts_with("Small type-converted value of ``sz``"));
        assert_eq!(
            ID.docstring(),
            "Small type-converted value of ``id`` attribute."
        );
    }
}
