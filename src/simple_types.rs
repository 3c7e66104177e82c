//! Simple type converters
//!
//! A simple type translates between the text of an XML attribute and a
//! validated in-memory value for one data domain. Attribute descriptors are
//! parameterized by a simple type; reading goes through
//! [`SimpleType::from_xml`] and writing through [`SimpleType::to_xml`], which
//! validates before converting so a rejected value never reaches the tree.
//!
//! [`XsdValue`] is the dynamic counterpart used when properties are assigned
//! by name, where a value of the wrong representation must be rejected with
//! a type error rather than by the compiler.

use crate::error::{Error, Result};
use std::fmt;

// =============================================================================
// Dynamic values
// =============================================================================

/// A dynamically typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum XsdValue {
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Null/absent value
    Null,
}

impl XsdValue {
    /// Name of the representation, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            XsdValue::String(_) => "string",
            XsdValue::Boolean(_) => "boolean",
            XsdValue::Integer(_) => "integer",
            XsdValue::Null => "null",
        }
    }

    /// True for [`XsdValue::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, XsdValue::Null)
    }
}

impl fmt::Display for XsdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XsdValue::String(s) => write!(f, "'{}'", s),
            XsdValue::Boolean(b) => write!(f, "{}", b),
            XsdValue::Integer(i) => write!(f, "{}", i),
            XsdValue::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for XsdValue {
    fn from(value: &str) -> Self {
        XsdValue::String(value.to_string())
    }
}

impl From<String> for XsdValue {
    fn from(value: String) -> Self {
        XsdValue::String(value)
    }
}

impl From<bool> for XsdValue {
    fn from(value: bool) -> Self {
        XsdValue::Boolean(value)
    }
}

impl From<i64> for XsdValue {
    fn from(value: i64) -> Self {
        XsdValue::Integer(value)
    }
}

impl<T: Into<XsdValue>> From<Option<T>> for XsdValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(XsdValue::Null, Into::into)
    }
}

// =============================================================================
// Simple Type contract
// =============================================================================

/// Converter between attribute text and a typed value
pub trait SimpleType: 'static {
    /// In-memory representation
    type Value: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Schema name of the type, used in generated documentation
    const NAME: &'static str;

    /// Parse attribute text; fails with a value error on malformed text
    fn convert_from_xml(text: &str) -> Result<Self::Value>;

    /// Render a value that has already been validated
    fn convert_to_xml(value: &Self::Value) -> String;

    /// Check that `value` lies in this type's domain
    fn validate(value: &Self::Value) -> Result<()>;

    /// Accept a dynamic value of the right representation
    fn coerce(value: &XsdValue) -> Result<Self::Value>;

    /// Dynamic form of a typed value
    fn to_xsd_value(value: &Self::Value) -> XsdValue;

    /// Typed value of attribute text
    fn from_xml(text: &str) -> Result<Self::Value> {
        Self::convert_from_xml(text)
    }

    /// Attribute text for `value`, validating it first
    fn to_xml(value: &Self::Value) -> Result<String> {
        Self::validate(value)?;
        Ok(Self::convert_to_xml(value))
    }
}

/// Check that `value` is in `min..=max`
pub fn validate_int_in_range(value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(Error::Value(format!(
            "value must be in range {} to {} inclusive, got {}",
            min, max, value
        )));
    }
    Ok(())
}

fn type_error(expected: &str, value: &XsdValue) -> Error {
    Error::Type(format!(
        "value must be {}, got {} {}",
        expected,
        value.type_name(),
        value
    ))
}

fn parse_int(text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| Error::Value(format!("invalid literal for integer: '{}'", text)))
}

// =============================================================================
// Integer types
// =============================================================================

/// Integer simple type; implementors only describe their domain
///
/// Every `BaseIntType` is a [`SimpleType`] with `i64` values.
pub trait BaseIntType: 'static {
    /// Schema name of the type
    const NAME: &'static str;

    /// Check that `value` lies in this type's domain
    fn validate(value: i64) -> Result<()> {
        let _ = value;
        Ok(())
    }
}

impl<T: BaseIntType> SimpleType for T {
    type Value = i64;

    const NAME: &'static str = <T as BaseIntType>::NAME;

    fn convert_from_xml(text: &str) -> Result<i64> {
        parse_int(text)
    }

    fn convert_to_xml(value: &i64) -> String {
        value.to_string()
    }

    fn validate(value: &i64) -> Result<()> {
        <T as BaseIntType>::validate(*value)
    }

    fn coerce(value: &XsdValue) -> Result<i64> {
        match value {
            XsdValue::Integer(i) => Ok(*i),
            other => Err(type_error("an integer", other)),
        }
    }

    fn to_xsd_value(value: &i64) -> XsdValue {
        XsdValue::Integer(*value)
    }
}

/// `xsd:int`
#[derive(Debug, Clone, Copy)]
pub struct XsdInt;

impl BaseIntType for XsdInt {
    const NAME: &'static str = "XsdInt";

    fn validate(value: i64) -> Result<()> {
        validate_int_in_range(value, -2147483648, 2147483647)
    }
}

/// `xsd:long`
#[derive(Debug, Clone, Copy)]
pub struct XsdLong;

impl BaseIntType for XsdLong {
    const NAME: &'static str = "XsdLong";
}

/// `xsd:unsignedInt`
#[derive(Debug, Clone, Copy)]
pub struct XsdUnsignedInt;

impl BaseIntType for XsdUnsignedInt {
    const NAME: &'static str = "XsdUnsignedInt";

    fn validate(value: i64) -> Result<()> {
        validate_int_in_range(value, 0, 4294967295)
    }
}

/// `ST_DrawingElementId`, an unsigned int identifying a shape on its slide
#[derive(Debug, Clone, Copy)]
pub struct StDrawingElementId;

impl BaseIntType for StDrawingElementId {
    const NAME: &'static str = "ST_DrawingElementId";

    fn validate(value: i64) -> Result<()> {
        validate_int_in_range(value, 0, 4294967295)
    }
}

/// `ST_PositiveCoordinate`, a non-negative length in EMU
#[derive(Debug, Clone, Copy)]
pub struct StPositiveCoordinate;

impl BaseIntType for StPositiveCoordinate {
    const NAME: &'static str = "ST_PositiveCoordinate";

    fn validate(value: i64) -> Result<()> {
        validate_int_in_range(value, 0, 27273042316900)
    }
}

/// `ST_Coordinate`, a signed position in EMU
///
/// Accepts a universal measure (`"1in"`, `"2.54cm"`) on read; always writes
/// plain EMU.
#[derive(Debug, Clone, Copy)]
pub struct StCoordinate;

impl SimpleType for StCoordinate {
    type Value = i64;

    const NAME: &'static str = "ST_Coordinate";

    fn convert_from_xml(text: &str) -> Result<i64> {
        if text.contains(['i', 'm', 'p']) {
            return universal_measure_to_emu(text);
        }
        parse_int(text)
    }

    fn convert_to_xml(value: &i64) -> String {
        value.to_string()
    }

    fn validate(value: &i64) -> Result<()> {
        validate_int_in_range(*value, -27273042329600, 27273042316900)
    }

    fn coerce(value: &XsdValue) -> Result<i64> {
        match value {
            XsdValue::Integer(i) => Ok(*i),
            other => Err(type_error("an integer", other)),
        }
    }

    fn to_xsd_value(value: &i64) -> XsdValue {
        XsdValue::Integer(*value)
    }
}

/// EMU value of an `ST_UniversalMeasure` such as `"1.5in"`
pub fn universal_measure_to_emu(text: &str) -> Result<i64> {
    let malformed = || Error::Value(format!("invalid universal measure: '{}'", text));
    let split = text.len().checked_sub(2).ok_or_else(malformed)?;
    if !text.is_char_boundary(split) {
        return Err(malformed());
    }
    let (quantity, units) = text.split_at(split);
    let multiplier = match units {
        "mm" => 36000.0,
        "cm" => 360000.0,
        "in" => 914400.0,
        "pt" => 12700.0,
        "pc" | "pi" => 152400.0,
        _ => return Err(malformed()),
    };
    let quantity: f64 = quantity.trim().parse().map_err(|_| malformed())?;
    Ok((quantity * multiplier).round() as i64)
}

// =============================================================================
// Boolean and string types
// =============================================================================

/// `xsd:boolean`; reads `1`/`0`/`true`/`false`, writes `1`/`0`
#[derive(Debug, Clone, Copy)]
pub struct XsdBoolean;

impl SimpleType for XsdBoolean {
    type Value = bool;

    const NAME: &'static str = "XsdBoolean";

    fn convert_from_xml(text: &str) -> Result<bool> {
        match text {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(Error::Value(format!(
                "value must be one of '1', '0', 'true' or 'false', got '{}'",
                text
            ))),
        }
    }

    fn convert_to_xml(value: &bool) -> String {
        String::from(if *value { "1" } else { "0" })
    }

    fn validate(_value: &bool) -> Result<()> {
        Ok(())
    }

    fn coerce(value: &XsdValue) -> Result<bool> {
        match value {
            XsdValue::Boolean(b) => Ok(*b),
            other => Err(type_error("a boolean", other)),
        }
    }

    fn to_xsd_value(value: &bool) -> XsdValue {
        XsdValue::Boolean(*value)
    }
}

macro_rules! string_type {
    ($(#[$meta:meta])* $name:ident, $schema_name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl SimpleType for $name {
            type Value = String;

            const NAME: &'static str = $schema_name;

            fn convert_from_xml(text: &str) -> Result<String> {
                Ok(text.to_string())
            }

            fn convert_to_xml(value: &String) -> String {
                value.clone()
            }

            fn validate(_value: &String) -> Result<()> {
                Ok(())
            }

            fn coerce(value: &XsdValue) -> Result<String> {
                match value {
                    XsdValue::String(s) => Ok(s.clone()),
                    other => Err(type_error("a string", other)),
                }
            }

            fn to_xsd_value(value: &String) -> XsdValue {
                XsdValue::String(value.clone())
            }
        }
    };
}

string_type!(
    /// `xsd:string`
    XsdString,
    "XsdString"
);
string_type!(
    /// `xsd:token`
    XsdToken,
    "XsdToken"
);
string_type!(
    /// `xsd:anyURI`
    XsdAnyUri,
    "XsdAnyUri"
);
