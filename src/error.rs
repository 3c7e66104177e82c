//! Error types for oxml
//!
//! This module defines all error types used throughout the library.
//! Two groups matter most to callers: `InvalidXml` means the document itself
//! breaks its schema, while `Type` and `Value` mean a caller tried to assign
//! something an attribute cannot hold.

use thiserror::Error;

/// Result type alias using oxml Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for oxml operations
#[derive(Error, Debug)]
pub enum Error {
    /// The document violates its schema (e.g. a required attribute is missing)
    #[error("invalid XML: {0}")]
    InvalidXml(String),

    /// A value of the wrong representation was assigned
    #[error("type error: {0}")]
    Type(String),

    /// A value outside the declared domain was assigned or read
    #[error("value error: {0}")]
    Value(String),

    /// Unknown property name
    #[error("key error: {0}")]
    Key(String),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised by an attribute setter rejecting its value.
    pub fn is_invalid_assignment(&self) -> bool {
        matches!(self, Error::Type(_) | Error::Value(_))
    }

    /// True when the source document is structurally invalid.
    pub fn is_malformed_document(&self) -> bool {
        matches!(self, Error::InvalidXml(_))
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
