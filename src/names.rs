//! XML name validation
//!
//! Checks for NCNames and prefixed names. Element tags and attribute names
//! handed to descriptors are validated here before they are resolved against
//! the namespace table.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}]*$")
        .expect("NCName pattern is valid")
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Check if a string is a valid prefixed name, `prefix:local` or `local`
pub fn is_valid_qname(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_valid_ncname(prefix) && is_valid_ncname(local),
        None => is_valid_ncname(name),
    }
}

/// Validate a prefixed name and return an error if invalid
pub fn validate_qname(name: &str) -> Result<()> {
    if is_valid_qname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid QName: '{}'", name)))
    }
}

/// Split a prefixed name into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ncname() {
        assert!(is_valid_ncname("zomChild"));
        assert!(is_valid_ncname("cNvPr"));
        assert!(is_valid_ncname("_x"));
        assert!(is_valid_ncname("a.b-c"));

        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("p:parent"));
        assert!(!is_valid_ncname("1st"));
    }

    #[test]
    fn test_is_valid_qname() {
        assert!(is_valid_qname("p:parent"));
        assert!(is_valid_qname("optAttr"));

        assert!(!is_valid_qname(":parent"));
        assert!(!is_valid_qname("p:"));
        assert!(!is_valid_qname("a:b:c"));
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("reqAttr"), (None, "reqAttr"));
        assert_eq!(split_qname("r:id"), (Some("r"), "id"));
    }

    #[test]
    fn test_validate_qname() {
        assert!(validate_qname("a:xfrm").is_ok());
        assert!(matches!(validate_qname("a:"), Err(Error::Name(_))));
    }
}
