//! XML name validation
//!
//! Element and attribute names produced by the encoder come from arbitrary
//! mapping keys, so they are checked against the XML `Name` production
//! before anything is written.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

// NameStartChar NameChar*, XML 1.0 (fifth edition) section 2.3
static XML_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[:A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}",
        r"\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}",
        r"\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\u{10000}-\u{EFFFF}]",
        r"[:A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}",
        r"\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}",
        r"\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\u{10000}-\u{EFFFF}",
        r"\-\.0-9\u{B7}\u{300}-\u{36F}\u{203F}-\u{2040}]*$",
    ))
    .unwrap()
});

/// Check if a string is a valid XML Name
pub fn is_valid_name(name: &str) -> bool {
    XML_NAME.is_match(name)
}

/// Validate an XML Name and return an error if invalid
pub fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid XML Name: '{}'", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("element"));
        assert!(is_valid_name("my-element"));
        assert!(is_valid_name("my_element"));
        assert!(is_valid_name("element123"));
        assert!(is_valid_name("_element"));
        assert!(is_valid_name("xs:element"));
        assert!(is_valid_name("café"));

        assert!(!is_valid_name(""));
        assert!(!is_valid_name("123element"));
        assert!(!is_valid_name("-element"));
        assert!(!is_valid_name("my element"));
        assert!(!is_valid_name("0"));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("element").is_ok());
        assert!(matches!(validate_name("123"), Err(Error::Name(_))));
    }
}
