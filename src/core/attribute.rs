//! Attribute model and reader.
//!
//! An attribute is one `name="value"` pair. Attributes attached to a tag or
//! node form a prepend-ordered list: iteration order is the *reverse* of
//! document order. That ordering is observable through the public API and
//! callers depend on it; it is part of the contract, not an accident.

use std::io::Read;

use crate::diag::{report, Diagnostics};
use crate::error::{ErrorKind, XmlError};

use super::scanner::Scanner;

/// One `name="value"` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the name in place.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replace the value in place.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

/// Prepend-ordered attribute list.
///
/// `push` makes the new attribute the head, so iteration visits attributes
/// in reverse document order. Names are not deduplicated; [`get`] returns
/// the first match scanning from the head, i.e. the most recently attached
/// one when names collide.
///
/// [`get`]: AttributeList::get
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    items: Vec<Attribute>,
}

impl AttributeList {
    pub fn new() -> Self {
        AttributeList { items: Vec::new() }
    }

    /// Attach an attribute as the new head of the list.
    pub fn push(&mut self, attr: Attribute) {
        self.items.insert(0, attr);
    }

    /// Detach and return the head of the list.
    pub fn pop(&mut self) -> Option<Attribute> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// First value whose name matches, scanning head to tail.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|a| a.name() == name)
            .map(Attribute::value)
    }

    /// Head-to-tail iteration (reverse document order).
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Read one `name="value"` pair from the stream.
///
/// The scanner must be positioned at the first byte of the name. The name
/// runs up to (and excludes) `=`; the byte after `=` must be `"`; the value
/// runs up to (and excludes) the closing `"`. No escape sequences exist, so
/// a literal `"` cannot appear inside a value.
pub fn read_attribute<R: Read>(
    scanner: &mut Scanner<R>,
    diag: &dyn Diagnostics,
) -> Result<Attribute, XmlError> {
    // Name, up to '='.
    let mut name = scanner.token_buf();
    loop {
        match scanner.next_byte()? {
            Some(b'=') => break,
            Some(b) => name.push(b, scanner.position()).map_err(|e| {
                diag.report(&e);
                e
            })?,
            None => {
                return Err(report(
                    diag,
                    ErrorKind::MalformedTag,
                    "end of input while reading an attribute name",
                    scanner.position(),
                ))
            }
        }
    }

    // The opening quote is required immediately after '='.
    match scanner.next_byte()? {
        Some(b'"') => {}
        _ => {
            return Err(report(
                diag,
                ErrorKind::MalformedTag,
                "attribute value must open with '\"'",
                scanner.position(),
            ))
        }
    }

    // Value, up to the closing '"'.
    let mut value = scanner.token_buf();
    loop {
        match scanner.next_byte()? {
            Some(b'"') => break,
            Some(b) => value.push(b, scanner.position()).map_err(|e| {
                diag.report(&e);
                e
            })?,
            None => {
                return Err(report(
                    diag,
                    ErrorKind::UnexpectedEndOfInput,
                    "end of input inside an attribute value",
                    scanner.position(),
                ))
            }
        }
    }

    Ok(Attribute::new(name.into_string(), value.into_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::testing::CollectingDiagnostics;
    use crate::diag::NullDiagnostics;

    fn read(input: &str) -> Result<Attribute, XmlError> {
        let mut scanner = Scanner::new(input.as_bytes());
        read_attribute(&mut scanner, &NullDiagnostics)
    }

    #[test]
    fn test_simple_attribute() {
        let attr = read("id=\"test\"").unwrap();
        assert_eq!(attr.name(), "id");
        assert_eq!(attr.value(), "test");
    }

    #[test]
    fn test_empty_value() {
        let attr = read("k=\"\"").unwrap();
        assert_eq!(attr.name(), "k");
        assert_eq!(attr.value(), "");
    }

    #[test]
    fn test_missing_opening_quote() {
        let err = read("k=v\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedTag);
    }

    #[test]
    fn test_eof_before_equals() {
        let err = read("dangling").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedTag);
    }

    #[test]
    fn test_eof_inside_value() {
        let err = read("k=\"unterminated").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn test_failure_reaches_sink() {
        let sink = CollectingDiagnostics::default();
        let mut scanner = Scanner::new(&b"k=v\""[..]);
        assert!(read_attribute(&mut scanner, &sink).is_err());
        assert!(sink.seen(ErrorKind::MalformedTag));
    }

    #[test]
    fn test_list_prepend_order() {
        let mut list = AttributeList::new();
        list.push(Attribute::new("x", "1"));
        list.push(Attribute::new("y", "2"));
        let names: Vec<_> = list.iter().map(Attribute::name).collect();
        assert_eq!(names, ["y", "x"]);
    }

    #[test]
    fn test_duplicate_names_head_wins() {
        let mut list = AttributeList::new();
        list.push(Attribute::new("k", "old"));
        list.push(Attribute::new("k", "new"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get("k"), Some("new"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut attr = Attribute::new("k", "v1");
        attr.set_value("v2");
        assert_eq!(attr.value(), "v2");
    }
}
