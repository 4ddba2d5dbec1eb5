//! Tag reader and text-value scanner.
//!
//! A [`Tag`] is a transient parse artifact describing one `<...>` unit. It
//! is produced here, folded into a node by the tree builder, and discarded
//! before the next tag is read. The text scanner handles the bytes between
//! a tag and the next one, yielding an optional node value.

use std::io::Read;

use crate::diag::{report, Diagnostics};
use crate::error::{ErrorKind, XmlError};

use super::attribute::{read_attribute, AttributeList};
use super::scanner::Scanner;

/// What a tag does to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`: opens a node.
    Opening,
    /// `</name>`: closes the innermost open node.
    Closing,
    /// `<name .../>`: opens and closes a node of its own.
    Unique,
    /// Not yet determined; never escapes the reader.
    Unknown,
}

/// One parsed `<...>` unit.
#[derive(Debug, Clone)]
pub struct Tag {
    pub name: String,
    pub attributes: AttributeList,
    pub kind: TagKind,
}

/// Read one tag from the stream.
///
/// The scanner may be positioned either at the opening `<` or just past it
/// (the text scanner consumes the `<` it stops on). The name runs until a
/// space, `>`, `/`, or end of input; a space hands control to the attribute
/// reader until `>` or `/>` terminates the tag.
pub fn read_tag<R: Read>(
    scanner: &mut Scanner<R>,
    diag: &dyn Diagnostics,
) -> Result<Tag, XmlError> {
    // Consume the opening '<' if the previous scan has not already done so.
    if scanner.peek()? == Some(b'<') {
        scanner.next_byte()?;
    }

    let mut kind = TagKind::Unknown;
    if scanner.peek()? == Some(b'/') {
        scanner.next_byte()?;
        kind = TagKind::Closing;
    }

    let mut name = scanner.token_buf();
    let terminator = loop {
        match scanner.next_byte()? {
            Some(b @ (b' ' | b'>' | b'/')) => break b,
            Some(b) => name.push(b, scanner.position()).map_err(|e| {
                diag.report(&e);
                e
            })?,
            None => {
                return Err(report(
                    diag,
                    ErrorKind::UnexpectedEndOfInput,
                    "end of input while reading a tag name",
                    scanner.position(),
                ))
            }
        }
    };

    let mut tag = Tag {
        name: name.into_string(),
        attributes: AttributeList::new(),
        kind,
    };

    match terminator {
        b'>' => {
            if tag.kind == TagKind::Unknown {
                tag.kind = TagKind::Opening;
            }
        }
        b'/' => {
            if tag.kind == TagKind::Closing {
                return Err(report(
                    diag,
                    ErrorKind::MalformedTag,
                    "closing tag cannot also be self-closing",
                    scanner.position(),
                ));
            }
            tag.kind = TagKind::Unique;
            expect_closing_angle(scanner, diag)?;
        }
        b' ' => {
            // A space is only valid while the kind is still open: it
            // announces attributes on an opening or unique tag.
            if tag.kind != TagKind::Unknown {
                return Err(report(
                    diag,
                    ErrorKind::MalformedTag,
                    "unexpected space in a closing tag",
                    scanner.position(),
                ));
            }
            loop {
                let attr = read_attribute(scanner, diag)?;
                tag.attributes.push(attr);
                match scanner.next_byte()? {
                    Some(b' ') => continue,
                    Some(b'>') => {
                        tag.kind = TagKind::Opening;
                        break;
                    }
                    Some(b'/') => {
                        tag.kind = TagKind::Unique;
                        expect_closing_angle(scanner, diag)?;
                        break;
                    }
                    Some(_) => {
                        return Err(report(
                            diag,
                            ErrorKind::MalformedTag,
                            "unexpected character after an attribute",
                            scanner.position(),
                        ))
                    }
                    None => {
                        return Err(report(
                            diag,
                            ErrorKind::UnexpectedEndOfInput,
                            "end of input inside a tag",
                            scanner.position(),
                        ))
                    }
                }
            }
        }
        _ => unreachable!("name loop only breaks on ' ', '>', '/'"),
    }

    Ok(tag)
}

/// `/` inside a tag must be followed immediately by `>`.
fn expect_closing_angle<R: Read>(
    scanner: &mut Scanner<R>,
    diag: &dyn Diagnostics,
) -> Result<(), XmlError> {
    match scanner.next_byte()? {
        Some(b'>') => Ok(()),
        Some(_) => Err(report(
            diag,
            ErrorKind::MalformedTag,
            "'/' in a tag must be followed by '>'",
            scanner.position(),
        )),
        None => Err(report(
            diag,
            ErrorKind::UnexpectedEndOfInput,
            "end of input after '/'",
            scanner.position(),
        )),
    }
}

/// Scan the text between a tag and the next one.
///
/// Bytes outside the printable range `'!'..='~'` are skipped until the first
/// printable byte starts accumulation; from there bytes in `' '..='~'` are
/// kept until `<`, LF, or CR. A stop at a line break keeps what was read and
/// discards the rest of the text up to the next `<`. The `<` is always
/// consumed; reaching `<` before any printable byte means "no value".
///
/// End of input before a `<` is `UnexpectedEndOfInput`; the builder decides
/// whether that means a truncated document or an unclosed root.
pub fn read_text<R: Read>(
    scanner: &mut Scanner<R>,
    diag: &dyn Diagnostics,
) -> Result<Option<String>, XmlError> {
    let mut buf = scanner.token_buf();

    // Reach the first useful character.
    loop {
        match scanner.next_byte()? {
            Some(b'<') => return Ok(None),
            Some(b @ b'!'..=b'~') => {
                buf.push(b, scanner.position()).map_err(|e| {
                    diag.report(&e);
                    e
                })?;
                break;
            }
            Some(_) => continue,
            None => {
                return Err(report(
                    diag,
                    ErrorKind::UnexpectedEndOfInput,
                    "end of input while scanning for text or a tag",
                    scanner.position(),
                ))
            }
        }
    }

    // Accumulate; spaces are kept now.
    let stopped_at_break = loop {
        match scanner.next_byte()? {
            Some(b'<') => break false,
            Some(b'\n') | Some(b'\r') => break true,
            Some(b @ b' '..=b'~') => buf.push(b, scanner.position()).map_err(|e| {
                diag.report(&e);
                e
            })?,
            Some(_) => continue,
            None => {
                return Err(report(
                    diag,
                    ErrorKind::UnexpectedEndOfInput,
                    "end of input while reading a node's value",
                    scanner.position(),
                ))
            }
        }
    };

    // Text after an embedded line break is not modeled; drop it and leave
    // the stream just past the next '<'.
    if stopped_at_break {
        loop {
            match scanner.next_byte()? {
                Some(b'<') => break,
                Some(_) => continue,
                None => {
                    return Err(report(
                        diag,
                        ErrorKind::UnexpectedEndOfInput,
                        "end of input while reading a node's value",
                        scanner.position(),
                    ))
                }
            }
        }
    }

    Ok(Some(buf.into_string()))
}
