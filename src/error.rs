//! Error taxonomy for parsing and queries.

use std::borrow::Cow;
use std::fmt;
use std::io;

use thiserror::Error;

/// Classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Storage for a new node could not be acquired (arena index space
    /// exhausted).
    AllocationFailure,
    /// Structurally invalid tag or attribute syntax.
    MalformedTag,
    /// The stream ended in the middle of a construct.
    UnexpectedEndOfInput,
    /// A closing tag with no open parent, or a root that was never closed.
    UnbalancedTags,
    /// A name or value outgrew the configured token capacity.
    BufferOverflow,
    /// A query path did not resolve.
    NotFound,
    /// An I/O error surfaced by the underlying stream.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::AllocationFailure => "allocation failure",
            ErrorKind::MalformedTag => "malformed tag",
            ErrorKind::UnexpectedEndOfInput => "unexpected end of input",
            ErrorKind::UnbalancedTags => "unbalanced tags",
            ErrorKind::BufferOverflow => "buffer overflow",
            ErrorKind::NotFound => "not found",
            ErrorKind::Io => "i/o error",
        };
        f.write_str(name)
    }
}

/// A parse or query failure, carrying its kind, a human-readable message,
/// and the byte offset in the input where it was detected.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message} (byte {position})")]
pub struct XmlError {
    pub kind: ErrorKind,
    pub message: Cow<'static, str>,
    pub position: usize,
}

impl XmlError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>, position: usize) -> Self {
        XmlError {
            kind,
            message: message.into(),
            position,
        }
    }

    /// Shorthand used by the readers.
    pub(crate) fn at(kind: ErrorKind, message: &'static str, position: usize) -> Self {
        Self::new(kind, message, position)
    }
}

impl From<io::Error> for XmlError {
    fn from(err: io::Error) -> Self {
        XmlError::new(ErrorKind::Io, err.to_string(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = XmlError::at(ErrorKind::MalformedTag, "unexpected character", 17);
        assert_eq!(
            err.to_string(),
            "malformed tag: unexpected character (byte 17)"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = XmlError::from(io);
        assert_eq!(err.kind, ErrorKind::Io);
    }
}
