//! Buffered byte-stream scanner.
//!
//! Reads from any source implementing `Read`, using an internal buffer for
//! efficient single-byte access. Tracks the absolute byte offset so error
//! positions survive buffer refills. Token accumulation goes through
//! [`TokenBuf`], which enforces the configured capacity instead of growing
//! without bound.

use std::io::Read;

use crate::error::{ErrorKind, XmlError};

/// Buffer size for reading chunks
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Default cap for a single accumulated token (tag name, attribute name or
/// value, text value, declaration line).
pub const DEFAULT_TOKEN_LIMIT: usize = 200;

/// Buffered scanner over a blocking byte stream.
pub struct Scanner<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    end: usize,
    eof: bool,
    /// Absolute offset of the next unread byte.
    offset: usize,
    token_limit: usize,
}

impl<R: Read> Scanner<R> {
    /// Create a scanner with the default token capacity.
    pub fn new(reader: R) -> Self {
        Self::with_token_limit(reader, DEFAULT_TOKEN_LIMIT)
    }

    /// Create a scanner with an explicit token capacity.
    pub fn with_token_limit(reader: R, token_limit: usize) -> Self {
        Scanner {
            reader,
            buffer: vec![0u8; DEFAULT_BUFFER_SIZE],
            pos: 0,
            end: 0,
            eof: false,
            offset: 0,
            token_limit,
        }
    }

    /// Absolute byte offset of the next unread byte.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Capacity bound applied to token accumulation.
    #[inline]
    pub fn token_limit(&self) -> usize {
        self.token_limit
    }

    /// A fresh accumulation buffer bound to this scanner's capacity.
    pub fn token_buf(&self) -> TokenBuf {
        TokenBuf::new(self.token_limit)
    }

    /// Fill the buffer from the reader, compacting unread bytes first.
    fn fill(&mut self) -> Result<bool, XmlError> {
        if self.eof {
            return Ok(false);
        }

        if self.pos > 0 {
            let remaining = self.end - self.pos;
            if remaining > 0 {
                self.buffer.copy_within(self.pos..self.end, 0);
            }
            self.end = remaining;
            self.pos = 0;
        }

        let read = self
            .reader
            .read(&mut self.buffer[self.end..])
            .map_err(|e| XmlError::new(ErrorKind::Io, e.to_string(), self.offset))?;
        if read == 0 {
            self.eof = true;
            Ok(false)
        } else {
            self.end += read;
            Ok(true)
        }
    }

    /// Peek at the next byte without consuming it. `None` at end of input.
    pub fn peek(&mut self) -> Result<Option<u8>, XmlError> {
        while self.pos >= self.end {
            if !self.fill()? {
                return Ok(None);
            }
        }
        Ok(Some(self.buffer[self.pos]))
    }

    /// Consume and return the next byte. `None` at end of input.
    pub fn next_byte(&mut self) -> Result<Option<u8>, XmlError> {
        match self.peek()? {
            Some(b) => {
                self.pos += 1;
                self.offset += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }
}

/// Capacity-bounded accumulation buffer.
///
/// Pushing past the limit yields `ErrorKind::BufferOverflow`; adjacent
/// memory is never at risk (ordinary `Vec` storage), the bound exists so a
/// hostile stream cannot force unbounded allocation for a single token.
pub struct TokenBuf {
    bytes: Vec<u8>,
    limit: usize,
}

impl TokenBuf {
    fn new(limit: usize) -> Self {
        TokenBuf {
            bytes: Vec::new(),
            limit,
        }
    }

    /// Append one byte, failing when the capacity is exhausted.
    pub fn push(&mut self, byte: u8, position: usize) -> Result<(), XmlError> {
        if self.bytes.len() >= self.limit {
            return Err(XmlError::at(
                ErrorKind::BufferOverflow,
                "token exceeds configured capacity",
                position,
            ));
        }
        self.bytes.push(byte);
        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer into a `String`. Input is nominally 7-bit ASCII;
    /// anything else is replaced rather than rejected.
    pub fn into_string(self) -> String {
        match String::from_utf8(self.bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}
