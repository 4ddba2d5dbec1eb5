//! Document facade.
//!
//! Ties the pieces together: opens a source, checks the declaration line,
//! runs the tree builder, and exposes the query surface (path lookups and
//! typed getters) over the finished tree.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::scanner::{Scanner, DEFAULT_TOKEN_LIMIT};
use crate::diag::{Diagnostics, LogDiagnostics};
use crate::dom::builder::build_tree;
use crate::dom::node::NodeId;
use crate::dom::tree::NodeTree;
use crate::error::{ErrorKind, XmlError};
use crate::path::select::select_node;
use crate::path::value::resolve_value;

/// Expected first line of a source, minus the line feed.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Knobs for parsing.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Cap on any single accumulated token (names, values, the declaration
    /// line). Exceeding it fails the parse with `BufferOverflow`.
    pub max_token_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_token_len: DEFAULT_TOKEN_LIMIT,
        }
    }
}

/// A parsed document: one tree, where it came from, and whether the
/// declaration line matched.
pub struct Document {
    source_path: Option<PathBuf>,
    declaration_ok: bool,
    tree: NodeTree,
    diag: Arc<dyn Diagnostics>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("source_path", &self.source_path)
            .field("declaration_ok", &self.declaration_ok)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Load and parse a file, logging diagnostics through the `log` facade.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Document, XmlError> {
        Self::load_with(path, ParseOptions::default(), Arc::new(LogDiagnostics))
    }

    /// Load and parse a file with explicit options and diagnostics sink.
    pub fn load_with<P: AsRef<Path>>(
        path: P,
        options: ParseOptions,
        diag: Arc<dyn Diagnostics>,
    ) -> Result<Document, XmlError> {
        let file = File::open(path.as_ref()).map_err(|e| {
            let err = XmlError::from(e);
            diag.report(&err);
            err
        })?;
        let mut doc = Self::from_reader_with(file, options, diag)?;
        doc.source_path = Some(path.as_ref().to_path_buf());
        Ok(doc)
    }

    /// Parse from any byte stream, logging diagnostics through `log`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Document, XmlError> {
        Self::from_reader_with(reader, ParseOptions::default(), Arc::new(LogDiagnostics))
    }

    /// Parse from any byte stream with explicit options and sink.
    ///
    /// The first line is always consumed and compared verbatim against
    /// [`XML_DECLARATION`]; a mismatch is advisory (see
    /// [`declaration_ok`](Self::declaration_ok)) and parsing continues with
    /// the remainder of the stream.
    pub fn from_reader_with<R: Read>(
        reader: R,
        options: ParseOptions,
        diag: Arc<dyn Diagnostics>,
    ) -> Result<Document, XmlError> {
        let mut scanner = Scanner::with_token_limit(reader, options.max_token_len);
        let declaration_ok = check_first_line(&mut scanner).map_err(|e| {
            diag.report(&e);
            e
        })?;
        // Structural failures are reported at their source; raw stream
        // failures surface here without having passed through a sink.
        let tree = build_tree(&mut scanner, diag.as_ref()).map_err(|e| {
            if e.kind == ErrorKind::Io {
                diag.report(&e);
            }
            e
        })?;
        Ok(Document {
            source_path: None,
            declaration_ok,
            tree,
            diag,
        })
    }

    /// Path of the source file, when loaded from one.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Whether the first line matched the expected XML declaration.
    pub fn declaration_ok(&self) -> bool {
        self.declaration_ok
    }

    /// The underlying tree.
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// The underlying tree, mutably (detach/remove edits).
    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    /// Root node id.
    pub fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    /// Value/attribute lookup: `root/foo/bar$` for a node's text value,
    /// `root/foo/bar:name` for an attribute value. The first segment names
    /// the root itself.
    pub fn value(&self, path: &str) -> Option<&str> {
        resolve_value(&self.tree, path, self.diag.as_ref())
    }

    /// Predicate node lookup starting at `start`'s sibling level:
    /// `item?id=2/detail` walks siblings named `item` carrying `id="2"` and
    /// descends into their children on `/`.
    pub fn select(&self, path: &str, start: NodeId) -> Option<NodeId> {
        select_node(&self.tree, path, Some(start), self.diag.as_ref())
    }

    /// Predicate node lookup starting at the root's sibling level (the
    /// first segment names the root).
    pub fn find_node(&self, path: &str) -> Option<NodeId> {
        select_node(&self.tree, path, self.tree.root(), self.diag.as_ref())
    }

    /// String lookup with a default for unresolved paths.
    pub fn get_str<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.value(path).unwrap_or(default)
    }

    /// Integer lookup; unresolved paths and unparseable text both yield the
    /// default.
    pub fn get_int(&self, path: &str, default: i64) -> i64 {
        self.value(path)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(default)
    }

    /// Boolean lookup recognizing exactly `"true"` and `"false"`; anything
    /// else yields the default.
    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        match self.value(path) {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }

    /// Float lookup; unresolved paths and unparseable text both yield the
    /// default.
    pub fn get_double(&self, path: &str, default: f64) -> f64 {
        self.value(path)
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(default)
    }
}

/// Consume the first line and compare it against the expected declaration.
///
/// The comparison result is advisory. The line is consumed whether or not
/// it matches; a missing newline or a line longer than the token cap simply
/// reports a mismatch.
fn check_first_line<R: Read>(scanner: &mut Scanner<R>) -> Result<bool, XmlError> {
    let expected = XML_DECLARATION.as_bytes();
    let mut matched = 0usize;
    let mut exact = true;
    let mut read = 0usize;

    loop {
        if read >= scanner.token_limit() {
            return Ok(false);
        }
        match scanner.peek()? {
            Some(b'\n') => {
                scanner.next_byte()?;
                return Ok(exact && matched == expected.len());
            }
            Some(b) => {
                scanner.next_byte()?;
                read += 1;
                if matched < expected.len() && b == expected[matched] {
                    matched += 1;
                } else {
                    exact = false;
                }
            }
            None => return Ok(false),
        }
    }
}
