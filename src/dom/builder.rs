//! Tree-construction state machine.
//!
//! Consumes the tag sequence produced by the tag reader and folds it into a
//! [`NodeTree`], maintaining a cursor over the currently open node. Closing
//! tags are matched structurally, not by name: documents in the wild carry
//! mismatched closing names and rely on them being accepted.

use std::io::Read;

use crate::core::scanner::Scanner;
use crate::core::tag::{read_tag, read_text, TagKind};
use crate::diag::{report, Diagnostics};
use crate::error::{ErrorKind, XmlError};

use super::node::NodeId;
use super::tree::NodeTree;

/// Where the builder is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    /// No tag consumed yet.
    AwaitingRoot,
    /// A node is open; new children attach beneath the cursor.
    Open(NodeId),
    /// The root has been closed.
    Done(NodeId),
}

/// Build a tree from the tag stream.
///
/// Any failure discards the partially built tree (it is dropped with this
/// frame) and propagates the error; there is no recovery or partial result.
pub fn build_tree<R: Read>(
    scanner: &mut Scanner<R>,
    diag: &dyn Diagnostics,
) -> Result<NodeTree, XmlError> {
    let mut tree = NodeTree::new();
    let mut state = BuilderState::AwaitingRoot;

    loop {
        match state {
            BuilderState::AwaitingRoot => {
                let tag = read_tag(scanner, diag)?;
                match tag.kind {
                    TagKind::Closing => {
                        return Err(report(
                            diag,
                            ErrorKind::UnbalancedTags,
                            "first tag is a closing tag",
                            scanner.position(),
                        ));
                    }
                    TagKind::Unique => {
                        let root = tree.attach_root(tag)?;
                        state = BuilderState::Done(root);
                    }
                    TagKind::Opening => {
                        let root = tree.attach_root(tag)?;
                        state = BuilderState::Open(root);
                    }
                    TagKind::Unknown => {
                        return Err(report(
                            diag,
                            ErrorKind::MalformedTag,
                            "tag kind could not be determined",
                            scanner.position(),
                        ));
                    }
                }
            }

            BuilderState::Open(cursor) => {
                // Text between this node's tags; only the first value read
                // for a node sticks.
                match read_text(scanner, diag) {
                    Ok(Some(text)) => {
                        if !text.is_empty() {
                            tree.set_value_if_unset(cursor, text);
                        }
                    }
                    Ok(None) => {}
                    Err(e) if e.kind == ErrorKind::UnexpectedEndOfInput => {
                        // The stream ran out at a point where a tag could
                        // legally start: the root was never closed.
                        return Err(report(
                            diag,
                            ErrorKind::UnbalancedTags,
                            "input ended before the root was closed",
                            scanner.position(),
                        ));
                    }
                    Err(e) => return Err(e),
                }

                let tag = read_tag(scanner, diag)?;
                match tag.kind {
                    TagKind::Opening => {
                        let child = tree.append_child(cursor, tag)?;
                        state = BuilderState::Open(child);
                    }
                    TagKind::Unique => {
                        tree.append_child(cursor, tag)?;
                    }
                    TagKind::Closing => {
                        state = match tree.get(cursor).and_then(|n| n.parent) {
                            Some(parent) => BuilderState::Open(parent),
                            None => BuilderState::Done(cursor),
                        };
                    }
                    TagKind::Unknown => {
                        return Err(report(
                            diag,
                            ErrorKind::MalformedTag,
                            "tag kind could not be determined",
                            scanner.position(),
                        ));
                    }
                }
            }

            BuilderState::Done(last) => {
                // Closing tags must have walked the cursor back to the root.
                if tree.root() != Some(last) {
                    return Err(report(
                        diag,
                        ErrorKind::UnbalancedTags,
                        "last closed node is not the root",
                        scanner.position(),
                    ));
                }
                return Ok(tree);
            }
        }
    }
}
