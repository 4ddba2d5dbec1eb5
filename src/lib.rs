//! minixml - Restricted-dialect XML reader
//!
//! Layers:
//! - core: byte scanner plus attribute/tag/text readers
//! - dom: arena node tree, the tree builder, and the Document facade
//! - path: slash-path value lookup and predicate node selection
//!
//! The dialect is deliberately small: no entities, no CDATA or comments,
//! no namespaces, printable-ASCII names and values, double-quoted
//! attributes only. Closing tags are matched structurally rather than by
//! name, and attribute lists hold reverse document order; both are part of
//! the dialect's contract.

pub mod core;
pub mod diag;
pub mod dom;
pub mod error;
pub mod path;

pub use crate::core::attribute::{read_attribute, Attribute, AttributeList};
pub use crate::core::scanner::Scanner;
pub use crate::core::tag::{read_tag, read_text, Tag, TagKind};
pub use crate::diag::{Diagnostics, LogDiagnostics, NullDiagnostics};
pub use crate::dom::builder::build_tree;
pub use crate::dom::document::{Document, ParseOptions, XML_DECLARATION};
pub use crate::dom::node::{Node, NodeId};
pub use crate::dom::tree::{ChildIter, NodeTree};
pub use crate::error::{ErrorKind, XmlError};
pub use crate::path::select::select_node;
pub use crate::path::value::resolve_value;
