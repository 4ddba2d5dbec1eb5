//! Document model
//!
//! The structural half of the crate:
//! - Node/NodeTree: arena storage with NodeId (u32) indices, doubly linked
//!   sibling order, per-parent traversal cursor, work-list teardown
//! - builder: the state machine folding tags into a tree
//! - Document: source handling, declaration check, queries, typed getters

pub mod builder;
pub mod document;
pub mod node;
pub mod tree;

pub use builder::build_tree;
pub use document::{Document, ParseOptions, XML_DECLARATION};
pub use node::{Node, NodeId};
pub use tree::{ChildIter, NodeTree};
