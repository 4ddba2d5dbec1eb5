//! Path queries
//!
//! Two small grammars over the finished tree:
//! - value paths (`root/foo/bar$`, `root/foo/bar:attr`) resolving to text
//!   or attribute values
//! - node paths with predicates (`root/item?id=2/detail`) resolving to a
//!   node id
//!
//! Both are resolved with borrowed slices of the path string; nothing is
//! allocated and the tree is never modified.

pub mod select;
pub mod value;

pub use select::select_node;
pub use value::resolve_value;
