//! Core parsing primitives
//!
//! The character-level half of the crate:
//! - Scanner: buffered byte access over any `Read` with bounded token buffers
//! - Attribute: `name="value"` pairs and the prepend-ordered attribute list
//! - Tag: the `<...>` unit reader and the between-tags text scanner

pub mod attribute;
pub mod scanner;
pub mod tag;

pub use attribute::{read_attribute, Attribute, AttributeList};
pub use scanner::{Scanner, DEFAULT_TOKEN_LIMIT};
pub use tag::{read_tag, read_text, Tag, TagKind};
