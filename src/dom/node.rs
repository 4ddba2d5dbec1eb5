//! Tree node representation.
//!
//! Nodes live in an arena and reference each other through `NodeId` indices
//! instead of pointers; teardown and re-linking can never dangle.

use crate::core::attribute::AttributeList;
use crate::core::tag::Tag;

/// Compact node identifier (index into the arena)
pub type NodeId = u32;

/// A persistent tree element: name, optional text value, attributes, and
/// structural links.
///
/// `first_child`/`last_child`/`child_count` always agree with walking
/// `next_sibling` from `first_child`; `current_child` is a movable cursor
/// over the children used for resumable traversal.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Text content; `None` means no text was observed for this node.
    pub value: Option<String>,
    /// Reverse-document-order attribute list, moved out of the tag that
    /// produced this node.
    pub attributes: AttributeList,

    pub parent: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub current_child: Option<NodeId>,
    pub child_count: u32,
}

impl Node {
    /// Create an unlinked node from a parsed tag, taking ownership of its
    /// name and attribute list. The tag's kind has already been acted on by
    /// the builder and is not retained.
    pub fn from_tag(tag: Tag) -> Self {
        Node {
            name: tag.name,
            value: None,
            attributes: tag.attributes,
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            current_child: None,
            child_count: 0,
        }
    }

    /// First matching attribute value, scanning from the list head.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attribute::Attribute;
    use crate::core::tag::TagKind;

    #[test]
    fn test_from_tag_moves_name_and_attributes() {
        let mut attributes = AttributeList::new();
        attributes.push(Attribute::new("x", "1"));
        attributes.push(Attribute::new("y", "2"));
        let tag = Tag {
            name: "item".to_string(),
            attributes,
            kind: TagKind::Unique,
        };

        let node = Node::from_tag(tag);
        assert_eq!(node.name, "item");
        assert_eq!(node.value, None);
        assert_eq!(node.attribute("y"), Some("2"));
        assert_eq!(node.child_count, 0);
        assert!(node.is_root());
    }
}
