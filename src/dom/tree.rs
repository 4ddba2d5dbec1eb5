//! Arena-backed node tree.
//!
//! Nodes are stored in a slot vector and addressed by `NodeId`. Structural
//! edits (append, detach, subtree removal) rewrite index fields, so there is
//! no pointer graph to corrupt: a removed node's slot is recycled through a
//! free list and every surviving link is fixed up before the slot is
//! vacated.

use crate::core::tag::Tag;
use crate::error::{ErrorKind, XmlError};

use super::node::{Node, NodeId};

/// The persistent document model: an arena of nodes plus the root id.
#[derive(Debug, Default)]
pub struct NodeTree {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
}

impl NodeTree {
    pub fn new() -> Self {
        NodeTree {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
        }
    }

    /// Root node id, if a tree has been built.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    /// Get a node by id, mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id as usize).and_then(Option::as_mut)
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn alloc(&mut self, node: Node) -> Result<NodeId, XmlError> {
        if let Some(id) = self.free.pop() {
            self.slots[id as usize] = Some(node);
            return Ok(id);
        }
        if self.slots.len() >= NodeId::MAX as usize {
            return Err(XmlError::at(
                ErrorKind::AllocationFailure,
                "node arena exhausted",
                0,
            ));
        }
        let id = self.slots.len() as NodeId;
        self.slots.push(Some(node));
        Ok(id)
    }

    /// Create the root node from a tag. Fails if a root already exists:
    /// one tree holds exactly one parse result.
    pub fn attach_root(&mut self, tag: Tag) -> Result<NodeId, XmlError> {
        if self.root.is_some() {
            return Err(XmlError::at(
                ErrorKind::UnbalancedTags,
                "tree already has a root",
                0,
            ));
        }
        let id = self.alloc(Node::from_tag(tag))?;
        self.root = Some(id);
        Ok(id)
    }

    /// Create a node from a tag and append it as `parent`'s last child.
    pub fn append_child(&mut self, parent: NodeId, tag: Tag) -> Result<NodeId, XmlError> {
        if self.get(parent).is_none() {
            return Err(XmlError::at(
                ErrorKind::NotFound,
                "parent node does not exist",
                0,
            ));
        }
        let child = self.alloc(Node::from_tag(tag))?;

        let mut prev_last = None;
        if let Some(p) = self.get_mut(parent) {
            prev_last = p.last_child;
            p.child_count += 1;
            p.last_child = Some(child);
            if p.first_child.is_none() {
                p.first_child = Some(child);
                p.current_child = Some(child);
            }
        }

        if let Some(last) = prev_last {
            if let Some(n) = self.get_mut(last) {
                n.next_sibling = Some(child);
            }
            if let Some(c) = self.get_mut(child) {
                c.prev_sibling = Some(last);
            }
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        Ok(child)
    }

    /// Unlink a node from its parent and siblings, fixing up the parent's
    /// first/last/current pointers and child count. The node itself (and its
    /// subtree) stays in the arena. Returns `false` when the node does not
    /// exist or has no parent.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => match n.parent {
                Some(p) => (p, n.prev_sibling, n.next_sibling),
                None => return false,
            },
            None => return false,
        };

        if let Some(p) = self.get_mut(parent) {
            p.child_count -= 1;
            if p.first_child == Some(id) {
                p.first_child = next;
            }
            if p.last_child == Some(id) {
                p.last_child = prev;
            }
            if p.current_child == Some(id) {
                p.current_child = next.or(prev);
            }
        }
        if let Some(prev_id) = prev {
            if let Some(n) = self.get_mut(prev_id) {
                n.next_sibling = next;
            }
        }
        if let Some(next_id) = next {
            if let Some(n) = self.get_mut(next_id) {
                n.prev_sibling = prev;
            }
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
            n.prev_sibling = None;
            n.next_sibling = None;
        }
        true
    }

    /// Detach a node and free its whole subtree.
    ///
    /// Unlinking happens first, so no surviving node ever references a freed
    /// slot. The subtree is torn down with an explicit work-list rather than
    /// recursion; a pathologically deep document cannot exhaust the stack.
    pub fn remove_subtree(&mut self, id: NodeId) {
        if self.get(id).is_none() {
            return;
        }
        self.detach(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut work = vec![id];
        while let Some(nid) = work.pop() {
            let node = match self.slots.get_mut(nid as usize).and_then(Option::take) {
                Some(n) => n,
                None => continue,
            };
            let mut child = node.first_child;
            while let Some(cid) = child {
                work.push(cid);
                child = self.get(cid).and_then(|c| c.next_sibling);
            }
            self.free.push(nid);
        }
    }

    /// Iterate over a node's children in document order.
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            next: self.get(id).and_then(|n| n.first_child),
        }
    }

    /// Reset a node's traversal cursor to its first child.
    pub fn rewind_children(&mut self, id: NodeId) {
        if let Some(first) = self.get(id).and_then(|n| n.first_child) {
            if let Some(n) = self.get_mut(id) {
                n.current_child = Some(first);
            }
        }
    }

    /// Return the child under the cursor and advance the cursor, or `None`
    /// once the child list is exhausted.
    pub fn next_child(&mut self, id: NodeId) -> Option<NodeId> {
        let current = self.get(id).and_then(|n| n.current_child)?;
        let following = self.get(current).and_then(|n| n.next_sibling);
        if let Some(n) = self.get_mut(id) {
            n.current_child = following;
        }
        Some(current)
    }

    /// Record a text value for a node unless one is already set: text after
    /// the first child is not modeled distinctly.
    pub(crate) fn set_value_if_unset(&mut self, id: NodeId, value: String) {
        if let Some(n) = self.get_mut(id) {
            if n.value.is_none() {
                n.value = Some(value);
            }
        }
    }

    /// Structural self-check used by the tests: child counts, sibling links,
    /// and parent back-references must all agree.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> bool {
        for (idx, slot) in self.slots.iter().enumerate() {
            let node = match slot {
                Some(n) => n,
                None => continue,
            };
            let id = idx as NodeId;

            // Walk the child list and compare against the recorded shape.
            let mut walked = 0u32;
            let mut prev: Option<NodeId> = None;
            let mut cursor = node.first_child;
            let mut last_seen = None;
            while let Some(cid) = cursor {
                let child = match self.get(cid) {
                    Some(c) => c,
                    None => return false,
                };
                if child.parent != Some(id) || child.prev_sibling != prev {
                    return false;
                }
                walked += 1;
                if walked > node.child_count {
                    return false;
                }
                last_seen = Some(cid);
                prev = Some(cid);
                cursor = child.next_sibling;
            }
            if walked != node.child_count || node.last_child != last_seen {
                return false;
            }
        }
        // Detached nodes may linger in the arena without a parent; only the
        // registered root itself is required to be parentless.
        match self.root {
            Some(r) => self.get(r).map_or(false, Node::is_root),
            None => true,
        }
    }
}

/// Iterator over a node's children.
pub struct ChildIter<'a> {
    tree: &'a NodeTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attribute::AttributeList;
    use crate::core::tag::TagKind;

    fn tag(name: &str) -> Tag {
        Tag {
            name: name.to_string(),
            attributes: AttributeList::new(),
            kind: TagKind::Opening,
        }
    }

    fn sample_tree() -> (NodeTree, NodeId, Vec<NodeId>) {
        let mut tree = NodeTree::new();
        let root = tree.attach_root(tag("root")).unwrap();
        let kids = vec![
            tree.append_child(root, tag("a")).unwrap(),
            tree.append_child(root, tag("b")).unwrap(),
            tree.append_child(root, tag("c")).unwrap(),
        ];
        (tree, root, kids)
    }

    #[test]
    fn test_append_links_siblings() {
        let (tree, root, kids) = sample_tree();
        assert!(tree.check_invariants());
        assert_eq!(tree.get(root).unwrap().child_count, 3);
        assert_eq!(tree.get(root).unwrap().first_child, Some(kids[0]));
        assert_eq!(tree.get(root).unwrap().last_child, Some(kids[2]));
        let collected: Vec<_> = tree.children(root).collect();
        assert_eq!(collected, kids);
    }

    #[test]
    fn test_second_root_rejected() {
        let mut tree = NodeTree::new();
        tree.attach_root(tag("root")).unwrap();
        let err = tree.attach_root(tag("other")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnbalancedTags);
    }

    #[test]
    fn test_detach_middle_child() {
        let (mut tree, root, kids) = sample_tree();
        assert!(tree.detach(kids[1]));
        assert!(tree.check_invariants());
        assert_eq!(tree.get(root).unwrap().child_count, 2);
        let collected: Vec<_> = tree.children(root).collect();
        assert_eq!(collected, [kids[0], kids[2]]);
        // The detached node still exists, unlinked.
        let b = tree.get(kids[1]).unwrap();
        assert!(b.parent.is_none());
        assert!(b.prev_sibling.is_none() && b.next_sibling.is_none());
    }

    #[test]
    fn test_detach_last_child_moves_cursor_back() {
        let (mut tree, root, kids) = sample_tree();
        // Point the cursor at the last child, then detach it.
        tree.get_mut(root).unwrap().current_child = Some(kids[2]);
        assert!(tree.detach(kids[2]));
        assert_eq!(tree.get(root).unwrap().current_child, Some(kids[1]));
        assert_eq!(tree.get(root).unwrap().last_child, Some(kids[1]));
    }

    #[test]
    fn test_detach_root_is_noop() {
        let (mut tree, root, _) = sample_tree();
        assert!(!tree.detach(root));
    }

    #[test]
    fn test_remove_subtree_recycles_slots() {
        let (mut tree, root, kids) = sample_tree();
        let grandchild = tree.append_child(kids[1], tag("x")).unwrap();
        assert_eq!(tree.node_count(), 5);

        tree.remove_subtree(kids[1]);
        assert!(tree.check_invariants());
        assert_eq!(tree.node_count(), 3);
        assert!(tree.get(kids[1]).is_none());
        assert!(tree.get(grandchild).is_none());

        // Freed slots are reused by later appends.
        let reused = tree.append_child(root, tag("y")).unwrap();
        assert!(reused == kids[1] || reused == grandchild);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_remove_deep_subtree_iteratively() {
        // Deep chain; would overflow the stack if teardown recursed.
        let mut tree = NodeTree::new();
        let root = tree.attach_root(tag("root")).unwrap();
        let mut cursor = root;
        for _ in 0..100_000 {
            cursor = tree.append_child(cursor, tag("n")).unwrap();
        }
        tree.remove_subtree(root);
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn test_traversal_cursor() {
        let (mut tree, root, kids) = sample_tree();
        assert_eq!(tree.next_child(root), Some(kids[0]));
        assert_eq!(tree.next_child(root), Some(kids[1]));
        assert_eq!(tree.next_child(root), Some(kids[2]));
        assert_eq!(tree.next_child(root), None);
        tree.rewind_children(root);
        assert_eq!(tree.next_child(root), Some(kids[0]));
    }
}
