//! Value and attribute lookup.
//!
//! Resolves paths of the form `segment(/segment)*` ending in `$` (text
//! value) or `:attrName` (attribute value), e.g. `root/foo/bar$` or
//! `root/foo/bar:baz`. Resolution starts at the root's own sibling level,
//! so the first segment names the root. Comparison is byte-exact and
//! case-sensitive.

use memchr::memchr3;

use crate::diag::{report, Diagnostics};
use crate::dom::node::NodeId;
use crate::dom::tree::NodeTree;
use crate::error::ErrorKind;

/// Resolve a value/attribute path against the tree.
///
/// Failures are reported to the sink as `NotFound` (with the offset into
/// the path string) and yield `None`; the tree is never affected.
pub fn resolve_value<'t>(
    tree: &'t NodeTree,
    path: &str,
    diag: &dyn Diagnostics,
) -> Option<&'t str> {
    let mut rest = path;
    let mut level = tree.root();

    loop {
        let consumed = path.len() - rest.len();
        let idx = match memchr3(b'/', b':', b'$', rest.as_bytes()) {
            Some(i) => i,
            None => {
                report(
                    diag,
                    ErrorKind::NotFound,
                    "path ends without ':' or '$'",
                    consumed,
                );
                return None;
            }
        };
        let segment = &rest[..idx];
        let delimiter = rest.as_bytes()[idx];

        let found = match find_sibling(tree, level, segment) {
            Some(id) => id,
            None => {
                report(
                    diag,
                    ErrorKind::NotFound,
                    "no node with this name at this level",
                    consumed,
                );
                return None;
            }
        };

        match delimiter {
            b'/' => {
                level = tree.get(found).and_then(|n| n.first_child);
                rest = &rest[idx + 1..];
            }
            b'$' => {
                return match tree.get(found).and_then(|n| n.value.as_deref()) {
                    Some(v) => Some(v),
                    None => {
                        report(diag, ErrorKind::NotFound, "node has no value", consumed);
                        None
                    }
                };
            }
            _ => {
                // ':' means the remainder of the path is the attribute name.
                let attr_name = &rest[idx + 1..];
                return match tree.get(found).and_then(|n| n.attributes.get(attr_name)) {
                    Some(v) => Some(v),
                    None => {
                        report(
                            diag,
                            ErrorKind::NotFound,
                            "no attribute with this name",
                            consumed,
                        );
                        None
                    }
                };
            }
        }
    }
}

/// First node in the sibling chain whose name matches.
fn find_sibling(tree: &NodeTree, start: Option<NodeId>, name: &str) -> Option<NodeId> {
    let mut cursor = start;
    while let Some(id) = cursor {
        let node = tree.get(id)?;
        if node.name == name {
            return Some(id);
        }
        cursor = node.next_sibling;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::Scanner;
    use crate::diag::testing::CollectingDiagnostics;
    use crate::diag::NullDiagnostics;
    use crate::dom::builder::build_tree;

    fn tree(input: &str) -> NodeTree {
        let mut scanner = Scanner::new(input.as_bytes());
        build_tree(&mut scanner, &NullDiagnostics).unwrap()
    }

    fn value<'t>(tree: &'t NodeTree, path: &str) -> Option<&'t str> {
        resolve_value(tree, path, &NullDiagnostics)
    }

    #[test]
    fn test_text_value() {
        let t = tree("<root><foo><bar baz=\"1\">hi</bar></foo></root>");
        assert_eq!(value(&t, "root/foo/bar$"), Some("hi"));
    }

    #[test]
    fn test_attribute_value() {
        let t = tree("<root><foo><bar baz=\"1\">hi</bar></foo></root>");
        assert_eq!(value(&t, "root/foo/bar:baz"), Some("1"));
    }

    #[test]
    fn test_missing_node() {
        let t = tree("<root><foo><bar baz=\"1\">hi</bar></foo></root>");
        assert_eq!(value(&t, "root/foo/missing$"), None);
    }

    #[test]
    fn test_missing_attribute() {
        let t = tree("<root><foo><bar baz=\"1\">hi</bar></foo></root>");
        assert_eq!(value(&t, "root/foo/bar:nope"), None);
    }

    #[test]
    fn test_absent_value_is_not_found() {
        let t = tree("<root><empty/></root>");
        assert_eq!(value(&t, "root/empty$"), None);
    }

    #[test]
    fn test_wrong_root_name() {
        let t = tree("<root><a>x</a></root>");
        assert_eq!(value(&t, "other/a$"), None);
    }

    #[test]
    fn test_case_sensitive() {
        let t = tree("<root><Item>x</Item></root>");
        assert_eq!(value(&t, "root/item$"), None);
        assert_eq!(value(&t, "root/Item$"), Some("x"));
    }

    #[test]
    fn test_sibling_scan_takes_first_match() {
        let t = tree("<root><a>one</a><a>two</a></root>");
        assert_eq!(value(&t, "root/a$"), Some("one"));
    }

    #[test]
    fn test_duplicate_attribute_head_wins() {
        // The later attribute in document order sits at the list head.
        let t = tree("<root><n k=\"doc-first\" k=\"doc-second\">x</n></root>");
        assert_eq!(value(&t, "root/n:k"), Some("doc-second"));
    }

    #[test]
    fn test_unterminated_path_reports_not_found() {
        let t = tree("<root><a>x</a></root>");
        let sink = CollectingDiagnostics::default();
        assert_eq!(resolve_value(&t, "root/a", &sink), None);
        assert!(sink.seen(ErrorKind::NotFound));
    }
}
