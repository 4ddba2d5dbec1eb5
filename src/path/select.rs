//! Predicate node lookup.
//!
//! Resolves paths of the form `name(?attr=value)?(/...)*` to a node id.
//! Each segment is matched against a sibling chain; the optional predicate
//! requires an exact attribute match. The first matching sibling is
//! committed: on a dead end deeper in the path the walk does not back up
//! and try a later sibling.

use memchr::{memchr, memchr2};

use crate::diag::{report, Diagnostics};
use crate::dom::node::{Node, NodeId};
use crate::dom::tree::NodeTree;
use crate::error::ErrorKind;

/// One parsed path segment.
struct Segment<'p> {
    name: &'p str,
    predicate: Option<(&'p str, &'p str)>,
    rest: Option<&'p str>,
}

/// Find the first node matching `path`, scanning the sibling chain that
/// starts at `start`.
///
/// Failures (no match, or a predicate without `=`) are reported to the
/// sink as `NotFound` and yield `None`.
pub fn select_node(
    tree: &NodeTree,
    path: &str,
    start: Option<NodeId>,
    diag: &dyn Diagnostics,
) -> Option<NodeId> {
    let segment = parse_segment(path, diag)?;

    let mut cursor = start;
    while let Some(id) = cursor {
        let node = tree.get(id)?;
        if node.name == segment.name && predicate_holds(node, segment.predicate) {
            return match segment.rest {
                Some(rest) => select_node(tree, rest, node.first_child, diag),
                None => Some(id),
            };
        }
        cursor = node.next_sibling;
    }

    report(diag, ErrorKind::NotFound, "no sibling matches this segment", 0);
    None
}

fn parse_segment<'p>(path: &'p str, diag: &dyn Diagnostics) -> Option<Segment<'p>> {
    match memchr2(b'/', b'?', path.as_bytes()) {
        None => Some(Segment {
            name: path,
            predicate: None,
            rest: None,
        }),
        Some(i) if path.as_bytes()[i] == b'/' => Some(Segment {
            name: &path[..i],
            predicate: None,
            rest: Some(&path[i + 1..]),
        }),
        Some(i) => {
            let name = &path[..i];
            let after = &path[i + 1..];
            let eq = match memchr(b'=', after.as_bytes()) {
                Some(e) => e,
                None => {
                    report(
                        diag,
                        ErrorKind::NotFound,
                        "predicate is missing '='",
                        i + 1,
                    );
                    return None;
                }
            };
            let attr = &after[..eq];
            let tail = &after[eq + 1..];
            let (value, rest) = match memchr(b'/', tail.as_bytes()) {
                Some(s) => (&tail[..s], Some(&tail[s + 1..])),
                None => (tail, None),
            };
            Some(Segment {
                name,
                predicate: Some((attr, value)),
                rest,
            })
        }
    }
}

fn predicate_holds(node: &Node, predicate: Option<(&str, &str)>) -> bool {
    match predicate {
        None => true,
        Some((attr, value)) => node
            .attributes
            .iter()
            .any(|a| a.name() == attr && a.value() == value),
    }
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

    fn select(tree: &NodeTree, path: &str) -> Option<NodeId> {
        select_node(tree, path, tree.root(), &NullDiagnostics)
    }

    #[test]
    fn test_plain_descent() {
        let t = tree("<root><a><b/></a></root>");
        let found = select(&t, "root/a/b").unwrap();
        assert_eq!(t.get(found).unwrap().name, "b");
    }

    #[test]
    fn test_predicate_selects_among_siblings() {
        let t = tree("<root><item id=\"1\"/><item id=\"2\"/><item id=\"3\"/></root>");
        let found = select(&t, "root/item?id=2").unwrap();
        assert_eq!(t.get(found).unwrap().attribute("id"), Some("2"));
    }

    #[test]
    fn test_predicate_then_descend() {
        let t = tree("<root><item id=\"1\"><d>x</d></item><item id=\"2\"><d>y</d></item></root>");
        let found = select(&t, "root/item?id=2/d").unwrap();
        assert_eq!(t.get(found).unwrap().value.as_deref(), Some("y"));
    }

    #[test]
    fn test_predicate_requires_both_name_and_value() {
        let t = tree("<root><item id=\"1\"/><item kind=\"2\"/></root>");
        assert_eq!(select(&t, "root/item?id=2"), None);
    }

    #[test]
    fn test_no_match_yields_none() {
        let t = tree("<root><a/></root>");
        assert_eq!(select(&t, "root/b"), None);
        assert_eq!(select(&t, "other"), None);
    }

    #[test]
    fn test_first_match_is_committed() {
        // Both siblings are named "a" but only the second has the child;
        // the walk commits to the first and does not back up.
        let t = tree("<root><a><x/></a><a><y/></a></root>");
        assert_eq!(select(&t, "root/a/y"), None);
        assert!(select(&t, "root/a/x").is_some());
    }

    #[test]
    fn test_start_anchors_the_scan() {
        let t = tree("<root><a/><b/></root>");
        let root = t.root().unwrap();
        let first = t.children(root).next().unwrap();
        // Starting below the root, the root's own name no longer resolves.
        assert_eq!(select_node(&t, "root", Some(first), &NullDiagnostics), None);
        assert!(select_node(&t, "b", Some(first), &NullDiagnostics).is_some());
    }

    #[test]
    fn test_malformed_predicate_reports() {
        let t = tree("<root><item id=\"1\"/></root>");
        let sink = CollectingDiagnostics::default();
        assert_eq!(select_node(&t, "root/item?id", t.root(), &sink), None);
        assert!(sink.seen(ErrorKind::NotFound));
    }

    #[test]
    fn test_trailing_slash_finds_nothing() {
        let t = tree("<root><a/></root>");
        assert_eq!(select(&t, "root/a/"), None);
    }
}
