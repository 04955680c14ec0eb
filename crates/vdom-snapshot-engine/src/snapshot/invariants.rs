use std::collections::HashSet;

use crate::vnode::VNode;

/// Validates that a tree is ready to be snapshotted.
///
/// Asserts that:
/// - No thunk is left pending or poisoned
/// - Keys are unique within each keyed node
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(root: &VNode) {
    check_at(root, &mut Vec::new());
}

fn check_at(node: &VNode, path: &mut Vec<usize>) {
    match node {
        VNode::Thunk(thunk) => {
            let resolved = thunk.resolved_node().unwrap_or_else(|| {
                panic!("unresolved thunk at path {path:?} (poisoned: {})", thunk.is_poisoned())
            });
            check_at(resolved, path);
        }
        VNode::Tagger(tagger) => check_at(&tagger.child, path),
        VNode::Node(element) => {
            for (i, child) in element.children.iter().enumerate() {
                path.push(i);
                check_at(child, path);
                path.pop();
            }
        }
        VNode::KeyedNode(element) => {
            let mut seen = HashSet::new();
            for (i, (key, child)) in element.children.iter().enumerate() {
                assert!(seen.insert(key), "duplicate key {key:?} at path {path:?}");
                path.push(i);
                check_at(child, path);
                path.pop();
            }
        }
        VNode::Text(_) | VNode::Custom(_) => {}
    }
}
