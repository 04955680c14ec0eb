//! # Tree normalization
//!
//! Forces every deferred subtree so the tree can be inspected and serialized.
//! The walk is depth-first and pre-order:
//!
//! - **Thunk**: run the computation if the cache is empty, then descend into
//!   the cached node (also when it was already cached, since it may hold
//!   thunks of its own)
//! - **Tagger**: descend into the wrapped child
//! - **Node / KeyedNode**: descend into every child, in order
//! - **Text / Custom**: leaves; custom widgets are never looked into
//!
//! Normalization mutates thunk caches in place and nothing else. Running it
//! twice is a no-op the second time.
//!
//! Trees built from untyped data can still carry a kind outside the closed
//! set. The fixture decoder rejects those, including inside lazily decoded
//! thunks, so normalization surfaces them as [`VdomError::UnknownVariant`].

use crate::{error::VdomError, vnode::VNode};

/// Counters collected during one normalization pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeStats {
    pub nodes_visited: usize,
    pub thunks_forced: usize,
}

/// Normalizes an optional tree. An absent tree is returned unchanged.
pub fn normalize(root: Option<VNode>) -> Result<Option<VNode>, VdomError> {
    let Some(mut root) = root else {
        return Ok(None);
    };
    normalize_in_place(&mut root)?;
    Ok(Some(root))
}

/// Normalizes `root` in place, returning what the pass did.
pub fn normalize_in_place(root: &mut VNode) -> Result<NormalizeStats, VdomError> {
    let mut stats = NormalizeStats::default();
    visit(root, &mut stats)?;
    log::debug!(
        "normalized tree: {} nodes visited, {} thunks forced",
        stats.nodes_visited,
        stats.thunks_forced
    );
    Ok(stats)
}

fn visit(node: &mut VNode, stats: &mut NormalizeStats) -> Result<(), VdomError> {
    stats.nodes_visited += 1;
    match node {
        VNode::Thunk(thunk) => {
            if thunk.force()? {
                stats.thunks_forced += 1;
                log::trace!("forced thunk with {} captured args", thunk.args().len());
            }
            if let Some(resolved) = thunk.resolved_node_mut() {
                visit(resolved, stats)?;
            }
        }
        VNode::Tagger(tagger) => visit(&mut tagger.child, stats)?,
        VNode::Node(element) => {
            for child in &mut element.children {
                visit(child, stats)?;
            }
        }
        VNode::KeyedNode(element) => {
            for (_, child) in &mut element.children {
                visit(child, stats)?;
            }
        }
        VNode::Text(_) | VNode::Custom(_) => {}
    }
    Ok(())
}
