//! # Snapshots
//!
//! Turns a normalized tree into something tests can compare.
//!
//! ## Modules
//!
//! - **`serialize`**: structural transform of a tree into the `NodeSnap`
//!   format, and from there into a JSON value or JSON text
//! - **`html`**: HTML rendering of the same tree for human-readable failures
//! - **`invariants`**: checks that a tree is normalized and well formed
//!
//! ## Wire format
//!
//! Every node carries a `type` discriminant:
//!
//! ```text
//! {"type":"text","value":"hi"}
//! {"type":"node","tag":"div","facts":{},"events":[{"name":"click",...}],"children":[...]}
//! {"type":"keyed-node", ... same fields as "node" ..., "keys":[...]}   keys are opt-in
//! {"type":"tagger","node":{...}}
//! {"type":"custom","name":"chart","facts":{}}
//! ```
//!
//! Thunks have no entry of their own: a resolved thunk serializes as the node
//! it resolved to. Decoders, tagger functions, thunk computations and their
//! captured arguments never appear in the output.

pub mod html;
pub mod invariants;
pub mod serialize;

pub use html::to_html;
pub use invariants::check as invariants;
pub use serialize::{
    ElementSnap, EventSnap, NodeSnap, SnapshotOptions, SnapshotValue, TextFormat, serialize,
    serialize_with, to_json_string, to_json_string_with,
};

use crate::{error::VdomError, normalize::normalize_in_place, vnode::VNode};

/// Normalizes `root` in place and serializes the result.
pub fn snapshot(root: &mut VNode) -> Result<SnapshotValue, VdomError> {
    snapshot_with(root, &SnapshotOptions::default())
}

pub fn snapshot_with(
    root: &mut VNode,
    options: &SnapshotOptions,
) -> Result<SnapshotValue, VdomError> {
    normalize_in_place(root)?;
    serialize_with(root, options)
}
