pub mod decode;
pub mod error;
pub mod normalize;
pub mod query;
pub mod snapshot;
pub mod vnode;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use error::VdomError;
pub use normalize::{NormalizeStats, normalize, normalize_in_place};
pub use query::{NodePath, events_at, node_at, simulate};
pub use snapshot::{
    SnapshotOptions, SnapshotValue, TextFormat, serialize, serialize_with, to_html, to_json_string,
    to_json_string_with,
};
pub use vnode::*;
