use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::VdomError,
    vnode::{EventTable, Facts, VNode},
};

/// JSON-compatible structural representation of a normalized tree.
pub type SnapshotValue = Value;

/// Text layout of a serialized snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextFormat {
    /// Single line, no whitespace.
    #[default]
    Compact,
    /// Two-space indented.
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SnapshotOptions {
    pub format: TextFormat,
    /// Emit the `keys` array on keyed nodes. Off by default: keys matter for
    /// diffing, not for what the view looks like.
    pub include_keys: bool,
    pub include_facts: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            format: TextFormat::Compact,
            include_keys: false,
            include_facts: true,
        }
    }
}

/// Snapshot of one node. `type` carries the discriminant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeSnap {
    Text {
        value: String,
    },
    Node(ElementSnap),
    KeyedNode(ElementSnap),
    Tagger {
        node: Box<NodeSnap>,
    },
    Custom {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        facts: Option<Facts>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnap {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facts: Option<Facts>,
    pub events: Vec<EventSnap>,
    pub children: Vec<NodeSnap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
}

/// An event handler as it appears in a snapshot: by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnap {
    pub name: String,
    pub stop_propagation: bool,
    pub prevent_default: bool,
}

/// Builds the snapshot of a normalized tree.
///
/// Resolved thunks are transparent and serialize as the node they resolved
/// to. A pending thunk is a caller error reported as
/// [`VdomError::UnresolvedThunk`]; it is never forced here.
pub fn build(node: &VNode, options: &SnapshotOptions) -> Result<NodeSnap, VdomError> {
    let facts = |facts: &Facts| options.include_facts.then(|| facts.clone());

    let snap = match node {
        VNode::Text(value) => NodeSnap::Text {
            value: value.clone(),
        },
        VNode::Node(element) => NodeSnap::Node(ElementSnap {
            tag: element.tag.clone(),
            namespace: element.namespace.clone(),
            facts: facts(&element.facts),
            events: events(&element.events),
            children: element
                .children
                .iter()
                .map(|child| build(child, options))
                .collect::<Result<_, _>>()?,
            keys: None,
        }),
        VNode::KeyedNode(element) => NodeSnap::KeyedNode(ElementSnap {
            tag: element.tag.clone(),
            namespace: element.namespace.clone(),
            facts: facts(&element.facts),
            events: events(&element.events),
            children: element
                .children
                .iter()
                .map(|(_, child)| build(child, options))
                .collect::<Result<_, _>>()?,
            keys: options
                .include_keys
                .then(|| element.children.iter().map(|(key, _)| key.clone()).collect()),
        }),
        VNode::Tagger(tagger) => NodeSnap::Tagger {
            node: Box::new(build(&tagger.child, options)?),
        },
        VNode::Thunk(_) => build(node.peel_thunks()?, options)?,
        VNode::Custom(custom) => NodeSnap::Custom {
            name: custom.name.clone(),
            facts: facts(&custom.facts),
        },
    };
    Ok(snap)
}

fn events(table: &EventTable) -> Vec<EventSnap> {
    table
        .iter()
        .map(|(name, descriptor)| EventSnap {
            name: name.to_string(),
            stop_propagation: descriptor.options.stop_propagation,
            prevent_default: descriptor.options.prevent_default,
        })
        .collect()
}

pub fn serialize(root: &VNode) -> Result<SnapshotValue, VdomError> {
    serialize_with(root, &SnapshotOptions::default())
}

pub fn serialize_with(root: &VNode, options: &SnapshotOptions) -> Result<SnapshotValue, VdomError> {
    Ok(serde_json::to_value(build(root, options)?)?)
}

/// Renders the snapshot as JSON text. An absent tree renders as `""`.
pub fn to_json_string(root: Option<&VNode>) -> Result<String, VdomError> {
    to_json_string_with(root, &SnapshotOptions::default())
}

pub fn to_json_string_with(
    root: Option<&VNode>,
    options: &SnapshotOptions,
) -> Result<String, VdomError> {
    let Some(root) = root else {
        return Ok(String::new());
    };
    let snap = build(root, options)?;
    let text = match options.format {
        TextFormat::Compact => serde_json::to_string(&snap)?,
        TextFormat::Pretty => serde_json::to_string_pretty(&snap)?,
    };
    Ok(text)
}
