//! # Virtual-DOM model
//!
//! A rendered view is a tree of [`VNode`]s. The set of node kinds is closed:
//! anything a rendering library produces that does not fit one of the
//! ordinary kinds is carried as an opaque [`Custom`] leaf.
//!
//! ```text
//! VNode
//! ├── Text        "hello"
//! ├── Node        tag + facts + events + children
//! ├── KeyedNode   tag + facts + events + (key, child) pairs
//! ├── Tagger      message mapper wrapping one child
//! ├── Thunk       deferred subtree, resolved once by normalization
//! └── Custom      opaque widget, never traversed
//! ```

pub mod events;
pub mod thunk;

use std::{fmt, rc::Rc};

use serde_json::Value;

use crate::error::VdomError;

pub use events::{
    DecodeError, Decoder, EventDescriptor, EventOptions, EventTable, find_event_decoder,
};
pub use thunk::{Thunk, ThunkArg};

/// Attributes, properties and styles of an element, in insertion order.
pub type Facts = serde_json::Map<String, Value>;

/// Discriminant of a [`VNode`], with the string tags used by the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Node,
    KeyedNode,
    Tagger,
    Thunk,
    Custom,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Text,
        NodeKind::Node,
        NodeKind::KeyedNode,
        NodeKind::Tagger,
        NodeKind::Thunk,
        NodeKind::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Node => "node",
            NodeKind::KeyedNode => "keyed-node",
            NodeKind::Tagger => "tagger",
            NodeKind::Thunk => "thunk",
            NodeKind::Custom => "custom",
        }
    }

    pub fn parse(tag: &str) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum VNode {
    Text(String),
    Node(Element),
    KeyedNode(KeyedElement),
    Tagger(Tagger),
    Thunk(Thunk),
    Custom(Custom),
}

#[derive(Debug, Default)]
pub struct Element {
    pub tag: String,
    pub namespace: Option<String>,
    pub facts: Facts,
    pub events: EventTable,
    pub children: Vec<VNode>,
}

/// An element whose children carry stable keys for diffing.
#[derive(Debug, Default)]
pub struct KeyedElement {
    pub tag: String,
    pub namespace: Option<String>,
    pub facts: Facts,
    pub events: EventTable,
    pub children: Vec<(String, VNode)>,
}

/// Maps every message produced below it. Has no events of its own.
#[derive(Debug)]
pub struct Tagger {
    pub mapper: MessageMapper,
    pub child: Box<VNode>,
}

#[derive(Clone)]
pub struct MessageMapper(Rc<dyn Fn(Value) -> Value>);

impl MessageMapper {
    pub fn new<F>(map: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        Self(Rc::new(map))
    }

    pub fn apply(&self, message: Value) -> Value {
        (self.0)(message)
    }
}

impl fmt::Debug for MessageMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MessageMapper(<opaque>)")
    }
}

/// A node managed outside the virtual DOM, e.g. a third-party widget.
#[derive(Debug, Default)]
pub struct Custom {
    pub name: String,
    pub facts: Facts,
    /// Widget state. Opaque to normalization and never serialized.
    pub model: Value,
}

impl VNode {
    pub fn text(value: impl Into<String>) -> Self {
        VNode::Text(value.into())
    }

    pub fn node(tag: impl Into<String>, children: Vec<VNode>) -> Self {
        VNode::Node(Element::new(tag).with_children(children))
    }

    pub fn keyed<K: Into<String>>(tag: impl Into<String>, children: Vec<(K, VNode)>) -> Self {
        VNode::KeyedNode(KeyedElement::new(tag).with_children(children))
    }

    /// Wraps `child` so that its messages pass through `map`.
    pub fn map<F>(map: F, child: VNode) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        VNode::Tagger(Tagger {
            mapper: MessageMapper::new(map),
            child: Box::new(child),
        })
    }

    pub fn lazy<F>(compute: F) -> Self
    where
        F: FnOnce() -> VNode + 'static,
    {
        VNode::Thunk(Thunk::new(Vec::new(), move |_| compute()))
    }

    pub fn lazy_with<F>(args: Vec<ThunkArg>, compute: F) -> Self
    where
        F: FnOnce(&[ThunkArg]) -> VNode + 'static,
    {
        VNode::Thunk(Thunk::new(args, compute))
    }

    pub fn custom(name: impl Into<String>, model: Value) -> Self {
        VNode::Custom(Custom {
            name: name.into(),
            facts: Facts::new(),
            model,
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            VNode::Text(_) => NodeKind::Text,
            VNode::Node(_) => NodeKind::Node,
            VNode::KeyedNode(_) => NodeKind::KeyedNode,
            VNode::Tagger(_) => NodeKind::Tagger,
            VNode::Thunk(_) => NodeKind::Thunk,
            VNode::Custom(_) => NodeKind::Custom,
        }
    }

    /// Follows resolved thunks down to the node they stand for.
    pub fn peel_thunks(&self) -> Result<&VNode, VdomError> {
        let mut current = self;
        while let VNode::Thunk(thunk) = current {
            current = match thunk.resolved_node() {
                Some(node) => node,
                None if thunk.is_poisoned() => return Err(VdomError::PoisonedThunk),
                None => return Err(VdomError::UnresolvedThunk),
            };
        }
        Ok(current)
    }

    /// Event table of an element node; `None` for every other kind.
    pub fn events(&self) -> Option<&EventTable> {
        match self {
            VNode::Node(element) => Some(&element.events),
            VNode::KeyedNode(element) => Some(&element.events),
            _ => None,
        }
    }
}

impl From<Element> for VNode {
    fn from(element: Element) -> Self {
        VNode::Node(element)
    }
}

impl From<KeyedElement> for VNode {
    fn from(element: KeyedElement) -> Self {
        VNode::KeyedNode(element)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_fact(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.facts.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<VNode>) -> Self {
        self.children = children;
        self
    }

    pub fn on(mut self, event: impl Into<String>, decoder: Decoder) -> Self {
        self.events.insert(event, EventDescriptor::new(decoder));
        self
    }

    pub fn on_with(
        mut self,
        event: impl Into<String>,
        decoder: Decoder,
        options: EventOptions,
    ) -> Self {
        self.events
            .insert(event, EventDescriptor::with_options(decoder, options));
        self
    }
}

impl KeyedElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_fact(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.facts.insert(name.into(), value.into());
        self
    }

    pub fn with_children<K: Into<String>>(mut self, children: Vec<(K, VNode)>) -> Self {
        self.children = children
            .into_iter()
            .map(|(key, child)| (key.into(), child))
            .collect();
        self
    }

    pub fn on(mut self, event: impl Into<String>, decoder: Decoder) -> Self {
        self.events.insert(event, EventDescriptor::new(decoder));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_kind_tags_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::parse("keyed_node"), None);
        assert_eq!(NodeKind::parse("widget"), None);
    }

    #[test]
    fn peel_thunks_follows_nested_resolved_thunks() {
        let inner = VNode::Thunk(Thunk::resolved(VNode::text("deep")));
        let outer = VNode::Thunk(Thunk::resolved(inner));

        assert!(matches!(outer.peel_thunks().unwrap(), VNode::Text(t) if t == "deep"));
    }

    #[test]
    fn peel_thunks_rejects_pending_thunk() {
        let node = VNode::lazy(|| VNode::text("later"));
        assert!(matches!(node.peel_thunks(), Err(VdomError::UnresolvedThunk)));
    }

    #[test]
    fn only_elements_have_events() {
        let button: VNode = Element::new("button")
            .on("click", Decoder::succeed(json!("Go")))
            .into();

        assert!(button.events().unwrap().contains("click"));
        assert!(VNode::text("x").events().is_none());
        assert!(VNode::map(|m| m, VNode::text("x")).events().is_none());
    }
}
