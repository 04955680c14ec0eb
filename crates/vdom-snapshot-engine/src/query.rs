//! Locating nodes in a normalized tree and simulating events on them.
//!
//! A [`NodePath`] is a list of child indices from the root. Resolved thunks
//! and taggers do not consume an index: they are looked through, the same way
//! they are invisible in the rendered view.

use std::{fmt, str::FromStr};

use serde_json::Value;

use crate::{
    error::VdomError,
    vnode::{EventTable, MessageMapper, VNode, find_event_decoder},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn child(mut self, index: usize) -> Self {
        self.0.push(index);
        self
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

/// Parses `/0/2`, `0/2` or `/` (the root).
impl FromStr for NodePath {
    type Err = VdomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                segment
                    .parse::<usize>()
                    .map_err(|_| VdomError::InvalidPath(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(NodePath)
    }
}

/// The node a path points at, after looking through thunks and taggers.
struct Located<'a> {
    node: &'a VNode,
    /// Taggers crossed on the way, outermost first.
    mappers: Vec<&'a MessageMapper>,
}

fn see_through<'a>(
    mut node: &'a VNode,
    mappers: &mut Vec<&'a MessageMapper>,
) -> Result<&'a VNode, VdomError> {
    loop {
        node = node.peel_thunks()?;
        match node {
            VNode::Tagger(tagger) => {
                mappers.push(&tagger.mapper);
                node = &tagger.child;
            }
            _ => return Ok(node),
        }
    }
}

fn locate<'a>(root: &'a VNode, path: &NodePath) -> Result<Option<Located<'a>>, VdomError> {
    let mut mappers = Vec::new();
    let mut current = see_through(root, &mut mappers)?;
    for &index in path.indices() {
        let child = match current {
            VNode::Node(element) => element.children.get(index),
            VNode::KeyedNode(element) => element.children.get(index).map(|(_, child)| child),
            _ => None,
        };
        let Some(child) = child else {
            return Ok(None);
        };
        current = see_through(child, &mut mappers)?;
    }
    Ok(Some(Located {
        node: current,
        mappers,
    }))
}

/// Returns the node at `path`, or `None` when the path leads nowhere.
///
/// Fails only when the walk crosses a thunk that has not been normalized.
pub fn node_at<'a>(root: &'a VNode, path: &NodePath) -> Result<Option<&'a VNode>, VdomError> {
    Ok(locate(root, path)?.map(|located| located.node))
}

/// Event table of the element at `path`. Non-element nodes have none.
pub fn events_at<'a>(
    root: &'a VNode,
    path: &NodePath,
) -> Result<Option<&'a EventTable>, VdomError> {
    Ok(node_at(root, path)?.and_then(VNode::events))
}

/// Fires `event` with `payload` at the node at `path`.
///
/// Runs the registered decoder and passes the resulting message up through
/// every tagger between the node and the root, innermost first.
pub fn simulate(
    root: &VNode,
    path: &NodePath,
    event: &str,
    payload: &Value,
) -> Result<Value, VdomError> {
    let located = locate(root, path)?.ok_or_else(|| VdomError::NodeNotFound(path.to_string()))?;
    let decoder = located
        .node
        .events()
        .and_then(|events| find_event_decoder(event, events))
        .ok_or_else(|| VdomError::EventNotFound {
            path: path.to_string(),
            event: event.to_string(),
        })?;

    let message = decoder.decode(payload)?;
    log::debug!("simulated {event:?} at {path}: {message}");
    Ok(located
        .mappers
        .iter()
        .rev()
        .fold(message, |message, mapper| mapper.apply(message)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        normalize_in_place,
        vnode::{Decoder, Element},
    };

    fn counter_view() -> VNode {
        VNode::node(
            "main",
            vec![
                VNode::text("Count: 0"),
                VNode::map(
                    |msg| json!({"Counter": msg}),
                    VNode::lazy(|| {
                        Element::new("div")
                            .with_children(vec![
                                Element::new("button")
                                    .on("click", Decoder::succeed(json!("Increment")))
                                    .into(),
                                Element::new("input")
                                    .on("input", Decoder::at(["target", "value"]))
                                    .into(),
                            ])
                            .into()
                    }),
                ),
            ],
        )
    }

    #[test]
    fn path_parsing_and_display() {
        assert_eq!("/1/0".parse::<NodePath>().unwrap(), NodePath::new(vec![1, 0]));
        assert_eq!("1/0".parse::<NodePath>().unwrap().to_string(), "/1/0");
        assert_eq!("/".parse::<NodePath>().unwrap(), NodePath::root());
        assert!(matches!(
            "/a/1".parse::<NodePath>(),
            Err(VdomError::InvalidPath(p)) if p == "/a/1"
        ));
    }

    #[test]
    fn node_at_looks_through_taggers_and_thunks() {
        let mut tree = counter_view();
        normalize_in_place(&mut tree).unwrap();

        let button = node_at(&tree, &NodePath::new(vec![1, 0])).unwrap().unwrap();
        assert!(matches!(button, VNode::Node(el) if el.tag == "button"));
        assert!(node_at(&tree, &NodePath::new(vec![1, 5])).unwrap().is_none());
        assert!(node_at(&tree, &NodePath::new(vec![0, 0])).unwrap().is_none());
    }

    #[test]
    fn node_at_requires_normalized_tree() {
        let tree = counter_view();
        assert!(matches!(
            node_at(&tree, &NodePath::new(vec![1, 0])),
            Err(VdomError::UnresolvedThunk)
        ));
    }

    #[test]
    fn simulate_maps_message_through_taggers() {
        let mut tree = counter_view();
        normalize_in_place(&mut tree).unwrap();

        let click = simulate(&tree, &"/1/0".parse().unwrap(), "click", &json!({})).unwrap();
        let input = simulate(
            &tree,
            &"/1/1".parse().unwrap(),
            "input",
            &json!({"target": {"value": "42"}}),
        )
        .unwrap();

        assert_eq!(click, json!({"Counter": "Increment"}));
        assert_eq!(input, json!({"Counter": "42"}));
    }

    #[test]
    fn nested_taggers_apply_innermost_first() {
        let tree = VNode::map(
            |msg| json!(["outer", msg]),
            VNode::map(
                |msg| json!(["inner", msg]),
                Element::new("a")
                    .on("click", Decoder::succeed(json!("Go")))
                    .into(),
            ),
        );

        let message = simulate(&tree, &NodePath::root(), "click", &json!(null)).unwrap();

        assert_eq!(message, json!(["outer", ["inner", "Go"]]));
    }

    #[test]
    fn simulate_reports_missing_node_and_event() {
        let mut tree = counter_view();
        normalize_in_place(&mut tree).unwrap();

        let missing_node = simulate(&tree, &"/9".parse().unwrap(), "click", &json!({}));
        let missing_event = simulate(&tree, &"/1/0".parse().unwrap(), "hover", &json!({}));

        assert!(matches!(missing_node, Err(VdomError::NodeNotFound(p)) if p == "/9"));
        assert!(matches!(
            missing_event,
            Err(VdomError::EventNotFound { event, .. }) if event == "hover"
        ));
    }

    #[test]
    fn decoder_failure_is_reported() {
        let mut tree = counter_view();
        normalize_in_place(&mut tree).unwrap();

        let err = simulate(&tree, &"/1/1".parse().unwrap(), "input", &json!({})).unwrap_err();

        assert!(matches!(err, VdomError::Decode(_)));
    }
}
