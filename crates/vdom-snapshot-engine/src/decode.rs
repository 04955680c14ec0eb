//! # Fixture decoding
//!
//! Builds trees from JSON, for tests and the CLI. The format is the snapshot
//! wire format plus a `thunk` kind:
//!
//! ```json
//! {"type": "node", "tag": "div", "children": [
//!     {"type": "thunk", "args": [1], "node": {"type": "text", "value": "hi"}}
//! ]}
//! ```
//!
//! A thunk's body is decoded lazily, when normalization forces it, so a
//! malformed or unknown node inside a thunk surfaces as a normalization error.
//!
//! Events are listed as `{"name": ..., "message": ...}`. The decoder built
//! for an entry returns `message` when given, reads the payload at `field`
//! (a list of keys) when given, and otherwise returns the payload unchanged.
//! A tagger may name a `wrap` constructor: messages passing through it become
//! `{wrap: message}`.

use std::rc::Rc;

use serde_json::{Map, Value};

use crate::{
    error::VdomError,
    vnode::{
        Custom, Decoder, Element, EventDescriptor, EventOptions, EventTable, Facts, KeyedElement,
        NodeKind, Thunk, ThunkArg, VNode,
    },
};

/// Decodes a tree. JSON `null` is an absent tree.
pub fn from_json(value: &Value) -> Result<Option<VNode>, VdomError> {
    if value.is_null() {
        return Ok(None);
    }
    decode_node(value, "$").map(Some)
}

pub fn from_str(text: &str) -> Result<Option<VNode>, VdomError> {
    let value: Value = serde_json::from_str(text)?;
    from_json(&value)
}

fn decode_node(value: &Value, path: &str) -> Result<VNode, VdomError> {
    let obj = value
        .as_object()
        .ok_or_else(|| VdomError::invalid_fixture(path, "expected an object"))?;
    let tag = str_field(obj, "type", path)?;
    let kind = NodeKind::parse(tag).ok_or_else(|| VdomError::UnknownVariant(tag.to_string()))?;

    let node = match kind {
        NodeKind::Text => VNode::Text(str_field(obj, "value", path)?.to_string()),
        NodeKind::Node => {
            let mut element = Element::new(str_field(obj, "tag", path)?);
            element.namespace = opt_str_field(obj, "namespace", path)?;
            element.facts = facts(obj, path)?;
            element.events = events(obj, path)?;
            element.children = array_field(obj, "children", path)?
                .iter()
                .enumerate()
                .map(|(i, child)| decode_node(child, &format!("{path}.children[{i}]")))
                .collect::<Result<_, _>>()?;
            VNode::Node(element)
        }
        NodeKind::KeyedNode => {
            let mut element = KeyedElement::new(str_field(obj, "tag", path)?);
            element.namespace = opt_str_field(obj, "namespace", path)?;
            element.facts = facts(obj, path)?;
            element.events = events(obj, path)?;
            element.children = keyed_children(obj, path)?;
            VNode::KeyedNode(element)
        }
        NodeKind::Tagger => {
            let child = decode_node(field(obj, "node", path)?, &format!("{path}.node"))?;
            match opt_str_field(obj, "wrap", path)? {
                Some(constructor) => VNode::map(
                    move |message| {
                        let mut wrapped = Map::new();
                        wrapped.insert(constructor.clone(), message);
                        Value::Object(wrapped)
                    },
                    child,
                ),
                None => VNode::map(|message| message, child),
            }
        }
        NodeKind::Thunk => {
            let body = field(obj, "node", path)?.clone();
            let body_path = format!("{path}.node");
            let args = match obj.get("args") {
                None => Vec::new(),
                Some(Value::Array(args)) => args
                    .iter()
                    .map(|arg| Rc::new(arg.clone()) as ThunkArg)
                    .collect(),
                Some(_) => return Err(VdomError::invalid_fixture(path, "`args` must be an array")),
            };
            VNode::Thunk(Thunk::fallible(args, move |_| decode_node(&body, &body_path)))
        }
        NodeKind::Custom => VNode::Custom(Custom {
            name: str_field(obj, "name", path)?.to_string(),
            facts: facts(obj, path)?,
            model: obj.get("model").cloned().unwrap_or(Value::Null),
        }),
    };
    Ok(node)
}

fn keyed_children(obj: &Map<String, Value>, path: &str) -> Result<Vec<(String, VNode)>, VdomError> {
    let children = array_field(obj, "children", path)?;
    let keys = match obj.get("keys") {
        None => None,
        Some(Value::Array(keys)) if keys.len() == children.len() => Some(keys),
        Some(_) => {
            return Err(VdomError::invalid_fixture(
                path,
                "`keys` must be an array with one key per child",
            ));
        }
    };

    children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let child_path = format!("{path}.children[{i}]");
            if let Some(keys) = keys {
                let key = keys[i].as_str().ok_or_else(|| {
                    VdomError::invalid_fixture(&format!("{path}.keys[{i}]"), "expected a string")
                })?;
                return Ok((key.to_string(), decode_node(child, &child_path)?));
            }
            match child.as_object() {
                Some(pair) if !pair.contains_key("type") => {
                    let key = str_field(pair, "key", &child_path)?.to_string();
                    let node = decode_node(field(pair, "node", &child_path)?, &child_path)?;
                    Ok((key, node))
                }
                _ => Ok((i.to_string(), decode_node(child, &child_path)?)),
            }
        })
        .collect()
}

fn events(obj: &Map<String, Value>, path: &str) -> Result<EventTable, VdomError> {
    let Some(entries) = obj.get("events") else {
        return Ok(EventTable::new());
    };
    let entries = entries
        .as_array()
        .ok_or_else(|| VdomError::invalid_fixture(path, "`events` must be an array"))?;

    let mut table = EventTable::new();
    for (i, entry) in entries.iter().enumerate() {
        let entry_path = format!("{path}.events[{i}]");
        let entry = entry
            .as_object()
            .ok_or_else(|| VdomError::invalid_fixture(&entry_path, "expected an object"))?;
        let name = str_field(entry, "name", &entry_path)?;
        let decoder = if let Some(message) = entry.get("message") {
            Decoder::succeed(message.clone())
        } else if let Some(field_path) = entry.get("field") {
            let keys = field_path
                .as_array()
                .and_then(|keys| keys.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
                .ok_or_else(|| {
                    VdomError::invalid_fixture(&entry_path, "`field` must be an array of strings")
                })?;
            Decoder::at(keys)
        } else {
            Decoder::new(|payload| Ok(payload.clone()))
        };
        let options = EventOptions {
            stop_propagation: bool_field(entry, "stopPropagation", &entry_path)?,
            prevent_default: bool_field(entry, "preventDefault", &entry_path)?,
        };
        if table
            .insert(name, EventDescriptor::with_options(decoder, options))
            .is_some()
        {
            return Err(VdomError::invalid_fixture(
                &entry_path,
                format!("duplicate event {name:?}"),
            ));
        }
    }
    Ok(table)
}

fn facts(obj: &Map<String, Value>, path: &str) -> Result<Facts, VdomError> {
    match obj.get("facts") {
        None => Ok(Facts::new()),
        Some(Value::Object(facts)) => Ok(facts.clone()),
        Some(_) => Err(VdomError::invalid_fixture(path, "`facts` must be an object")),
    }
}

fn field<'a>(obj: &'a Map<String, Value>, name: &str, path: &str) -> Result<&'a Value, VdomError> {
    obj.get(name)
        .ok_or_else(|| VdomError::invalid_fixture(path, format!("missing field `{name}`")))
}

fn str_field<'a>(
    obj: &'a Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<&'a str, VdomError> {
    field(obj, name, path)?
        .as_str()
        .ok_or_else(|| VdomError::invalid_fixture(path, format!("`{name}` must be a string")))
}

fn opt_str_field(
    obj: &Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<Option<String>, VdomError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(VdomError::invalid_fixture(path, format!("`{name}` must be a string"))),
    }
}

fn bool_field(obj: &Map<String, Value>, name: &str, path: &str) -> Result<bool, VdomError> {
    match obj.get(name) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(VdomError::invalid_fixture(path, format!("`{name}` must be a boolean"))),
    }
}

fn array_field<'a>(
    obj: &'a Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<&'a [Value], VdomError> {
    match obj.get(name) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(VdomError::invalid_fixture(path, format!("`{name}` must be an array"))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{normalize_in_place, serialize};

    #[test]
    fn null_is_absent_tree() {
        assert!(from_json(&Value::Null).unwrap().is_none());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = from_json(&json!({"type": "widget"})).unwrap_err();
        assert!(matches!(err, VdomError::UnknownVariant(tag) if tag == "widget"));
    }

    #[test]
    fn unknown_type_inside_thunk_fails_at_normalization() {
        let mut tree = from_json(&json!({
            "type": "node",
            "tag": "div",
            "children": [{"type": "thunk", "node": {"type": "portal"}}]
        }))
        .unwrap()
        .unwrap();

        let err = normalize_in_place(&mut tree).unwrap_err();
        assert!(matches!(err, VdomError::UnknownVariant(tag) if tag == "portal"));
    }

    #[test]
    fn thunk_args_are_captured() {
        let tree = from_json(&json!({
            "type": "thunk",
            "args": [1, "two"],
            "node": {"type": "text", "value": "x"}
        }))
        .unwrap()
        .unwrap();

        let VNode::Thunk(thunk) = &tree else {
            panic!("expected a thunk, got {tree:?}");
        };
        assert_eq!(thunk.args().len(), 2);
        assert_eq!(thunk.args()[1].downcast_ref::<Value>(), Some(&json!("two")));
    }

    #[test]
    fn missing_fields_report_path() {
        let err = from_json(&json!({
            "type": "node",
            "tag": "ul",
            "children": [{"type": "text"}]
        }))
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid fixture at $.children[0]: missing field `value`"
        );
    }

    #[test]
    fn duplicate_events_are_rejected() {
        let err = from_json(&json!({
            "type": "node",
            "tag": "button",
            "events": [{"name": "click"}, {"name": "click"}]
        }))
        .unwrap_err();

        assert!(err.to_string().contains("duplicate event \"click\""));
    }

    #[test]
    fn keyed_children_accept_pairs_or_keys_array() {
        let pairs = from_json(&json!({
            "type": "keyed-node",
            "tag": "ul",
            "children": [{"key": "a", "node": {"type": "text", "value": "A"}}]
        }))
        .unwrap()
        .unwrap();
        let zipped = from_json(&json!({
            "type": "keyed-node",
            "tag": "ul",
            "children": [{"type": "text", "value": "A"}],
            "keys": ["a"]
        }))
        .unwrap()
        .unwrap();

        for tree in [pairs, zipped] {
            let VNode::KeyedNode(element) = &tree else {
                panic!("expected a keyed node, got {tree:?}");
            };
            assert_eq!(element.children[0].0, "a");
        }
    }

    #[test]
    fn event_entries_build_decoders() {
        let tree = from_json(&json!({
            "type": "node",
            "tag": "input",
            "events": [
                {"name": "input", "field": ["target", "value"]},
                {"name": "focus", "message": "Focused"},
                {"name": "blur"}
            ]
        }))
        .unwrap()
        .unwrap();
        let events = tree.events().unwrap();
        let payload = json!({"target": {"value": "typed"}});

        let decode = |name: &str| events.get(name).unwrap().decoder.decode(&payload).unwrap();
        assert_eq!(decode("input"), json!("typed"));
        assert_eq!(decode("focus"), json!("Focused"));
        assert_eq!(decode("blur"), payload);
    }

    #[test]
    fn snapshot_output_decodes_back_to_same_snapshot() {
        let fixture = json!({
            "type": "node",
            "tag": "div",
            "facts": {"id": "root"},
            "events": [{"name": "click", "stopPropagation": true, "preventDefault": false}],
            "children": [
                {"type": "tagger", "node": {"type": "text", "value": "a"}},
                {"type": "custom", "name": "chart", "facts": {}}
            ]
        });
        let mut tree = from_json(&fixture).unwrap().unwrap();
        normalize_in_place(&mut tree).unwrap();
        let snap = serialize(&tree).unwrap();

        let reparsed = from_json(&snap).unwrap().unwrap();
        assert_eq!(serialize(&reparsed).unwrap(), snap);
    }
}
