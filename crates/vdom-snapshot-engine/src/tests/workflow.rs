use pretty_assertions::assert_eq;
use serde_json::json;

use super::CallCounter;
use crate::{
    NodePath, events_at, find_event_decoder, node_at, simulate,
    snapshot::{self, SnapshotOptions, TextFormat},
    to_html,
    vnode::{Decoder, Element, VNode},
};

fn todo_item(counter: &CallCounter, label: &'static str, done: bool) -> VNode {
    counter.lazy(move || {
        Element::new("li")
            .with_fact("className", if done { "done" } else { "todo" })
            .on("click", Decoder::succeed(json!({"Toggle": label})))
            .with_children(vec![VNode::text(label)])
            .into()
    })
}

fn todo_list(counter: &CallCounter) -> VNode {
    VNode::map(
        |msg| json!({"Todos": msg}),
        VNode::keyed(
            "ul",
            vec![
                ("milk", todo_item(counter, "Buy milk", true)),
                ("cat", todo_item(counter, "Feed cat", false)),
            ],
        ),
    )
}

#[test]
fn user_workflow_snapshot_then_simulate_click() {
    // Given a view with lazily rendered list items
    let counter = CallCounter::default();
    let mut view = todo_list(&counter);

    // When taking a snapshot
    let snap = snapshot::snapshot(&mut view).unwrap();

    // Then every item was rendered exactly once and appears in order
    assert_eq!(counter.get(), 2);
    assert_eq!(snap["type"], "tagger");
    assert_eq!(snap["node"]["children"][1]["children"][0]["value"], "Feed cat");

    // And the click handler on the second item can be found and fired
    let path = NodePath::root().child(1);
    let events = events_at(&view, &path).unwrap().unwrap();
    assert!(find_event_decoder("click", events).is_some());
    assert!(find_event_decoder("dblclick", events).is_none());
    assert_eq!(
        simulate(&view, &path, "click", &json!({})).unwrap(),
        json!({"Todos": {"Toggle": "Feed cat"}})
    );

    // And a second snapshot renders nothing new
    snapshot::snapshot(&mut view).unwrap();
    assert_eq!(counter.get(), 2);
}

#[test]
fn user_workflow_pretty_snapshot_with_keys() {
    let counter = CallCounter::default();
    let mut view = todo_list(&counter);
    let options = SnapshotOptions {
        format: TextFormat::Pretty,
        include_keys: true,
        include_facts: false,
    };

    crate::normalize_in_place(&mut view).unwrap();
    let text = snapshot::to_json_string_with(Some(&view), &options).unwrap();

    assert!(text.starts_with("{\n  \"type\": \"tagger\""));
    assert!(text.contains("\"keys\": [\n      \"milk\",\n      \"cat\"\n    ]"));
    assert!(!text.contains("className"));
}

#[test]
fn user_workflow_render_html_for_failure_message() {
    let counter = CallCounter::default();
    let mut view = todo_list(&counter);
    crate::normalize_in_place(&mut view).unwrap();

    assert_eq!(
        to_html(&view).unwrap(),
        r#"<ul><li className="done">Buy milk</li><li className="todo">Feed cat</li></ul>"#
    );
    assert!(matches!(
        node_at(&view, &NodePath::new(vec![0, 0])).unwrap(),
        Some(VNode::Text(t)) if t == "Buy milk"
    ));
}
