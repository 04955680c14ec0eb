// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use serde_json::json;
use vdom_snapshot_engine::{Decoder, Element, VNode};

/// A list of `rows` lazily rendered rows, each a tagged element with a
/// handler and `cells` text children.
#[allow(dead_code)]
pub fn generate_lazy_table(rows: usize, cells: usize) -> VNode {
    let rows = (0..rows)
        .map(|row| {
            (
                format!("row-{row}"),
                VNode::map(
                    move |msg| json!({"Row": [row, msg]}),
                    VNode::lazy(move || {
                        Element::new("tr")
                            .with_fact("className", if row % 2 == 0 { "even" } else { "odd" })
                            .on("click", Decoder::succeed(json!("Select")))
                            .with_children((0..cells).map(|cell| table_cell(row, cell)).collect())
                            .into()
                    }),
                ),
            )
        })
        .collect();
    VNode::keyed("tbody", rows)
}

#[allow(dead_code)]
fn table_cell(row: usize, cell: usize) -> VNode {
    VNode::node("td", vec![VNode::text(format!("{row}:{cell}"))])
}
