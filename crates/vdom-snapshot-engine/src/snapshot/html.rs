use serde_json::Value;

use crate::{
    error::VdomError,
    vnode::{Facts, VNode},
};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Renders a normalized tree as HTML text, for readable assertion failures.
///
/// Taggers and resolved thunks are transparent. Custom widgets render as a
/// comment naming them, since their content is not part of the tree.
pub fn to_html(root: &VNode) -> Result<String, VdomError> {
    let mut out = String::new();
    write_node(root, &mut out)?;
    Ok(out)
}

fn write_node(node: &VNode, out: &mut String) -> Result<(), VdomError> {
    match node {
        VNode::Text(text) => out.push_str(&html_escape::encode_text(text)),
        VNode::Node(element) => {
            write_element(&element.tag, &element.facts, element.children.iter(), out)?
        }
        VNode::KeyedNode(element) => write_element(
            &element.tag,
            &element.facts,
            element.children.iter().map(|(_, child)| child),
            out,
        )?,
        VNode::Tagger(tagger) => write_node(&tagger.child, out)?,
        VNode::Thunk(_) => write_node(node.peel_thunks()?, out)?,
        VNode::Custom(custom) => {
            out.push_str("<!-- custom: ");
            out.push_str(&html_escape::encode_text(&custom.name).replace("--", "&#45;&#45;"));
            out.push_str(" -->");
        }
    }
    Ok(())
}

fn write_element<'a>(
    tag: &str,
    facts: &Facts,
    children: impl Iterator<Item = &'a VNode>,
    out: &mut String,
) -> Result<(), VdomError> {
    check_name(tag)?;
    out.push('<');
    out.push_str(tag);
    for (name, value) in facts {
        check_name(name)?;
        write_attribute(name, value, out);
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&tag) {
        return Ok(());
    }
    for child in children {
        write_node(child, out)?;
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    Ok(())
}

/// Tag and attribute names are written unescaped, so anything that could end
/// the name early is refused.
fn check_name(name: &str) -> Result<(), VdomError> {
    let valid = !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        });
    if valid {
        Ok(())
    } else {
        Err(VdomError::InvalidHtmlName(name.to_string()))
    }
}

fn write_attribute(name: &str, value: &Value, out: &mut String) {
    let rendered = match value {
        Value::Null | Value::Bool(false) => return,
        Value::Bool(true) => {
            out.push(' ');
            out.push_str(name);
            return;
        }
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Object(styles) if name == "style" => styles
            .iter()
            .map(|(property, v)| match v {
                Value::String(s) => format!("{property}: {s}"),
                other => format!("{property}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    };
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(&rendered));
    out.push('"');
}
