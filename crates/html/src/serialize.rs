use crate::dom::{NodeData, NodeRef};
use crate::entities::escape_html;
use crate::tokenizer::is_void_element;

enum Step {
    Open(NodeRef),
    Close(String),
}

/// Serializes a node to markup. Fragments serialize their children only.
///
/// Text is escaped except directly inside `script`/`style`; attribute values are always
/// escaped; void elements get no end tag.
pub fn to_html(node: &NodeRef) -> String {
    let mut out = String::new();
    let mut stack = if node.is_fragment() {
        let mut children: Vec<Step> = node.children().into_iter().map(Step::Open).collect();
        children.reverse();
        children
    } else {
        vec![Step::Open(node.clone())]
    };

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Close(name) => {
                out.push_str("</");
                out.push_str(&name);
                out.push('>');
                continue;
            }
            Step::Open(node) => node,
        };
        match &*node.data() {
            NodeData::Fragment => {
                stack.extend(node.children().into_iter().rev().map(Step::Open));
            }
            NodeData::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    if let Some(value) = value {
                        out.push_str("=\"");
                        out.push_str(&escape_html(value));
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void_element(name) {
                    continue;
                }
                stack.push(Step::Close(name.clone()));
                stack.extend(node.children().into_iter().rev().map(Step::Open));
            }
            NodeData::Text(text) => {
                let raw_parent = node
                    .parent()
                    .is_some_and(|p| p.has_tag_name("script") || p.has_tag_name("style"));
                if raw_parent {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_html(text));
                }
            }
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
    out
}
