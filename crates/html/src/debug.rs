use crate::dom::{NodeData, NodeRef};

const INDENT_STEP: &str = "  ";
const PREVIEW_CHARS: usize = 40;

fn push_preview(out: &mut String, s: &str) {
    for (i, ch) in s.chars().enumerate() {
        if i == PREVIEW_CHARS {
            out.push('…');
            break;
        }
        out.push(if ch == '\n' { ' ' } else { ch });
    }
}

/// Human-readable outline of a tree, at most `cap` lines. Whitespace-only text is
/// skipped; long text is truncated.
pub fn outline(root: &NodeRef, cap: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack = vec![(root.clone(), 0usize)];
    while let Some((node, depth)) = stack.pop() {
        if out.len() == cap {
            break;
        }
        let mut line = INDENT_STEP.repeat(depth);
        match &*node.data() {
            NodeData::Fragment => line.push_str("#fragment"),
            NodeData::Element { name, .. } => {
                line.push('<');
                line.push_str(name);
                for attr in ["id", "class"] {
                    if let Some(value) = node.attribute(attr).filter(|v| !v.is_empty()) {
                        line.push_str(&format!(r#" {attr}="{value}""#));
                    }
                }
                line.push('>');
            }
            NodeData::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                line.push('"');
                push_preview(&mut line, trimmed);
                line.push('"');
            }
            NodeData::Comment(text) => {
                line.push_str("<!-- ");
                push_preview(&mut line, text);
                line.push_str(" -->");
            }
        }
        out.push(line);
        for child in node.children().into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    out
}
