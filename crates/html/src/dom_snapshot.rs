use crate::dom::{NodeData, NodeRef};
use std::fmt::{self, Write};

/// Deterministic line serialization of a node tree for test comparisons.
/// Not a stable public format.
///
/// - One line per node, indented two spaces per depth.
/// - Attribute order is significant.
/// - Text and comments are printed with `\n`, `\t`, `"` and non-ASCII escaped.
#[derive(Clone, Debug, Default)]
pub struct DomSnapshotOptions {
    /// Drop text nodes that are entirely ASCII whitespace (template indentation).
    pub skip_whitespace_text: bool,
    /// Attribute values starting with this prefix print as `<prefix*>`, hiding random ids.
    pub mask_value_prefix: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(root: &NodeRef, options: &DomSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        let mut stack = vec![(root.clone(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if options.skip_whitespace_text && is_whitespace_text(&node) {
                continue;
            }
            let mut line = " ".repeat(depth * 2);
            write_node_line(&mut line, &node, options);
            lines.push(line);
            for child in node.children().into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug)]
pub struct DomMismatch {
    pub line: usize,
    pub expected: String,
    pub actual: String,
    expected_tree: String,
    actual_tree: String,
}

impl fmt::Display for DomMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DOM mismatch at snapshot line {}", self.line + 1)?;
        writeln!(f, "expected: {}", self.expected)?;
        writeln!(f, "actual:   {}", self.actual)?;
        writeln!(f, "expected tree:\n{}", self.expected_tree)?;
        write!(f, "actual tree:\n{}", self.actual_tree)
    }
}

impl std::error::Error for DomMismatch {}

pub fn compare_dom(
    expected: &NodeRef,
    actual: &NodeRef,
    options: &DomSnapshotOptions,
) -> Result<(), Box<DomMismatch>> {
    let expected = DomSnapshot::new(expected, options);
    let actual = DomSnapshot::new(actual, options);
    let missing = "<missing>".to_string();
    let len = expected.lines.len().max(actual.lines.len());
    for line in 0..len {
        let exp = expected.lines.get(line).unwrap_or(&missing);
        let act = actual.lines.get(line).unwrap_or(&missing);
        if exp != act {
            return Err(Box::new(DomMismatch {
                line,
                expected: exp.clone(),
                actual: act.clone(),
                expected_tree: expected.render(),
                actual_tree: actual.render(),
            }));
        }
    }
    Ok(())
}

pub fn assert_dom_eq(expected: &NodeRef, actual: &NodeRef, options: &DomSnapshotOptions) {
    if let Err(mismatch) = compare_dom(expected, actual, options) {
        panic!("{mismatch}");
    }
}

fn is_whitespace_text(node: &NodeRef) -> bool {
    matches!(&*node.data(), NodeData::Text(t) if t.bytes().all(|b| b.is_ascii_whitespace()))
}

fn write_node_line(out: &mut String, node: &NodeRef, options: &DomSnapshotOptions) {
    match &*node.data() {
        NodeData::Fragment => out.push_str("#fragment"),
        NodeData::Element { name, attributes } => {
            out.push('<');
            out.push_str(name);
            for (attr, value) in attributes {
                out.push(' ');
                out.push_str(attr);
                let Some(value) = value else {
                    continue;
                };
                out.push_str("=\"");
                match options.mask_value_prefix.as_deref() {
                    Some(prefix) if value.starts_with(prefix) => {
                        out.push('<');
                        out.push_str(prefix);
                        out.push_str("*>");
                    }
                    _ => write_escaped(out, value),
                }
                out.push('"');
            }
            out.push('>');
        }
        NodeData::Text(text) => {
            out.push('"');
            write_escaped(out, text);
            out.push('"');
        }
        NodeData::Comment(text) => {
            out.push_str("<!-- ");
            write_escaped(out, text);
            out.push_str(" -->");
        }
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}
