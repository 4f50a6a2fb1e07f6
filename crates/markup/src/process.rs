//! Turns interpolated values into markup text.
//!
//! Text is escaped, unsafe markup is copied through, and every live element or comment
//! is replaced
//! by an empty marker element carrying a fresh token. The element itself is remembered
//! in a [`Placeholder`] so it can be put back after parsing.

use crate::context::RenderContext;
use crate::entropy::Entropy;
use crate::value::Value;
use html::{NodeData, NodeRef, escape_html};

/// A live node waiting for its marker to be replaced.
#[derive(Debug)]
pub struct Placeholder {
    pub token: String,
    pub node: NodeRef,
}

/// Markup text plus the placeholders recorded while producing it.
#[derive(Debug, Default)]
pub struct Accumulator {
    markup: String,
    placeholders: Vec<Placeholder>,
}

enum Work<'v> {
    Value(&'v Value),
    Node(NodeRef),
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_literal(&mut self, literal: &str) {
        self.markup.push_str(literal);
    }

    /// Appends the markup for `value`. Iterative, so deeply nested sequences and
    /// fragments do not grow the call stack.
    pub fn push_value<E: Entropy>(&mut self, value: &Value, cx: &mut RenderContext<E>) {
        let mut stack = vec![Work::Value(value)];
        while let Some(work) = stack.pop() {
            match work {
                Work::Value(value) => match value {
                    Value::Unsafe(raw) => self.markup.push_str(raw.as_str()),
                    Value::Text(text) => self.push_escaped(text),
                    Value::Node(node) => self.push_marker(node.clone(), cx),
                    Value::Fragment(fragment) => {
                        stack.extend(fragment.children().into_iter().rev().map(Work::Node));
                    }
                    Value::Seq(items) => stack.extend(items.iter().rev().map(Work::Value)),
                    Value::TextNode(node) => self.push_escaped(&node.text_content()),
                    Value::Other(scalar) => self.push_escaped(&scalar.to_string()),
                },
                Work::Node(node) => {
                    let children = match &*node.data() {
                        NodeData::Element { .. } | NodeData::Comment(_) => None,
                        NodeData::Text(text) => {
                            self.push_escaped(text);
                            continue;
                        }
                        NodeData::Fragment => Some(node.children()),
                    };
                    match children {
                        Some(children) => stack.extend(children.into_iter().rev().map(Work::Node)),
                        None => self.push_marker(node, cx),
                    }
                }
            }
        }
    }

    pub fn into_parts(self) -> (String, Vec<Placeholder>) {
        (self.markup, self.placeholders)
    }

    fn push_escaped(&mut self, text: &str) {
        self.markup.push_str(&escape_html(text));
    }

    fn push_marker<E: Entropy>(&mut self, node: NodeRef, cx: &mut RenderContext<E>) {
        let token = cx.ids.next_id();
        let tag = &cx.config.marker_tag;
        let attr = &cx.config.marker_attribute;
        self.markup.push('<');
        self.markup.push_str(tag);
        self.markup.push(' ');
        self.markup.push_str(attr);
        self.markup.push_str("=\"");
        self.markup.push_str(&escape_html(&token));
        self.markup.push_str("\"></");
        self.markup.push_str(tag);
        self.markup.push('>');
        log::trace!(target: "markup.process", "placeholder {token} for {:?}", node.tag_name());
        self.placeholders.push(Placeholder { token, node });
    }
}

/// Markup text for a single value; live elements met along the way are appended to
/// `placeholders`.
pub fn process<E: Entropy>(
    value: &Value,
    cx: &mut RenderContext<E>,
    placeholders: &mut Vec<Placeholder>,
) -> String {
    let mut acc = Accumulator::new();
    acc.push_value(value, cx);
    let (markup, found) = acc.into_parts();
    placeholders.extend(found);
    markup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnsafeMarkup;
    use crate::entropy::{IdTier, SeededEntropy};
    use crate::fragment::Fragment;

    fn cx() -> RenderContext<SeededEntropy> {
        RenderContext::with_entropy(SeededEntropy::new(5, IdTier::Uuid))
    }

    #[test]
    fn text_is_escaped_and_unsafe_is_not() {
        let mut cx = cx();
        let mut found = Vec::new();
        let text = Value::from("<a href='x'>&</a>");
        assert_eq!(
            process(&text, &mut cx, &mut found),
            "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;"
        );
        let raw = Value::from(UnsafeMarkup::new("<b>hi</b>"));
        assert_eq!(process(&raw, &mut cx, &mut found), "<b>hi</b>");
        assert!(found.is_empty());
    }

    #[test]
    fn scalars_and_null() {
        let mut cx = cx();
        let mut found = Vec::new();
        let v = Value::from(vec![
            Value::from(1u8),
            Value::null(),
            Value::from(true),
            Value::from(-2.5),
        ]);
        assert_eq!(process(&v, &mut cx, &mut found), "1true-2.5");
    }

    #[test]
    fn elements_become_markers() {
        let mut cx = cx();
        let mut found = Vec::new();
        let node = NodeRef::element("span");
        let out = process(&Value::from(&node), &mut cx, &mut found);
        assert_eq!(found.len(), 1);
        assert!(found[0].node.ptr_eq(&node));
        assert_eq!(out, format!("<div id=\"{}\"></div>", found[0].token));
        assert!(found[0].token.starts_with("sym_"));
    }

    #[test]
    fn fragments_dispatch_each_child() {
        let mut cx = cx();
        let mut found = Vec::new();
        let root = NodeRef::fragment();
        root.append_child(&NodeRef::text("a<")).unwrap();
        let note = NodeRef::comment("kept");
        root.append_child(&note).unwrap();
        let em = NodeRef::element("em");
        root.append_child(&em).unwrap();
        let frag = Fragment::from_node(root).unwrap();

        let out = process(&Value::from(frag), &mut cx, &mut found);
        assert_eq!(found.len(), 2);
        assert!(found[0].node.ptr_eq(&note));
        assert!(found[1].node.ptr_eq(&em));
        assert_eq!(
            out,
            format!(
                "a&lt;<div id=\"{}\"></div><div id=\"{}\"></div>",
                found[0].token, found[1].token
            )
        );
    }

    #[test]
    fn text_nodes_use_current_text() {
        let mut cx = cx();
        let mut found = Vec::new();
        let t = NodeRef::text("before");
        let v = Value::from(&t);
        t.set_text("after & now");
        assert_eq!(process(&v, &mut cx, &mut found), "after &amp; now");
    }

    #[test]
    fn deep_sequences_do_not_overflow() {
        let mut v = Value::from("x");
        for _ in 0..100_000 {
            v = Value::Seq(vec![v]);
        }
        let mut cx = cx();
        let mut found = Vec::new();
        assert_eq!(process(&v, &mut cx, &mut found), "x");
    }

    #[test]
    fn custom_marker_shape() {
        let config = crate::RenderConfig {
            marker_tag: "template".into(),
            marker_attribute: "data-slot".into(),
            ..Default::default()
        };
        let mut cx = RenderContext::new(config, SeededEntropy::new(5, IdTier::Uuid));
        let mut found = Vec::new();
        let out = process(&Value::from(NodeRef::element("i")), &mut cx, &mut found);
        assert_eq!(
            out,
            format!("<template data-slot=\"{}\"></template>", found[0].token)
        );
    }
}
