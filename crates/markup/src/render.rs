use crate::context::{Diagnostic, RenderContext};
use crate::entropy::Entropy;
use crate::fragment::Fragment;
use crate::process::{Accumulator, Placeholder};
use crate::value::Value;
use html::NodeRef;
use html::traverse::descendants;
use std::collections::HashMap;

/// A tagged template: literal segments interleaved with values, always one more
/// segment than values.
///
/// Usually built by [`template!`](crate::template) or rendered directly by
/// [`html!`](crate::html).
#[derive(Debug)]
pub struct Template {
    head: &'static str,
    parts: Vec<(Value, &'static str)>,
}

impl Template {
    pub fn new(head: &'static str) -> Self {
        Self {
            head,
            parts: Vec::new(),
        }
    }

    /// Appends a value and the literal segment that follows it.
    pub fn then(mut self, value: impl Into<Value>, segment: &'static str) -> Self {
        self.push(value, segment);
        self
    }

    pub fn push(&mut self, value: impl Into<Value>, segment: &'static str) {
        self.parts.push((value.into(), segment));
    }

    pub fn segments(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.head).chain(self.parts.iter().map(|(_, s)| *s))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.parts.iter().map(|(v, _)| v)
    }

    /// Accumulated markup and its placeholders, before parsing.
    pub fn accumulate<E: Entropy>(&self, cx: &mut RenderContext<E>) -> Accumulator {
        let mut acc = Accumulator::new();
        acc.push_literal(self.head);
        for (value, segment) in &self.parts {
            acc.push_value(value, cx);
            acc.push_literal(segment);
        }
        acc
    }

    /// Renders with system entropy. Diagnostics are logged and then dropped.
    pub fn render(self) -> Fragment {
        let mut cx: RenderContext = RenderContext::default();
        self.render_with(&mut cx)
    }

    /// Renders using `cx` for ids and diagnostics.
    pub fn render_with<E: Entropy>(self, cx: &mut RenderContext<E>) -> Fragment {
        cx.ids.begin_render();
        let (markup, placeholders) = self.accumulate(cx).into_parts();
        let root = html::parse_fragment(&markup);
        substitute(&root, placeholders, cx);
        log::trace!(
            target: "markup.render",
            "rendered {} bytes into {} top-level nodes",
            markup.len(),
            root.child_count()
        );
        match Fragment::from_node(root) {
            Ok(fragment) => fragment,
            Err(_) => Fragment::new(),
        }
    }
}

/// Puts every placeholder's node where its marker ended up. Markers are located in a
/// single walk; the first element in tree order carrying a token wins.
fn substitute<E: Entropy>(
    root: &NodeRef,
    placeholders: Vec<Placeholder>,
    cx: &mut RenderContext<E>,
) {
    if placeholders.is_empty() {
        return;
    }
    let attr = cx.config.marker_attribute.clone();
    let mut markers: HashMap<String, Option<NodeRef>> = placeholders
        .iter()
        .map(|p| (p.token.clone(), None))
        .collect();
    let mut pending = markers.len();
    for node in descendants(root) {
        if pending == 0 {
            break;
        }
        let Some(value) = node.attribute(&attr) else {
            continue;
        };
        if let Some(slot @ None) = markers.get_mut(&value) {
            *slot = Some(node);
            pending -= 1;
        }
    }

    for Placeholder { token, node } in placeholders {
        let Some(marker) = markers.get_mut(&token).and_then(Option::take) else {
            cx.report(Diagnostic::MissingPlaceholder {
                token,
                tag: node.tag_name(),
            });
            continue;
        };
        if let Err(error) = marker.replace_with(&node) {
            cx.report(Diagnostic::SubstitutionFailed { token, error });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{IdTier, SeededEntropy};

    fn cx() -> RenderContext<SeededEntropy> {
        RenderContext::with_entropy(SeededEntropy::new(11, IdTier::Uuid))
    }

    #[test]
    fn segments_and_values_interleave() {
        let t = Template::new("<p>").then("a", " and ").then(2, "</p>");
        assert_eq!(t.segments().collect::<Vec<_>>(), ["<p>", " and ", "</p>"]);
        assert_eq!(t.values().count(), 2);
    }

    #[test]
    fn static_template_parses() {
        let frag = Template::new("<p>hi</p>").render_with(&mut cx());
        assert_eq!(frag.to_html(), "<p>hi</p>");
    }

    #[test]
    fn live_node_is_inserted_by_identity() {
        let b = NodeRef::element("b");
        let mut cx = cx();
        let frag = Template::new("<p>")
            .then(&b, "</p>")
            .render_with(&mut cx);
        let p = frag.children()[0].clone();
        assert!(p.first_child().expect("child").ptr_eq(&b));
        assert!(b.parent().expect("parent").ptr_eq(&p));
        assert!(cx.diagnostics().is_empty());
        assert_eq!(frag.to_html(), "<p><b></b></p>");
    }

    #[test]
    fn marker_inside_rawtext_is_reported() {
        let node = NodeRef::element("b");
        let mut cx = cx();
        let frag = Template::new("<style>")
            .then(&node, "</style>")
            .render_with(&mut cx);
        assert!(node.parent().is_none());
        match cx.diagnostics() {
            [Diagnostic::MissingPlaceholder { token, tag }] => {
                assert!(frag.to_html().contains(token.as_str()));
                assert_eq!(tag.as_deref(), Some("b"));
            }
            other => panic!("unexpected diagnostics: {other:?}"),
        }
    }

    #[test]
    fn same_node_twice_ends_at_last_marker() {
        let node = NodeRef::element("i");
        let mut cx = cx();
        let frag = Template::new("<a>")
            .then(&node, "</a><b>")
            .then(&node, "</b>")
            .render_with(&mut cx);
        assert_eq!(frag.to_html(), "<a></a><b><i></i></b>");
        assert!(cx.diagnostics().is_empty());
    }

    #[test]
    fn ids_reset_between_renders() {
        let mut cx = cx();
        Template::new("").then(NodeRef::element("i"), "").render_with(&mut cx);
        assert_eq!(cx.ids().issued(), 1);
        Template::new("").then(NodeRef::element("i"), "").render_with(&mut cx);
        assert_eq!(cx.ids().issued(), 1);
    }
}
