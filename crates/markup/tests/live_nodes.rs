use markup::{
    Diagnostic, Fragment, IdTier, NodeRef, RenderContext, SeededEntropy, html, template,
};
use std::cell::Cell;
use std::rc::Rc;

fn seeded() -> RenderContext<SeededEntropy> {
    RenderContext::with_entropy(SeededEntropy::new(9, IdTier::Uuid))
}

fn no_markers_left(fragment: &Fragment, prefix: &str) -> bool {
    html::traverse::descendants(fragment.node())
        .all(|n| n.attribute("id").is_none_or(|id| !id.starts_with(prefix)))
}

#[test]
fn live_node_keeps_identity_and_listeners() {
    let clicks = Rc::new(Cell::new(0));
    let button = NodeRef::element("button");
    button.set_attribute("type", "button");
    let counter = Rc::clone(&clicks);
    button.add_event_listener("click", move |_| counter.set(counter.get() + 1));

    let fragment = html!("<form><p>", &button, "</p></form>");

    let form = &fragment.children()[0];
    let p = form.first_child().expect("p");
    let inserted = p.first_child().expect("button");
    assert!(inserted.ptr_eq(&button));
    assert_eq!(inserted.dispatch_event("click"), 1);
    assert_eq!(button.dispatch_event("click"), 1);
    assert_eq!(clicks.get(), 2);
    assert!(no_markers_left(&fragment, "sym_"));
}

#[test]
fn live_node_state_is_not_cloned() {
    let input = NodeRef::element("input");
    let fragment = html!("<label>Name ", &input, "</label>");
    input.set_attribute("value", "typed later");
    let found = fragment.elements_by_tag_name("input");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].attribute("value").as_deref(), Some("typed later"));
}

#[test]
fn nested_templates_resolve_inner_placeholders() {
    let live = NodeRef::element("b");
    let mut cx = seeded();
    let inner = template!("<span>", &live, "</span>").render_with(&mut cx);
    let outer = template!("<div>", inner, "</div>").render_with(&mut cx);

    let div = &outer.children()[0];
    assert!(div.has_tag_name("div"));
    let span = div.first_child().expect("span");
    assert!(span.has_tag_name("span"));
    assert!(span.first_child().expect("b").ptr_eq(&live));
    assert!(live.parent().expect("parent").ptr_eq(&span));
    assert!(cx.diagnostics().is_empty());
    assert!(no_markers_left(&outer, "sym_"));
}

#[test]
fn nested_fragment_content_survives_composition() {
    let inner = html!("<span>", "a & b", "</span>tail");
    let outer = html!("<div>", inner, "</div>");
    assert_eq!(outer.to_html(), "<div><span>a &amp; b</span>tail</div>");
}

#[test]
fn inserting_the_result_moves_its_content() {
    let fragment = html!("<li>one</li><li>two</li>");
    let list = NodeRef::element("ul");
    fragment.append_to(&list).expect("append");
    assert!(fragment.is_empty());
    assert_eq!(list.child_count(), 2);
}

#[test]
fn marker_in_rawtext_and_rcdata_stays_and_warns() {
    for (head, tail) in [("<style>", "</style>"), ("<textarea>", "</textarea>")] {
        let node = NodeRef::element("b");
        let mut cx = seeded();
        let fragment = markup::Template::new(head)
            .then(&node, tail)
            .render_with(&mut cx);
        assert!(node.parent().is_none(), "{head}");
        let [Diagnostic::MissingPlaceholder { token, tag }] = cx.diagnostics() else {
            panic!("{head}: unexpected diagnostics {:?}", cx.diagnostics());
        };
        assert_eq!(tag.as_deref(), Some("b"));
        let container = &fragment.children()[0];
        assert!(container.text_content().contains(token.as_str()), "{head}");
    }
}

#[test]
fn marker_in_attribute_value_is_reported() {
    let node = NodeRef::element("b");
    let mut cx = seeded();
    let _fragment = template!("<a title=\"", &node, "\">x</a>").render_with(&mut cx);
    assert!(node.parent().is_none());
    assert!(matches!(
        cx.diagnostics(),
        [Diagnostic::MissingPlaceholder { .. }]
    ));
}

#[test]
fn text_node_values_are_escaped_not_moved() {
    let parent = NodeRef::element("p");
    let text = NodeRef::text("<i>");
    parent.append_child(&text).expect("append");
    let fragment = html!("<div>", &text, "</div>");
    assert_eq!(fragment.to_html(), "<div>&lt;i&gt;</div>");
    assert!(text.parent().expect("still attached").ptr_eq(&parent));
}
