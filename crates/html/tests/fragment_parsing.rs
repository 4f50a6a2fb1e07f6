use html::debug::outline;
use html::traverse::{descendants, get_element_by_id};
use html::{NodeRef, parse_fragment, to_html};

#[test]
fn serialization_is_stable_after_one_round() {
    let inputs = [
        "<p class=a>one<br>two</p>",
        "<ul><li>a<li>b</ul>",
        "<div><span>unclosed",
        "a < b && c > d",
        "<style>p > a { color: red }</style><p>&lt;x&gt;</p>",
        "<textarea><b>&amp;</b></textarea>",
        "</stray><i>ok</i></b>",
        "<!-- note --><input disabled value='x \"y\"'>",
    ];
    for input in inputs {
        let once = to_html(&parse_fragment(input));
        let twice = to_html(&parse_fragment(&once));
        assert_eq!(once, twice, "input: {input}");
    }
}

#[test]
fn scripts_are_inert_elements() {
    let root = parse_fragment("<script>document.write('<b>x</b>')</script><p>after</p>");
    let script = root.first_child().expect("script");
    assert!(script.has_tag_name("script"));
    assert_eq!(script.child_count(), 1);
    assert!(script.first_child().expect("text").is_text());
    assert_eq!(descendants(&root).filter(|n| n.has_tag_name("b")).count(), 0);
}

#[test]
fn parsed_tree_accepts_live_substitution() {
    let root = parse_fragment(r#"<section><div id="slot"></div><p>tail</p></section>"#);
    let marker = get_element_by_id(&root, "slot").expect("marker");
    let live = NodeRef::element("canvas");
    marker.replace_with(&live).expect("replace");
    assert!(marker.parent().is_none());
    assert_eq!(to_html(&root), "<section><canvas></canvas><p>tail</p></section>");
}

#[test]
fn deep_input_builds_and_drops_without_recursion() {
    let depth = 10_000;
    let input = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let root = parse_fragment(&input);
    assert_eq!(root.text_content(), "x");
    assert_eq!(outline(&root, 3).len(), 3);
    assert_eq!(to_html(&root).len(), input.len());
}
