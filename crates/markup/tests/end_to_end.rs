use html::dom_snapshot::{DomSnapshotOptions, assert_dom_eq};
use markup::{Fragment, NodeRef, html};

#[test]
fn script_text_is_inert() {
    let fragment = html!("<p>", "<script>x</script>", "</p>");
    assert_eq!(fragment.text_content(), "<script>x</script>");
    assert!(fragment.elements_by_tag_name("script").is_empty());
    assert_eq!(fragment.elements_by_tag_name("p").len(), 1);
}

#[test]
fn list_items_from_nested_templates() {
    let items: Vec<Fragment> = ["a", "b", "c"]
        .into_iter()
        .map(|v| html!("<li>", v, "</li>"))
        .collect();
    let fragment = html!("<ul>", items, "</ul>");

    let lists = fragment.elements_by_tag_name("ul");
    assert_eq!(lists.len(), 1);
    let lis = lists[0].element_children();
    assert_eq!(lis.len(), 3);
    let letters: Vec<String> = lis.iter().map(|li| li.text_content()).collect();
    assert_eq!(letters, ["a", "b", "c"]);
    assert!(lis.iter().all(|li| li.has_tag_name("li")));
}

#[test]
fn list_items_escape_their_content() {
    let items: Vec<Fragment> = ["<a>", "b&", "\"c\""]
        .into_iter()
        .map(|v| html!("<li>", v, "</li>"))
        .collect();
    let fragment = html!("<ul>", items, "</ul>");
    assert_eq!(
        fragment.to_html(),
        "<ul><li>&lt;a&gt;</li><li>b&amp;</li><li>&quot;c&quot;</li></ul>"
    );
}

#[test]
fn deeply_nested_sequences_render() {
    let mut value = markup::Value::from("deep");
    for _ in 0..1_000 {
        value = markup::Value::Seq(vec![value]);
    }
    let fragment = markup::Template::new("<p>").then(value, "</p>").render();
    assert_eq!(fragment.to_html(), "<p>deep</p>");
}

#[test]
fn very_deep_sequence_renders_and_drops() {
    let mut value = markup::Value::from("deep");
    for _ in 0..500_000 {
        value = markup::Value::Seq(vec![value]);
    }
    let fragment = markup::Template::new("<p>").then(value, "</p>").render();
    assert_eq!(fragment.to_html(), "<p>deep</p>");
}

#[test]
fn composed_tree_matches_parsed_markup() {
    let button = NodeRef::element("button");
    button.set_attribute("type", "button");
    let row = html!("<td>", "a&b", "</td><td>", &button, "</td>");
    let table = html!("<table><tr>", row, "</tr></table>");
    let expected = html::parse_fragment(
        "<table><tr><td>a&amp;b</td><td><button type=\"button\"></button></td></tr></table>",
    );
    assert_dom_eq(&expected, table.node(), &DomSnapshotOptions::default());
}
