#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{IdTier, RenderContext, SeededEntropy, Template};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut cx = RenderContext::with_entropy(SeededEntropy::new(0, IdTier::Uuid));
    let fragment = Template::new("<p>").then(text, "</p>").render_with(&mut cx);
    let children = fragment.children();
    assert_eq!(children.len(), 1);
    assert!(children[0].element_children().is_empty());
    assert_eq!(fragment.text_content(), text);
});
