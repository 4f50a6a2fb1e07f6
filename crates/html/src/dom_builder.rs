use crate::dom::NodeRef;
use crate::tokenizer::tokenize;
use crate::types::{Token, TokenStream};

/// Parses `markup` into a detached fragment.
///
/// The fragment is never attached to a document and nothing in it runs: `script`
/// elements become ordinary inert element nodes.
pub fn parse_fragment(markup: &str) -> NodeRef {
    build_fragment(&tokenize(markup))
}

/// Builds a fragment from a token stream using an open-elements stack.
///
/// An end tag closes the nearest open element with the same name (and everything opened
/// after it); an end tag with no matching open element is ignored. Doctypes are dropped.
pub fn build_fragment(stream: &TokenStream) -> NodeRef {
    let atoms = stream.atoms();
    let root = NodeRef::fragment();
    let mut open_elements: Vec<NodeRef> = Vec::new();

    for token in stream.tokens() {
        let parent = open_elements.last().unwrap_or(&root);
        match token {
            Token::Doctype(_) => {}
            Token::Comment(text) => parent.push_new_child(NodeRef::comment(text.as_str())),
            Token::Text(text) => {
                if !text.is_empty() {
                    parent.push_new_child(NodeRef::text(text.as_str()));
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let attributes = attributes
                    .iter()
                    .map(|(k, v)| (atoms.resolve(*k).to_string(), v.clone()))
                    .collect();
                let element = NodeRef::element_with_attributes(atoms.resolve(*name), attributes);
                parent.push_new_child(element.clone());
                if !*self_closing {
                    open_elements.push(element);
                }
            }
            Token::EndTag(name) => {
                let target = atoms.resolve(*name);
                if let Some(index) = open_elements.iter().rposition(|e| e.has_tag_name(target)) {
                    open_elements.truncate(index);
                } else {
                    log::trace!(target: "html.dom_builder", "ignoring stray </{target}>");
                }
            }
        }
    }

    root
}
