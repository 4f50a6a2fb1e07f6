use crate::dom::NodeRef;

/// Pre-order iterator over the descendants of a node (the node itself excluded).
pub struct Descendants {
    stack: Vec<NodeRef>,
}

impl Iterator for Descendants {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let node = self.stack.pop()?;
        let mut children = node.children();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}

pub fn descendants(root: &NodeRef) -> Descendants {
    let mut stack = root.children();
    stack.reverse();
    Descendants { stack }
}

/// First element in tree order whose `attr` equals `value`.
pub fn find_element_by_attribute(root: &NodeRef, attr: &str, value: &str) -> Option<NodeRef> {
    descendants(root).find(|n| n.attribute_is(attr, value))
}

pub fn get_element_by_id(root: &NodeRef, id: &str) -> Option<NodeRef> {
    find_element_by_attribute(root, "id", id)
}

pub fn elements_by_tag_name(root: &NodeRef, tag: &str) -> Vec<NodeRef> {
    descendants(root).filter(|n| n.has_tag_name(tag)).collect()
}
