use html::traverse::{elements_by_tag_name, get_element_by_id};
use html::{DomError, NodeRef};

/// The result of rendering a template: a detached fragment node whose children are the
/// parsed content.
///
/// Inserting the fragment somewhere moves its children out and leaves it empty.
#[derive(Debug)]
pub struct Fragment {
    root: NodeRef,
}

impl Fragment {
    pub fn new() -> Self {
        Self {
            root: NodeRef::fragment(),
        }
    }

    /// Wraps an existing fragment node. Returns the node back if it is not one.
    pub fn from_node(node: NodeRef) -> Result<Self, NodeRef> {
        if node.is_fragment() {
            Ok(Self { root: node })
        } else {
            Err(node)
        }
    }

    pub fn node(&self) -> &NodeRef {
        &self.root
    }

    pub fn into_node(self) -> NodeRef {
        self.root
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.root.children()
    }

    pub fn is_empty(&self) -> bool {
        self.root.child_count() == 0
    }

    /// Moves the content under `parent`.
    pub fn append_to(&self, parent: &NodeRef) -> Result<(), DomError> {
        parent.append_child(&self.root)
    }

    pub fn to_html(&self) -> String {
        html::to_html(&self.root)
    }

    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeRef> {
        get_element_by_id(&self.root, id)
    }

    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<NodeRef> {
        elements_by_tag_name(&self.root, tag)
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}
