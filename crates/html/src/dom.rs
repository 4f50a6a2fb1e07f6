//! Live node tree with shared ownership.
//!
//! A [`NodeRef`] is a handle: cloning it never clones the node, and two handles are the
//! same node iff [`NodeRef::ptr_eq`] holds. Parents own their children; children keep a
//! weak back-reference to their parent.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    /// Detachable container of sibling nodes.
    Fragment,
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Fragment,
    Element,
    Text,
    Comment,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    /// The insertion would make a node its own ancestor, or the parent cannot hold children.
    HierarchyRequest,
    /// The node to replace has no parent to be replaced in.
    NotAChild,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::HierarchyRequest => f.write_str("node cannot be inserted at this position"),
            DomError::NotAChild => f.write_str("node is not attached to a parent"),
        }
    }
}

impl std::error::Error for DomError {}

/// Event delivered to listeners registered with [`NodeRef::add_event_listener`].
pub struct Event {
    pub kind: String,
    pub target: NodeRef,
}

type Callback = Rc<dyn Fn(&Event)>;

struct Listener {
    kind: String,
    callback: Callback,
}

struct NodeCell {
    data: RefCell<NodeData>,
    parent: RefCell<Weak<NodeCell>>,
    children: RefCell<Vec<NodeRef>>,
    listeners: RefCell<Vec<Listener>>,
}

impl Drop for NodeCell {
    // Unlink uniquely owned descendants iteratively so deep trees don't exhaust the stack.
    fn drop(&mut self) {
        let mut pending = std::mem::take(self.children.get_mut());
        while let Some(child) = pending.pop() {
            if let Ok(mut cell) = Rc::try_unwrap(child.0) {
                pending.append(cell.children.get_mut());
            }
        }
    }
}

#[derive(Clone)]
pub struct NodeRef(Rc<NodeCell>);

impl NodeRef {
    fn new(data: NodeData) -> Self {
        NodeRef(Rc::new(NodeCell {
            data: RefCell::new(data),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    pub fn fragment() -> Self {
        Self::new(NodeData::Fragment)
    }

    pub fn element(name: &str) -> Self {
        Self::new(NodeData::Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    pub fn element_with_attributes(name: &str, attributes: Vec<(String, Option<String>)>) -> Self {
        Self::new(NodeData::Element {
            name: name.to_ascii_lowercase(),
            attributes,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeData::Text(text.into()))
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(NodeData::Comment(text.into()))
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn data(&self) -> Ref<'_, NodeData> {
        self.0.data.borrow()
    }

    pub fn kind(&self) -> NodeKind {
        match &*self.data() {
            NodeData::Fragment => NodeKind::Fragment,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
        }
    }

    pub fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    pub fn is_fragment(&self) -> bool {
        self.kind() == NodeKind::Fragment
    }

    pub fn is_text(&self) -> bool {
        self.kind() == NodeKind::Text
    }

    fn can_have_children(&self) -> bool {
        matches!(self.kind(), NodeKind::Fragment | NodeKind::Element)
    }

    pub fn tag_name(&self) -> Option<String> {
        match &*self.data() {
            NodeData::Element { name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    pub fn has_tag_name(&self, tag: &str) -> bool {
        matches!(&*self.data(), NodeData::Element { name, .. } if name.eq_ignore_ascii_case(tag))
    }

    /// Value of the first attribute named `name`; `Some("")` for a valueless attribute.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match &*self.data() {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone().unwrap_or_default()),
            _ => None,
        }
    }

    pub fn attribute_is(&self, name: &str, value: &str) -> bool {
        match &*self.data() {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .is_some_and(|(_, v)| v.as_deref().unwrap_or("") == value),
            _ => false,
        }
    }

    /// Sets or replaces an attribute. No-op on non-element nodes.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut data = self.0.data.borrow_mut();
        let NodeData::Element { attributes, .. } = &mut *data else {
            return;
        };
        let name = name.to_ascii_lowercase();
        match attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = Some(value.to_string()),
            None => attributes.push((name, Some(value.to_string()))),
        }
    }

    /// Replaces the text of a text or comment node. No-op on containers.
    pub fn set_text(&self, text: &str) {
        match &mut *self.0.data.borrow_mut() {
            NodeData::Text(t) | NodeData::Comment(t) => {
                t.clear();
                t.push_str(text);
            }
            NodeData::Fragment | NodeData::Element { .. } => {}
        }
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.0.parent.borrow().upgrade().map(NodeRef)
    }

    /// Snapshot of the child list; later mutations don't affect the returned vector.
    pub fn children(&self) -> Vec<NodeRef> {
        self.0.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    pub fn first_child(&self) -> Option<NodeRef> {
        self.0.children.borrow().first().cloned()
    }

    pub fn element_children(&self) -> Vec<NodeRef> {
        self.0
            .children
            .borrow()
            .iter()
            .filter(|c| c.is_element())
            .cloned()
            .collect()
    }

    /// True if `other` is `self` or one of its descendants.
    pub fn contains(&self, other: &NodeRef) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Removes the node from its parent, if any.
    pub fn detach(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent
            .0
            .children
            .borrow_mut()
            .retain(|c| !c.ptr_eq(self));
        *self.0.parent.borrow_mut() = Weak::new();
    }

    /// Appends `child`, moving it out of any previous parent. Appending a fragment moves
    /// the fragment's children instead and leaves it empty.
    pub fn append_child(&self, child: &NodeRef) -> Result<(), DomError> {
        let moved = self.prepare_insert(child)?;
        for node in &moved {
            *node.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        }
        self.0.children.borrow_mut().extend(moved);
        Ok(())
    }

    /// Replaces this node in its parent with `replacement`, which is moved rather than
    /// cloned. A fragment replacement splices in its children.
    pub fn replace_with(&self, replacement: &NodeRef) -> Result<(), DomError> {
        if replacement.ptr_eq(self) {
            return Ok(());
        }
        let parent = self.parent().ok_or(DomError::NotAChild)?;
        let moved = parent.prepare_insert(replacement)?;

        let mut children = parent.0.children.borrow_mut();
        let index = children
            .iter()
            .position(|c| c.ptr_eq(self))
            .ok_or(DomError::NotAChild)?;
        for node in &moved {
            *node.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
        }
        children.splice(index..=index, moved);
        drop(children);

        *self.0.parent.borrow_mut() = Weak::new();
        Ok(())
    }

    /// Appends a freshly created, parentless node without hierarchy checks.
    pub(crate) fn push_new_child(&self, child: NodeRef) {
        debug_assert!(child.parent().is_none());
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child);
    }

    /// Validates an insertion under `self` and detaches the nodes that will move.
    fn prepare_insert(&self, child: &NodeRef) -> Result<Vec<NodeRef>, DomError> {
        if !self.can_have_children() || child.contains(self) {
            return Err(DomError::HierarchyRequest);
        }
        if child.is_fragment() {
            let moved = std::mem::take(&mut *child.0.children.borrow_mut());
            for node in &moved {
                *node.0.parent.borrow_mut() = Weak::new();
            }
            return Ok(moved);
        }
        child.detach();
        Ok(vec![child.clone()])
    }

    /// Concatenated text of all descendant text nodes, in tree order.
    pub fn text_content(&self) -> String {
        if let NodeData::Text(text) | NodeData::Comment(text) = &*self.data() {
            return text.clone();
        }
        let mut out = String::new();
        let mut stack = self.children();
        stack.reverse();
        while let Some(node) = stack.pop() {
            if let NodeData::Text(text) = &*node.data() {
                out.push_str(text);
                continue;
            }
            let mut children = node.children();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    pub fn add_event_listener(&self, kind: &str, callback: impl Fn(&Event) + 'static) {
        self.0.listeners.borrow_mut().push(Listener {
            kind: kind.to_string(),
            callback: Rc::new(callback),
        });
    }

    /// Invokes this node's listeners for `kind` in registration order; returns how many ran.
    pub fn dispatch_event(&self, kind: &str) -> usize {
        let callbacks: Vec<Callback> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| Rc::clone(&l.callback))
            .collect();
        let event = Event {
            kind: kind.to_string(),
            target: self.clone(),
        };
        for callback in &callbacks {
            callback(&event);
        }
        callbacks.len()
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.data() {
            NodeData::Fragment => write!(f, "#fragment({} children)", self.child_count()),
            NodeData::Element { name, .. } => {
                write!(f, "<{name}>({} children)", self.child_count())
            }
            NodeData::Text(text) => write!(f, "#text({text:?})"),
            NodeData::Comment(text) => write!(f, "#comment({text:?})"),
        }
    }
}
