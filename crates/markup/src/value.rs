//! Values that can be interpolated into a template.

use crate::fragment::Fragment;
use crate::unsafe_markup::UnsafeMarkup;
use html::{NodeKind, NodeRef};
use std::borrow::Cow;
use std::fmt;

/// An interpolated value, classified once at the boundary.
///
/// The variant decides how a value reaches the output: escaped text, verbatim markup,
/// or a live node substituted after parsing.
#[derive(Debug)]
pub enum Value {
    /// Spliced verbatim.
    Unsafe(UnsafeMarkup),
    /// Escaped.
    Text(String),
    /// Element or comment inserted by identity.
    Node(NodeRef),
    /// Each child is processed in order.
    Fragment(Fragment),
    /// Each item is processed in order; nesting is flattened.
    Seq(Vec<Value>),
    /// Text node; its current text is escaped.
    TextNode(NodeRef),
    /// Anything else, rendered through its display form and escaped.
    Other(Scalar),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    /// Renders as nothing.
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::UInt(n) => write!(f, "{n}"),
            Scalar::Float(n) => write!(f, "{n}"),
        }
    }
}

impl Drop for Value {
    // Flatten nested sequences onto one vector so deep nesting drops without recursion.
    fn drop(&mut self) {
        let Value::Seq(items) = self else {
            return;
        };
        let mut pending = std::mem::take(items);
        while let Some(mut value) = pending.pop() {
            if let Value::Seq(inner) = &mut value {
                pending.append(inner);
            }
        }
    }
}

impl Value {
    pub fn null() -> Self {
        Value::Other(Scalar::Null)
    }

    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        match node.kind() {
            NodeKind::Element | NodeKind::Comment => Value::Node(node),
            NodeKind::Text => Value::TextNode(node),
            NodeKind::Fragment => match Fragment::from_node(node) {
                Ok(fragment) => Value::Fragment(fragment),
                Err(_) => Value::null(),
            },
        }
    }
}

impl From<&NodeRef> for Value {
    fn from(node: &NodeRef) -> Self {
        Value::from(node.clone())
    }
}

impl From<Fragment> for Value {
    fn from(fragment: Fragment) -> Self {
        Value::Fragment(fragment)
    }
}

impl From<UnsafeMarkup> for Value {
    fn from(markup: UnsafeMarkup) -> Self {
        Value::Unsafe(markup)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Other(scalar)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(s: Cow<'_, str>) -> Self {
        Value::Text(s.into_owned())
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Text(c.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Other(Scalar::Bool(b))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Other(Scalar::Float(n))
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Other(Scalar::$variant(n as $wide))
                }
            }
        )*
    };
}

impl_from_int!(Int, i64: i8, i16, i32, i64, isize);
impl_from_int!(UInt, u64: u8, u16, u32, u64, usize);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Value::null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::seq(items)
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::seq(items.iter().cloned())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::seq(items)
    }
}
