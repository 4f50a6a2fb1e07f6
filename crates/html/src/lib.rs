//! Inert HTML fragment parsing over a live, identity-preserving node tree.

pub mod debug;
pub mod dom;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;
pub mod serialize;
pub mod traverse;

mod dom_builder;
mod entities;
mod tokenizer;
mod types;

pub use crate::dom::{DomError, Event, NodeData, NodeKind, NodeRef};
pub use crate::dom_builder::{build_fragment, parse_fragment};
pub use crate::entities::escape_html;
pub use crate::serialize::to_html;
pub use crate::tokenizer::{Tokenizer, tokenize};
pub use crate::types::{AtomId, AtomTable, Token, TokenStream};
