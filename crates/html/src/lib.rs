//! Minimal HTML fragment parsing and an arena DOM for form-binding work.
//!
//! The DOM keeps parent links so ancestor walks (enclosing form, owning component) are cheap,
//! and tracks the live state of form controls (typed value, checkedness, selectedness)
//! separately from their markup attributes.

pub mod dom_utils;

mod dom;
mod dom_builder;
mod entities;
mod tokenizer;
mod types;

pub use crate::dom::{Ancestors, Descendants, Dom, DomError, Element, NodeKind};
pub use crate::dom_utils::{
    append_markup, clone_element, parse_markup_to_element, render_opening_tag, render_outer_html,
};
pub use crate::tokenizer::tokenize;
pub use crate::types::{Attribute, Id, NodeId, Token};
