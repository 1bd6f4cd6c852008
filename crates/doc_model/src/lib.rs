//! Document Model - the internal rich-document tree
//!
//! This crate provides the document tree exchanged between the OOXML codec
//! and the editing surface: a JSON-serializable tree of `{type, attrs, content}`
//! nodes, plus the numbering model types shared by both sides.

mod error;
mod node;
pub mod list;

pub use error::*;
pub use list::*;
pub use node::*;
