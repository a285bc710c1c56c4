//! Generic XML tree for the podwire federation wire format.
//!
//! Every layer above this crate works on [`XmlNode`] — an ordered tree of
//! elements with attributes and optional text content. This crate owns the
//! two boundaries to raw text:
//! - [`parse_document`] reads a document string into a tree, tolerating
//!   insignificant whitespace,
//! - [`XmlNode::to_document_string`] writes a tree back out compactly with
//!   a leading XML declaration.
//!
//! Wire documents always start with an XML declaration; [`ensure_declaration`]
//! prepends the default one to caller-supplied strings that lack it.

mod document;
mod error;
mod node;

pub use document::{XML_DECLARATION, ensure_declaration, parse_document};
pub use error::{XmlError, XmlResult};
pub use node::XmlNode;
