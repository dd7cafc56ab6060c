//! # tmul: terminal markup renderer
//!
//! Renders XML documents made of `text`, `box` and `list` elements into
//! styled terminal output.
//!
//! ## Pipeline
//! - [`parser`] decodes markup into a generic [`Node`] tree
//! - [`document`] checks the root carries `type="tmul-1.0v"`
//! - [`resolver`] turns a node's attributes into a [`Style`]
//! - [`render`] composes the tree depth-first into a single string
//!
//! ## Example
//! ```ignore
//! use tmul::{render_document, StyleSheet};
//!
//! let xml = r#"
//! <box type="tmul-1.0v" border="rounded" padding="true">
//!   <text bold="true">Inventory</text>
//!   <list>
//!     <text>Lantern</text>
//!     <text>Rope</text>
//!   </list>
//! </box>
//! "#;
//!
//! let output = render_document(xml, &StyleSheet::default()).expect("invalid document");
//! println!("{}", output);
//! ```

pub mod ansi;
pub mod document;
pub mod error;
pub mod loader;
pub mod node;
mod paint;
pub mod parser;
pub mod render;
pub mod resolver;
pub mod style;
pub mod theme;

pub use document::DOCUMENT_TYPE;
pub use error::{TmulError, TmulResult};
pub use loader::{load_dir, DocumentSet, ENTRY_DOCUMENT};
pub use node::{Attributes, Node};
pub use parser::{decode, decode_file};
pub use render::{Layout, Renderer};
pub use resolver::resolve;
pub use style::{Align, BorderKind, Color, Edges, Style};
pub use theme::StyleSheet;

/// Decode, check and render a document in one step.
pub fn render_document(xml: &str, sheet: &StyleSheet) -> TmulResult<String> {
    let root = parser::decode(xml)?;
    document::validate(&root)?;
    Ok(Renderer::new(sheet).render(&root))
}
