//! KDML document model, rewriting and rendering
//!
//! This module turns KDML source into presentation markup. Parsing and
//! serialization, syntax highlighting and math typesetting are capabilities
//! injected into the [`Transformer`]; the rest is the context-sensitive
//! rewrite of sections, headings, code, math and quotes.
//!
//! # Example
//! ```ignore
//! use kdml::document::Transformer;
//!
//! let transformer = Transformer::new();
//! let rendered = transformer.render("<section><h>Intro</h></section>")?;
//! assert_eq!(rendered.body, "<section><h2>Intro</h2></section>");
//! ```

pub mod assembler;
pub mod context;
pub mod markup;
pub mod math;
pub mod node;
pub mod rewrite;
pub mod syntax;
mod transformer;

#[cfg(test)]
mod test_support;

pub use assembler::{assemble, Assembled};
pub use context::{is_block, Context, ElementKind};
pub use markup::{KdmlMarkup, Markup};
pub use math::{MathMlRenderer, MathMode, MathRenderer};
pub use node::{Attributes, Element, Node};
pub use syntax::{Highlighter, SyntaxHighlighter};
pub use transformer::{Rendered, Transformer};
