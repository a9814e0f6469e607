//! Tree walker and render pipeline
//!
//! [`Transformer`] owns the collaborators (tokenizer/serializer, highlighter,
//! math typesetter) and drives the recursive rewrite:
//!
//! - `section`: kept, children walked one heading level deeper
//! - `h`: retagged from the depth, then its children walked
//! - `code` / `math`: replaced, never descended into
//! - `quote`: retagged, then its children walked under the new tag
//! - anything else: kept, children walked under its own tag
//!
//! The walk is a pure function from nodes to new nodes; document order is
//! preserved.

use super::assembler::assemble;
use super::context::{Context, ElementKind};
use super::markup::{KdmlMarkup, Markup};
use super::math::{MathMlRenderer, MathRenderer};
use super::node::{Element, Node};
use super::rewrite::{rewrite_code, rewrite_heading, rewrite_math, rewrite_quote};
use super::syntax::{Highlighter, SyntaxHighlighter};
use crate::error::Result;
use log::debug;

/// Output of one render cycle, ready for a display surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Title markup from the document's `head`, if any
    pub title: Option<String>,
    /// Presentation markup of the body
    pub body: String,
}

impl Rendered {
    /// Title markup, empty when the document has no title.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// KDML to presentation-tree transformer.
pub struct Transformer {
    markup: Box<dyn Markup>,
    highlighter: Box<dyn Highlighter>,
    math: Box<dyn MathRenderer>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    /// Transformer wired with the default quick-xml markup, syntect
    /// highlighter and MathML typesetter.
    pub fn new() -> Self {
        Self::with_highlighter(SyntaxHighlighter::new())
    }

    /// Default collaborators around an already loaded highlighter.
    pub fn with_highlighter(highlighter: impl Highlighter + 'static) -> Self {
        Self::with_collaborators(KdmlMarkup, highlighter, MathMlRenderer)
    }

    pub fn with_collaborators(
        markup: impl Markup + 'static,
        highlighter: impl Highlighter + 'static,
        math: impl MathRenderer + 'static,
    ) -> Self {
        Self {
            markup: Box::new(markup),
            highlighter: Box::new(highlighter),
            math: Box::new(math),
        }
    }

    /// Run a full cycle: parse, rewrite, extract the title and serialize.
    pub fn render(&self, source: &str) -> Result<Rendered> {
        let nodes = self.markup.parse(source)?;
        let nodes = self.transform(nodes)?;
        let assembled = assemble(nodes);

        let rendered = Rendered {
            title: assembled
                .title
                .map(|title| self.markup.serialize(&title)),
            body: self.markup.serialize(&assembled.body),
        };
        debug!(
            "Rendered {} bytes of source into {} bytes of markup",
            source.len(),
            rendered.body.len()
        );
        Ok(rendered)
    }

    /// Rewrite a whole document from the root context.
    pub fn transform(&self, nodes: Vec<Node>) -> Result<Vec<Node>> {
        self.walk(nodes, Context::root())
    }

    /// Rewrite a node sequence whose parent is described by `ctx`.
    pub fn walk(&self, nodes: Vec<Node>, ctx: Context<'_>) -> Result<Vec<Node>> {
        nodes
            .into_iter()
            .map(|node| match node {
                Node::Text(_) => Ok(node),
                Node::Element(element) => self.walk_element(element, ctx).map(Node::Element),
            })
            .collect()
    }

    fn walk_element(&self, element: Element, ctx: Context<'_>) -> Result<Element> {
        match ElementKind::of(&element.tag) {
            ElementKind::Section => {
                let children = self.walk(element.children, ctx.enter_section())?;
                Ok(Element {
                    children,
                    ..element
                })
            }
            ElementKind::Heading => self.descend(rewrite_heading(element, ctx.depth), ctx),
            ElementKind::Code => rewrite_code(
                element,
                ctx.parent,
                self.markup.as_ref(),
                self.highlighter.as_ref(),
            ),
            ElementKind::Math => {
                rewrite_math(element, ctx.parent, self.markup.as_ref(), self.math.as_ref())
            }
            ElementKind::Quote => self.descend(rewrite_quote(element, ctx.parent), ctx),
            ElementKind::Generic => self.descend(element, ctx),
        }
    }

    /// Walk an element's children with the element's own tag as parent.
    fn descend(&self, element: Element, ctx: Context<'_>) -> Result<Element> {
        let Element {
            tag,
            attrs,
            children,
        } = element;
        let children = self.walk(children, ctx.child_of(&tag))?;
        Ok(Element {
            tag,
            attrs,
            children,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
