//! Positional context for the tree walk.
//!
//! Rewriters only ever look at the immediate parent tag and the current
//! heading depth. Block position is decided by the parent tag alone: a node is
//! block-level when its parent is a `section` or when it sits at the document
//! root.

/// Sectioning container: raises heading depth and defines block context.
pub const SECTION_TAG: &str = "section";
/// Heading whose level comes from the section depth.
pub const HEADING_TAG: &str = "h";
pub const CODE_TAG: &str = "code";
pub const MATH_TAG: &str = "math";
pub const QUOTE_TAG: &str = "quote";

/// Deepest heading level HTML has.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Element kinds the walker treats specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Section,
    Heading,
    Code,
    Math,
    Quote,
    /// Any other tag, passed through unchanged
    Generic,
}

impl ElementKind {
    /// Classify a tag. Matching is exact and case-sensitive.
    pub fn of(tag: &str) -> Self {
        match tag {
            SECTION_TAG => ElementKind::Section,
            HEADING_TAG => ElementKind::Heading,
            CODE_TAG => ElementKind::Code,
            MATH_TAG => ElementKind::Math,
            QUOTE_TAG => ElementKind::Quote,
            _ => ElementKind::Generic,
        }
    }
}

/// Whether a node whose immediate parent is `parent` is in block position.
pub fn is_block(parent: Option<&str>) -> bool {
    matches!(parent, None | Some(SECTION_TAG))
}

/// Context threaded down the recursion by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context<'a> {
    /// Tag of the immediate parent, `None` at the document root
    pub parent: Option<&'a str>,
    /// Heading depth, starting at 1 and raised by each enclosing section
    pub depth: usize,
}

impl Context<'static> {
    /// Context of the document root.
    pub fn root() -> Self {
        Self {
            parent: None,
            depth: 1,
        }
    }
}

impl Context<'_> {
    /// Context for the children of an element tagged `parent`, keeping depth.
    pub fn child_of<'b>(self, parent: &'b str) -> Context<'b> {
        Context {
            parent: Some(parent),
            depth: self.depth,
        }
    }

    /// Context for the children of a section.
    pub fn enter_section(self) -> Context<'static> {
        Context {
            parent: Some(SECTION_TAG),
            depth: self.depth + 1,
        }
    }

    pub fn is_block(&self) -> bool {
        is_block(self.parent)
    }
}
