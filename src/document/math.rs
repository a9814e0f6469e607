//! Math typesetting for `math` elements.
//!
//! LaTeX-style sources are typeset to MathML with `latex2mathml`. Typesetting
//! failures are returned to the caller untouched; a render cycle with broken
//! math fails as a whole.

use super::markup::{escape, unescape};
use crate::error::{Error, Result};
use latex2mathml::{latex_to_mathml, DisplayStyle};

/// MathML token elements, the only ones holding character data.
const TOKEN_TAGS: &[&str] = &["mi", "mn", "mo", "ms", "mtext"];

/// How a formula is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    /// Block formula on its own line
    Display,
    /// Formula flowing with surrounding text
    Inline,
}

impl MathMode {
    pub fn from_block(block: bool) -> Self {
        if block {
            MathMode::Display
        } else {
            MathMode::Inline
        }
    }
}

/// Typesets raw math source into markup.
pub trait MathRenderer {
    fn render(&self, source: &str, mode: MathMode) -> Result<String>;
}

/// MathML typesetter backed by `latex2mathml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathMlRenderer;

impl MathRenderer for MathMlRenderer {
    fn render(&self, source: &str, mode: MathMode) -> Result<String> {
        let style = match mode {
            MathMode::Display => DisplayStyle::Block,
            MathMode::Inline => DisplayStyle::Inline,
        };
        let mathml = latex_to_mathml(source, style).map_err(|e| Error::Math {
            source_text: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(well_formed(&mathml))
    }
}

/// Make typesetter output parseable markup.
///
/// `latex2mathml` writes operator and text characters unescaped (`<mo><</mo>`,
/// `<mi>&</mi>`) and closes sized parentheses with `</mro>`. Token contents
/// are re-escaped and the stray close tag repaired.
fn well_formed(mathml: &str) -> String {
    let mathml = mathml.replace("</mro>", "</mo>");
    let mut out = String::with_capacity(mathml.len());
    let mut rest = mathml.as_str();

    while let Some((start, tag)) = find_token_open(rest) {
        let Some(open_len) = rest[start..].find('>') else {
            break;
        };
        let content_start = start + open_len + 1;
        out.push_str(&rest[..content_start]);
        rest = &rest[content_start..];

        if out.ends_with("/>") {
            continue;
        }

        let close = format!("</{}>", tag);
        let Some(content_len) = rest.find(&close) else {
            break;
        };
        out.push_str(&escape(&unescape(&rest[..content_len])));
        out.push_str(&close);
        rest = &rest[content_len + close.len()..];
    }

    out.push_str(rest);
    out
}

/// Position and tag of the first token element start tag in `mathml`.
fn find_token_open(mathml: &str) -> Option<(usize, &'static str)> {
    mathml.match_indices('<').find_map(|(index, _)| {
        let after = &mathml[index + 1..];
        TOKEN_TAGS
            .iter()
            .find(|tag| {
                after
                    .strip_prefix(**tag)
                    .is_some_and(|r| r.starts_with(['>', ' ', '/']))
            })
            .map(|tag| (index, *tag))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_block() {
        assert_eq!(MathMode::from_block(true), MathMode::Display);
        assert_eq!(MathMode::from_block(false), MathMode::Inline);
    }

    #[test]
    fn test_render_display_math() {
        let mathml = MathMlRenderer.render("x^2", MathMode::Display).unwrap();
        assert!(mathml.starts_with("<math"));
        assert!(mathml.contains(r#"display="block""#));
        assert!(mathml.contains("<msup>"));
    }

    #[test]
    fn test_render_inline_math_differs_from_display() {
        let inline = MathMlRenderer.render("a + b", MathMode::Inline).unwrap();
        let display = MathMlRenderer.render("a + b", MathMode::Display).unwrap();
        assert!(inline.contains("<mi>a</mi>"));
        assert_ne!(inline, display);
    }

    #[test]
    fn test_render_escapes_operators() {
        let mathml = MathMlRenderer.render("a < b", MathMode::Inline).unwrap();
        assert!(mathml.contains("<mo>&lt;</mo>"));
        assert!(crate::document::markup::parse(&mathml).is_ok());

        let mathml = MathMlRenderer.render(r"x \& y", MathMode::Inline).unwrap();
        assert!(mathml.contains("&amp;</mi>"));
        assert!(crate::document::markup::parse(&mathml).is_ok());
    }

    #[test]
    fn test_well_formed_token_contents() {
        assert_eq!(
            well_formed("<mrow><mi>a</mi><mo><</mo><mo>></mo><mi>b</mi></mrow>"),
            "<mrow><mi>a</mi><mo>&lt;</mo><mo>&gt;</mo><mi>b</mi></mrow>"
        );
        assert_eq!(
            well_formed(r#"<mi mathvariant="normal">&</mi><mo>&amp;</mo>"#),
            r#"<mi mathvariant="normal">&amp;</mi><mo>&amp;</mo>"#
        );
    }

    #[test]
    fn test_well_formed_repairs_sized_paren_close() {
        assert_eq!(
            well_formed(r#"<mrow><mo maxsize="1.2em" minsize="1.2em">(</mro></mrow><mspace width="1em"/>"#),
            r#"<mrow><mo maxsize="1.2em" minsize="1.2em">(</mo></mrow><mspace width="1em"/>"#
        );
    }
}
