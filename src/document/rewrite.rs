//! Element rewriters
//!
//! One rule per special element kind. Each takes the element by value plus
//! its positional context and returns the replacement; none of them recurse.
//! Headings and quotes keep their children so the walker can descend into
//! them afterwards, while code and math replace their children with final
//! highlighted or typeset markup.

use super::context::{is_block, MAX_HEADING_LEVEL};
use super::markup::{unescape, Markup};
use super::math::{MathMode, MathRenderer};
use super::node::{Element, Node};
use super::syntax::Highlighter;
use crate::error::Result;
use log::debug;

/// Retag a heading as `h1`..`h6` from the current section depth.
///
/// Depths outside `1..=6` are clamped.
pub fn rewrite_heading(element: Element, depth: usize) -> Element {
    let level = depth.clamp(1, MAX_HEADING_LEVEL);
    Element {
        tag: format!("h{}", level),
        ..element
    }
}

/// Replace a code element with highlighted (or plain) code.
///
/// The children are serialized back to their source text. When `lang` names
/// a language the highlighter supports, the unescaped source is highlighted
/// and the result parsed back into nodes; otherwise the source text is kept
/// as a single text leaf. The `language-<lang>` class depends only on `lang`
/// being present. In block position the code is wrapped in `pre`.
pub fn rewrite_code(
    element: Element,
    parent: Option<&str>,
    markup: &dyn Markup,
    highlighter: &dyn Highlighter,
) -> Result<Element> {
    let source = markup.serialize(&element.children);
    let lang = element.attrs.get("lang");

    let highlighted = match lang {
        Some(lang) => highlighter.highlight(&unescape(&source), lang)?,
        None => None,
    };
    let content = match highlighted {
        Some(highlighted) => markup.parse(&highlighted)?,
        None => {
            if let Some(lang) = lang {
                debug!("Language '{}' not supported, leaving code plain", lang);
            }
            vec![Node::Text(source)]
        }
    };

    let class = lang.map(|lang| format!("language-{}", lang));
    let code = Element::new("code")
        .with_class(class.clone())
        .with_children(content);

    if is_block(parent) {
        Ok(Element::new("pre").with_class(class).with_child(code))
    } else {
        Ok(code)
    }
}

/// Replace a math element with typeset markup.
///
/// Block position typesets in display mode inside `div.math`; anywhere else
/// typesets inline inside `span.math`. Typesetter errors propagate.
pub fn rewrite_math(
    element: Element,
    parent: Option<&str>,
    markup: &dyn Markup,
    math: &dyn MathRenderer,
) -> Result<Element> {
    let block = is_block(parent);
    let source = markup.serialize(&element.children);
    let typeset = math.render(&unescape(&source), MathMode::from_block(block))?;
    let content = markup.parse(&typeset)?;

    let tag = if block { "div" } else { "span" };
    Ok(Element::new(tag)
        .with_attr("class", "math")
        .with_children(content))
}

/// Retag a quote as `blockquote` in block position and `q` elsewhere.
pub fn rewrite_quote(element: Element, parent: Option<&str>) -> Element {
    let tag = if is_block(parent) { "blockquote" } else { "q" };
    Element {
        tag: tag.to_string(),
        ..element
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::markup::{parse, KdmlMarkup};
    use crate::document::test_support::{FakeHighlighter, FakeMath};
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn element(source: &str) -> Element {
        parse(source)
            .unwrap()
            .into_iter()
            .next()
            .and_then(Node::into_element)
            .unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Heading
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_level_from_depth() {
        let heading = rewrite_heading(element("<h id=\"a\">Title</h>"), 3);
        assert_eq!(heading.tag, "h3");
        assert_eq!(heading.attrs.get("id"), Some("a"));
        assert_eq!(heading.children, vec![Node::text("Title")]);
    }

    #[test]
    fn test_heading_depth_clamped() {
        assert_eq!(rewrite_heading(Element::new("h"), 0).tag, "h1");
        assert_eq!(rewrite_heading(Element::new("h"), 6).tag, "h6");
        assert_eq!(rewrite_heading(Element::new("h"), 7).tag, "h6");
        assert_eq!(rewrite_heading(Element::new("h"), 40).tag, "h6");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Code
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_block_code_wraps_in_pre() {
        let highlighter = FakeHighlighter::default();
        let code = element(r#"<code lang="rust">let x;</code>"#);
        let result = rewrite_code(code, Some("section"), &KdmlMarkup, &highlighter).unwrap();

        let expected = Element::new("pre")
            .with_attr("class", "language-rust")
            .with_child(
                Element::new("code")
                    .with_attr("class", "language-rust")
                    .with_child(Element::new("span").with_attr("class", "kw").with_child(
                        Node::text("let x;"),
                    )),
            );
        assert_eq!(result, expected);
    }

    #[test]
    fn test_root_code_is_block() {
        let highlighter = FakeHighlighter::default();
        let result =
            rewrite_code(element("<code>x</code>"), None, &KdmlMarkup, &highlighter).unwrap();
        assert_eq!(result.tag, "pre");
    }

    #[test]
    fn test_inline_code_single_element() {
        let highlighter = FakeHighlighter::default();
        let code = element(r#"<code lang="rust">x</code>"#);
        let result = rewrite_code(code, Some("p"), &KdmlMarkup, &highlighter).unwrap();

        assert_eq!(result.tag, "code");
        assert_eq!(result.attrs.get("class"), Some("language-rust"));
        assert_eq!(result.children[0].tag(), Some("span"));
    }

    #[test]
    fn test_code_without_lang_has_no_class() {
        let highlighter = FakeHighlighter::default();
        let result =
            rewrite_code(element("<code>plain</code>"), Some("p"), &KdmlMarkup, &highlighter)
                .unwrap();

        assert!(result.attrs.is_empty());
        assert_eq!(result.children, vec![Node::text("plain")]);
        assert!(highlighter.inputs.borrow().is_empty());
    }

    #[test]
    fn test_unsupported_language_keeps_source_and_class() {
        let highlighter = FakeHighlighter::default();
        let code = element(r#"<code lang="nonexistent-lang">a &lt; b</code>"#);
        let result = rewrite_code(code, Some("p"), &KdmlMarkup, &highlighter).unwrap();

        assert_eq!(result.attrs.get("class"), Some("language-nonexistent-lang"));
        assert_eq!(result.children, vec![Node::text("a &lt; b")]);
    }

    #[test]
    fn test_highlighter_receives_unescaped_source() {
        let highlighter = FakeHighlighter::default();
        let code = element(r#"<code lang="rust">if a &lt; b &amp;&amp; c {}</code>"#);
        let result = rewrite_code(code, Some("p"), &KdmlMarkup, &highlighter).unwrap();

        assert_eq!(
            highlighter.inputs.borrow().as_slice(),
            &["if a < b && c {}".to_string()]
        );
        // Highlighter output is re-parsed, so escaping survives in the tree
        let span = result.children[0].as_element().unwrap();
        assert_eq!(span.children, vec![Node::text("if a &lt; b &amp;&amp; c {}")]);
    }

    #[test]
    fn test_code_children_serialized_as_source() {
        let highlighter = FakeHighlighter::default();
        let code = element(r#"<code lang="rust">a<b>c</b></code>"#);
        rewrite_code(code, Some("p"), &KdmlMarkup, &highlighter).unwrap();

        assert_eq!(highlighter.inputs.borrow()[0], "a<b>c</b>");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Math
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_block_math_display_mode() {
        let math = FakeMath::default();
        let result =
            rewrite_math(element("<math>x^2</math>"), None, &KdmlMarkup, &math).unwrap();

        assert_eq!(result.tag, "div");
        assert_eq!(result.attrs.get("class"), Some("math"));
        let typeset = result.children[0].as_element().unwrap();
        assert_eq!(typeset.attrs.get("mode"), Some("display"));
        assert_eq!(math.inputs.borrow()[0].1, MathMode::Display);
    }

    #[test]
    fn test_inline_math_inline_mode() {
        let math = FakeMath::default();
        let result =
            rewrite_math(element("<math>x^2</math>"), Some("p"), &KdmlMarkup, &math).unwrap();

        assert_eq!(result.tag, "span");
        assert_eq!(result.attrs.get("class"), Some("math"));
        assert_eq!(math.inputs.borrow()[0].1, MathMode::Inline);
    }

    #[test]
    fn test_math_source_unescaped() {
        let math = FakeMath::default();
        rewrite_math(element("<math>a &lt; b</math>"), None, &KdmlMarkup, &math).unwrap();
        assert_eq!(math.inputs.borrow()[0].0, "a < b");
    }

    #[test]
    fn test_math_error_propagates() {
        let math = FakeMath::default();
        let result = rewrite_math(element("<math>\\bad</math>"), None, &KdmlMarkup, &math);
        assert!(matches!(result, Err(Error::Math { .. })));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Quote
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_block_quote() {
        let quote = rewrite_quote(element("<quote cite=\"x\">Hi</quote>"), Some("section"));
        assert_eq!(quote.tag, "blockquote");
        assert_eq!(quote.attrs.get("cite"), Some("x"));
        assert_eq!(quote.children, vec![Node::text("Hi")]);
    }

    #[test]
    fn test_inline_quote() {
        let quote = rewrite_quote(element("<quote>Hi</quote>"), Some("p"));
        assert_eq!(quote.tag, "q");
    }
}
