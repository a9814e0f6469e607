//! Fake collaborators for exercising rewriters in isolation.

use super::math::{MathMode, MathRenderer};
use super::syntax::Highlighter;
use crate::error::{Error, Result};
use std::cell::RefCell;

/// Highlights only `rust`, wrapping the escaped input in a single span, and
/// records every input it was given.
#[derive(Default)]
pub struct FakeHighlighter {
    pub inputs: RefCell<Vec<String>>,
}

impl Highlighter for FakeHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<Option<String>> {
        self.inputs.borrow_mut().push(code.to_string());
        if language != "rust" {
            return Ok(None);
        }
        Ok(Some(format!(
            "<span class=\"kw\">{}</span>",
            html_escape::encode_text(code)
        )))
    }
}

/// Emits `<m mode="...">source</m>` and rejects sources containing `\bad`.
#[derive(Default)]
pub struct FakeMath {
    pub inputs: RefCell<Vec<(String, MathMode)>>,
}

impl MathRenderer for FakeMath {
    fn render(&self, source: &str, mode: MathMode) -> Result<String> {
        self.inputs.borrow_mut().push((source.to_string(), mode));
        if source.contains("\\bad") {
            return Err(Error::Math {
                source_text: source.to_string(),
                message: "unknown command".to_string(),
            });
        }
        let mode = match mode {
            MathMode::Display => "display",
            MathMode::Inline => "inline",
        };
        Ok(format!(
            "<m mode=\"{}\">{}</m>",
            mode,
            html_escape::encode_text(source)
        ))
    }
}
