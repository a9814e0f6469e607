//! KDML tokenizer and serializer
//!
//! KDML is written as HTML-like markup. The tokenizer is built on quick-xml's
//! event reader with lenient HTML attribute parsing, and the serializer is the
//! inverse used both for re-serializing fragments (code and math sources) and
//! for producing the final presentation markup.
//!
//! Text is kept exactly as written: entity references such as `&lt;` stay
//! escaped inside text leaves and are only decoded by [`unescape`] when a
//! collaborator needs raw source.

use super::node::{Element, Node};
use crate::error::{Error, Result};
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

/// HTML elements that never have content and serialize without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

// ─────────────────────────────────────────────────────────────────────────────
// Markup Capability
// ─────────────────────────────────────────────────────────────────────────────

/// Converts between markup text and node trees.
pub trait Markup {
    /// Tokenize markup into an ordered node sequence.
    fn parse(&self, source: &str) -> Result<Vec<Node>>;

    /// Serialize nodes back into markup text.
    fn serialize(&self, nodes: &[Node]) -> String;
}

/// The default KDML tokenizer/serializer.
#[derive(Debug, Clone, Copy, Default)]
pub struct KdmlMarkup;

impl Markup for KdmlMarkup {
    fn parse(&self, source: &str) -> Result<Vec<Node>> {
        parse(source)
    }

    fn serialize(&self, nodes: &[Node]) -> String {
        serialize(nodes)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tokenizer
// ─────────────────────────────────────────────────────────────────────────────

/// Parse KDML source into a node sequence.
///
/// Unknown tags pass through as generic elements, comments and CDATA sections
/// are kept verbatim as text, and elements still open at end of input are
/// closed implicitly. Tokenizing is lenient the way HTML is: a `&` that does
/// not start a reference is text, a `<` not followed by a tag name is text,
/// and void elements such as `<br>` need no closing tag. A closing tag that
/// does not match the open element is a parse error.
pub fn parse(source: &str) -> Result<Vec<Node>> {
    let source = escape_stray_lt(source);
    let mut reader = Reader::from_str(&source);
    let config = reader.config_mut();
    config.allow_dangling_amp = true;
    config.check_end_names = false;

    let mut open: Vec<Element> = Vec::new();
    let mut root: Vec<Node> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| Error::Parse {
            message: e.to_string(),
            position: reader.buffer_position() as u64,
        })?;

        match event {
            Event::Start(e) => {
                let element = start_element(&e, &reader)?;
                if is_void(&element.tag) {
                    children_of(&mut open, &mut root).push(element.into());
                } else {
                    open.push(element);
                }
            }
            Event::Empty(e) => {
                let element = start_element(&e, &reader)?;
                children_of(&mut open, &mut root).push(element.into());
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if is_void(&name) {
                    continue;
                }
                match open.pop() {
                    Some(element) if element.tag == name => {
                        children_of(&mut open, &mut root).push(element.into());
                    }
                    Some(element) => {
                        return Err(Error::Parse {
                            message: format!("expected </{}>, found </{}>", element.tag, name),
                            position: reader.buffer_position() as u64,
                        });
                    }
                    None => {
                        return Err(Error::Parse {
                            message: format!("unexpected closing tag </{}>", name),
                            position: reader.buffer_position() as u64,
                        });
                    }
                }
            }
            Event::Text(e) => {
                // References arrive as `GeneralRef`, so any `&` here is a lone one
                let text = String::from_utf8_lossy(&e).replace('&', "&amp;");
                push_text(children_of(&mut open, &mut root), &text);
            }
            Event::GeneralRef(e) => {
                let name = String::from_utf8_lossy(&e);
                let reference = if is_reference_name(&name) {
                    format!("&{};", name)
                } else {
                    format!("&amp;{};", name)
                };
                push_text(children_of(&mut open, &mut root), &reference);
            }
            Event::CData(e) => {
                let cdata = format!("<![CDATA[{}]]>", String::from_utf8_lossy(&e));
                push_text(children_of(&mut open, &mut root), &cdata);
            }
            Event::Comment(e) => {
                let comment = format!("<!--{}-->", String::from_utf8_lossy(&e));
                push_text(children_of(&mut open, &mut root), &comment);
            }
            Event::Eof => break,
            // Declarations, processing instructions and doctypes carry nothing
            // a preview renders.
            _ => {}
        }
    }

    while let Some(element) = open.pop() {
        debug!("Closing unterminated <{}> at end of input", element.tag);
        children_of(&mut open, &mut root).push(element.into());
    }

    Ok(root)
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}

/// Whether `name` can be the inside of a `&name;` character reference.
fn is_reference_name(name: &str) -> bool {
    if let Some(number) = name.strip_prefix('#') {
        return match number.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()),
        };
    }
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Escape every `<` that cannot open a tag, comment or declaration.
fn escape_stray_lt(source: &str) -> Cow<'_, str> {
    let is_stray = |index: usize| {
        !source[index + 1..]
            .starts_with(|c: char| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
    };

    let mut stray = source
        .match_indices('<')
        .map(|(index, _)| index)
        .filter(|&index| is_stray(index))
        .peekable();
    if stray.peek().is_none() {
        return Cow::Borrowed(source);
    }

    let mut out = String::with_capacity(source.len() + 8);
    let mut last = 0;
    for index in stray {
        out.push_str(&source[last..index]);
        out.push_str("&lt;");
        last = index + 1;
    }
    out.push_str(&source[last..]);
    Cow::Owned(out)
}

/// Build an element (without children) from a start or empty tag.
fn start_element(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());

    for attr in start.html_attributes() {
        let attr = attr.map_err(|e| Error::Parse {
            message: e.to_string(),
            position: reader.buffer_position() as u64,
        })?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(attr.value.as_ref());
        element.attrs.set(name, unescape(&value).into_owned());
    }

    Ok(element)
}

/// The child list new nodes are appended to: the innermost open element, or
/// the document root.
fn children_of<'a>(open: &'a mut [Element], root: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match open.last_mut() {
        Some(parent) => &mut parent.children,
        None => root,
    }
}

/// Append text, merging with a preceding text leaf.
fn push_text(children: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(previous)) = children.last_mut() {
        previous.push_str(text);
    } else {
        children.push(Node::text(text));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serializer
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize nodes to markup text.
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes);
    out
}

fn write_nodes(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => write_element(out, element),
        }
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in element.attrs.iter() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');

    if element.children.is_empty() && VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    write_nodes(out, &element.children);
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

// ─────────────────────────────────────────────────────────────────────────────
// Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// Escape raw text for embedding in markup.
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Decode entity references back into raw text.
pub fn unescape(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

/// Plain text of a node sequence: text leaves concatenated in document order
/// with tags and comments dropped and entities decoded.
pub fn text_content(nodes: &[Node]) -> String {
    fn collect(nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => push_without_comments(out, text),
                Node::Element(element) => collect(&element.children, out),
            }
        }
    }

    let mut raw = String::new();
    collect(nodes, &mut raw);
    unescape(&raw).into_owned()
}

/// Append `text` with any `<!--...-->` spans left out.
fn push_without_comments(out: &mut String, mut text: &str) {
    while let Some(start) = text.find("<!--") {
        out.push_str(&text[..start]);
        match text[start + 4..].find("-->") {
            Some(end) => text = &text[start + 4 + end + 3..],
            None => return,
        }
    }
    out.push_str(text);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
