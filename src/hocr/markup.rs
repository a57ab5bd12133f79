//! Markup tree construction.
//!
//! HOCR files are produced as XHTML by most OCR engines, but hand-edited and
//! older files are plain HTML. The tree builder runs `quick-xml` with end-name
//! checks disabled and applies a small set of HTML recovery rules so both
//! variants produce the same tree:
//!
//! - element and attribute names are ASCII-lowercased
//! - void elements (`<meta>`, `<br>`, ...) never take children
//! - an end tag closes the nearest open element with the same name, and is
//!   dropped when no such element is open
//! - elements still open at end of input are closed
//! - HTML named entities such as `&nbsp;` are resolved
//!
//! Whitespace in text nodes is preserved exactly.

use super::walker::{NodeKind, TreeNode};
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

/// Elements that cannot have content in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// A name/value attribute pair, in declaration order on its element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name (lowercased)
    pub name: String,
    /// Unescaped attribute value
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name (lowercased)
    pub name: String,
    /// Attributes in declaration order; names are unique
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order
    pub children: Vec<MarkupNode>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an attribute (builder style).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Add a child node (builder style).
    pub fn with_child(mut self, child: impl Into<MarkupNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Value of the first attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// A node of the parsed markup tree.
///
/// The tree is strictly owned top-down: a parent owns its children and there
/// are no parent links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// Synthetic root holding the top-level nodes
    Document(Vec<MarkupNode>),
    /// Element with tag name, attributes and children
    Element(Element),
    /// Literal text content
    Text(String),
}

impl MarkupNode {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        MarkupNode::Text(content.into())
    }

    /// Borrow this node as an element, if it is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for MarkupNode {
    fn from(element: Element) -> Self {
        MarkupNode::Element(element)
    }
}

impl TreeNode for MarkupNode {
    fn kind(&self) -> NodeKind {
        match self {
            MarkupNode::Document(_) => NodeKind::Document,
            MarkupNode::Element(_) => NodeKind::Element,
            MarkupNode::Text(_) => NodeKind::Text,
        }
    }

    fn tag_name(&self) -> Option<&str> {
        self.as_element().map(|e| e.name.as_str())
    }

    fn attributes(&self) -> &[Attribute] {
        match self {
            MarkupNode::Element(element) => &element.attributes,
            _ => &[],
        }
    }

    fn children(&self) -> &[MarkupNode] {
        match self {
            MarkupNode::Document(children) => children,
            MarkupNode::Element(element) => &element.children,
            MarkupNode::Text(_) => &[],
        }
    }

    fn text(&self) -> Option<&str> {
        match self {
            MarkupNode::Text(content) => Some(content),
            _ => None,
        }
    }
}

/// Parse markup into a [`MarkupNode::Document`] tree.
///
/// # Errors
///
/// Returns [`Error::MarkupParse`] when the input cannot be tokenized, for
/// example a tag or comment left unterminated at end of input.
pub fn parse_markup(source: &str) -> Result<MarkupNode> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(false);
    reader.check_end_names(false);

    let mut builder = TreeBuilder::default();

    loop {
        let event = reader.read_event().map_err(|e| Error::MarkupParse {
            offset: reader.buffer_position(),
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) => {
                let element = start_element(e, reader.buffer_position())?;
                if is_void(&element.name) {
                    builder.append(element.into());
                } else {
                    builder.open(element);
                }
            },
            Event::Empty(ref e) => {
                let element = start_element(e, reader.buffer_position())?;
                builder.append(element.into());
            },
            Event::End(ref e) => {
                builder.close(&lowercase_name(e.name().as_ref()));
            },
            Event::Text(ref e) => {
                let content = e
                    .unescape_with(resolve_html_entity)
                    .unwrap_or_else(|_| String::from_utf8_lossy(e).into_owned().into());
                builder.append_text(content);
            },
            Event::CData(ref e) => {
                builder.append_text(String::from_utf8_lossy(e));
            },
            Event::Eof => break,
            // Comments, doctype, declarations and processing instructions carry no text
            _ => {},
        }
    }

    Ok(builder.finish())
}

/// Open-element stack used while reading events.
#[derive(Default)]
struct TreeBuilder {
    top_level: Vec<MarkupNode>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn append(&mut self, node: MarkupNode) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.top_level.push(node),
        }
    }

    fn append_text(&mut self, content: Cow<'_, str>) {
        if content.is_empty() {
            return;
        }
        self.append(MarkupNode::Text(content.into_owned()));
    }

    fn open(&mut self, element: Element) {
        self.open.push(element);
    }

    fn close(&mut self, name: &str) {
        let Some(depth) = self.open.iter().rposition(|e| e.name == name) else {
            return;
        };
        while self.open.len() > depth {
            if let Some(element) = self.open.pop() {
                self.append(element.into());
            }
        }
    }

    fn finish(mut self) -> MarkupNode {
        while let Some(element) = self.open.pop() {
            self.append(element.into());
        }
        MarkupNode::Document(self.top_level)
    }
}

fn start_element(e: &BytesStart<'_>, offset: usize) -> Result<Element> {
    let mut element = Element::new(lowercase_name(e.name().as_ref()));

    let mut attributes = e.html_attributes();
    attributes.with_checks(false);
    for attr in attributes {
        let attr = attr.map_err(|err| Error::MarkupParse {
            offset,
            reason: err.to_string(),
        })?;
        let name = lowercase_name(attr.key.as_ref());
        if element.attributes.iter().any(|a| a.name == name) {
            continue;
        }
        let value = attr
            .unescape_value_with(resolve_html_entity)
            .map(Cow::into_owned)
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        element.attributes.push(Attribute { name, value });
    }

    Ok(element)
}

fn lowercase_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Resolve HTML named entities that XML does not predefine.
fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    let resolved = match entity {
        "nbsp" => "\u{00A0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "shy" => "\u{00AD}",
        "copy" => "\u{00A9}",
        "reg" => "\u{00AE}",
        "trade" => "\u{2122}",
        "deg" => "\u{00B0}",
        "para" => "\u{00B6}",
        "sect" => "\u{00A7}",
        "middot" => "\u{00B7}",
        "bull" => "\u{2022}",
        "hellip" => "\u{2026}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "sbquo" => "\u{201A}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "bdquo" => "\u{201E}",
        "laquo" => "\u{00AB}",
        "raquo" => "\u{00BB}",
        "euro" => "\u{20AC}",
        "pound" => "\u{00A3}",
        "yen" => "\u{00A5}",
        "cent" => "\u{00A2}",
        "times" => "\u{00D7}",
        "divide" => "\u{00F7}",
        "plusmn" => "\u{00B1}",
        _ => return None,
    };
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(node: &MarkupNode) -> &Element {
        node.children()
            .iter()
            .find_map(MarkupNode::as_element)
            .expect("element child")
    }

    #[test]
    fn test_parse_nested_elements() {
        let tree = parse_markup("<html><body><p>Hi</p></body></html>").unwrap();
        let html = first_element(&tree);
        assert_eq!(html.name, "html");
        let body = html.children[0].as_element().unwrap();
        assert_eq!(body.name, "body");
        let p = body.children[0].as_element().unwrap();
        assert_eq!(p.children, vec![MarkupNode::text("Hi")]);
    }

    #[test]
    fn test_attributes_keep_declaration_order() {
        let tree = parse_markup(r#"<span id="w1" class="ocrx_word" title="bbox 1 2 3 4"/>"#)
            .unwrap();
        let span = first_element(&tree);
        let names: Vec<&str> = span.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["id", "class", "title"]);
        assert_eq!(span.attribute("title"), Some("bbox 1 2 3 4"));
    }

    #[test]
    fn test_duplicate_attribute_keeps_first() {
        let tree = parse_markup(r#"<span title="bbox 1 2 3 4" title="bbox 5 6 7 8"></span>"#)
            .unwrap();
        let span = first_element(&tree);
        assert_eq!(span.attributes.len(), 1);
        assert_eq!(span.attribute("title"), Some("bbox 1 2 3 4"));
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let tree = parse_markup("<p>  a \n b  </p>").unwrap();
        let p = first_element(&tree);
        assert_eq!(p.children, vec![MarkupNode::text("  a \n b  ")]);
    }

    #[test]
    fn test_names_are_lowercased() {
        let tree = parse_markup(r#"<HTML XMLNS="http://x"><BODY>t</BODY></HTML>"#).unwrap();
        let html = first_element(&tree);
        assert_eq!(html.name, "html");
        assert_eq!(html.attribute("xmlns"), Some("http://x"));
    }

    #[test]
    fn test_void_elements_take_no_children() {
        let tree =
            parse_markup(r#"<html><head><meta charset="utf-8"><title>x</title></head></html>"#)
                .unwrap();
        let html = first_element(&tree);
        let head = html.children[0].as_element().unwrap();
        assert_eq!(head.children.len(), 2);
        let meta = head.children[0].as_element().unwrap();
        assert_eq!(meta.name, "meta");
        assert!(meta.children.is_empty());
    }

    #[test]
    fn test_unclosed_elements_are_closed_at_eof() {
        let tree = parse_markup("<html><body><p>text").unwrap();
        let html = first_element(&tree);
        let body = html.children[0].as_element().unwrap();
        let p = body.children[0].as_element().unwrap();
        assert_eq!(p.children, vec![MarkupNode::text("text")]);
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let tree = parse_markup("<body>a</span>b</body>").unwrap();
        let body = first_element(&tree);
        assert_eq!(body.children, vec![MarkupNode::text("a"), MarkupNode::text("b")]);
    }

    #[test]
    fn test_html_entities_are_resolved() {
        let tree = parse_markup("<p>a&nbsp;b &amp; c</p>").unwrap();
        let p = first_element(&tree);
        assert_eq!(p.children, vec![MarkupNode::text("a\u{00A0}b & c")]);
    }

    #[test]
    fn test_comments_and_doctype_are_dropped() {
        let source = "<!DOCTYPE html><html><!-- note --><body>t</body></html>";
        let tree = parse_markup(source).unwrap();
        let html = first_element(&tree);
        assert_eq!(html.children.len(), 1);
    }

    #[test]
    fn test_unterminated_tag_is_an_error() {
        let result = parse_markup("<html><body><p");
        assert!(matches!(result, Err(Error::MarkupParse { .. })));
    }
}
