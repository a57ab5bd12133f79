//! Parsed HOCR documents.

use super::bbox::BoundingBox;
use super::markup::{parse_markup, MarkupNode};
use super::walker::{extract_text, find_first_by_tag, find_namespace, PreOrder, TreeNode};
use crate::error::{Error, Result};
use std::path::Path;

/// Class HOCR engines put on recognized words.
pub const WORD_CLASS: &str = "ocrx_word";

/// A recognized word and its geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HocrWord {
    /// Word text
    pub text: String,
    /// Pixel rectangle of the word
    pub bbox: BoundingBox,
}

/// An HOCR document: the markup tree plus its declared namespace.
#[derive(Debug, Clone)]
pub struct HocrDocument {
    root: MarkupNode,
    namespace: String,
}

impl HocrDocument {
    /// Read and parse an HOCR file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file cannot be read, [`Error::MarkupParse`] when
    /// its content cannot be tokenized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&String::from_utf8_lossy(&bytes))
    }

    /// Parse HOCR markup held in memory.
    pub fn parse_str(source: &str) -> Result<Self> {
        Ok(Self::from_tree(parse_markup(source)?))
    }

    /// Wrap an already built tree.
    pub fn from_tree(root: MarkupNode) -> Self {
        let namespace = find_namespace(&root);
        Self { root, namespace }
    }

    /// Root of the markup tree.
    pub fn root(&self) -> &MarkupNode {
        &self.root
    }

    /// Namespace declared on the `html` element, empty if none.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Bounding box from the node's first `title` attribute.
    ///
    /// Nodes without attributes, or without a `title`, yield the zero box.
    /// Only the first `title` is read even if the markup repeats it.
    pub fn element_coordinates<N: TreeNode>(&self, node: &N) -> Result<BoundingBox> {
        match node.attributes().iter().find(|attr| attr.name == "title") {
            Some(title) => BoundingBox::parse(&title.value),
            None => Ok(BoundingBox::default()),
        }
    }

    /// Plain text of the `body` element, or an empty string without one.
    pub fn to_text(&self) -> String {
        find_first_by_tag(&self.root, "body")
            .map(extract_text)
            .unwrap_or_default()
    }

    /// Elements whose `class` list contains `class`, in document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<&MarkupNode> {
        PreOrder::new(&self.root)
            .filter(|node| {
                node.as_element()
                    .and_then(|e| e.attribute("class"))
                    .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
            })
            .collect()
    }

    /// Every recognized word with its bounding box.
    pub fn words(&self) -> Result<Vec<HocrWord>> {
        self.elements_with_class(WORD_CLASS)
            .into_iter()
            .map(|node| -> Result<HocrWord> {
                Ok(HocrWord {
                    text: extract_text(node),
                    bbox: self.element_coordinates(node)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoundingBoxError;
    use crate::hocr::markup::Element;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN"
    "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en" lang="en">
 <head>
  <title>scan</title>
  <meta name="ocr-system" content="tesseract"/>
 </head>
 <body>
  <div class="ocr_page" id="page_1" title="image &quot;scan.png&quot;; bbox 0 0 200 100; ppageno 0">
   <span class="ocr_line" id="line_1_1" title="bbox 10 10 120 30; baseline 0 -3">
    <span class="ocrx_word" id="word_1_1" title="bbox 10 10 60 30; x_wconf 96">Hello</span>
    <span class="ocrx_word" id="word_1_2" title="bbox 70 10 120 30; x_wconf 91">World</span>
   </span>
  </div>
 </body>
</html>
"#;

    #[test]
    fn test_namespace_is_detected_on_parse() {
        let doc = HocrDocument::parse_str(SAMPLE).unwrap();
        assert_eq!(doc.namespace(), "http://www.w3.org/1999/xhtml");
    }

    #[test]
    fn test_to_text_reads_body_only() {
        let doc = HocrDocument::parse_str(SAMPLE).unwrap();
        let text = doc.to_text();
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(!text.contains("scan"));
    }

    #[test]
    fn test_to_text_without_body_is_empty() {
        let doc = HocrDocument::parse_str("<html><head><title>t</title></head></html>").unwrap();
        assert_eq!(doc.to_text(), "");
    }

    #[test]
    fn test_element_coordinates() {
        let doc = HocrDocument::parse_str(SAMPLE).unwrap();
        let page = doc.elements_with_class("ocr_page")[0];
        assert_eq!(doc.element_coordinates(page).unwrap(), BoundingBox::new(0, 0, 200, 100));
    }

    #[test]
    fn test_element_coordinates_without_attributes() {
        let doc = HocrDocument::parse_str("<p/>").unwrap();
        let node = MarkupNode::from(Element::new("p"));
        assert!(doc.element_coordinates(&node).unwrap().is_zero());
    }

    #[test]
    fn test_element_coordinates_without_title() {
        let doc = HocrDocument::parse_str("<p/>").unwrap();
        let node = MarkupNode::from(Element::new("p").with_attribute("id", "x"));
        assert!(doc.element_coordinates(&node).unwrap().is_zero());
    }

    #[test]
    fn test_element_coordinates_uses_first_title() {
        let doc = HocrDocument::parse_str("<p/>").unwrap();
        let node = MarkupNode::from(
            Element::new("p")
                .with_attribute("title", "bbox 1 2 3 4")
                .with_attribute("title", "bbox a b c d"),
        );
        assert_eq!(doc.element_coordinates(&node).unwrap(), BoundingBox::new(1, 2, 3, 4));
    }

    #[test]
    fn test_element_coordinates_malformed() {
        let doc = HocrDocument::parse_str("<p/>").unwrap();
        let node = MarkupNode::from(Element::new("p").with_attribute("title", "bbox 1 2 3"));
        assert!(matches!(
            doc.element_coordinates(&node),
            Err(Error::MalformedBoundingBox(BoundingBoxError::WrongArity { .. }))
        ));
    }

    #[test]
    fn test_words() {
        let doc = HocrDocument::parse_str(SAMPLE).unwrap();
        let words = doc.words().unwrap();
        assert_eq!(
            words,
            vec![
                HocrWord {
                    text: "Hello".to_string(),
                    bbox: BoundingBox::new(10, 10, 60, 30),
                },
                HocrWord {
                    text: "World".to_string(),
                    bbox: BoundingBox::new(70, 10, 120, 30),
                },
            ]
        );
    }

    #[test]
    fn test_open_missing_file() {
        let result = HocrDocument::open("/nonexistent/dir/scan.hocr");
        match result {
            Err(Error::Io { path, .. }) => assert!(path.ends_with("scan.hocr")),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
