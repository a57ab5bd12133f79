//! HOCR reading: markup tree, traversal, and bounding-box geometry.
//!
//! ```ignore
//! use hocr2pdf::hocr::HocrDocument;
//!
//! let doc = HocrDocument::open("scan.hocr")?;
//! println!("namespace: {}", doc.namespace());
//! for word in doc.words()? {
//!     println!("{:?} {}", word.bbox, word.text);
//! }
//! ```

mod bbox;
mod document;
pub mod markup;
pub mod walker;

pub use bbox::BoundingBox;
pub use document::{HocrDocument, HocrWord, WORD_CLASS};
pub use markup::{parse_markup, Attribute, Element, MarkupNode};
pub use walker::{extract_text, find_first_by_tag, find_namespace, NodeKind, PreOrder, TreeNode};
