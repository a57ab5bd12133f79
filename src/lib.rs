//! # hocr2pdf
//!
//! Turn an HOCR document and the scan it describes into a searchable,
//! single-page PDF.
//!
//! ## Pipeline
//!
//! ```text
//! HOCR bytes ──> [hocr::markup] tree ──> [hocr::HocrDocument] (namespace, text, bboxes)
//!                                              │
//! page image ──> header dimensions ──> [compose::PageComposer] ──> [writer::PdfWriter] ──> PDF
//! ```
//!
//! The page is sized from the image pixel counts in the configured unit
//! (inches by default), the image fills the page, and the document's body
//! text is laid over it as one centered text cell, invisible by default so
//! the PDF is searchable without changing how the scan looks.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hocr2pdf::{ComposerConfig, ConversionRequest};
//!
//! # fn main() -> hocr2pdf::Result<()> {
//! ConversionRequest::new("scan.hocr", "scan.png", "scan.pdf")
//!     .with_overwrite(true)
//!     .run(&ComposerConfig::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// HOCR reading
pub mod hocr;

// PDF objects and writing
pub mod object;
pub mod writer;

// Page composition
pub mod compose;

// Configuration
pub mod config;

// Re-exports
pub use compose::{image_dimensions, PageComposer};
pub use config::{ComposerConfig, ConversionRequest, TextLayer};
pub use error::{BoundingBoxError, Error, Result};
pub use hocr::{BoundingBox, HocrDocument, HocrWord};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
