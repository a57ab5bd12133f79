//! PDF writing module for generating PDF files.
//!
//! ## Architecture
//!
//! ```text
//! page geometry, images, text cells
//!     ↓
//! [PageBuilder] (unit conversion, top-left origin)
//!     ↓
//! [ContentStreamBuilder] (operators → content stream bytes)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ```ignore
//! use hocr2pdf::writer::{CellAlign, CellVAlign, PdfWriter, PdfWriterConfig, TextCell, Unit};
//!
//! let mut writer = PdfWriter::with_config(PdfWriterConfig::default().with_unit(Unit::Point));
//! writer
//!     .add_page(612.0, 792.0)
//!     .add_cell(&TextCell::new("Hello, World!", 0.0, 0.0, 612.0, 20.0)
//!         .with_align(CellAlign::Center, CellVAlign::Middle));
//! let bytes = writer.finish()?;
//! ```

mod content_stream;
mod font_manager;
mod image_handler;
mod object_serializer;
mod pdf_writer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp, TextRenderMode};
pub use font_manager::{encode_win_ansi, FontManager, StandardFont};
pub use image_handler::{ColorSpace, ImageData, ImageFormat};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{
    CellAlign, CellVAlign, PageBuilder, PdfWriter, PdfWriterConfig, TextCell, Unit,
};
