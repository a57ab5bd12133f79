//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.
//!
//! Page geometry is given in the configured [`Unit`] with the origin at the
//! top-left corner of the page; the writer converts to PDF user space
//! (points, bottom-left origin) when it emits operators.

use super::content_stream::{ContentStreamBuilder, TextRenderMode};
use super::font_manager::{encode_win_ansi, FontManager, StandardFont};
use super::image_handler::ImageData;
use super::object_serializer::ObjectSerializer;
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;

/// Horizontal padding inside a cell for left/right alignment, in points.
const CELL_MARGIN_PT: f32 = 2.835;

/// Largest page side, in default user space units, that viewers accept.
const MAX_PAGE_EXTENT: f32 = 14400.0;

/// Measurement unit for page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    /// PostScript points (1/72 inch)
    Point,
    /// Inches
    #[default]
    Inch,
    /// Millimeters
    Millimeter,
}

impl Unit {
    /// Points per unit.
    pub fn scale_factor(&self) -> f32 {
        match self {
            Unit::Point => 1.0,
            Unit::Inch => 72.0,
            Unit::Millimeter => 72.0 / 25.4,
        }
    }
}

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Producing library
    pub producer: Option<String>,
    /// Whether to compress content streams
    pub compress: bool,
    /// Unit for page geometry
    pub unit: Unit,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            creator: Some(crate::NAME.to_string()),
            producer: Some(format!("{} {}", crate::NAME, crate::VERSION)),
            compress: false,
            unit: Unit::default(),
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable stream compression.
    ///
    /// When enabled, content streams are compressed using FlateDecode
    /// (zlib/deflate) to reduce file size.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the unit page geometry is expressed in.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }
}

/// Horizontal alignment for cell content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellAlign {
    /// Align to the left
    #[default]
    Left,
    /// Center horizontally
    Center,
    /// Align to the right
    Right,
}

/// Vertical alignment for cell content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellVAlign {
    /// Align to the top
    Top,
    /// Center vertically
    #[default]
    Middle,
    /// Align to the bottom
    Bottom,
}

/// A single line of text laid out inside a rectangle.
#[derive(Debug, Clone)]
pub struct TextCell {
    /// Text to show
    pub text: String,
    /// Left edge, in page units
    pub x: f32,
    /// Top edge, in page units from the top of the page
    pub y: f32,
    /// Cell width, in page units
    pub width: f32,
    /// Cell height, in page units
    pub height: f32,
    /// Font
    pub font: StandardFont,
    /// Font size in points
    pub font_size: f32,
    /// Horizontal alignment
    pub align: CellAlign,
    /// Vertical alignment
    pub valign: CellVAlign,
    /// Whether to stroke the cell outline
    pub border: bool,
    /// Text rendering mode
    pub render_mode: TextRenderMode,
}

impl TextCell {
    /// Create a cell at `(x, y)` of the given size, Helvetica 12pt, left/middle aligned.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
            font: StandardFont::Helvetica,
            font_size: 12.0,
            align: CellAlign::default(),
            valign: CellVAlign::default(),
            border: false,
            render_mode: TextRenderMode::default(),
        }
    }

    /// Set font and size.
    pub fn with_font(mut self, font: StandardFont, size: f32) -> Self {
        self.font = font;
        self.font_size = size;
        self
    }

    /// Set horizontal and vertical alignment.
    pub fn with_align(mut self, align: CellAlign, valign: CellVAlign) -> Self {
        self.align = align;
        self.valign = valign;
        self
    }

    /// Stroke the cell outline.
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Set the text rendering mode.
    pub fn with_render_mode(mut self, mode: TextRenderMode) -> Self {
        self.render_mode = mode;
        self
    }
}

/// Convert a UTF-8 string into a PDF text string object.
///
/// ASCII stays literal; anything else is UTF-16BE with a byte order mark.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return ObjectSerializer::string(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes)
}

/// Compress data using Flate/Deflate compression.
///
/// Returns compressed bytes suitable for FlateDecode filter.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// A page being built.
pub struct PageBuilder<'a> {
    writer: &'a mut PdfWriter,
    page_index: usize,
}

impl<'a> PageBuilder<'a> {
    /// Place an image with its top-left corner at `(x, y)`, scaled to `width` x `height`.
    pub fn draw_image(
        &mut self,
        image: ImageData,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> &mut Self {
        let resource_id = format!("Im{}", self.writer.images.len() + 1);
        self.writer.images.push((resource_id.clone(), image));

        let page = &mut self.writer.pages[self.page_index];
        let k = page.scale;
        let bottom = page.height - y - height;
        page.content_builder
            .draw_image(&resource_id, x * k, bottom * k, width * k, height * k);
        page.xobjects.insert(resource_id);
        self
    }

    /// Lay out a text cell.
    pub fn add_cell(&mut self, cell: &TextCell) -> &mut Self {
        let unit = self.writer.config.unit.scale_factor();
        let font_id = self.writer.fonts.register(cell.font);

        let page = &mut self.writer.pages[self.page_index];
        page.fonts.insert(font_id.clone());
        let page_height = page.height;
        let user_unit = page.user_unit;
        let k = page.scale;
        let builder = &mut page.content_builder;

        if cell.border {
            builder.stroke_rect(
                cell.x * k,
                (page_height - cell.y - cell.height) * k,
                cell.width * k,
                cell.height * k,
            );
        }

        if cell.text.is_empty() {
            return self;
        }

        let encoded = encode_win_ansi(&cell.text);
        let font_size = cell.font_size / unit;
        let text_width = cell.font.encoded_width(&encoded, cell.font_size) / unit;
        let margin = CELL_MARGIN_PT / unit;

        let dx = match cell.align {
            CellAlign::Left => margin,
            CellAlign::Center => (cell.width - text_width) / 2.0,
            CellAlign::Right => cell.width - margin - text_width,
        };
        let dy = match cell.valign {
            CellVAlign::Top => (font_size - cell.height) / 2.0,
            CellVAlign::Middle => 0.0,
            CellVAlign::Bottom => (cell.height - font_size) / 2.0,
        };
        let baseline = cell.y + dy + 0.5 * cell.height + 0.3 * font_size;

        builder
            .save_state()
            .begin_text()
            .set_font(&font_id, cell.font_size / user_unit)
            .set_text_render_mode(cell.render_mode)
            .text(encoded, (cell.x + dx) * k, (page_height - baseline) * k)
            .end_text()
            .restore_state();
        self
    }

    /// Finish building this page and return to the writer.
    pub fn finish(self) -> &'a mut PdfWriter {
        let page = &mut self.writer.pages[self.page_index];
        page.content_builder.end_text();
        self.writer
    }
}

/// Internal page data.
struct PageData {
    /// Width in page units
    width: f32,
    /// Height in page units
    height: f32,
    /// `/UserUnit` of the page; 1 unless the page exceeds [`MAX_PAGE_EXTENT`] points
    user_unit: f32,
    /// Page units to user space units
    scale: f32,
    content_builder: ContentStreamBuilder,
    /// Font resource names used by the page
    fonts: BTreeSet<String>,
    /// XObject resource names used by the page
    xobjects: BTreeSet<String>,
}

/// PDF document writer.
///
/// Builds a complete PDF document with pages, fonts, images, and content.
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<PageData>,
    fonts: FontManager,
    /// Embedded images with their resource names
    images: Vec<(String, ImageData)>,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            fonts: FontManager::new(),
            images: Vec::new(),
        }
    }

    /// Writer configuration.
    pub fn config(&self) -> &PdfWriterConfig {
        &self.config
    }

    /// Add a page with the given dimensions in page units.
    ///
    /// A page wider or taller than 14400 points gets the smallest integer
    /// `/UserUnit` that brings its MediaBox back under that limit.
    pub fn add_page(&mut self, width: f32, height: f32) -> PageBuilder<'_> {
        let page_index = self.pages.len();
        let k = self.config.unit.scale_factor();
        let user_unit = (width.max(height) * k / MAX_PAGE_EXTENT).ceil().max(1.0);
        self.pages.push(PageData {
            width,
            height,
            user_unit,
            scale: k / user_unit,
            content_builder: ContentStreamBuilder::new(),
            fonts: BTreeSet::new(),
            xobjects: BTreeSet::new(),
        });
        PageBuilder {
            writer: self,
            page_index,
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Nominal size of a page in points.
    pub fn page_size(&self, index: usize) -> Option<(f32, f32)> {
        let k = self.config.unit.scale_factor();
        self.pages
            .get(index)
            .map(|page| (page.width * k, page.height * k))
    }

    /// Build the complete PDF document.
    pub fn finish(self) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::compact();
        let mut next_id: u32 = 1;
        let mut alloc = || {
            let id = next_id;
            next_id += 1;
            id
        };
        let mut objects: Vec<(u32, Object)> = Vec::new();

        let catalog_id = alloc();
        let pages_id = alloc();

        // Fonts
        let mut font_refs: HashMap<String, ObjectRef> = HashMap::new();
        for (resource_id, font) in self.fonts.fonts() {
            let id = alloc();
            objects.push((id, font.font_dict()));
            font_refs.insert(resource_id.to_string(), ObjectRef::new(id, 0));
        }

        // Images, each optionally followed by its soft mask
        let mut image_refs: HashMap<String, ObjectRef> = HashMap::new();
        for (resource_id, mut image) in self.images {
            let id = alloc();
            let smask = match (image.build_soft_mask_dict(), image.soft_mask.take()) {
                (Some(dict), Some(mask)) => {
                    let mask_id = alloc();
                    objects.push((
                        mask_id,
                        Object::Stream {
                            dict,
                            data: bytes::Bytes::from(mask),
                        },
                    ));
                    Some(ObjectSerializer::reference(mask_id, 0))
                },
                _ => None,
            };
            let dict = image.build_xobject_dict(smask);
            objects.push((
                id,
                Object::Stream {
                    dict,
                    data: bytes::Bytes::from(image.data),
                },
            ));
            image_refs.insert(resource_id, ObjectRef::new(id, 0));
        }

        // Pages
        let mut page_refs: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page_data in &self.pages {
            let page_id = alloc();
            let content_id = alloc();

            let raw_content = page_data.content_builder.build()?;
            let mut content_dict = HashMap::new();
            let content_bytes = if self.config.compress {
                content_dict.insert("Filter".to_string(), Object::Name("FlateDecode".to_string()));
                compress_data(&raw_content)?
            } else {
                raw_content
            };

            let mut resources = vec![(
                "ProcSet",
                Object::Array(
                    ["PDF", "Text", "ImageB", "ImageC"]
                        .iter()
                        .map(|n| ObjectSerializer::name(n))
                        .collect(),
                ),
            )];
            if !page_data.fonts.is_empty() {
                let fonts = page_data
                    .fonts
                    .iter()
                    .filter_map(|id| font_refs.get(id).map(|r| (id.clone(), Object::Reference(*r))))
                    .collect();
                resources.push(("Font", Object::Dictionary(fonts)));
            }
            if !page_data.xobjects.is_empty() {
                let xobjects = page_data
                    .xobjects
                    .iter()
                    .filter_map(|id| {
                        image_refs.get(id).map(|r| (id.clone(), Object::Reference(*r)))
                    })
                    .collect();
                resources.push(("XObject", Object::Dictionary(xobjects)));
            }

            let mut page_entries = vec![
                ("Type", ObjectSerializer::name("Page")),
                ("Parent", ObjectSerializer::reference(pages_id, 0)),
                (
                    "MediaBox",
                    ObjectSerializer::rect(
                        0.0,
                        0.0,
                        (page_data.width * page_data.scale) as f64,
                        (page_data.height * page_data.scale) as f64,
                    ),
                ),
                ("Contents", ObjectSerializer::reference(content_id, 0)),
                ("Resources", ObjectSerializer::dict(resources)),
            ];
            if page_data.user_unit > 1.0 {
                page_entries
                    .push(("UserUnit", ObjectSerializer::integer(page_data.user_unit as i64)));
            }
            let page_obj = ObjectSerializer::dict(page_entries);

            page_refs.push(Object::Reference(ObjectRef::new(page_id, 0)));
            objects.push((page_id, page_obj));
            objects.push((
                content_id,
                Object::Stream {
                    dict: content_dict,
                    data: bytes::Bytes::from(content_bytes),
                },
            ));
        }

        let page_count = page_refs.len();
        objects.push((
            pages_id,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Pages")),
                ("Kids", Object::Array(page_refs)),
                ("Count", ObjectSerializer::integer(page_count as i64)),
            ]),
        ));
        objects.push((
            catalog_id,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Catalog")),
                ("Pages", ObjectSerializer::reference(pages_id, 0)),
            ]),
        ));

        // Info object (optional metadata)
        let info_id = alloc();
        let info_entries: Vec<(&str, Object)> = [
            ("Title", &self.config.title),
            ("Creator", &self.config.creator),
            ("Producer", &self.config.producer),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, text_string(v))))
        .collect();
        objects.push((info_id, ObjectSerializer::dict(info_entries)));

        let size = alloc();
        objects.sort_by_key(|(id, _)| *id);

        let mut output = Vec::new();
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut xref_offsets: Vec<usize> = Vec::with_capacity(objects.len());
        for (id, obj) in &objects {
            xref_offsets.push(output.len());
            serializer.write_indirect(&mut output, *id, 0, obj)?;
        }

        // Write xref table
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", size)?;
        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(size as i64)),
            ("Root", ObjectSerializer::reference(catalog_id, 0)),
            ("Info", ObjectSerializer::reference(info_id, 0)),
        ]);

        writeln!(output, "trailer")?;
        serializer.write_object(&mut output, &trailer)?;
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        log::debug!(
            "Serialized {} objects across {} page(s), {} bytes",
            objects.len(),
            page_count,
            output.len()
        );

        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}
