//! Configuration for HOCR to PDF conversion.

use crate::compose::PageComposer;
use crate::error::Result;
use crate::hocr::HocrDocument;
use crate::writer::{StandardFont, TextRenderMode, Unit};
use std::path::PathBuf;

/// How the recognized text is drawn over the page image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextLayer {
    /// Selectable and searchable, but not painted.
    #[default]
    Invisible,
    /// Painted in black over the image.
    Visible,
}

impl TextLayer {
    /// PDF text rendering mode for this layer.
    pub fn render_mode(&self) -> TextRenderMode {
        match self {
            TextLayer::Invisible => TextRenderMode::Invisible,
            TextLayer::Visible => TextRenderMode::Fill,
        }
    }
}

/// Page composition configuration.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Unit the image pixel counts are interpreted in.
    pub unit: Unit,

    /// Font for the text cell.
    pub font: StandardFont,

    /// Font size in points.
    pub font_size: f32,

    /// Height of the text cell, in `unit`.
    pub cell_height: f32,

    /// Text layer rendering.
    pub text_layer: TextLayer,

    /// Compress the page content stream.
    pub compress: bool,

    /// Document title for the Info dictionary.
    pub title: Option<String>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposerConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            unit: Unit::Inch,
            font: StandardFont::Helvetica,
            font_size: 12.0,
            cell_height: 10.0,
            text_layer: TextLayer::Invisible,
            compress: false,
            title: None,
        }
    }

    /// Set the page unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Set the text cell font and size.
    pub fn with_font(mut self, font: StandardFont, size: f32) -> Self {
        self.font = font;
        self.font_size = size;
        self
    }

    /// Set the text cell height.
    pub fn with_cell_height(mut self, height: f32) -> Self {
        self.cell_height = height;
        self
    }

    /// Set the text layer rendering.
    pub fn with_text_layer(mut self, layer: TextLayer) -> Self {
        self.text_layer = layer;
        self
    }

    /// Enable content stream compression.
    pub fn with_compress(mut self, enable: bool) -> Self {
        self.compress = enable;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// One conversion: which files to read and where to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// HOCR input
    pub hocr_path: PathBuf,
    /// Page image
    pub image_path: PathBuf,
    /// PDF output
    pub output_path: PathBuf,
    /// Replace an existing output file
    pub overwrite: bool,
}

impl ConversionRequest {
    /// Create a request that refuses to overwrite existing output.
    pub fn new(
        hocr_path: impl Into<PathBuf>,
        image_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            hocr_path: hocr_path.into(),
            image_path: image_path.into(),
            output_path: output_path.into(),
            overwrite: false,
        }
    }

    /// Allow replacing an existing output file.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Parse the HOCR file and compose the PDF.
    pub fn run(&self, config: &ComposerConfig) -> Result<()> {
        log::debug!("Parsing HOCR from {}", self.hocr_path.display());
        let document = HocrDocument::open(&self.hocr_path)?;
        PageComposer::with_config(config.clone()).compose(
            &document,
            &self.image_path,
            &self.output_path,
            self.overwrite,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComposerConfig::default();
        assert_eq!(config.unit, Unit::Inch);
        assert_eq!(config.font, StandardFont::Helvetica);
        assert_eq!(config.font_size, 12.0);
        assert_eq!(config.cell_height, 10.0);
        assert_eq!(config.text_layer, TextLayer::Invisible);
        assert!(!config.compress);
        assert!(config.title.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ComposerConfig::new()
            .with_unit(Unit::Point)
            .with_font(StandardFont::Courier, 9.0)
            .with_cell_height(20.0)
            .with_text_layer(TextLayer::Visible)
            .with_compress(true)
            .with_title("scan");
        assert_eq!(config.unit, Unit::Point);
        assert_eq!(config.font, StandardFont::Courier);
        assert_eq!(config.font_size, 9.0);
        assert_eq!(config.cell_height, 20.0);
        assert_eq!(config.text_layer.render_mode(), TextRenderMode::Fill);
        assert!(config.compress);
        assert_eq!(config.title.as_deref(), Some("scan"));
    }

    #[test]
    fn test_request() {
        let request = ConversionRequest::new("a.hocr", "a.png", "a.pdf");
        assert!(!request.overwrite);
        assert!(request.with_overwrite(true).overwrite);
    }

    #[test]
    fn test_request_with_missing_hocr() {
        let request = ConversionRequest::new("/nonexistent/a.hocr", "a.png", "a.pdf");
        assert!(matches!(
            request.run(&ComposerConfig::default()),
            Err(crate::Error::Io { .. })
        ));
    }
}
