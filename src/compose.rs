//! Single-page composition: page image underneath, HOCR text on top.

use crate::config::ComposerConfig;
use crate::error::{Error, Result};
use crate::hocr::HocrDocument;
use crate::writer::{CellAlign, CellVAlign, ImageData, PdfWriter, PdfWriterConfig, TextCell};
use std::io::{self, Write};
use std::path::Path;

/// Read an image's pixel dimensions from its header.
///
/// The format is guessed from the file content, not its extension.
pub fn image_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32)> {
    let path = path.as_ref();
    let dimension_error = |reason: String| Error::ImageDimension {
        path: path.to_path_buf(),
        reason,
    };

    image::io::Reader::open(path)
        .map_err(|e| dimension_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| dimension_error(e.to_string()))?
        .into_dimensions()
        .map_err(|e| dimension_error(e.to_string()))
}

/// Builds a searchable PDF page from an HOCR document and its scanned image.
#[derive(Debug, Clone, Default)]
pub struct PageComposer {
    config: ComposerConfig,
}

impl PageComposer {
    /// Composer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Composer with a custom configuration.
    pub fn with_config(config: ComposerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Compose the page and write it to `output_path`.
    ///
    /// # Errors
    ///
    /// - [`Error::OutputExists`] if `overwrite` is false and the output is
    ///   already there; nothing else is attempted in that case
    /// - [`Error::ImageDimension`] if the image header cannot be read
    /// - [`Error::OutputWrite`] if the finished PDF cannot be stored
    pub fn compose(
        &self,
        document: &HocrDocument,
        image_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<()> {
        let output_path = output_path.as_ref();
        if !overwrite && output_path.exists() {
            return Err(Error::OutputExists(output_path.to_path_buf()));
        }

        let bytes = self.render(document, image_path)?;
        write_output(output_path, &bytes, overwrite)?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), output_path.display());
        Ok(())
    }

    /// Compose the page and return the PDF bytes.
    pub fn render(&self, document: &HocrDocument, image_path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let image_path = image_path.as_ref();
        let (width, height) = image_dimensions(image_path)?;
        log::debug!("Image {} is {}x{} px", image_path.display(), width, height);

        let image = ImageData::from_file(image_path)?;
        let text = document.to_text();
        log::debug!("Extracted {} characters of text", text.chars().count());

        let mut writer_config = PdfWriterConfig::default()
            .with_unit(self.config.unit)
            .with_compress(self.config.compress);
        if let Some(title) = &self.config.title {
            writer_config = writer_config.with_title(title.clone());
        }

        let (page_width, page_height) = (width as f32, height as f32);
        let cell = TextCell::new(text, 0.0, 0.0, page_width, self.config.cell_height)
            .with_font(self.config.font, self.config.font_size)
            .with_align(CellAlign::Center, CellVAlign::Middle)
            .with_border(false)
            .with_render_mode(self.config.text_layer.render_mode());

        let mut writer = PdfWriter::with_config(writer_config);
        writer
            .add_page(page_width, page_height)
            .draw_image(image, 0.0, 0.0, page_width, page_height)
            .add_cell(&cell);
        writer.finish()
    }
}

/// Store `bytes` at `path` through a temporary file in the same directory.
///
/// Without `overwrite` the final rename refuses to replace a file that
/// appeared in the meantime.
fn write_output(path: &Path, bytes: &[u8], overwrite: bool) -> Result<()> {
    let write_error = |source: io::Error| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(bytes).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(write_error)?;
    }

    if overwrite {
        tmp.persist(path).map_err(|e| write_error(e.error))?;
    } else {
        tmp.persist_noclobber(path).map_err(|e| match e.error.kind() {
            io::ErrorKind::AlreadyExists => Error::OutputExists(path.to_path_buf()),
            _ => write_error(e.error),
        })?;
    }
    Ok(())
}
