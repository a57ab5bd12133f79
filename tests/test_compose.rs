//! End-to-end composition tests: HOCR + image in, single-page PDF out.

use hocr2pdf::{
    ComposerConfig, ConversionRequest, Error, HocrDocument, PageComposer, TextLayer,
};
use std::path::{Path, PathBuf};

const HOCR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
 <head><title></title></head>
 <body><div class="ocr_page" title="bbox 0 0 200 100">ABC</div></body>
</html>
"#;

struct Fixture {
    dir: tempfile::TempDir,
    hocr: PathBuf,
    image: PathBuf,
    output: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let hocr = dir.path().join("page.hocr");
        let image = dir.path().join("page.png");
        let output = dir.path().join("page.pdf");
        std::fs::write(&hocr, HOCR).unwrap();
        image::RgbImage::from_pixel(200, 100, image::Rgb([255, 255, 255]))
            .save(&image)
            .unwrap();
        Self {
            dir,
            hocr,
            image,
            output,
        }
    }

    fn document(&self) -> HocrDocument {
        HocrDocument::open(&self.hocr).unwrap()
    }

    fn entries(&self) -> Vec<PathBuf> {
        let mut entries: Vec<_> = std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        entries
    }
}

fn read_pdf(path: &Path) -> String {
    String::from_utf8_lossy(&std::fs::read(path).unwrap()).to_string()
}

#[test]
fn test_round_trip_page_size() {
    let fx = Fixture::new();
    PageComposer::new()
        .compose(&fx.document(), &fx.image, &fx.output, true)
        .unwrap();

    let pdf = read_pdf(&fx.output);
    assert!(pdf.starts_with("%PDF-1.7"));
    assert!(pdf.contains("/Count 1"));
    // 200 x 100 inches
    assert!(pdf.contains("/MediaBox [0 0 14400 7200]"));
    assert!(pdf.contains("/Im1 Do"));
    assert!(pdf.contains("(ABC) Tj"));
    assert!(pdf.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_compose_twice_with_overwrite() {
    let fx = Fixture::new();
    let composer = PageComposer::new();
    let doc = fx.document();

    composer.compose(&doc, &fx.image, &fx.output, true).unwrap();
    let first = std::fs::read(&fx.output).unwrap();
    composer.compose(&doc, &fx.image, &fx.output, true).unwrap();
    let second = std::fs::read(&fx.output).unwrap();

    assert_eq!(first, second);
    // No stray temporary files are left next to the output
    assert_eq!(fx.entries(), vec![fx.hocr.clone(), fx.output.clone(), fx.image.clone()]);
}

#[test]
fn test_existing_output_without_overwrite() {
    let fx = Fixture::new();
    std::fs::write(&fx.output, b"previous").unwrap();
    std::fs::remove_file(&fx.image).unwrap();

    // The image is gone: reaching the dimension probe would report it
    let result = PageComposer::new().compose(&fx.document(), &fx.image, &fx.output, false);
    assert!(matches!(result, Err(Error::OutputExists(ref p)) if p == &fx.output));
    assert_eq!(std::fs::read(&fx.output).unwrap(), b"previous");
}

#[test]
fn test_unreadable_image() {
    let fx = Fixture::new();
    std::fs::write(&fx.image, b"this is not a png").unwrap();

    let result = PageComposer::new().compose(&fx.document(), &fx.image, &fx.output, true);
    assert!(matches!(result, Err(Error::ImageDimension { .. })));
    assert!(!fx.output.exists());
}

#[test]
fn test_missing_image() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("nope.png");
    let result = PageComposer::new().compose(&fx.document(), &missing, &fx.output, false);
    assert!(matches!(result, Err(Error::ImageDimension { .. })));
    assert!(!fx.output.exists());
}

#[test]
fn test_output_in_missing_directory() {
    let fx = Fixture::new();
    let output = fx.dir.path().join("missing").join("page.pdf");
    let result = PageComposer::new().compose(&fx.document(), &fx.image, &output, true);
    assert!(matches!(result, Err(Error::OutputWrite { .. })));
}

#[test]
fn test_jpeg_page_is_passed_through() {
    let fx = Fixture::new();
    let jpeg = fx.dir.path().join("page.jpg");
    image::RgbImage::from_pixel(200, 100, image::Rgb([200, 200, 200]))
        .save(&jpeg)
        .unwrap();

    let bytes = PageComposer::new().render(&fx.document(), &jpeg).unwrap();
    let pdf = String::from_utf8_lossy(&bytes);
    assert!(pdf.contains("/Filter /DCTDecode"));
    assert!(pdf.contains("/MediaBox [0 0 14400 7200]"));
}

#[test]
fn test_wide_scan_stays_within_page_limits() {
    let fx = Fixture::new();
    let wide = fx.dir.path().join("wide.png");
    image::RgbImage::from_pixel(300, 50, image::Rgb([255, 255, 255]))
        .save(&wide)
        .unwrap();

    // 300 inches is 21600 points, so the page is drawn at two points per unit
    let bytes = PageComposer::new().render(&fx.document(), &wide).unwrap();
    let pdf = String::from_utf8_lossy(&bytes);
    assert!(pdf.contains("/MediaBox [0 0 10800 1800]"));
    assert!(pdf.contains("/UserUnit 2"));
    assert!(pdf.contains("10800 0 0 1800 0 0 cm"));
    assert!(pdf.contains("/F1 6 Tf"));
}

#[test]
fn test_document_without_body_composes_empty_text() {
    let fx = Fixture::new();
    let doc = HocrDocument::parse_str("<html><head><title>x</title></head></html>").unwrap();
    let bytes = PageComposer::new().render(&doc, &fx.image).unwrap();
    let pdf = String::from_utf8_lossy(&bytes);
    assert!(pdf.contains("/MediaBox [0 0 14400 7200]"));
    assert!(!pdf.contains(" Tj"));
}

#[test]
fn test_conversion_request_runs_end_to_end() {
    let fx = Fixture::new();
    let config = ComposerConfig::new()
        .with_text_layer(TextLayer::Visible)
        .with_compress(true)
        .with_title("Page 1");

    ConversionRequest::new(&fx.hocr, &fx.image, &fx.output)
        .run(&config)
        .unwrap();

    let pdf = read_pdf(&fx.output);
    assert!(pdf.contains("/Title (Page 1)"));
    assert!(pdf.contains("/Filter /FlateDecode"));

    // Second run without overwrite refuses
    let again = ConversionRequest::new(&fx.hocr, &fx.image, &fx.output).run(&config);
    assert!(matches!(again, Err(Error::OutputExists(_))));
}
