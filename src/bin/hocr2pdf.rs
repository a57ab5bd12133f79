//! Convert an HOCR file and its page image into a searchable PDF.
//!
//! Usage:
//!   hocr2pdf --hocr scan.hocr --image scan.png --pdf scan.pdf [--overwrite]
//!
//! Logging goes to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.

use clap::Parser;
use hocr2pdf::{ComposerConfig, ConversionRequest, TextLayer};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "hocr2pdf",
    version,
    about = "Overlay HOCR text on its page image to produce a searchable PDF"
)]
struct Args {
    /// HOCR input file
    #[arg(long)]
    hocr: PathBuf,

    /// Page image (PNG, JPEG or TIFF)
    #[arg(long)]
    image: PathBuf,

    /// Output PDF file
    #[arg(long)]
    pdf: PathBuf,

    /// Replace the output file if it already exists
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Paint the text layer instead of keeping it invisible
    #[arg(long, default_value_t = false)]
    visible_text: bool,

    /// Compress the page content stream
    #[arg(long, default_value_t = false)]
    compress: bool,

    /// Document title stored in the PDF metadata
    #[arg(long)]
    title: Option<String>,

    /// Log composition steps
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = ComposerConfig::new().with_compress(args.compress);
    if args.visible_text {
        config = config.with_text_layer(TextLayer::Visible);
    }
    if let Some(title) = args.title {
        config = config.with_title(title);
    }

    let request = ConversionRequest::new(args.hocr, args.image, args.pdf)
        .with_overwrite(args.overwrite);

    match request.run(&config) {
        Ok(()) => {
            log::info!(
                "Wrote {} from {} and {}",
                request.output_path.display(),
                request.hocr_path.display(),
                request.image_path.display()
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            log::error!("Conversion failed: {}", e);
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_required_flags() {
        assert!(Args::try_parse_from(["hocr2pdf", "--hocr", "a.hocr", "--image", "a.png"]).is_err());
        let err = Args::try_parse_from(["hocr2pdf", "--hocr", "", "--image", "a.png", "--pdf", "a.pdf"])
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "hocr2pdf",
            "--hocr",
            "a.hocr",
            "--image",
            "a.png",
            "--pdf",
            "a.pdf",
            "--overwrite",
            "--visible-text",
            "-v",
        ])
        .unwrap();
        assert!(args.overwrite);
        assert!(args.visible_text);
        assert!(args.verbose);
        assert!(!args.compress);
        assert_eq!(args.pdf, PathBuf::from("a.pdf"));
    }
}
