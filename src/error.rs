//! Error types for HOCR conversion.
//!
//! Every fallible operation in the crate returns [`Result`]. Missing data
//! (no `title` attribute, no `bbox` property, no `body` element) is never an
//! error; only malformed or unreadable input is.

use std::path::PathBuf;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading HOCR or writing the PDF.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input file could not be opened or read
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Markup could not be tokenized into a tree
    #[error("Failed to parse markup at byte {offset}: {reason}")]
    MarkupParse {
        /// Byte offset where the tokenizer gave up
        offset: usize,
        /// Reason reported by the tokenizer
        reason: String,
    },

    /// A `bbox` property was present but unusable
    #[error(transparent)]
    MalformedBoundingBox(#[from] BoundingBoxError),

    /// Image header could not be read or its format is unknown
    #[error("Failed to read image dimensions from '{}': {reason}", path.display())]
    ImageDimension {
        /// Image file
        path: PathBuf,
        /// Reason reported by the decoder
        reason: String,
    },

    /// Image could not be embedded into the page
    #[error("Image error: {0}")]
    Image(String),

    /// The output exists and overwriting was not requested
    #[error("Output file '{}' already exists; use overwrite to replace it", .0.display())]
    OutputExists(PathBuf),

    /// The finished PDF could not be written
    #[error("Failed to write output PDF '{}': {source}", path.display())]
    OutputWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Serialization into an in-memory buffer failed
    #[error("Serialization error: {0}")]
    Write(#[from] std::io::Error),
}

/// Reasons a `bbox` property is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundingBoxError {
    /// The property did not carry exactly four coordinates
    #[error("Malformed bounding box '{value}': expected 4 coordinates, found {found}")]
    WrongArity {
        /// Attribute value that was parsed
        value: String,
        /// Number of tokens found
        found: usize,
    },

    /// A coordinate token is not a non-negative integer
    #[error("Malformed bounding box '{value}': '{token}' is not a non-negative integer")]
    InvalidCoordinate {
        /// Attribute value that was parsed
        value: String,
        /// Offending token
        token: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = Error::Io {
            path: PathBuf::from("scan.hocr"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("scan.hocr"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_markup_parse_error() {
        let err = Error::MarkupParse {
            offset: 42,
            reason: "unexpected end of file".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("42"));
        assert!(msg.contains("unexpected end of file"));
    }

    #[test]
    fn test_bounding_box_errors() {
        let err: Error = BoundingBoxError::InvalidCoordinate {
            value: "bbox a 2 3 4".to_string(),
            token: "a".to_string(),
        }
        .into();
        assert!(format!("{}", err).contains("'a' is not a non-negative integer"));

        let err: Error = BoundingBoxError::WrongArity {
            value: "bbox 1 2 3".to_string(),
            found: 3,
        }
        .into();
        assert!(format!("{}", err).contains("found 3"));
    }

    #[test]
    fn test_output_exists_error() {
        let err = Error::OutputExists(PathBuf::from("out.pdf"));
        let msg = format!("{}", err);
        assert!(msg.contains("out.pdf"));
        assert!(msg.contains("already exists"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
