//! `bbox` property extraction from HOCR `title` attributes.
//!
//! HOCR stores geometry as semicolon-separated properties inside the `title`
//! attribute, e.g. `title="bbox 36 92 618 184; x_wconf 93"`. Only the `bbox`
//! property is read here; every other property is ignored.

use crate::error::{BoundingBoxError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `bbox` followed by up to four tokens, stopping at whitespace, `;` or the end
    static ref RE_BBOX: Regex = Regex::new(r"bbox((?:\s+[^\s;]+){0,4})(?:[\s;]|$)").unwrap();
}

/// Pixel rectangle an OCR engine assigned to a recognized region.
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right corner.
/// The corners are stored as written; no ordering between them is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    /// Left edge
    pub x1: i32,
    /// Top edge
    pub y1: i32,
    /// Right edge
    pub x2: i32,
    /// Bottom edge
    pub y2: i32,
}

impl BoundingBox {
    /// Create a bounding box from its corners.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Extract the `bbox` property from an attribute value.
    ///
    /// A value without a `bbox` property yields the zero box. Only the first
    /// four tokens after `bbox` are read; fewer than four, or a token that is
    /// not a non-negative integer, is an error.
    ///
    /// ```
    /// use hocr2pdf::hocr::BoundingBox;
    ///
    /// let bbox = BoundingBox::parse("bbox 10 20 110 60; x_wconf 91").unwrap();
    /// assert_eq!(bbox, BoundingBox::new(10, 20, 110, 60));
    /// assert_eq!(BoundingBox::parse("x_wconf 91").unwrap(), BoundingBox::default());
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let captures = match RE_BBOX.captures(value) {
            Some(captures) => captures,
            None => return Ok(Self::default()),
        };

        let tokens: Vec<&str> = captures
            .get(1)
            .map(|m| m.as_str().split_whitespace().collect())
            .unwrap_or_default();
        if tokens.len() != 4 {
            return Err(BoundingBoxError::WrongArity {
                value: value.to_string(),
                found: tokens.len(),
            }
            .into());
        }

        let mut coords = [0i32; 4];
        for (slot, token) in coords.iter_mut().zip(&tokens) {
            *slot = Some(token)
                .filter(|t| t.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|t| t.parse::<u32>().ok())
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| BoundingBoxError::InvalidCoordinate {
                    value: value.to_string(),
                    token: token.to_string(),
                })?;
        }

        Ok(Self::new(coords[0], coords[1], coords[2], coords[3]))
    }

    /// Horizontal extent (`x2 - x1`).
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Vertical extent (`y2 - y1`).
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// True when all four coordinates are zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    #[test]
    fn test_parse_plain_bbox() {
        assert_eq!(BoundingBox::parse("bbox 1 2 3 4").unwrap(), BoundingBox::new(1, 2, 3, 4));
    }

    #[test]
    fn test_parse_with_other_properties() {
        let value = "image \"page.png\"; bbox 0 0 2480 3508; ppageno 0";
        assert_eq!(BoundingBox::parse(value).unwrap(), BoundingBox::new(0, 0, 2480, 3508));
    }

    #[test]
    fn test_parse_without_bbox_is_zero() {
        let bbox = BoundingBox::parse("x_wconf 96").unwrap();
        assert!(bbox.is_zero());
        assert!(BoundingBox::parse("").unwrap().is_zero());
    }

    #[test]
    fn test_bbox_found_inside_a_longer_name() {
        assert_eq!(BoundingBox::parse("x_bbox 1 2 3 4").unwrap(), BoundingBox::new(1, 2, 3, 4));
        assert!(BoundingBox::parse("bboxes 1 2 3 4").unwrap().is_zero());
    }

    #[test]
    fn test_trailing_content_after_four_coordinates() {
        let expected = BoundingBox::new(1, 2, 3, 4);
        assert_eq!(BoundingBox::parse("bbox 1 2 3 4 x_wconf 90").unwrap(), expected);
        assert_eq!(BoundingBox::parse("bbox 1 2 3 4 5").unwrap(), expected);
        assert_eq!(BoundingBox::parse("bbox 1 2 3 4;x_wconf 90").unwrap(), expected);
    }

    #[test]
    fn test_three_coordinates_before_semicolon() {
        assert!(matches!(
            BoundingBox::parse("bbox 1 2 3; x_wconf 90 91").unwrap_err(),
            Error::MalformedBoundingBox(BoundingBoxError::WrongArity { found: 3, .. })
        ));
    }

    #[test]
    fn test_negative_coordinate_is_rejected() {
        match BoundingBox::parse("bbox -1 2 3 4") {
            Err(Error::MalformedBoundingBox(BoundingBoxError::InvalidCoordinate {
                token, ..
            })) => assert_eq!(token, "-1"),
            other => panic!("expected invalid coordinate, got {:?}", other),
        }
        assert!(BoundingBox::parse("bbox +1 2 3 4").is_err());
        assert!(BoundingBox::parse("bbox 1 2 3 4294967295").is_err());
    }

    #[test]
    fn test_three_coordinates_is_malformed() {
        let err = BoundingBox::parse("bbox 1 2 3").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedBoundingBox(BoundingBoxError::WrongArity { found: 3, .. })
        ));
    }

    #[test]
    fn test_non_numeric_token_is_reported() {
        match BoundingBox::parse("bbox a 2 3 4") {
            Err(Error::MalformedBoundingBox(BoundingBoxError::InvalidCoordinate {
                token, ..
            })) => assert_eq!(token, "a"),
            other => panic!("expected invalid coordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_extent() {
        let bbox = BoundingBox::new(10, 20, 110, 70);
        assert_eq!(bbox.width(), 100);
        assert_eq!(bbox.height(), 50);
    }

    proptest! {
        #[test]
        fn prop_four_integers_round_trip(
            x1 in 0i32..100_000,
            y1 in 0i32..100_000,
            x2 in 0i32..100_000,
            y2 in 0i32..100_000,
        ) {
            let value = format!("bbox {} {} {} {}", x1, y1, x2, y2);
            prop_assert_eq!(BoundingBox::parse(&value).unwrap(), BoundingBox::new(x1, y1, x2, y2));
        }

        #[test]
        fn prop_titles_without_bbox_are_zero(title in "[a-z_ ;0-9]*") {
            prop_assume!(!title.contains("bbox"));
            prop_assert!(BoundingBox::parse(&title).unwrap().is_zero());
        }
    }
}
