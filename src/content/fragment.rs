//! Span model of sanitized rich text
//!
//! A fragment is split into plain text and image markers so each marker can be
//! rewritten on its own and the result concatenated back together.

use std::ops::Range;

use super::markup::{Piece, Tag, pieces};
use super::sanitizer::IMAGE_TAG;
use crate::models::ImageMarker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span<'a> {
    Text(&'a str),
    Image(ImageSpan<'a>),
}

/// An `<img>` tag carrying a resource path and numeric dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpan<'a> {
    raw: &'a str,
    src_range: Range<usize>,
    pub marker: ImageMarker,
}

impl<'a> ImageSpan<'a> {
    /// Recognize a marker: `src` made of `[A-Za-z0-9_/:.]` plus decimal
    /// `width` and `height`, in any order
    fn from_tag(tag: &Tag<'a>) -> Option<Self> {
        if tag.closing || !tag.is_named(IMAGE_TAG) {
            return None;
        }

        let attributes = tag.attributes()?;
        let find = |name: &str| attributes.iter().find(|a| a.name.eq_ignore_ascii_case(name));

        let src = find("src").filter(|a| is_marker_path(a.value))?;
        let width = find("width").and_then(|a| parse_dimension(a.value))?;
        let height = find("height").and_then(|a| parse_dimension(a.value))?;

        Some(Self {
            raw: tag.raw,
            src_range: src.value_range.clone(),
            marker: ImageMarker { source_path: src.value.to_string(), width, height },
        })
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// The original tag with only its `src` value replaced
    pub fn with_source(&self, source: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + source.len());
        out.push_str(&self.raw[..self.src_range.start]);
        out.push_str(source);
        out.push_str(&self.raw[self.src_range.end..]);
        out
    }
}

fn is_marker_path(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'/' | b':' | b'.'))
}

fn parse_dimension(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Split a sanitized fragment into text and image-marker spans
///
/// Tags that are not image markers stay in the output as text.
pub fn spans(fragment: &str) -> Vec<Span<'_>> {
    pieces(fragment)
        .map(|piece| match piece {
            Piece::Text(text) => Span::Text(text),
            Piece::Tag(tag) => match ImageSpan::from_tag(&tag) {
                Some(image) => Span::Image(image),
                None => Span::Text(tag.raw),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(fragment: &str) -> Vec<ImageMarker> {
        spans(fragment)
            .into_iter()
            .filter_map(|span| match span {
                Span::Image(image) => Some(image.marker),
                Span::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_recognizes_marker() {
        let fragment = r#"hi <img src="/ressources/a_1.png" width="207" height="256" /> there"#;
        let found = spans(fragment);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0], Span::Text("hi "));
        assert_eq!(found[2], Span::Text(" there"));
        assert_eq!(
            images(fragment),
            vec![ImageMarker {
                source_path: "/ressources/a_1.png".to_string(),
                width: 207,
                height: 256
            }]
        );
    }

    #[test]
    fn test_attribute_order_does_not_matter() {
        let fragment = r#"<img height="2" width="1" src="smileys/wink.gif">"#;
        assert_eq!(images(fragment)[0].source_path, "smileys/wink.gif");
    }

    #[test]
    fn test_rejects_paths_outside_marker_alphabet() {
        let fragment = r#"<img src="/ressources/my file.png" width="1" height="1" />"#;
        let found = spans(fragment);
        assert_eq!(found, vec![Span::Text(fragment)]);
    }

    #[test]
    fn test_rejects_non_numeric_dimensions() {
        assert!(images(r#"<img src="/ressources/a.png" width="50%" height="1" />"#).is_empty());
        assert!(images(r#"<img src="/ressources/a.png" height="1" />"#).is_empty());
    }

    #[test]
    fn test_with_source_preserves_rest_of_tag() {
        let fragment = r#"<img src="/ressources/a.png" width="207" height="256" />"#;
        let Span::Image(image) = spans(fragment).remove(0) else {
            panic!("expected image span");
        };
        assert_eq!(
            image.with_source("ressources/a.png"),
            r#"<img src="ressources/a.png" width="207" height="256" />"#
        );
        assert_eq!(image.raw(), fragment);
    }

    #[test]
    fn test_concatenating_spans_restores_fragment() {
        let fragment = r#"a<img src="/x.png" width="1" height="2" />b<img src="bad path" />c"#;
        let rebuilt: String = spans(fragment)
            .iter()
            .map(|span| match span {
                Span::Text(text) => *text,
                Span::Image(image) => image.raw(),
            })
            .collect();
        assert_eq!(rebuilt, fragment);
    }
}
