//! Reduce GigaTribe rich text to its message body
//!
//! A rich-text record is a complete Qt HTML document:
//!
//! ```text
//! <!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.0//EN" ...>
//! <html><head><meta name="qrichtext" content="1" /><style type="text/css">
//! p, li { white-space: pre-wrap; }
//! </style></head><body style=" font-family:'Arial'; font-size:16pt;">
//! <p style=" margin-top:0px; ..."><img src="/ressources/a.png" width="207" height="256" />TEXT <a href="x"></a> MORE</p></body></html>
//! ```
//!
//! Only the paragraph content is kept, and inside it only text and `<img>` tags:
//!
//! ```text
//! <img src="/ressources/a.png" width="207" height="256" />TEXT  MORE
//! ```

use super::markup::{Piece, pieces};

const PARAGRAPH_TAG: &str = "p";
pub(crate) const IMAGE_TAG: &str = "img";

/// Strip the document wrapper and every non-image tag
///
/// Absent input stays absent. Without a paragraph the whole fragment is
/// stripped instead.
pub fn sanitize(fragment: Option<&str>) -> Option<String> {
    let fragment = fragment?;
    let body = paragraph_body(fragment).unwrap_or(fragment);
    Some(strip_non_image_tags(body))
}

/// Content between the first `<p ...>` and the last `</p>` after it
fn paragraph_body(fragment: &str) -> Option<&str> {
    let mut start = None;
    let mut end = None;

    for piece in pieces(fragment) {
        let Piece::Tag(tag) = piece else { continue };
        if !tag.is_named(PARAGRAPH_TAG) {
            continue;
        }
        match (start, tag.closing) {
            (None, false) => start = Some(tag.end()),
            (Some(_), true) => end = Some(tag.offset),
            _ => {}
        }
    }

    Some(&fragment[start?..end?])
}

fn strip_non_image_tags(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    for piece in pieces(body) {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Tag(tag) if !tag.closing && tag.is_named(IMAGE_TAG) => out.push_str(tag.raw),
            Piece::Tag(_) => {}
        }
    }
    out
}
