//! Tag scanner for the rich-text fragments embedded in chat records
//!
//! GigaTribe writes Qt rich text where literal `<` in message text is always
//! escaped, so every `<` starts a tag. The tag ends at the next `>` that is
//! not inside a quoted attribute value.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    Tag(Tag<'a>),
}

/// One `<...>` tag as it appears in the fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub raw: &'a str,
    /// Byte offset of `<` in the scanned fragment
    pub offset: usize,
    pub closing: bool,
    name_start: usize,
    name_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: &'a str,
    /// Byte range of `value` inside the tag's `raw` text
    pub value_range: Range<usize>,
}

impl<'a> Tag<'a> {
    fn parse(raw: &'a str, offset: usize) -> Self {
        let bytes = raw.as_bytes();
        let closing = bytes.get(1) == Some(&b'/');
        let name_start = if closing { 2 } else { 1 };
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'!')
            .count();
        Self { raw, offset, closing, name_start, name_end: name_start + name_len }
    }

    pub fn name(&self) -> &'a str {
        &self.raw[self.name_start..self.name_end]
    }

    /// Case-insensitive tag name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
    }

    /// Byte offset just past `>` in the scanned fragment
    pub fn end(&self) -> usize {
        self.offset + self.raw.len()
    }

    /// Parse the attribute list, `None` if it is malformed
    ///
    /// Values may be double-quoted, single-quoted or bare. Attributes without
    /// a value get an empty one.
    pub fn attributes(&self) -> Option<Vec<Attribute<'a>>> {
        let raw = self.raw;
        let bytes = raw.as_bytes();
        let skip_ws = |mut i: usize| {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            i
        };

        let mut attributes = Vec::new();
        let mut i = self.name_end;
        loop {
            while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
                i += 1;
            }
            if i >= bytes.len() || bytes[i] == b'>' {
                return Some(attributes);
            }

            let name_start = i;
            while i < bytes.len() && is_attribute_name_byte(bytes[i]) {
                i += 1;
            }
            if i == name_start {
                return None;
            }
            let name = &raw[name_start..i];

            i = skip_ws(i);
            if bytes.get(i) != Some(&b'=') {
                attributes.push(Attribute { name, value: "", value_range: i..i });
                continue;
            }
            i = skip_ws(i + 1);

            let value_range = match bytes.get(i) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let start = i + 1;
                    let len = raw[start..].find(char::from(quote))?;
                    i = start + len + 1;
                    start..start + len
                }
                Some(_) => {
                    let start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    start..i
                }
                None => return None,
            };
            attributes.push(Attribute { name, value: &raw[value_range.clone()], value_range });
        }
    }
}

fn is_attribute_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':')
}

/// Offset of the `>` closing the tag that starts `rest`
///
/// A quote opens a value only right after `=`. If a quoted value is never
/// closed, the first `>` ends the tag.
fn tag_end(rest: &str) -> Option<usize> {
    let mut quote = None;
    let mut after_equals = false;
    for (i, b) in rest.bytes().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'>' => return Some(i),
            b'"' | b'\'' if after_equals => quote = Some(b),
            b'=' => {
                after_equals = true;
                continue;
            }
            b if b.is_ascii_whitespace() && after_equals => continue,
            _ => {}
        }
        after_equals = false;
    }
    rest.find('>')
}

/// Iterator splitting a fragment into text runs and tags
#[derive(Debug, Clone)]
pub struct Pieces<'a> {
    input: &'a str,
    pos: usize,
}

pub fn pieces(input: &str) -> Pieces<'_> {
    Pieces { input, pos: 0 }
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.input[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let start = self.pos;
        match rest.find('<') {
            Some(0) => match tag_end(rest) {
                Some(close) => {
                    self.pos += close + 1;
                    Some(Piece::Tag(Tag::parse(&rest[..=close], start)))
                }
                // An unterminated tag is left as text
                None => {
                    self.pos = self.input.len();
                    Some(Piece::Text(rest))
                }
            },
            Some(open) => {
                self.pos += open;
                Some(Piece::Text(&rest[..open]))
            }
            None => {
                self.pos = self.input.len();
                Some(Piece::Text(rest))
            }
        }
    }
}
