//! HTML table output for chat transcripts

use std::io::{self, Write};

use super::transcript::{RowSink, TranscriptRow};
use crate::content::RenderedContent;

/// Base64 PNG showing "Image not found", shown by `.image_not_found` spans
const IMAGE_NOT_FOUND_PNG_BASE64: &str = include_str!("../../assets/image_not_found.png.b64");

const HEADER_START: &str = r#"<html>
<head>
<meta http-equiv="content-type" content="text/html; charset=UTF-8">
<style>
table {
    padding: 0;
    margin: 0;
    border-collapse: collapse;
    border: 1px solid #333;
    font-family: Verdana, Arial, Helvetica, sans-serif;
    font-size: 0.9em;
    color: #000;
}
table th, table td {
    border: 1px dotted;
    padding: 0.5em;
    text-align: left;
}
.image_not_found:before {
    content: url('data:image/png;base64,"#;

const HEADER_END: &str = r#"')
}
</style>
</head>
<body>
<table>
<tr>
<th>Sender</th>
<th>Date</th>
<th>Message</th>
</tr>
"#;

const FOOTER: &str = "</table>\n</body>\n</html>\n";

/// [`RowSink`] writing a standalone HTML document
pub struct HtmlTranscriptWriter<W: Write> {
    out: W,
}

impl<W: Write> HtmlTranscriptWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RowSink for HtmlTranscriptWriter<W> {
    fn begin(&mut self) -> io::Result<()> {
        self.out.write_all(HEADER_START.as_bytes())?;
        self.out.write_all(IMAGE_NOT_FOUND_PNG_BASE64.trim().as_bytes())?;
        self.out.write_all(HEADER_END.as_bytes())
    }

    fn row(&mut self, row: &TranscriptRow) -> io::Result<()> {
        let content = match &row.content {
            RenderedContent::Markup(html) => html.clone(),
            RenderedContent::Plain(text) => escape_html(text),
        };
        writeln!(
            self.out,
            "<tr>\n<td>{}</td>\n<td>{}</td>\n<td>{}</td>\n</tr>",
            escape_html(&row.sender),
            row.date,
            content
        )
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.write_all(FOOTER.as_bytes())?;
        self.out.flush()
    }
}

/// Escape text for use inside an HTML element
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
