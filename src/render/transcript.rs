use std::io;

use crate::content::{
    RenderedContent, ResolveReport, ResourceResolver, ResourceStore, resolve_content,
};
use crate::models::Message;
use crate::parsers::DecodeError;

/// One transcript line: sender, formatted date, content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRow {
    pub sender: String,
    pub date: String,
    pub content: RenderedContent,
}

/// Destination of rendered rows
pub trait RowSink {
    fn begin(&mut self) -> io::Result<()>;
    fn row(&mut self, row: &TranscriptRow) -> io::Result<()>;
    fn finish(&mut self) -> io::Result<()>;
}

/// What happened while rendering one chat log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub rows: usize,
    pub images: ResolveReport,
    /// Decoding failure that ended the transcript early
    pub error: Option<DecodeError>,
}

pub struct TranscriptRenderer<'r, S> {
    resolver: &'r ResourceResolver<S>,
}

impl<'r, S: ResourceStore> TranscriptRenderer<'r, S> {
    pub fn new(resolver: &'r ResourceResolver<S>) -> Self {
        Self { resolver }
    }

    pub fn row_for(&self, message: &Message) -> (TranscriptRow, ResolveReport) {
        let (content, report) = resolve_content(message, self.resolver);
        let row = TranscriptRow {
            sender: message.sender_display().to_string(),
            date: message.timestamp.to_string(),
            content,
        };
        (row, report)
    }

    /// Render decoded records in order, one row each
    ///
    /// A decoding error ends the transcript; rows already written are kept and
    /// the footer is still emitted. Only sink I/O errors are returned as `Err`.
    pub fn render<I, K>(&self, records: I, sink: &mut K) -> io::Result<RenderSummary>
    where
        I: IntoIterator<Item = Result<Message, DecodeError>>,
        K: RowSink + ?Sized,
    {
        let mut summary = RenderSummary::default();
        sink.begin()?;

        for record in records {
            match record {
                Ok(message) => {
                    let (row, report) = self.row_for(&message);
                    sink.row(&row)?;
                    summary.rows += 1;
                    summary.images += report;
                }
                Err(err) => {
                    summary.error = Some(err);
                    break;
                }
            }
        }

        sink.finish()?;
        Ok(summary)
    }
}
