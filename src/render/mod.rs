//! Transcript rendering: decoded messages become rows of a table document

pub mod html;
pub mod transcript;

pub use html::{HtmlTranscriptWriter, escape_html};
pub use transcript::{RenderSummary, RowSink, TranscriptRenderer, TranscriptRow};
