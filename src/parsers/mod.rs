//! Binary decoder for GigaTribe chat logs
//!
//! # Error Handling Strategy
//!
//! The format has no record framing, so decoding is **fail-fast per file**:
//!
//! - **Signature mismatch**: Files not starting with `ch` are reported as
//!   [`ChatLogOutcome::NotChatLog`]. The `chat/` folder also holds images and
//!   other blobs, so this is not an error.
//!
//! - **Header failure**: A truncated or malformed version field fails the file.
//!
//! - **Record failure**: The first truncated or malformed record stops decoding.
//!   Records decoded before it are kept and returned as
//!   [`ChatLogOutcome::Partial`] together with the [`DecodeError`], which carries
//!   the record index and byte offset. No resynchronization is attempted.
//!
//! Primitive reads return [`ReadError`]; the record stream lifts them into
//! [`DecodeError`] with record context. File-level plumbing uses `anyhow`.

pub mod calendar;
pub mod error;
pub mod reader;
pub mod record_stream;
pub mod writer;

use std::path::Path;

use anyhow::{Context, Result};

pub use error::{DecodeError, ReadError};
pub use reader::ByteCursor;
pub use record_stream::{CHAT_LOG_MAGIC, Opened, RecordStream, StreamState};
pub use writer::{ChatLogWriter, EncodeError};

use crate::models::{ChatLog, ChatLogOutcome};
use crate::utils::read_chat_file;

/// Decode every record of an in-memory chat log
///
/// # Errors
///
/// Returns an error only when the version header cannot be read. Record-level
/// failures are reported through [`ChatLogOutcome::Partial`].
pub fn decode_chat_log(name: &str, data: &[u8]) -> Result<ChatLogOutcome, DecodeError> {
    let mut stream = match RecordStream::open(data)? {
        Opened::Chat(stream) => stream,
        Opened::NotChatLog => return Ok(ChatLogOutcome::NotChatLog),
    };

    let mut messages = Vec::new();
    let mut failure = None;
    for record in stream.by_ref() {
        match record {
            Ok(message) => messages.push(message),
            Err(err) => failure = Some(err),
        }
    }

    let log = ChatLog {
        name: name.to_string(),
        version: stream.version().map(str::to_string),
        messages,
    };
    Ok(match failure {
        Some(error) => ChatLogOutcome::Partial { log, error },
        None => ChatLogOutcome::Complete(log),
    })
}

/// Read and decode a chat log file
pub fn parse_chat_log_file(path: &Path) -> Result<ChatLogOutcome> {
    let data = read_chat_file(path)?;
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    decode_chat_log(&name, &data)
        .with_context(|| format!("Failed to decode chat log: {}", path.display()))
}
