//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use gigatribe_chat_export::models::{CivilDateTime, Message};
use gigatribe_chat_export::parsers::ChatLogWriter;
use gigatribe_chat_export::parsers::calendar::decode_timestamp;
use tempfile::TempDir;

/// 27/07/2013
pub const SAMPLE_JULIAN_DAY: u32 = 2_456_501;

/// Builder for creating test GigaTribe user directories
pub struct UserDirBuilder {
    temp_dir: TempDir,
}

impl UserDirBuilder {
    /// Create a user directory with empty `chat/` and `ressources/` folders
    pub fn new() -> Self {
        let builder = Self::without_resources();
        fs::create_dir(builder.path().join("ressources")).expect("Failed to create ressources dir");
        builder
    }

    /// Create a user directory with only a `chat/` folder
    pub fn without_resources() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("chat")).expect("Failed to create chat dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add an encoded chat log to `chat/`
    pub fn with_chat_log(self, name: &str, messages: &[MessageBuilder]) -> Self {
        let bytes = encode_chat_log(Some("2.0"), messages);
        self.with_raw_file(name, &bytes)
    }

    /// Add arbitrary bytes to `chat/`
    pub fn with_raw_file(self, name: &str, bytes: &[u8]) -> Self {
        fs::write(self.path().join("chat").join(name), bytes).expect("Failed to write chat file");
        self
    }

    /// Add a file below `ressources/`
    pub fn with_resource(self, relative: &str, bytes: &[u8]) -> Self {
        let path = self.path().join("ressources").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create resource dir");
        }
        fs::write(path, bytes).expect("Failed to write resource");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for UserDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for chat records
#[derive(Clone)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// A record sent by `alice` at 27/07/2013 12:34:56
    pub fn new(id: u32) -> Self {
        Self {
            message: Message {
                id,
                timestamp: decode_timestamp(SAMPLE_JULIAN_DAY, 45_296_000, 0),
                sender_id: 1001,
                sender_name: Some("alice".to_string()),
                participant_ids: vec![1001, 1002],
                participant_names: vec![Some("alice".to_string()), Some("bob".to_string())],
                ..Default::default()
            },
        }
    }

    pub fn sender(mut self, name: Option<&str>) -> Self {
        self.message.sender_name = name.map(str::to_string);
        self
    }

    pub fn rich(mut self, text: &str) -> Self {
        self.message.rich_text = Some(text.to_string());
        self
    }

    pub fn legacy(mut self, text: &str) -> Self {
        self.message.legacy_text = Some(text.to_string());
        self
    }

    pub fn supplemental(mut self, text: &str) -> Self {
        self.message.supplemental_text = Some(text.to_string());
        self
    }

    pub fn timestamp(mut self, timestamp: CivilDateTime) -> Self {
        self.message.timestamp = timestamp;
        self
    }

    pub fn participants(mut self, ids: &[u32], names: &[&str]) -> Self {
        self.message.participant_ids = ids.to_vec();
        self.message.participant_names = names.iter().map(|n| Some(n.to_string())).collect();
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}

/// Encode a chat log with the given version and records
pub fn encode_chat_log(version: Option<&str>, messages: &[MessageBuilder]) -> Vec<u8> {
    let mut writer = ChatLogWriter::with_header(version).expect("Failed to encode header");
    for builder in messages {
        writer.message(&builder.clone().build()).expect("Failed to encode record");
    }
    writer.into_bytes()
}

/// Rich text holding one paragraph, wrapped like GigaTribe wraps it
pub fn rich_paragraph(body: &str) -> String {
    format!(
        r#"<html><head><meta name="qrichtext" content="1" /></head><body style="font-size:9pt;"><p style="margin:0px;">{}</p></body></html>"#,
        body
    )
}

/// Image marker as GigaTribe embeds it
pub fn image_marker(src: &str) -> String {
    format!(r#"<img src="{}" width="16" height="16" />"#, src)
}
