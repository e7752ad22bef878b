//! GigaTribe Chat Export - Convert GigaTribe chat logs to HTML transcripts
//!
//! This library decodes the binary chat logs GigaTribe keeps in each user
//! directory and renders them as standalone HTML documents. It supports:
//!
//! - Decoding the big-endian record stream of `chat/` files
//! - Converting Julian day timestamps to civil dates
//! - Sanitizing rich text down to plain text and inline images
//! - Copying referenced images from `ressources/` next to the documents
//!
//! # Example
//!
//! ```no_run
//! use gigatribe_chat_export::{ExportConfig, export_user_dir};
//!
//! let config = ExportConfig::new("/data/GigaTribe/1234567", "/tmp/chat-export");
//! let summary = export_user_dir(&config)?;
//! println!("Exported {} messages", summary.messages);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod exporter;
pub mod models;
pub mod parsers;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::ExportConfig;
pub use exporter::{ExportSummary, export_user_dir};
pub use models::{ChatLog, ChatLogOutcome, Message};
pub use parsers::{decode_chat_log, parse_chat_log_file};
