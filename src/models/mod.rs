//! Data models for decoded GigaTribe chat logs.
//!
//! - [`Message`] - One decoded chat record
//! - [`CivilDateTime`] - Record timestamp after calendar conversion
//! - [`ChatLog`] - All messages decoded from one chat file
//! - [`ImageMarker`] - An image reference found inside rich-text content
//! - [`UserDirInfo`] - A discovered GigaTribe user directory
//!
//! Models are immutable once decoded and serialize to JSON for `inspect`.

pub mod chat_log;
pub mod message;
pub mod user_dir;

pub use chat_log::{ChatLog, ChatLogOutcome};
pub use message::{CivilDateTime, ContentSource, ImageMarker, Message};
pub use user_dir::UserDirInfo;
