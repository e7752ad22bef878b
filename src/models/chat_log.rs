use serde::Serialize;

use super::Message;
use crate::parsers::DecodeError;

/// Messages decoded from one chat file, in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLog {
    /// Source file name
    pub name: String,
    pub version: Option<String>,
    pub messages: Vec<Message>,
}

/// Result of decoding a whole chat file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatLogOutcome {
    /// The file does not start with the chat log signature
    NotChatLog,
    Complete(ChatLog),
    /// Decoding stopped at `error`; `log` holds the records read before it
    Partial { log: ChatLog, error: DecodeError },
}

impl ChatLogOutcome {
    pub fn log(&self) -> Option<&ChatLog> {
        match self {
            Self::NotChatLog => None,
            Self::Complete(log) | Self::Partial { log, .. } => Some(log),
        }
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            Self::Partial { error, .. } => Some(error),
            _ => None,
        }
    }
}
