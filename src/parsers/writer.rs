//! Chat log encoder used to build fixtures for tests and benchmarks

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use super::calendar::GREGORIAN_REFORM_DAY;
use super::reader::NULL_TEXT_LENGTH;
use super::record_stream::CHAT_LOG_MAGIC;
use crate::models::{CivilDateTime, Message};

/// Offset between a Julian day number and chrono's days-from-CE count
const CE_DAY_OFFSET: i64 = 1_721_425;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("text of {0} UTF-16 bytes does not fit a length prefix")]
    TextTooLong(usize),

    #[error("timestamp {0} cannot be encoded as a Gregorian Julian day")]
    DateOutOfRange(CivilDateTime),
}

/// Append-only big-endian writer producing the chat log wire format
#[derive(Debug, Default, Clone)]
pub struct ChatLogWriter {
    buf: Vec<u8>,
}

impl ChatLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a chat log: magic signature followed by the version field
    pub fn with_header(version: Option<&str>) -> Result<Self, EncodeError> {
        let mut writer = Self::new();
        writer.raw(CHAT_LOG_MAGIC);
        writer.text(version)?;
        Ok(writer)
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.u8(u8::from(value))
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.raw(&value.to_be_bytes())
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.raw(&value.to_be_bytes())
    }

    /// Write a nullable UTF-16BE text field
    pub fn text(&mut self, value: Option<&str>) -> Result<&mut Self, EncodeError> {
        let Some(value) = value else {
            return Ok(self.u32(NULL_TEXT_LENGTH));
        };

        let units: Vec<u16> = value.encode_utf16().collect();
        let byte_len = units.len() * 2;
        let prefix = u32::try_from(byte_len)
            .ok()
            .filter(|&len| len != NULL_TEXT_LENGTH)
            .ok_or(EncodeError::TextTooLong(byte_len))?;

        self.u32(prefix);
        for unit in units {
            self.raw(&unit.to_be_bytes());
        }
        Ok(self)
    }

    /// Write a timestamp as Julian day, milliseconds since midnight and flag
    pub fn timestamp(&mut self, timestamp: &CivilDateTime) -> Result<&mut Self, EncodeError> {
        let julian_day = julian_day_of(timestamp).ok_or(EncodeError::DateOutOfRange(*timestamp))?;
        let seconds = timestamp.hour * 3_600 + timestamp.minute * 60 + timestamp.second;
        self.u32(julian_day).u32(seconds * 1_000).u8(timestamp.timezone_flag);
        Ok(self)
    }

    /// Write one complete record
    ///
    /// Both participant counts are taken from the lengths of the two lists.
    pub fn message(&mut self, message: &Message) -> Result<&mut Self, EncodeError> {
        self.u32(message.id).bool(message.is_offline);
        self.timestamp(&message.timestamp)?;
        self.u32(message.sender_id);
        self.text(message.sender_name.as_deref())?;

        self.u32(count_of(message.participant_ids.len()));
        for id in &message.participant_ids {
            self.u32(*id);
        }
        self.u32(count_of(message.participant_names.len()));
        for name in &message.participant_names {
            self.text(name.as_deref())?;
        }

        self.text(message.legacy_text.as_deref())?;
        self.text(message.rich_text.as_deref())?;
        self.text(message.supplemental_text.as_deref())?;
        self.u64(message.bytes_read);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

fn count_of(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn julian_day_of(timestamp: &CivilDateTime) -> Option<u32> {
    let date = NaiveDate::from_ymd_opt(timestamp.year, timestamp.month, timestamp.day)?;
    let julian_day = i64::from(date.num_days_from_ce()) + CE_DAY_OFFSET;
    u32::try_from(julian_day).ok().filter(|&day| day > GREGORIAN_REFORM_DAY)
}
