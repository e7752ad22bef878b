//! Sequential record decoding for GigaTribe chat logs
//!
//! A chat log is the two bytes `ch`, a version text field, then records back
//! to back until end of input. Records carry no length prefix or checksum, so
//! the first bad field ends decoding of the whole file.

use tracing::{debug, warn};

use super::calendar::decode_timestamp;
use super::error::{DecodeError, ReadError};
use super::reader::ByteCursor;
use crate::models::Message;

/// File signature of a chat log
pub const CHAT_LOG_MAGIC: &[u8] = b"ch";

/// Smallest possible encoding of a participant id or name
const MIN_PARTICIPANT_FIELD_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Reading,
    Done,
    Aborted,
}

/// Outcome of checking a file's signature
#[derive(Debug)]
pub enum Opened<'a> {
    Chat(RecordStream<'a>),
    NotChatLog,
}

/// Iterator over the records of one chat log
///
/// Yields `Ok(Message)` per record. On the first failure it yields a single
/// `Err` and then stops.
#[derive(Debug)]
pub struct RecordStream<'a> {
    cursor: ByteCursor<'a>,
    version: Option<String>,
    records: usize,
    state: StreamState,
}

impl<'a> RecordStream<'a> {
    /// Check the signature and read the version field
    ///
    /// A wrong signature is a normal outcome ([`Opened::NotChatLog`]), not an error.
    pub fn open(data: &'a [u8]) -> Result<Opened<'a>, DecodeError> {
        let mut cursor = ByteCursor::new(data);
        match cursor.read_bytes(CHAT_LOG_MAGIC.len()) {
            Ok(magic) if magic == CHAT_LOG_MAGIC => {}
            _ => return Ok(Opened::NotChatLog),
        }

        let version = cursor.read_text().map_err(DecodeError::in_header)?;
        debug!(version = version.as_deref().unwrap_or("<null>"), "opened chat log");

        Ok(Opened::Chat(Self { cursor, version, records: 0, state: StreamState::Reading }))
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Number of records decoded so far
    pub fn records_read(&self) -> usize {
        self.records
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    fn decode_record(&mut self, index: usize) -> Result<Message, ReadError> {
        let cursor = &mut self.cursor;

        let id = cursor.read_u32()?;
        let is_offline = cursor.read_bool()?;
        let julian_day = cursor.read_u32()?;
        let millis = cursor.read_u32()?;
        let timezone_flag = cursor.read_u8()?;
        let sender_id = cursor.read_u32()?;
        let sender_name = cursor.read_text()?;

        let id_count = cursor.read_count(MIN_PARTICIPANT_FIELD_SIZE)?;
        let mut participant_ids = Vec::with_capacity(id_count);
        for _ in 0..id_count {
            participant_ids.push(cursor.read_u32()?);
        }

        let name_count = cursor.read_count(MIN_PARTICIPANT_FIELD_SIZE)?;
        let mut participant_names = Vec::with_capacity(name_count);
        for _ in 0..name_count {
            participant_names.push(cursor.read_text()?);
        }
        if id_count != name_count {
            warn!(record = index, id_count, name_count, "participant counts differ");
        }

        let legacy_text = cursor.read_text()?;
        let rich_text = cursor.read_text()?;
        let supplemental_text = cursor.read_text()?;
        let bytes_read = cursor.read_u64()?;

        Ok(Message {
            id,
            is_offline,
            timestamp: decode_timestamp(julian_day, millis, timezone_flag),
            sender_id,
            sender_name,
            participant_ids,
            participant_names,
            legacy_text,
            rich_text,
            supplemental_text,
            bytes_read,
        })
    }
}

impl Iterator for RecordStream<'_> {
    type Item = Result<Message, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != StreamState::Reading {
            return None;
        }
        if !self.cursor.has_remaining() {
            self.state = StreamState::Done;
            return None;
        }

        let index = self.records;
        match self.decode_record(index) {
            Ok(message) => {
                self.records += 1;
                debug!(record = index, id = message.id, "decoded record");
                Some(Ok(message))
            }
            Err(err) => {
                self.state = StreamState::Aborted;
                Some(Err(DecodeError::in_record(index, err)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CivilDateTime;
    use crate::parsers::writer::ChatLogWriter;

    fn sample_message(id: u32) -> Message {
        Message {
            id,
            is_offline: id % 2 == 0,
            timestamp: CivilDateTime {
                year: 2013,
                month: 7,
                day: 27,
                hour: 12,
                minute: 34,
                second: 56,
                timezone_flag: 2,
            },
            sender_id: 1_358_413,
            sender_name: Some("alice".to_string()),
            participant_ids: vec![1_358_413, 42],
            participant_names: vec![Some("alice".to_string()), None],
            legacy_text: Some("hello".to_string()),
            rich_text: None,
            supplemental_text: Some(String::new()),
            bytes_read: 1_024,
        }
    }

    fn open(data: &[u8]) -> RecordStream<'_> {
        match RecordStream::open(data).unwrap() {
            Opened::Chat(stream) => stream,
            Opened::NotChatLog => panic!("expected a chat log"),
        }
    }

    #[test]
    fn test_decodes_records_in_order() {
        let mut writer = ChatLogWriter::with_header(Some("3.0")).unwrap();
        writer.message(&sample_message(1)).unwrap();
        writer.message(&sample_message(2)).unwrap();
        let bytes = writer.into_bytes();

        let mut stream = open(&bytes);
        assert_eq!(stream.version(), Some("3.0"));
        let messages: Vec<Message> = stream.by_ref().map(Result::unwrap).collect();

        assert_eq!(messages, vec![sample_message(1), sample_message(2)]);
        assert_eq!(stream.state(), StreamState::Done);
        assert_eq!(stream.records_read(), 2);
    }

    #[test]
    fn test_header_only_log_has_no_records() {
        let bytes = ChatLogWriter::with_header(None).unwrap().into_bytes();
        let mut stream = open(&bytes);
        assert_eq!(stream.version(), None);
        assert!(stream.next().is_none());
        assert_eq!(stream.state(), StreamState::Done);
    }

    #[test]
    fn test_wrong_magic_is_not_a_chat_log() {
        let data = b"\xFF\xD8\xFF\xE0 jpeg data";
        assert!(matches!(RecordStream::open(data), Ok(Opened::NotChatLog)));
    }

    #[test]
    fn test_too_short_for_magic_is_not_a_chat_log() {
        assert!(matches!(RecordStream::open(b"c"), Ok(Opened::NotChatLog)));
        assert!(matches!(RecordStream::open(b""), Ok(Opened::NotChatLog)));
    }

    #[test]
    fn test_missing_version_is_header_error() {
        let err = RecordStream::open(b"ch\x00\x00").unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedHeader { offset: 2, .. }));
    }

    #[test]
    fn test_truncated_record_aborts_stream() {
        let mut writer = ChatLogWriter::with_header(Some("3")).unwrap();
        writer.message(&sample_message(1)).unwrap();
        let full_len = writer.len();
        writer.message(&sample_message(2)).unwrap();
        let mut bytes = writer.into_bytes();
        bytes.truncate(full_len + 10);

        let mut stream = open(&bytes);
        assert_eq!(stream.next(), Some(Ok(sample_message(1))));
        let err = stream.next().unwrap().unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedRecord { index: 1, .. }));
        assert_eq!(stream.state(), StreamState::Aborted);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_corrupted_participant_count_reports_truncation() {
        let mut writer = ChatLogWriter::with_header(Some("3")).unwrap();
        writer.u32(7).bool(false).u32(2_456_501).u32(0).u8(2).u32(9);
        writer.text(Some("bob")).unwrap();
        writer.u32(0x00FF_FFFF);
        writer.u32(1).u32(2);
        let bytes = writer.into_bytes();

        let mut stream = open(&bytes);
        let err = stream.next().unwrap().unwrap_err();
        assert_eq!(err.record_index(), Some(0));
        assert!(matches!(err, DecodeError::TruncatedRecord { .. }));
    }

    #[test]
    fn test_mismatched_participant_counts_are_kept() {
        let mut writer = ChatLogWriter::with_header(Some("3")).unwrap();
        writer.u32(7).bool(true).u32(2_456_501).u32(0).u8(2).u32(9);
        writer.text(Some("bob")).unwrap();
        writer.u32(2).u32(9).u32(10);
        writer.u32(1);
        writer.text(Some("bob")).unwrap();
        writer.text(Some("legacy")).unwrap().text(None).unwrap().text(None).unwrap();
        writer.u64(64);
        let bytes = writer.into_bytes();

        let mut stream = open(&bytes);
        let message = stream.next().unwrap().unwrap();
        assert_eq!(message.participant_ids, vec![9, 10]);
        assert_eq!(message.participant_names, vec![Some("bob".to_string())]);
        assert_eq!(message.bytes_read, 64);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_odd_text_length_is_malformed_field() {
        let mut writer = ChatLogWriter::with_header(Some("3")).unwrap();
        writer.u32(7).bool(false).u32(2_456_501).u32(0).u8(2).u32(9);
        writer.u32(3).raw(b"abc");
        let bytes = writer.into_bytes();

        let mut stream = open(&bytes);
        let err = stream.next().unwrap().unwrap_err();
        assert!(matches!(err, DecodeError::MalformedTextField { index: 0, len: 3, .. }));
    }
}
