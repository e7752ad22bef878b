use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Calendar date and time of day of a chat record
///
/// `timezone_flag` is the raw byte from the file. It is documented as
/// 0 = local / 1 = UTC but real files mostly carry 2, so it is never interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CivilDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub timezone_flag: u8,
}

impl CivilDateTime {
    /// Convert to a chrono value, `None` when the fields are out of range
    ///
    /// chrono is proleptic Gregorian, so dates before the 1582 reform come out
    /// shifted relative to the Julian calendar used by the decoder.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(
            self.hour,
            self.minute,
            self.second,
        )
    }
}

/// Formats as `dd/mm/yyyy hh:mm:ss`
impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{} {:02}:{:02}:{:02}",
            self.day, self.month, self.year, self.hour, self.minute, self.second
        )
    }
}

/// One decoded chat record
///
/// `participant_ids` and `participant_names` are read with two independent
/// counts and may differ in length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: u32,
    pub is_offline: bool,
    pub timestamp: CivilDateTime,
    pub sender_id: u32,
    pub sender_name: Option<String>,
    pub participant_ids: Vec<u32>,
    pub participant_names: Vec<Option<String>>,
    pub legacy_text: Option<String>,
    pub rich_text: Option<String>,
    pub supplemental_text: Option<String>,
    pub bytes_read: u64,
}

/// Which field of a [`Message`] provides the rendered content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource<'a> {
    Rich(&'a str),
    Legacy(&'a str),
    Supplemental(&'a str),
    Empty,
}

impl Message {
    /// Pick the content field by fixed precedence: rich text, then legacy
    /// text, then supplemental text. Absent and empty fields are passed over.
    pub fn content_source(&self) -> ContentSource<'_> {
        fn non_empty(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|s| !s.is_empty())
        }

        if let Some(html) = non_empty(&self.rich_text) {
            ContentSource::Rich(html)
        } else if let Some(text) = non_empty(&self.legacy_text) {
            ContentSource::Legacy(text)
        } else if let Some(text) = non_empty(&self.supplemental_text) {
            ContentSource::Supplemental(text)
        } else {
            ContentSource::Empty
        }
    }

    pub fn sender_display(&self) -> &str {
        self.sender_name.as_deref().unwrap_or_default()
    }
}

/// An `<img>` tag inside rich text that references an asset by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMarker {
    pub source_path: String,
    pub width: u32,
    pub height: u32,
}
