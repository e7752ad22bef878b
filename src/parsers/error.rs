use thiserror::Error;

/// Failure of a single primitive read from a [`ByteCursor`](super::reader::ByteCursor)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("needed {needed} bytes at offset {offset}, only {remaining} left")]
    Truncated { offset: usize, needed: usize, remaining: usize },

    #[error("text field at offset {offset} has odd byte length {len}")]
    OddTextLength { offset: usize, len: u32 },
}

/// Errors that abort decoding of one chat log
///
/// Every variant is fatal for the file it came from only. Records decoded
/// before the failure remain valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("version header truncated at offset {offset} (needed {needed} bytes, {remaining} left)")]
    TruncatedHeader { offset: usize, needed: usize, remaining: usize },

    #[error("version header has malformed text field at offset {offset} (odd length {len})")]
    MalformedHeader { offset: usize, len: u32 },

    #[error(
        "record {index} truncated at offset {offset} (needed {needed} bytes, {remaining} left)"
    )]
    TruncatedRecord { index: usize, offset: usize, needed: usize, remaining: usize },

    #[error("record {index} has malformed text field at offset {offset} (odd length {len})")]
    MalformedTextField { index: usize, offset: usize, len: u32 },
}

impl DecodeError {
    pub(crate) fn in_header(err: ReadError) -> Self {
        match err {
            ReadError::Truncated { offset, needed, remaining } => {
                Self::TruncatedHeader { offset, needed, remaining }
            }
            ReadError::OddTextLength { offset, len } => Self::MalformedHeader { offset, len },
        }
    }

    pub(crate) fn in_record(index: usize, err: ReadError) -> Self {
        match err {
            ReadError::Truncated { offset, needed, remaining } => {
                Self::TruncatedRecord { index, offset, needed, remaining }
            }
            ReadError::OddTextLength { offset, len } => {
                Self::MalformedTextField { index, offset, len }
            }
        }
    }

    /// Index of the record being decoded when the failure happened
    pub fn record_index(&self) -> Option<usize> {
        match self {
            Self::TruncatedRecord { index, .. } | Self::MalformedTextField { index, .. } => {
                Some(*index)
            }
            Self::TruncatedHeader { .. } | Self::MalformedHeader { .. } => None,
        }
    }

    /// Byte offset in the file where the failing field starts
    pub fn offset(&self) -> usize {
        match self {
            Self::TruncatedHeader { offset, .. }
            | Self::MalformedHeader { offset, .. }
            | Self::TruncatedRecord { offset, .. }
            | Self::MalformedTextField { offset, .. } => *offset,
        }
    }
}
