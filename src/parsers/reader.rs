//! Big-endian primitive decoding over an in-memory chat log

use super::error::ReadError;

/// Length prefix marking an absent (null) text field
pub const NULL_TEXT_LENGTH: u32 = 0xFFFF_FFFF;

/// Forward-only cursor over the bytes of one chat log
///
/// Every read either consumes exactly the bytes of its field or fails without
/// consuming anything. [`ByteCursor::has_remaining`] never consumes.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the input
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether at least one unread byte is left
    pub fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }

    fn ensure(&self, needed: usize) -> Result<(), ReadError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ReadError::Truncated { offset: self.pos, needed, remaining });
        }
        Ok(())
    }

    /// Consume `n` raw bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        self.ensure(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// One byte, any non-zero value is `true`
    pub fn read_bool(&mut self) -> Result<bool, ReadError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Read a `u32` element count and check that `count` items of at least
    /// `min_item_size` bytes each could still fit in the input
    ///
    /// Corrupted counts are reported as truncation before anything is allocated.
    pub fn read_count(&mut self, min_item_size: usize) -> Result<usize, ReadError> {
        let start = self.pos;
        let count = self.read_u32()? as usize;
        let needed = count.saturating_mul(min_item_size);
        if let Err(err) = self.ensure(needed) {
            self.pos = start;
            return Err(err);
        }
        Ok(count)
    }

    /// Read a length-prefixed UTF-16BE text field
    ///
    /// Returns `None` for the null sentinel, which is distinct from `Some("")`.
    /// Unpaired surrogates decode to U+FFFD.
    pub fn read_text(&mut self) -> Result<Option<String>, ReadError> {
        let start = self.pos;
        let len = self.read_u32()?;
        if len == NULL_TEXT_LENGTH {
            return Ok(None);
        }
        if len % 2 != 0 {
            self.pos = start;
            return Err(ReadError::OddTextLength { offset: start, len });
        }

        let bytes = match self.read_bytes(len as usize) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.pos = start;
                return Err(err);
            }
        };
        let units = bytes.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        let text = char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        Ok(Some(text))
    }
}
