//! Endian-aware byte cursor
//!
//! A thin typed view over a borrowed byte buffer. Fixed-width reads index
//! the slice directly and are only called with offsets the validator has
//! already bounds-checked; an out-of-range read is a programming error and
//! panics rather than reading out of bounds.

/// Read-only cursor over a document buffer with a fixed endianness.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    big_endian: bool,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor over `data` with the document's endianness.
    pub fn new(data: &'a [u8], big_endian: bool) -> Self {
        Self { data, big_endian }
    }

    /// Whether multi-byte reads are big-endian.
    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    /// The underlying buffer.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    fn fixed<const N: usize>(&self, offset: u64) -> [u8; N] {
        let start = offset as usize;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[start..start + N]);
        bytes
    }

    /// Read a single byte.
    pub fn read_u8(&self, offset: u64) -> u8 {
        self.data[offset as usize]
    }

    /// Read a 16-bit unsigned integer.
    pub fn read_u16(&self, offset: u64) -> u16 {
        let bytes = self.fixed::<2>(offset);
        if self.big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        }
    }

    /// Read a 32-bit unsigned integer.
    pub fn read_u32(&self, offset: u64) -> u32 {
        let bytes = self.fixed::<4>(offset);
        if self.big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        }
    }

    /// Read a 64-bit unsigned integer.
    pub fn read_u64(&self, offset: u64) -> u64 {
        let bytes = self.fixed::<8>(offset);
        if self.big_endian {
            u64::from_be_bytes(bytes)
        } else {
            u64::from_le_bytes(bytes)
        }
    }

    /// Read a 64-bit signed integer.
    pub fn read_i64(&self, offset: u64) -> i64 {
        self.read_u64(offset) as i64
    }

    /// Read a 32-bit float (byteswapped as its integer bit pattern).
    pub fn read_f32(&self, offset: u64) -> f32 {
        f32::from_bits(self.read_u32(offset))
    }

    /// Read a 64-bit float (byteswapped as its integer bit pattern).
    pub fn read_f64(&self, offset: u64) -> f64 {
        f64::from_bits(self.read_u64(offset))
    }

    /// Read a 24-bit unsigned integer.
    ///
    /// The three bytes follow the document's endianness: big-endian in
    /// "BY" documents, little-endian in "YB" documents.
    pub fn read_u24(&self, offset: u64) -> u32 {
        let bytes = self.fixed::<3>(offset);
        if self.big_endian {
            u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2])
        } else {
            u32::from(bytes[2]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[0])
        }
    }

    /// Read the NUL-terminated string starting at `offset`, without the
    /// terminator. Returns `None` if `offset` is out of range or no NUL
    /// occurs before end of buffer.
    pub fn string_at(&self, offset: u64) -> Option<&'a [u8]> {
        let start = usize::try_from(offset).ok()?;
        let tail = self.data.get(start..)?;
        let nul = tail.iter().position(|&b| b == 0)?;
        Some(&tail[..nul])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fixed_width_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let cur = ByteCursor::new(&data, false);
        assert_eq!(cur.read_u8(0), 0x01);
        assert_eq!(cur.read_u16(0), 0x0201);
        assert_eq!(cur.read_u32(0), 0x0403_0201);
        assert_eq!(cur.read_u64(0), 0x0807_0605_0403_0201);
    }

    #[test]
    fn test_read_fixed_width_big_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let cur = ByteCursor::new(&data, true);
        assert_eq!(cur.read_u16(0), 0x0102);
        assert_eq!(cur.read_u32(0), 0x0102_0304);
        assert_eq!(cur.read_u64(0), 0x0102_0304_0506_0708);
    }

    #[test]
    fn test_read_u24() {
        let data = [0x01, 0x02, 0x03];
        assert_eq!(ByteCursor::new(&data, false).read_u24(0), 0x03_0201);
        assert_eq!(ByteCursor::new(&data, true).read_u24(0), 0x01_0203);
    }

    #[test]
    fn test_read_floats() {
        let bits = 1.5f32.to_bits().to_le_bytes();
        let cur = ByteCursor::new(&bits, false);
        assert_eq!(cur.read_f32(0), 1.5);

        let bits = (-2.25f64).to_bits().to_be_bytes();
        let cur = ByteCursor::new(&bits, true);
        assert_eq!(cur.read_f64(0), -2.25);
    }

    #[test]
    fn test_read_i64_sign() {
        let data = i64::MIN.to_le_bytes();
        let cur = ByteCursor::new(&data, false);
        assert_eq!(cur.read_i64(0), i64::MIN);
    }

    #[test]
    fn test_string_at() {
        let data = b"abc\0def";
        let cur = ByteCursor::new(data, false);
        assert_eq!(cur.string_at(0), Some(&b"abc"[..]));
        assert_eq!(cur.string_at(4), None); // no terminator before EOF
        assert_eq!(cur.string_at(3), Some(&b""[..]));
        assert_eq!(cur.string_at(100), None);
    }
}
