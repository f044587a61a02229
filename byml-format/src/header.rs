//! Resource header codec

use crate::constants::{HEADER_LEN, MAGIC_BE, MAGIC_LE, SUPPORTED_VERSIONS};
use crate::cursor::ByteCursor;
use crate::error::{BymlError, Result};

/// Decoded 16-byte resource header.
///
/// The magic selects the endianness of every multi-byte field in the
/// document. Each table offset is measured from the start of the buffer
/// and may be zero, meaning the table (or the root) is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Whether multi-byte fields are stored big-endian ("BY").
    pub big_endian: bool,
    /// Format version (2 or 3).
    pub version: u16,
    /// Offset to the hash key table, or 0 if no map nodes exist.
    pub hash_key_table_offset: u32,
    /// Offset to the string table, or 0 if no string values exist.
    pub string_table_offset: u32,
    /// Offset to the root node, or 0 for an empty document.
    pub root_node_offset: u32,
}

impl Header {
    /// Decode the header from the start of a document buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(BymlError::TruncatedHeader);
        }

        let magic = [bytes[0], bytes[1]];
        let big_endian = match magic {
            MAGIC_BE => true,
            MAGIC_LE => false,
            _ => return Err(BymlError::InvalidMagic(magic)),
        };

        let cur = ByteCursor::new(bytes, big_endian);

        let version = cur.read_u16(2);
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(BymlError::UnsupportedVersion(version));
        }

        Ok(Self {
            big_endian,
            version,
            hash_key_table_offset: cur.read_u32(4),
            string_table_offset: cur.read_u32(8),
            root_node_offset: cur.read_u32(12),
        })
    }
}
