//! The document handle

use byml_format::{ByteCursor, Header, NodeType, Result};

use crate::validate;
use crate::value::{ArrayView, DocContext, MapView};

/// A BYML document over a borrowed byte buffer.
///
/// Construction never fails: a malformed buffer simply produces a reader
/// that reports invalid and whose navigation entry points all return
/// `None`. Validation runs once, here; every view and item handed out
/// afterwards reads from the buffer without further checks.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    data: &'a [u8],
    big_endian: bool,
    version: u16,
    hash_key_table_offset: u32,
    string_table_offset: u32,
    root_node_offset: u32,
    valid: bool,
}

impl<'a> Reader<'a> {
    /// Create a reader over `data` and validate the document structure.
    pub fn new(data: &'a [u8]) -> Self {
        match Header::decode(data) {
            Ok(header) => Self {
                data,
                big_endian: header.big_endian,
                version: header.version,
                hash_key_table_offset: header.hash_key_table_offset,
                string_table_offset: header.string_table_offset,
                root_node_offset: header.root_node_offset,
                valid: validate::check_document(data, &header).is_ok(),
            },
            Err(_) => Self {
                data,
                big_endian: false,
                version: 0,
                hash_key_table_offset: 0,
                string_table_offset: 0,
                root_node_offset: 0,
                valid: false,
            },
        }
    }

    /// Whether the document passed structural validation.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Re-run the structural check, returning the first failure as a
    /// typed error. Diagnostics only; [`Reader::is_valid`] is the gate.
    pub fn validate(&self) -> Result<()> {
        let header = Header::decode(self.data)?;
        validate::check_document(self.data, &header)
    }

    /// The underlying buffer.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Whether multi-byte fields are stored big-endian ("BY" magic).
    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    /// The format version (2 or 3), or 0 if the header was rejected.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Offset of the hash key table, or 0 if absent. Public so callers
    /// that traverse the binary format themselves can reach the table.
    pub fn hash_key_table_offset(&self) -> u32 {
        self.hash_key_table_offset
    }

    /// Offset of the string table, or 0 if absent.
    pub fn string_table_offset(&self) -> u32 {
        self.string_table_offset
    }

    fn root_type(&self) -> Option<NodeType> {
        if !self.valid || self.root_node_offset == 0 {
            return None;
        }
        NodeType::from_u8(self.data[self.root_node_offset as usize])
    }

    fn ctx(&self) -> DocContext<'a> {
        DocContext {
            cur: ByteCursor::new(self.data, self.big_endian),
            hash_key_table_offset: self.hash_key_table_offset,
            string_table_offset: self.string_table_offset,
        }
    }

    /// Whether the root node is an array.
    pub fn is_root_array(&self) -> bool {
        self.root_type() == Some(NodeType::Array)
    }

    /// Whether the root node is a map.
    pub fn is_root_map(&self) -> bool {
        self.root_type() == Some(NodeType::Map)
    }

    /// View of the root array, if the document is valid and its root is
    /// an array.
    pub fn root_array(&self) -> Option<ArrayView<'a>> {
        if !self.is_root_array() {
            return None;
        }
        Some(ArrayView::new(self.ctx(), self.root_node_offset))
    }

    /// View of the root map, if the document is valid and its root is a
    /// map.
    pub fn root_map(&self) -> Option<MapView<'a>> {
        if !self.is_root_map() {
            return None;
        }
        Some(MapView::new(self.ctx(), self.root_node_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byml_format::BymlError;

    const EMPTY_LE: [u8; 16] = [
        0x59, 0x42, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    ];

    #[test]
    fn test_empty_document_is_valid() {
        let doc = Reader::new(&EMPTY_LE);
        assert!(doc.is_valid());
        assert!(doc.validate().is_ok());
        assert!(!doc.is_big_endian());
        assert_eq!(doc.version(), 2);
        assert!(!doc.is_root_array());
        assert!(!doc.is_root_map());
        assert!(doc.root_array().is_none());
        assert!(doc.root_map().is_none());
    }

    #[test]
    fn test_short_buffer_is_invalid() {
        let doc = Reader::new(&EMPTY_LE[..15]);
        assert!(!doc.is_valid());
        assert_eq!(doc.validate(), Err(BymlError::TruncatedHeader));
    }

    #[test]
    fn test_bad_magic_is_invalid() {
        let mut buf = EMPTY_LE;
        buf[0] = b'X';
        let doc = Reader::new(&buf);
        assert!(!doc.is_valid());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_bad_version_is_invalid() {
        let mut buf = EMPTY_LE;
        buf[2] = 4;
        assert!(!Reader::new(&buf).is_valid());
        buf[2] = 1;
        assert!(!Reader::new(&buf).is_valid());
    }

    #[test]
    fn test_root_offset_one_past_end_is_invalid() {
        let mut buf = EMPTY_LE.to_vec();
        buf[12] = buf.len() as u8;
        let doc = Reader::new(&buf);
        assert!(!doc.is_valid());
        assert_eq!(
            doc.validate(),
            Err(BymlError::OffsetOutOfBounds(buf.len() as u64))
        );
    }

    #[test]
    fn test_invalid_document_blocks_navigation() {
        // Root points at a valid-looking map, but the hash key table
        // offset is out of bounds, so the whole document is rejected.
        let mut buf = EMPTY_LE.to_vec();
        buf.extend_from_slice(&[0xC1, 0x00, 0x00, 0x00]); // empty map at 0x10
        buf[12] = 0x10;
        assert!(Reader::new(&buf).is_valid());

        buf[4] = 0xFF; // hash key table offset 0xFF: out of bounds
        let doc = Reader::new(&buf);
        assert!(!doc.is_valid());
        assert!(doc.root_map().is_none());
        assert!(!doc.is_root_map());
    }

    #[test]
    fn test_root_must_be_container() {
        let mut buf = EMPTY_LE.to_vec();
        buf.extend_from_slice(&[0xD0, 0x01, 0x00, 0x00]); // bool node at 0x10
        buf[12] = 0x10;
        let doc = Reader::new(&buf);
        assert!(!doc.is_valid());
        assert_eq!(doc.validate(), Err(BymlError::InvalidRootType(0xD0)));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let doc = Reader::new(&EMPTY_LE);
        let again = Reader::new(&EMPTY_LE);
        assert_eq!(doc.is_valid(), again.is_valid());
        assert_eq!(doc.validate(), again.validate());
    }
}
