//! Error types for the BYML format

use thiserror::Error;

/// BYML error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BymlError {
    /// Buffer is shorter than the 16-byte resource header.
    #[error("Buffer too small for header")]
    TruncatedHeader,
    /// Input does not start with "BY" or "YB".
    #[error("Invalid magic bytes: {0:02x?}")]
    InvalidMagic([u8; 2]),
    /// Format version is not supported by this reader.
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u16),
    /// A header table offset or node offset points outside the buffer.
    #[error("Offset 0x{0:x} is out of bounds")]
    OffsetOutOfBounds(u64),
    /// A node's declared extent runs past the end of the buffer.
    #[error("Node at 0x{offset:x} extends past end of buffer")]
    NodeOutOfBounds {
        /// Offset of the offending node.
        offset: u64,
    },
    /// A node has a different tag than the context requires.
    #[error("Node at 0x{offset:x} has type 0x{found:02x}, expected 0x{expected:02x}")]
    NodeTypeMismatch {
        /// Offset of the offending node.
        offset: u64,
        /// Tag the context requires.
        expected: u8,
        /// Tag actually stored.
        found: u8,
    },
    /// The root node is neither an array nor a map.
    #[error("Invalid root node type: 0x{0:02x}")]
    InvalidRootType(u8),
    /// A cell carries a tag that is unknown or not valid in value position.
    #[error("Invalid node type: 0x{0:02x}")]
    InvalidNodeType(u8),
    /// A string table entry has no NUL terminator before end of buffer.
    #[error("String at 0x{0:x} is not NUL-terminated")]
    UnterminatedString(u64),
    /// A string cell's index is not covered by the string table.
    #[error("String index {index} is out of range (table holds {len})")]
    StringIndexOutOfRange {
        /// Index stored in the cell.
        index: u32,
        /// Number of entries in the string table.
        len: u32,
    },
    /// A map entry's key index is not covered by the hash key table.
    #[error("Key index {index} is out of range (table holds {len})")]
    KeyIndexOutOfRange {
        /// Index stored in the entry.
        index: u32,
        /// Number of entries in the hash key table.
        len: u32,
    },
    /// An out-of-line 64-bit value does not fit in the buffer.
    #[error("64-bit value at 0x{0:x} is out of bounds")]
    ValueOutOfBounds(u64),
    /// Container nesting exceeds the validator's depth cap.
    #[error("Container nesting exceeds depth limit")]
    DepthLimitExceeded,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BymlError>;
