//! Constants and magic numbers for the BYML format

/// Magic bytes of a big-endian document: "BY"
pub const MAGIC_BE: [u8; 2] = *b"BY";

/// Magic bytes of a little-endian document: "YB"
pub const MAGIC_LE: [u8; 2] = *b"YB";

/// Size of the resource header in bytes.
pub const HEADER_LEN: usize = 16;

/// Format versions this reader accepts.
pub const SUPPORTED_VERSIONS: [u16; 2] = [2, 3];

/// Container item counts are stored as 24-bit integers.
pub const MAX_CONTAINER_ITEMS: u32 = 0xFF_FFFF;

/// Maximum container nesting depth accepted by the validator.
///
/// The on-disk format places no limit of its own; this cap keeps the
/// recursive structural check from overflowing the stack on adversarial
/// documents (including self-referential containers).
pub const MAX_NODE_DEPTH: u32 = 512;

/// Type tag for a string node (index into the string table).
pub const TAG_STRING: u8 = 0xA0;
/// Type tag for an array node.
pub const TAG_ARRAY: u8 = 0xC0;
/// Type tag for a map node.
pub const TAG_MAP: u8 = 0xC1;
/// Type tag for a string table node.
pub const TAG_STRING_TABLE: u8 = 0xC2;
/// Type tag for a boolean value.
pub const TAG_BOOL: u8 = 0xD0;
/// Type tag for a signed 32-bit integer.
pub const TAG_INT: u8 = 0xD1;
/// Type tag for a 32-bit float.
pub const TAG_FLOAT: u8 = 0xD2;
/// Type tag for an unsigned 32-bit integer.
pub const TAG_UINT: u8 = 0xD3;
/// Type tag for an out-of-line signed 64-bit integer.
pub const TAG_INT64: u8 = 0xD4;
/// Type tag for an out-of-line unsigned 64-bit integer.
pub const TAG_UINT64: u8 = 0xD5;
/// Type tag for an out-of-line 64-bit float.
pub const TAG_DOUBLE: u8 = 0xD6;
/// Type tag for a null value.
pub const TAG_NULL: u8 = 0xFF;
