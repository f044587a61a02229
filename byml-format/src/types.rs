//! Node type tag enumeration

use crate::constants::*;

/// Type tag of a BYML node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeType {
    /// String value (raw cell is a string table index)
    String = TAG_STRING,
    /// Array container
    Array = TAG_ARRAY,
    /// Map container (string-keyed, sorted)
    Map = TAG_MAP,
    /// String table (only valid as one of the two header tables)
    StringTable = TAG_STRING_TABLE,
    /// Boolean value
    Bool = TAG_BOOL,
    /// Signed 32-bit integer
    Int = TAG_INT,
    /// 32-bit float
    Float = TAG_FLOAT,
    /// Unsigned 32-bit integer
    UInt = TAG_UINT,
    /// Signed 64-bit integer (raw cell is an offset to the value)
    Int64 = TAG_INT64,
    /// Unsigned 64-bit integer (raw cell is an offset to the value)
    UInt64 = TAG_UINT64,
    /// 64-bit float (raw cell is an offset to the value)
    Double = TAG_DOUBLE,
    /// Null value
    Null = TAG_NULL,
}

impl NodeType {
    /// Convert from a raw tag byte. Returns `None` for unknown tags.
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            TAG_STRING => Some(NodeType::String),
            TAG_ARRAY => Some(NodeType::Array),
            TAG_MAP => Some(NodeType::Map),
            TAG_STRING_TABLE => Some(NodeType::StringTable),
            TAG_BOOL => Some(NodeType::Bool),
            TAG_INT => Some(NodeType::Int),
            TAG_FLOAT => Some(NodeType::Float),
            TAG_UINT => Some(NodeType::UInt),
            TAG_INT64 => Some(NodeType::Int64),
            TAG_UINT64 => Some(NodeType::UInt64),
            TAG_DOUBLE => Some(NodeType::Double),
            TAG_NULL => Some(NodeType::Null),
            _ => None,
        }
    }

    /// Whether this tag denotes a container node.
    pub fn is_container(self) -> bool {
        matches!(self, NodeType::Array | NodeType::Map)
    }

    /// Whether this tag denotes a value node (inline or out-of-line).
    pub fn is_value(self) -> bool {
        matches!(
            self,
            NodeType::String
                | NodeType::Bool
                | NodeType::Int
                | NodeType::Float
                | NodeType::UInt
                | NodeType::Int64
                | NodeType::UInt64
                | NodeType::Double
                | NodeType::Null
        )
    }
}
