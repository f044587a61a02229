//! One-shot structural validation
//!
//! Runs right after the header is accepted and checks that every
//! reachable node lies within the buffer and carries a known type tag.
//! Success is what makes the unchecked reads of the navigation API safe;
//! nothing here is reachable from a [`crate::Reader`] that failed
//! validation.

use byml_format::constants::{MAX_NODE_DEPTH, TAG_ARRAY, TAG_MAP, TAG_STRING_TABLE};
use byml_format::{layout, BymlError, ByteCursor, Header, NodeType, Result};

struct CheckContext<'a> {
    cur: ByteCursor<'a>,
    size: u64,
    hash_key_table_len: u32,
    string_table_len: u32,
}

/// Check the whole document body against an already-decoded header.
pub(crate) fn check_document(data: &[u8], header: &Header) -> Result<()> {
    let cur = ByteCursor::new(data, header.big_endian);
    let size = data.len() as u64;

    for offset in [
        header.hash_key_table_offset,
        header.string_table_offset,
        header.root_node_offset,
    ] {
        if size <= u64::from(offset) {
            return Err(BymlError::OffsetOutOfBounds(u64::from(offset)));
        }
    }

    let mut ctx = CheckContext {
        cur,
        size,
        hash_key_table_len: 0,
        string_table_len: 0,
    };
    if header.hash_key_table_offset != 0 {
        ctx.hash_key_table_len =
            check_string_table(&ctx, u64::from(header.hash_key_table_offset))?;
    }
    if header.string_table_offset != 0 {
        ctx.string_table_len = check_string_table(&ctx, u64::from(header.string_table_offset))?;
    }

    if header.root_node_offset != 0 {
        let tag = cur.read_u8(u64::from(header.root_node_offset));
        match NodeType::from_u8(tag) {
            Some(ty) if ty.is_container() => {}
            _ => return Err(BymlError::InvalidRootType(tag)),
        }
        check_node(&ctx, header.root_node_offset, tag, 0)?;
    }

    Ok(())
}

/// Check a string table node and return its entry count.
fn check_string_table(ctx: &CheckContext<'_>, offset: u64) -> Result<u32> {
    if ctx.size < offset + 4 {
        return Err(BymlError::NodeOutOfBounds { offset });
    }

    let tag = ctx.cur.read_u8(offset);
    if tag != TAG_STRING_TABLE {
        return Err(BymlError::NodeTypeMismatch {
            offset,
            expected: TAG_STRING_TABLE,
            found: tag,
        });
    }

    let len = layout::container_len(ctx.cur, offset);
    // The offset array holds len + 1 entries; the last one is the end
    // sentinel just past the final string.
    if ctx.size < offset + 4 + 4 * (u64::from(len) + 1) {
        return Err(BymlError::NodeOutOfBounds { offset });
    }

    for i in 0..len {
        let string_offset = layout::string_offset(ctx.cur, offset, i);
        if ctx.size <= string_offset {
            return Err(BymlError::OffsetOutOfBounds(string_offset));
        }
        if ctx.cur.string_at(string_offset).is_none() {
            return Err(BymlError::UnterminatedString(string_offset));
        }
    }

    Ok(len)
}

fn check_array(ctx: &CheckContext<'_>, offset: u64, depth: u32) -> Result<()> {
    if ctx.size < offset + 4 {
        return Err(BymlError::NodeOutOfBounds { offset });
    }

    let tag = ctx.cur.read_u8(offset);
    if tag != TAG_ARRAY {
        return Err(BymlError::NodeTypeMismatch {
            offset,
            expected: TAG_ARRAY,
            found: tag,
        });
    }

    let len = layout::container_len(ctx.cur, offset);
    let types_offset = layout::array_types_offset(offset);
    let values_offset = layout::array_values_offset(offset, len);
    if ctx.size < values_offset + 4 * u64::from(len) {
        return Err(BymlError::NodeOutOfBounds { offset });
    }

    for i in 0..len {
        let cell = layout::read_array_cell(ctx.cur, types_offset, values_offset, i);
        check_node(ctx, cell.raw, cell.tag, depth)?;
    }

    Ok(())
}

fn check_map(ctx: &CheckContext<'_>, offset: u64, depth: u32) -> Result<()> {
    if ctx.size < offset + 4 {
        return Err(BymlError::NodeOutOfBounds { offset });
    }

    let tag = ctx.cur.read_u8(offset);
    if tag != TAG_MAP {
        return Err(BymlError::NodeTypeMismatch {
            offset,
            expected: TAG_MAP,
            found: tag,
        });
    }

    let len = layout::container_len(ctx.cur, offset);
    if ctx.size < layout::map_entries_offset(offset) + 8 * u64::from(len) {
        return Err(BymlError::NodeOutOfBounds { offset });
    }

    for i in 0..len {
        let entry = layout::read_map_entry(ctx.cur, offset, i);
        if entry.key_index >= ctx.hash_key_table_len {
            return Err(BymlError::KeyIndexOutOfRange {
                index: entry.key_index,
                len: ctx.hash_key_table_len,
            });
        }
        check_node(ctx, entry.cell.raw, entry.cell.tag, depth)?;
    }

    Ok(())
}

/// Check a (raw cell, tag) pair, recursing into containers.
fn check_node(ctx: &CheckContext<'_>, raw: u32, tag: u8, depth: u32) -> Result<()> {
    let Some(ty) = NodeType::from_u8(tag) else {
        return Err(BymlError::InvalidNodeType(tag));
    };

    match ty {
        NodeType::String => {
            // raw is an index into the string table.
            if raw < ctx.string_table_len {
                Ok(())
            } else {
                Err(BymlError::StringIndexOutOfRange {
                    index: raw,
                    len: ctx.string_table_len,
                })
            }
        }
        NodeType::Array | NodeType::Map => {
            // raw is an offset to the child node. The depth cap keeps
            // adversarial nesting (and self-referential offsets) from
            // blowing the stack.
            if depth >= MAX_NODE_DEPTH {
                return Err(BymlError::DepthLimitExceeded);
            }
            if ty == NodeType::Array {
                check_array(ctx, u64::from(raw), depth + 1)
            } else {
                check_map(ctx, u64::from(raw), depth + 1)
            }
        }
        NodeType::Bool | NodeType::Int | NodeType::Float | NodeType::UInt | NodeType::Null => {
            Ok(())
        }
        NodeType::Int64 | NodeType::UInt64 | NodeType::Double => {
            // raw is an offset to an 8-byte value. The strict `<` is kept
            // from the original implementation: a value ending exactly at
            // end of buffer is rejected.
            if u64::from(raw) + 8 < ctx.size {
                Ok(())
            } else {
                Err(BymlError::ValueOutOfBounds(u64::from(raw)))
            }
        }
        NodeType::StringTable => Err(BymlError::InvalidNodeType(tag)),
    }
}
