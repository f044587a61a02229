//! Pure layout arithmetic for container and string table nodes
//!
//! All offsets are carried as `u64` so that arithmetic on attacker
//! controlled 32-bit fields cannot wrap around.

use crate::cursor::ByteCursor;

/// A 32-bit value slot together with its type tag.
///
/// The meaning of `raw` depends on `tag`: an inline scalar, a string
/// table index, or an offset to a child node or out-of-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCell {
    /// The 32-bit value slot, already byteswapped.
    pub raw: u32,
    /// The raw type tag byte.
    pub tag: u8,
}

/// One 8-byte map entry: a key index into the hash key table plus a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMapEntry {
    /// 24-bit index into the hash key table.
    pub key_index: u32,
    /// The entry's value cell.
    pub cell: RawCell,
}

/// Smallest multiple of `align` that is >= `value`. `align` must be a
/// power of two.
pub const fn align_up(value: u64, align: u64) -> u64 {
    (value + align - 1) & !(align - 1)
}

/// Number of items in a container node (24-bit count after the tag byte).
pub fn container_len(cur: ByteCursor<'_>, node: u64) -> u32 {
    cur.read_u24(node + 1)
}

/// Absolute offset of string `index` in the table at `table`.
///
/// The table stores offsets relative to its own start, immediately after
/// the tag byte and 24-bit count.
pub fn string_offset(cur: ByteCursor<'_>, table: u64, index: u32) -> u64 {
    table + u64::from(cur.read_u32(table + 4 + 4 * u64::from(index)))
}

// Array layout: tag byte, u24 count, N type bytes, padding to a 4-byte
// boundary, N 32-bit value slots.

/// Offset of an array's type byte region.
pub const fn array_types_offset(node: u64) -> u64 {
    node + 4
}

/// Offset of an array's value slot region.
pub const fn array_values_offset(node: u64, len: u32) -> u64 {
    align_up(array_types_offset(node) + len as u64, 4)
}

/// Read array item `index` given precomputed type/value region offsets.
pub fn read_array_cell(
    cur: ByteCursor<'_>,
    types_offset: u64,
    values_offset: u64,
    index: u32,
) -> RawCell {
    RawCell {
        raw: cur.read_u32(values_offset + 4 * u64::from(index)),
        tag: cur.read_u8(types_offset + u64::from(index)),
    }
}

// Map layout: tag byte, u24 count, N 8-byte entries.

/// Offset of a map's entry region.
pub const fn map_entries_offset(node: u64) -> u64 {
    node + 4
}

/// Offset of map entry `index`.
pub const fn map_entry_offset(node: u64, index: u32) -> u64 {
    map_entries_offset(node) + 8 * index as u64
}

/// Read the map entry stored at `entry_offset`.
pub fn read_map_entry_at(cur: ByteCursor<'_>, entry_offset: u64) -> RawMapEntry {
    RawMapEntry {
        key_index: cur.read_u24(entry_offset),
        cell: RawCell {
            raw: cur.read_u32(entry_offset + 4),
            tag: cur.read_u8(entry_offset + 3),
        },
    }
}

/// Read map entry `index` of the map node at `node`.
pub fn read_map_entry(cur: ByteCursor<'_>, node: u64, index: u32) -> RawMapEntry {
    read_map_entry_at(cur, map_entry_offset(node, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 4), 0);
        assert_eq!(align_up(1, 4), 4);
        assert_eq!(align_up(4, 4), 4);
        assert_eq!(align_up(5, 4), 8);
        assert_eq!(align_up(0xFF_FFFF, 4), 0x100_0000);
    }

    #[test]
    fn test_array_offsets() {
        // 3 items: types at node+4, one padding byte, values at node+8.
        assert_eq!(array_types_offset(0x30), 0x34);
        assert_eq!(array_values_offset(0x30, 3), 0x38);
        // A multiple of 4 needs no padding.
        assert_eq!(array_values_offset(0x30, 4), 0x38);
        assert_eq!(array_values_offset(0x30, 0), 0x34);
    }

    #[test]
    fn test_map_offsets() {
        assert_eq!(map_entries_offset(0x30), 0x34);
        assert_eq!(map_entry_offset(0x30, 0), 0x34);
        assert_eq!(map_entry_offset(0x30, 2), 0x44);
    }

    #[test]
    fn test_read_array_cell() {
        // Array at 0: tag, count=2, 2 type bytes, 2 padding, 2 values.
        let data = [
            0xC0, 0x02, 0x00, 0x00, // header
            0xD1, 0xD0, 0x00, 0x00, // types + padding
            0xFE, 0xFF, 0xFF, 0xFF, // -2
            0x01, 0x00, 0x00, 0x00, // 1
        ];
        let cur = ByteCursor::new(&data, false);
        let types = array_types_offset(0);
        let values = array_values_offset(0, 2);
        assert_eq!(
            read_array_cell(cur, types, values, 0),
            RawCell { raw: 0xFFFF_FFFE, tag: 0xD1 }
        );
        assert_eq!(
            read_array_cell(cur, types, values, 1),
            RawCell { raw: 1, tag: 0xD0 }
        );
    }

    #[test]
    fn test_read_map_entry() {
        // Map at 0 with one entry: key index 5, tag Bool, value 1.
        let data = [
            0xC1, 0x01, 0x00, 0x00, //
            0x05, 0x00, 0x00, 0xD0, //
            0x01, 0x00, 0x00, 0x00, //
        ];
        let cur = ByteCursor::new(&data, false);
        let entry = read_map_entry(cur, 0, 0);
        assert_eq!(entry.key_index, 5);
        assert_eq!(entry.cell, RawCell { raw: 1, tag: 0xD0 });
    }

    #[test]
    fn test_string_offset() {
        // Table at 0 with 1 string: offsets [12, 16], "abc\0" at 12.
        let data = [
            0xC2, 0x01, 0x00, 0x00, //
            0x0C, 0x00, 0x00, 0x00, //
            0x10, 0x00, 0x00, 0x00, //
            b'a', b'b', b'c', 0x00, //
        ];
        let cur = ByteCursor::new(&data, false);
        assert_eq!(string_offset(cur, 0, 0), 12);
        assert_eq!(string_offset(cur, 0, 1), 16);
    }
}
