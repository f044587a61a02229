//! Container views, items and tagged values
//!
//! Everything in this module is a lightweight copyable handle borrowing
//! from the document buffer. These types are only reachable through a
//! [`crate::Reader`] that passed validation, so the unchecked reads the
//! accessors perform are always in bounds.

use byml_format::{layout, ByteCursor, NodeType, RawCell};

/// The per-document state a view or item needs to resolve reads.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DocContext<'a> {
    pub(crate) cur: ByteCursor<'a>,
    pub(crate) hash_key_table_offset: u32,
    pub(crate) string_table_offset: u32,
}

/// A typed item: a raw 32-bit cell bound to its document.
#[derive(Debug, Clone, Copy)]
pub struct Item<'a> {
    ctx: DocContext<'a>,
    cell: RawCell,
}

/// A tagged value covering every observable node kind.
///
/// `Null` is a proper variant; an item whose tag is `0xFF` yields
/// `Value::Null` rather than a sentinel.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    /// A map view.
    Map(MapView<'a>),
    /// An array view.
    Array(ArrayView<'a>),
    /// A string (bytes without the NUL terminator).
    String(&'a [u8]),
    /// A boolean.
    Bool(bool),
    /// A signed 32-bit integer.
    Int(i32),
    /// An unsigned 32-bit integer.
    UInt(u32),
    /// A 32-bit float.
    Float(f32),
    /// A signed 64-bit integer.
    Int64(i64),
    /// An unsigned 64-bit integer.
    UInt64(u64),
    /// A 64-bit float.
    Double(f64),
    /// Null.
    Null,
}

impl<'a> Item<'a> {
    pub(crate) fn new(ctx: DocContext<'a>, cell: RawCell) -> Self {
        Self { ctx, cell }
    }

    /// The item's type tag, if it is one of the known tags.
    pub fn node_type(&self) -> Option<NodeType> {
        NodeType::from_u8(self.cell.tag)
    }

    /// The map this item refers to, if it is tagged `Map`.
    pub fn as_map(&self) -> Option<MapView<'a>> {
        match self.node_type()? {
            NodeType::Map => Some(MapView::new(self.ctx, self.cell.raw)),
            _ => None,
        }
    }

    /// The array this item refers to, if it is tagged `Array`.
    pub fn as_array(&self) -> Option<ArrayView<'a>> {
        match self.node_type()? {
            NodeType::Array => Some(ArrayView::new(self.ctx, self.cell.raw)),
            _ => None,
        }
    }

    /// The string bytes this item refers to, if it is tagged `String`.
    pub fn as_string(&self) -> Option<&'a [u8]> {
        match self.node_type()? {
            NodeType::String => {
                let offset = layout::string_offset(
                    self.ctx.cur,
                    u64::from(self.ctx.string_table_offset),
                    self.cell.raw,
                );
                self.ctx.cur.string_at(offset)
            }
            _ => None,
        }
    }

    /// UTF-8 view of [`Item::as_string`]. The format does not promise
    /// UTF-8, so this additionally returns `None` for non-UTF-8 bytes.
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.as_string()?).ok()
    }

    /// The boolean value, if tagged `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self.node_type()? {
            NodeType::Bool => Some(self.cell.raw != 0),
            _ => None,
        }
    }

    /// The signed 32-bit value, if tagged `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self.node_type()? {
            NodeType::Int => Some(self.cell.raw as i32),
            _ => None,
        }
    }

    /// The unsigned 32-bit value: `UInt`, or a non-negative `Int`.
    pub fn as_uint(&self) -> Option<u32> {
        match self.node_type()? {
            NodeType::Int => (self.cell.raw as i32 >= 0).then_some(self.cell.raw),
            NodeType::UInt => Some(self.cell.raw),
            _ => None,
        }
    }

    /// The 32-bit float value, if tagged `Float`.
    pub fn as_float(&self) -> Option<f32> {
        match self.node_type()? {
            NodeType::Float => Some(f32::from_bits(self.cell.raw)),
            _ => None,
        }
    }

    /// The signed 64-bit value: `Int` (sign-extended), `UInt`
    /// (zero-extended), or an out-of-line `Int64`.
    pub fn as_int64(&self) -> Option<i64> {
        match self.node_type()? {
            NodeType::Int => Some(i64::from(self.cell.raw as i32)),
            NodeType::UInt => Some(i64::from(self.cell.raw)),
            NodeType::Int64 => Some(self.ctx.cur.read_i64(u64::from(self.cell.raw))),
            _ => None,
        }
    }

    /// The unsigned 64-bit value: anything [`Item::as_uint`] accepts, an
    /// out-of-line `UInt64`, or a non-negative out-of-line `Int64`.
    pub fn as_uint64(&self) -> Option<u64> {
        if let Some(value) = self.as_uint() {
            return Some(u64::from(value));
        }

        match self.node_type()? {
            NodeType::Int64 | NodeType::UInt64 => {
                let value = self.ctx.cur.read_u64(u64::from(self.cell.raw));
                if self.node_type() == Some(NodeType::Int64) && (value as i64) < 0 {
                    return None;
                }
                Some(value)
            }
            _ => None,
        }
    }

    /// The 64-bit float value: a widened `Float` or an out-of-line
    /// `Double`.
    pub fn as_double(&self) -> Option<f64> {
        if let Some(value) = self.as_float() {
            return Some(f64::from(value));
        }

        match self.node_type()? {
            NodeType::Double => Some(self.ctx.cur.read_f64(u64::from(self.cell.raw))),
            _ => None,
        }
    }

    /// The item as a tagged [`Value`].
    ///
    /// More convenient than the typed accessors when every kind has to be
    /// handled, at the cost of resolving the value eagerly.
    pub fn value(&self) -> Value<'a> {
        match self.node_type() {
            Some(NodeType::Map) => self.as_map().map_or(Value::Null, Value::Map),
            Some(NodeType::Array) => self.as_array().map_or(Value::Null, Value::Array),
            Some(NodeType::String) => self.as_string().map_or(Value::Null, Value::String),
            Some(NodeType::Bool) => self.as_bool().map_or(Value::Null, Value::Bool),
            Some(NodeType::Int) => self.as_int().map_or(Value::Null, Value::Int),
            Some(NodeType::UInt) => self.as_uint().map_or(Value::Null, Value::UInt),
            Some(NodeType::Float) => self.as_float().map_or(Value::Null, Value::Float),
            Some(NodeType::Int64) => self.as_int64().map_or(Value::Null, Value::Int64),
            Some(NodeType::UInt64) => self.as_uint64().map_or(Value::Null, Value::UInt64),
            Some(NodeType::Double) => self.as_double().map_or(Value::Null, Value::Double),
            // Null, plus tags that cannot appear in a validated document.
            _ => Value::Null,
        }
    }
}

/// Zero-copy view of an array node.
#[derive(Debug, Clone, Copy)]
pub struct ArrayView<'a> {
    ctx: DocContext<'a>,
    offset: u32,
    len: u32,
}

impl<'a> ArrayView<'a> {
    pub(crate) fn new(ctx: DocContext<'a>, offset: u32) -> Self {
        let len = layout::container_len(ctx.cur, u64::from(offset));
        Self { ctx, offset, len }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the array holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the item at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<Item<'a>> {
        if index >= self.len() {
            return None;
        }
        let node = u64::from(self.offset);
        let cell = layout::read_array_cell(
            self.ctx.cur,
            layout::array_types_offset(node),
            layout::array_values_offset(node, self.len),
            index as u32,
        );
        Some(Item::new(self.ctx, cell))
    }

    /// Iterate over the items in index order.
    pub fn iter(&self) -> ArrayIter<'a> {
        ArrayIter {
            view: *self,
            index: 0,
        }
    }
}

impl<'a> IntoIterator for ArrayView<'a> {
    type Item = Item<'a>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> ArrayIter<'a> {
        self.iter()
    }
}

impl<'a> IntoIterator for &ArrayView<'a> {
    type Item = Item<'a>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> ArrayIter<'a> {
        self.iter()
    }
}

/// Iterator over an array's items.
#[derive(Debug, Clone)]
pub struct ArrayIter<'a> {
    view: ArrayView<'a>,
    index: usize,
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = Item<'a>;

    fn next(&mut self) -> Option<Item<'a>> {
        let item = self.view.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArrayIter<'_> {}

/// One map entry: the key string and its item.
#[derive(Debug, Clone, Copy)]
pub struct MapEntry<'a> {
    /// Key bytes in the hash key table, without the NUL terminator.
    pub key: &'a [u8],
    /// The entry's value.
    pub item: Item<'a>,
}

impl<'a> MapEntry<'a> {
    /// UTF-8 view of the key.
    pub fn key_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.key).ok()
    }
}

/// Zero-copy view of a map node.
#[derive(Debug, Clone, Copy)]
pub struct MapView<'a> {
    ctx: DocContext<'a>,
    offset: u32,
    len: u32,
}

impl<'a> MapView<'a> {
    pub(crate) fn new(ctx: DocContext<'a>, offset: u32) -> Self {
        let len = layout::container_len(ctx.cur, u64::from(offset));
        Self { ctx, offset, len }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the entry at `index` in stored order, or `None` if out of
    /// range.
    pub fn entry(&self, index: usize) -> Option<MapEntry<'a>> {
        if index >= self.len() {
            return None;
        }
        let raw = layout::read_map_entry(self.ctx.cur, u64::from(self.offset), index as u32);
        let key_offset = layout::string_offset(
            self.ctx.cur,
            u64::from(self.ctx.hash_key_table_offset),
            raw.key_index,
        );
        Some(MapEntry {
            key: self.ctx.cur.string_at(key_offset)?,
            item: Item::new(self.ctx, raw.cell),
        })
    }

    /// Look up an entry by key.
    ///
    /// Entries are stored sorted by key, so this is a binary search with
    /// byte-wise lexicographic comparison.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<Item<'a>> {
        let key = key.as_ref();
        let mut lo = 0usize;
        let mut hi = self.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let entry = self.entry(mid)?;
            match entry.key.cmp(key) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return Some(entry.item),
            }
        }
        None
    }

    /// Whether the map contains an entry with the given key.
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over the entries in stored order.
    pub fn iter(&self) -> MapIter<'a> {
        MapIter {
            view: *self,
            index: 0,
        }
    }

    /// Iterate over the keys in stored order.
    pub fn keys(&self) -> impl Iterator<Item = &'a [u8]> {
        self.iter().map(|entry| entry.key)
    }
}

impl<'a> IntoIterator for MapView<'a> {
    type Item = MapEntry<'a>;
    type IntoIter = MapIter<'a>;

    fn into_iter(self) -> MapIter<'a> {
        self.iter()
    }
}

impl<'a> IntoIterator for &MapView<'a> {
    type Item = MapEntry<'a>;
    type IntoIter = MapIter<'a>;

    fn into_iter(self) -> MapIter<'a> {
        self.iter()
    }
}

/// Iterator over a map's entries.
#[derive(Debug, Clone)]
pub struct MapIter<'a> {
    view: MapView<'a>,
    index: usize,
}

impl<'a> Iterator for MapIter<'a> {
    type Item = MapEntry<'a>;

    fn next(&mut self) -> Option<MapEntry<'a>> {
        let entry = self.view.entry(self.index)?;
        self.index += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MapIter<'_> {}
