//! BYML Test Utilities
//!
//! This crate provides a document builder that serializes BYML byte
//! buffers for tests. It is intentionally not a production writer: it
//! exists so integration and property tests can construct well-formed
//! documents (in both endiannesses) and then corrupt them selectively.

use std::collections::BTreeSet;

use byml_format::constants::{
    HEADER_LEN, MAGIC_BE, MAGIC_LE, TAG_ARRAY, TAG_BOOL, TAG_DOUBLE, TAG_FLOAT, TAG_INT,
    TAG_INT64, TAG_MAP, TAG_NULL, TAG_STRING, TAG_STRING_TABLE, TAG_UINT, TAG_UINT64,
};

/// A node of the document under construction.
#[derive(Debug, Clone)]
pub enum Node {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 32-bit integer.
    Int(i32),
    /// Unsigned 32-bit integer.
    UInt(u32),
    /// 32-bit float.
    Float(f32),
    /// Out-of-line signed 64-bit integer.
    Int64(i64),
    /// Out-of-line unsigned 64-bit integer.
    UInt64(u64),
    /// Out-of-line 64-bit float.
    Double(f64),
    /// String value (stored via the string table).
    String(String),
    /// Array container.
    Array(Vec<Node>),
    /// Map container. Entries are sorted by key at serialization time.
    Map(Vec<(String, Node)>),
}

impl Node {
    /// Convenience constructor for a string node.
    pub fn string(value: &str) -> Self {
        Node::String(value.to_string())
    }

    /// Convenience constructor for a map node.
    pub fn map(entries: Vec<(&str, Node)>) -> Self {
        Node::Map(
            entries
                .into_iter()
                .map(|(key, node)| (key.to_string(), node))
                .collect(),
        )
    }

    fn tag(&self) -> u8 {
        match self {
            Node::Null => TAG_NULL,
            Node::Bool(_) => TAG_BOOL,
            Node::Int(_) => TAG_INT,
            Node::UInt(_) => TAG_UINT,
            Node::Float(_) => TAG_FLOAT,
            Node::Int64(_) => TAG_INT64,
            Node::UInt64(_) => TAG_UINT64,
            Node::Double(_) => TAG_DOUBLE,
            Node::String(_) => TAG_STRING,
            Node::Array(_) => TAG_ARRAY,
            Node::Map(_) => TAG_MAP,
        }
    }
}

/// Builder for BYML test documents.
pub struct DocumentBuilder {
    big_endian: bool,
    version: u16,
    root: Option<Node>,
}

impl DocumentBuilder {
    /// Create a builder for a little-endian version 2 document.
    pub fn new() -> Self {
        Self {
            big_endian: false,
            version: 2,
            root: None,
        }
    }

    /// Set the document endianness.
    pub fn big_endian(mut self, big_endian: bool) -> Self {
        self.big_endian = big_endian;
        self
    }

    /// Set the format version.
    pub fn version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    /// Set the root container. Must be an array or map node.
    pub fn root(mut self, root: Node) -> Self {
        assert!(
            matches!(root, Node::Array(_) | Node::Map(_)),
            "root must be a container"
        );
        self.root = Some(root);
        self
    }

    /// Serialize the document.
    pub fn build(&self) -> Vec<u8> {
        let mut keys = BTreeSet::new();
        let mut strings = BTreeSet::new();
        if let Some(root) = &self.root {
            collect_strings(root, &mut keys, &mut strings);
        }
        let keys: Vec<&String> = keys.iter().collect();
        let strings: Vec<&String> = strings.iter().collect();

        let mut buf = vec![0u8; HEADER_LEN];

        let hash_key_table_offset = if keys.is_empty() {
            0
        } else {
            let offset = buf.len() as u32;
            self.write_string_table(&mut buf, &keys);
            offset
        };
        let string_table_offset = if strings.is_empty() {
            0
        } else {
            let offset = buf.len() as u32;
            self.write_string_table(&mut buf, &strings);
            offset
        };
        let root_node_offset = match &self.root {
            Some(root) => self.write_container(&mut buf, root, &keys, &strings),
            None => 0,
        };

        // The reader requires a 64-bit out-of-line value to end strictly
        // before end of buffer, so a document whose last bytes are such a
        // value needs one trailing byte.
        if self.root.as_ref().is_some_and(contains_big_value) {
            buf.push(0);
        }

        buf[0..2].copy_from_slice(if self.big_endian { &MAGIC_BE } else { &MAGIC_LE });
        self.patch_u16(&mut buf, 2, self.version);
        self.patch_u32(&mut buf, 4, hash_key_table_offset);
        self.patch_u32(&mut buf, 8, string_table_offset);
        self.patch_u32(&mut buf, 12, root_node_offset);
        buf
    }

    fn patch_u16(&self, buf: &mut [u8], pos: usize, value: u16) {
        let bytes = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        buf[pos..pos + 2].copy_from_slice(&bytes);
    }

    fn patch_u32(&self, buf: &mut [u8], pos: usize, value: u32) {
        let bytes = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        buf[pos..pos + 4].copy_from_slice(&bytes);
    }

    fn push_u32(&self, buf: &mut Vec<u8>, value: u32) {
        let pos = buf.len();
        buf.resize(pos + 4, 0);
        self.patch_u32(buf, pos, value);
    }

    fn push_u24(&self, buf: &mut Vec<u8>, value: u32) {
        assert!(value < 0x100_0000);
        if self.big_endian {
            buf.extend_from_slice(&[(value >> 16) as u8, (value >> 8) as u8, value as u8]);
        } else {
            buf.extend_from_slice(&[value as u8, (value >> 8) as u8, (value >> 16) as u8]);
        }
    }

    fn push_u64(&self, buf: &mut Vec<u8>, value: u64) {
        let bytes = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        buf.extend_from_slice(&bytes);
    }

    /// Write a string table node: tag, count, N + 1 relative offsets,
    /// then the NUL-terminated strings.
    fn write_string_table(&self, buf: &mut Vec<u8>, entries: &[&String]) {
        let base = buf.len();
        buf.push(TAG_STRING_TABLE);
        self.push_u24(buf, entries.len() as u32);

        let mut offset = 4 + 4 * (entries.len() as u32 + 1);
        for entry in entries {
            self.push_u32(buf, offset);
            offset += entry.len() as u32 + 1;
        }
        self.push_u32(buf, offset); // end sentinel

        for entry in entries {
            buf.extend_from_slice(entry.as_bytes());
            buf.push(0);
        }
        debug_assert_eq!(buf.len() - base, offset as usize);
    }

    /// Write a container node at the current end of the buffer and
    /// return its offset. Children (nested containers and out-of-line
    /// 64-bit values) are appended afterwards and backpatched.
    fn write_container(
        &self,
        buf: &mut Vec<u8>,
        node: &Node,
        keys: &[&String],
        strings: &[&String],
    ) -> u32 {
        let base = buf.len() as u32;
        match node {
            Node::Array(items) => {
                buf.push(TAG_ARRAY);
                self.push_u24(buf, items.len() as u32);
                for item in items {
                    buf.push(item.tag());
                }
                while buf.len() % 4 != 0 {
                    buf.push(0);
                }
                let values_pos = buf.len();
                for _ in items {
                    self.push_u32(buf, 0);
                }
                for (i, item) in items.iter().enumerate() {
                    self.fill_slot(buf, values_pos + 4 * i, item, keys, strings);
                }
            }
            Node::Map(entries) => {
                let mut sorted: Vec<&(String, Node)> = entries.iter().collect();
                sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

                buf.push(TAG_MAP);
                self.push_u24(buf, sorted.len() as u32);
                let entries_pos = buf.len();
                for (key, item) in sorted.iter() {
                    let key_index = keys
                        .binary_search_by(|probe| probe.as_bytes().cmp(key.as_bytes()))
                        .unwrap() as u32;
                    self.push_u24(buf, key_index);
                    buf.push(item.tag());
                    self.push_u32(buf, 0);
                }
                for (i, (_, item)) in sorted.iter().enumerate() {
                    self.fill_slot(buf, entries_pos + 8 * i + 4, item, keys, strings);
                }
            }
            _ => panic!("not a container"),
        }
        base
    }

    /// Compute the 32-bit value for a cell and patch it into `slot`.
    fn fill_slot(
        &self,
        buf: &mut Vec<u8>,
        slot: usize,
        node: &Node,
        keys: &[&String],
        strings: &[&String],
    ) {
        let value = match node {
            Node::Null => 0,
            Node::Bool(b) => u32::from(*b),
            Node::Int(v) => *v as u32,
            Node::UInt(v) => *v,
            Node::Float(f) => f.to_bits(),
            Node::String(s) => strings
                .binary_search_by(|probe| probe.as_bytes().cmp(s.as_bytes()))
                .unwrap() as u32,
            Node::Int64(v) => {
                let offset = buf.len() as u32;
                self.push_u64(buf, *v as u64);
                offset
            }
            Node::UInt64(v) => {
                let offset = buf.len() as u32;
                self.push_u64(buf, *v);
                offset
            }
            Node::Double(f) => {
                let offset = buf.len() as u32;
                self.push_u64(buf, f.to_bits());
                offset
            }
            Node::Array(_) | Node::Map(_) => self.write_container(buf, node, keys, strings),
        };
        self.patch_u32(buf, slot, value);
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_big_value(node: &Node) -> bool {
    match node {
        Node::Int64(_) | Node::UInt64(_) | Node::Double(_) => true,
        Node::Array(items) => items.iter().any(contains_big_value),
        Node::Map(entries) => entries.iter().any(|(_, item)| contains_big_value(item)),
        _ => false,
    }
}

fn collect_strings(node: &Node, keys: &mut BTreeSet<String>, strings: &mut BTreeSet<String>) {
    match node {
        Node::String(s) => {
            strings.insert(s.clone());
        }
        Node::Array(items) => {
            for item in items {
                collect_strings(item, keys, strings);
            }
        }
        Node::Map(entries) => {
            for (key, item) in entries {
                keys.insert(key.clone());
                collect_strings(item, keys, strings);
            }
        }
        _ => {}
    }
}
