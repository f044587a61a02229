//! Property-based tests: the reader must never panic on arbitrary input,
//! and documents produced by the builder must read back exactly.

use byml_reader::{Item, Reader};
use byml_test_utils::{DocumentBuilder, Node};
use proptest::prelude::*;

fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        Just(Node::Null),
        any::<bool>().prop_map(Node::Bool),
        any::<i32>().prop_map(Node::Int),
        any::<u32>().prop_map(Node::UInt),
        any::<f32>().prop_map(Node::Float),
        any::<i64>().prop_map(Node::Int64),
        any::<u64>().prop_map(Node::UInt64),
        any::<f64>().prop_map(Node::Double),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Node::String),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Node::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Node::Map(map.into_iter().collect())),
        ]
    })
}

fn root_strategy() -> impl Strategy<Value = Node> {
    prop_oneof![
        prop::collection::vec(node_strategy(), 0..5).prop_map(Node::Array),
        prop::collection::btree_map("[a-z]{1,6}", node_strategy(), 0..5)
            .prop_map(|map| Node::Map(map.into_iter().collect())),
    ]
}

/// Float comparisons are by bit pattern so NaN payloads round-trip.
fn assert_node_matches(node: &Node, item: Item<'_>) {
    match node {
        Node::Null => assert_eq!(item.node_type(), Some(byml_reader::NodeType::Null)),
        Node::Bool(v) => assert_eq!(item.as_bool(), Some(*v)),
        Node::Int(v) => assert_eq!(item.as_int(), Some(*v)),
        Node::UInt(v) => assert_eq!(item.as_uint(), Some(*v)),
        Node::Float(v) => assert_eq!(item.as_float().map(f32::to_bits), Some(v.to_bits())),
        Node::Int64(v) => assert_eq!(item.as_int64(), Some(*v)),
        Node::UInt64(v) => assert_eq!(item.as_uint64(), Some(*v)),
        Node::Double(v) => assert_eq!(item.as_double().map(f64::to_bits), Some(v.to_bits())),
        Node::String(v) => assert_eq!(item.as_string(), Some(v.as_bytes())),
        Node::Array(items) => {
            let array = item.as_array().expect("expected an array item");
            assert_eq!(array.len(), items.len());
            for (child, got) in items.iter().zip(array.iter()) {
                assert_node_matches(child, got);
            }
        }
        Node::Map(entries) => {
            let map = item.as_map().expect("expected a map item");
            assert_eq!(map.len(), entries.len());
            for (key, child) in entries {
                let got = map.get(key.as_bytes()).expect("key must be present");
                assert_node_matches(child, got);
            }
        }
    }
}

proptest! {
    #[test]
    fn reader_never_panics_on_arbitrary_bytes(
        bytes in prop::collection::vec(any::<u8>(), 0..256)
    ) {
        let doc = Reader::new(&bytes);
        // Whatever the verdict, introspection must be safe.
        let _ = doc.is_valid();
        let _ = doc.version();
        let _ = doc.root_array();
        let _ = doc.root_map();
    }

    #[test]
    fn reader_never_panics_on_corrupted_header(
        mut bytes in prop::collection::vec(any::<u8>(), 16..128),
        endian in any::<bool>(),
        version in prop::sample::select(vec![2u16, 3]),
    ) {
        // Force a plausible header so validation gets past the magic and
        // exercises the structural checks on junk offsets.
        let magic: &[u8; 2] = if endian { b"BY" } else { b"YB" };
        bytes[0..2].copy_from_slice(magic);
        let v = if endian { version.to_be_bytes() } else { version.to_le_bytes() };
        bytes[2..4].copy_from_slice(&v);

        let doc = Reader::new(&bytes);
        let _ = doc.is_valid();
    }

    #[test]
    fn built_documents_read_back_exactly(
        root in root_strategy(),
        big_endian in any::<bool>(),
    ) {
        let buf = DocumentBuilder::new().big_endian(big_endian).root(root.clone()).build();
        let doc = Reader::new(&buf);
        prop_assert!(doc.is_valid(), "builder output must validate: {:?}", doc.validate());
        prop_assert_eq!(doc.is_big_endian(), big_endian);

        match &root {
            Node::Array(items) => {
                let array = doc.root_array().expect("root must be an array");
                prop_assert_eq!(array.len(), items.len());
                for (child, got) in items.iter().zip(array.iter()) {
                    assert_node_matches(child, got);
                }
            }
            Node::Map(entries) => {
                let map = doc.root_map().expect("root must be a map");
                prop_assert_eq!(map.len(), entries.len());
                for (key, child) in entries {
                    let got = map.get(key.as_bytes()).expect("key must be present");
                    assert_node_matches(child, got);
                }
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn built_documents_validate_idempotently(root in root_strategy()) {
        let buf = DocumentBuilder::new().root(root).build();
        let first = Reader::new(&buf);
        let second = Reader::new(&buf);
        prop_assert_eq!(first.is_valid(), second.is_valid());
        prop_assert_eq!(first.validate(), second.validate());
    }

    #[test]
    fn truncation_is_never_fatal(root in root_strategy(), cut in 0usize..64) {
        let buf = DocumentBuilder::new().root(root).build();
        let cut = cut.min(buf.len());
        // Truncated documents may or may not validate (a truncated tail
        // might be unreferenced padding), but must never panic.
        let doc = Reader::new(&buf[..buf.len() - cut]);
        let _ = doc.is_valid();
        let _ = doc.root_array().map(|a| a.iter().count());
        let _ = doc.root_map().map(|m| m.iter().count());
    }
}
