#![no_main]

use byml_reader::{ArrayView, Item, MapView, Reader, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let doc = Reader::new(data);
    if !doc.is_valid() {
        // The typed diagnostic must agree with the boolean verdict.
        assert!(doc.validate().is_err());
        assert!(doc.root_array().is_none());
        assert!(doc.root_map().is_none());
        return;
    }

    assert!(doc.validate().is_ok());
    if let Some(array) = doc.root_array() {
        walk_array(array);
    }
    if let Some(map) = doc.root_map() {
        walk_map(map);
    }
});

// On a validated document every reachable item must resolve without
// panicking or reading out of bounds.
fn walk_item(item: Item<'_>) {
    let _ = item.as_bool();
    let _ = item.as_int();
    let _ = item.as_uint();
    let _ = item.as_float();
    let _ = item.as_int64();
    let _ = item.as_uint64();
    let _ = item.as_double();
    let _ = item.as_string();
    let _ = item.as_str();

    match item.value() {
        Value::Array(array) => walk_array(array),
        Value::Map(map) => walk_map(map),
        _ => {}
    }
}

fn walk_array(array: ArrayView<'_>) {
    assert_eq!(array.iter().count(), array.len());
    for item in array.iter() {
        walk_item(item);
    }
}

fn walk_map(map: MapView<'_>) {
    assert_eq!(map.iter().count(), map.len());
    for entry in map.iter() {
        // Key lookup round trip: looking up a stored key must succeed.
        assert!(map.get(entry.key).is_some() || !keys_sorted(&map));
        walk_item(entry.item);
    }
}

// Sortedness is not part of validation, so binary search is only
// guaranteed to find keys when the entries really are sorted.
fn keys_sorted(map: &MapView<'_>) -> bool {
    let keys: Vec<&[u8]> = map.keys().collect();
    keys.windows(2).all(|pair| pair[0] <= pair[1])
}
