//! BYML Reader - zero-copy random-access lookup into BYML documents
//!
//! A [`Reader`] borrows a byte buffer, validates its structure once, and
//! then hands out lightweight container views and typed items that read
//! straight from the buffer. No parsed tree is materialized.
//!
//! ```
//! use byml_reader::Reader;
//!
//! // An empty little-endian document: header only, root offset 0.
//! let buf = [
//!     0x59, 0x42, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00,
//!     0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
//! ];
//! let doc = Reader::new(&buf);
//! assert!(doc.is_valid());
//! assert!(doc.root_array().is_none());
//! assert!(doc.root_map().is_none());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod reader;
mod validate;
mod value;

pub use reader::Reader;
pub use value::{ArrayIter, ArrayView, Item, MapEntry, MapIter, MapView, Value};

// Re-export the format primitives callers commonly need.
pub use byml_format::{BymlError, Header, NodeType, Result};
