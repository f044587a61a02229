//! BYML Format - Core primitives for the BYML binary document format
//!
//! This crate provides the fundamental decoding utilities for BYML documents
//! with no I/O dependencies. It includes:
//!
//! - Magic numbers and constants
//! - The node type tag enumeration
//! - The 16-byte resource header codec
//! - An endian-aware byte cursor
//! - Pure layout arithmetic for containers and string tables
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod cursor;
pub mod error;
pub mod header;
pub mod layout;
pub mod types;

// Re-export commonly used types
pub use cursor::ByteCursor;
pub use error::{BymlError, Result};
pub use header::Header;
pub use layout::{RawCell, RawMapEntry};
pub use types::NodeType;
