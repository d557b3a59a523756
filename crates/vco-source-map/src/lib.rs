//! Source map values for the component override tooling
//!
//! This crate holds everything about a source map that does not depend on
//! how the generated text was produced: locations, segments, the
//! Base64-VLQ codec for the `mappings` field, and the version 3 map object
//! with its JSON and `data:` URL forms.
//!
//! # Example
//!
//! ```rust
//! use vco_source_map::*;
//!
//! let decoded = DecodedMap {
//!     sources: vec!["input.js".into()],
//!     mappings: vec![vec![Segment::mapped(0, 0, 0, 0)]],
//!     ..Default::default()
//! };
//! let map = SourceMap::from(decoded);
//! assert_eq!(map.mappings, "AAAA");
//! assert!(map.to_url().unwrap().starts_with("data:application/json"));
//! ```

pub mod line_index;
pub mod source_map;
pub mod types;
pub mod utils;
pub mod vlq;

// Re-export main types
pub use line_index::LineIndex;
pub use source_map::{DecodedMap, SourceMap, SourceMapError};
pub use types::{Location, OriginalPosition, Segment, SegmentLines};
pub use utils::{basename, byte_to_char, char_slice, char_to_byte, relative_path};
pub use vlq::{VlqError, decode, encode};
