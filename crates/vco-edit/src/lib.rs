//! Editable source text with source maps
//!
//! An [`EditBuffer`] holds an immutable original string and records edits
//! against it: insertions, replacements, removals, moves, indentation and
//! trimming. Edits are addressed by offsets into the *original* text, so
//! they can be applied in any order without the caller tracking how
//! earlier edits shifted things. At any point the buffer can render the
//! current text and generate a source map from it back to the original.
//!
//! Internally the original is covered by a chain of [`Chunk`]s that is
//! split on demand at the offsets edits touch.
//!
//! # Example
//!
//! ```rust
//! use vco_edit::{EditBuffer, MapOptions};
//!
//! let mut buffer = EditBuffer::new("problems = 99");
//! buffer.overwrite(0, 8, "answer", Default::default())?;
//! buffer.overwrite(11, 13, "42", Default::default())?;
//! buffer.prepend("var ").append(";");
//! assert_eq!(buffer.to_string(), "var answer = 42;");
//!
//! let map = buffer.generate_map(&MapOptions {
//!     file: Some("out.js".into()),
//!     source: Some("in.js".into()),
//!     include_content: true,
//!     ..Default::default()
//! });
//! assert_eq!(map.sources, vec!["in.js".to_string()]);
//! # Ok::<(), vco_edit::EditError>(())
//! ```

mod buffer;
mod chain;
mod chunk;
mod error;
mod indent;
mod mappings;
mod replace;

pub use buffer::{BufferOptions, EditBuffer, MapOptions, OverwriteOptions, UpdateOptions};
pub use chunk::Chunk;
pub use error::{Anchor, EditError, ErrorKind};
pub use indent::{IndentOptions, guess_indent};
pub use mappings::MappingResolution;
pub use vco_source_map::{DecodedMap, SourceMap};
