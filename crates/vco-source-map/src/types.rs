//! Core types for source mapping

use serde::{Deserialize, Serialize};

/// A location in source text (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Character offset from start of source
    pub offset: usize,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub column: usize,
}

/// The original side of a [`Segment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginalPosition {
    /// Index into the map's `sources` array
    pub source_index: u32,
    /// Line in the original source (0-indexed)
    pub line: u32,
    /// Column in the original source (0-indexed)
    pub column: u32,
    /// Index into the map's `names` array
    pub name_index: Option<u32>,
}

/// One mapping record on a generated line.
///
/// A segment without an original position marks generated text that has no
/// counterpart in the source. Encoded, that is a 1-field segment; with an
/// original position it has 4 fields, or 5 when a name is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Column in the generated line (0-indexed)
    pub generated_column: u32,
    /// Where this generated column came from
    pub original: Option<OriginalPosition>,
}

impl Segment {
    /// A segment with no original counterpart
    pub fn generated(generated_column: u32) -> Self {
        Segment {
            generated_column,
            original: None,
        }
    }

    /// A segment pointing into source `source_index` at `line:column`
    pub fn mapped(generated_column: u32, source_index: u32, line: u32, column: u32) -> Self {
        Segment {
            generated_column,
            original: Some(OriginalPosition {
                source_index,
                line,
                column,
                name_index: None,
            }),
        }
    }

    /// Attach a name index. Has no effect on a generated-only segment.
    pub fn with_name(mut self, name_index: u32) -> Self {
        if let Some(original) = self.original.as_mut() {
            original.name_index = Some(name_index);
        }
        self
    }

    /// Number of fields this segment occupies when encoded (1, 4 or 5)
    pub fn field_count(&self) -> usize {
        match &self.original {
            None => 1,
            Some(OriginalPosition {
                name_index: None, ..
            }) => 4,
            Some(_) => 5,
        }
    }
}

/// Decoded mappings: one list of segments per generated line
pub type SegmentLines = Vec<Vec<Segment>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering() {
        let loc1 = Location {
            offset: 0,
            line: 0,
            column: 0,
        };
        let loc2 = Location {
            offset: 5,
            line: 0,
            column: 5,
        };
        let loc3 = Location {
            offset: 10,
            line: 1,
            column: 0,
        };

        assert!(loc1 < loc2);
        assert!(loc2 < loc3);
        assert!(loc1 < loc3);
    }

    #[test]
    fn test_segment_field_count() {
        assert_eq!(Segment::generated(3).field_count(), 1);
        assert_eq!(Segment::mapped(0, 0, 1, 2).field_count(), 4);
        assert_eq!(Segment::mapped(0, 0, 1, 2).with_name(0).field_count(), 5);
    }

    #[test]
    fn test_with_name_on_generated_segment_is_ignored() {
        let segment = Segment::generated(7).with_name(2);
        assert_eq!(segment, Segment::generated(7));
    }

    #[test]
    fn test_serialization_location() {
        let loc = Location {
            offset: 100,
            line: 5,
            column: 10,
        };
        let json = serde_json::to_string(&loc).unwrap();
        let deserialized: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, deserialized);
    }
}
