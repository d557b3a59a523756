//! Character-offset to line/column lookups

use crate::types::Location;
use serde::{Deserialize, Serialize};

/// Index of line break positions for a piece of text
///
/// Offsets are character (Unicode scalar) offsets, matching the offsets
/// used by the edit buffer. The text itself is not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineIndex {
    /// Character offsets of each newline character
    line_breaks: Vec<usize>,

    /// Total length of the text in characters
    total_length: usize,
}

impl LineIndex {
    /// Scan `text` once and record where each line ends.
    ///
    /// # Example
    ///
    /// ```
    /// use vco_source_map::LineIndex;
    ///
    /// let index = LineIndex::new("hello\nworld");
    /// let loc = index.locate(6).unwrap();
    /// assert_eq!(loc.line, 1);
    /// assert_eq!(loc.column, 0);
    /// ```
    pub fn new(text: &str) -> Self {
        let mut line_breaks = Vec::new();
        let mut total_length = 0;
        for (idx, ch) in text.chars().enumerate() {
            if ch == '\n' {
                line_breaks.push(idx);
            }
            total_length += 1;
        }

        LineIndex {
            line_breaks,
            total_length,
        }
    }

    /// Convert a character offset to a [`Location`].
    ///
    /// Runs in O(log n) in the number of lines. Returns None if the offset
    /// is past the end of the text.
    pub fn locate(&self, offset: usize) -> Option<Location> {
        if offset > self.total_length {
            return None;
        }
        Some(self.locate_saturating(offset))
    }

    /// Like [`LineIndex::locate`], but clamps offsets past the end
    pub fn locate_saturating(&self, offset: usize) -> Location {
        let offset = offset.min(self.total_length);
        // A newline belongs to the line it terminates
        let line = match self.line_breaks.binary_search(&offset) {
            Ok(idx) | Err(idx) => idx,
        };
        let line_start = match line {
            0 => 0,
            _ => self.line_breaks[line - 1] + 1,
        };

        Location {
            offset,
            line,
            column: offset - line_start,
        }
    }

    /// Total length of the indexed text in characters
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Number of lines (a text with n newlines has n + 1 lines)
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }
}
