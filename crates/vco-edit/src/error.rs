//! Error types for buffer edits

use std::fmt;

use thiserror::Error;

/// Which side of a slice an anchor is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    End,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Start => f.write_str("start"),
            Anchor::End => f.write_str("end"),
        }
    }
}

/// Broad classification of an [`EditError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The call itself was malformed
    InvalidArgument,
    /// The call contradicts an earlier edit
    ConflictingEdit,
    /// An offset fell outside the original text
    OutOfBounds,
}

/// Errors that can occur while editing a buffer
///
/// The buffer is left in an unspecified state after an error and should
/// not be used further.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Character {index} is out of bounds (original length {length})")]
    OutOfBounds { index: isize, length: usize },

    #[error(
        "Cannot overwrite a zero-length range at {at} – use append_left or prepend_right instead"
    )]
    ZeroLengthRange { at: usize },

    #[error("end ({end}) must be greater than start ({start})")]
    InvertedRange { start: usize, end: usize },

    #[error("Cannot move a selection inside itself ({start}..{end} to {index})")]
    MoveInsideSelf {
        start: usize,
        end: usize,
        index: usize,
    },

    #[error("Cannot split a chunk that has already been edited ({line}:{column} – \"{original}\")")]
    SplitEditedChunk {
        line: usize,
        column: usize,
        original: String,
    },

    #[error("Cannot overwrite across a split point ({start}..{end})")]
    OverwriteAcrossSplit { start: usize, end: usize },

    #[error("Cannot move a range that earlier moves have split apart ({start}..{end})")]
    MoveAcrossSplit { start: usize, end: usize },

    #[error("Cannot use replaced character {index} as slice {anchor} anchor.")]
    SliceAnchor { index: usize, anchor: Anchor },

    #[error("Invalid trim pattern: {0}")]
    InvalidPattern(String),
}

impl EditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            EditError::ZeroLengthRange { .. }
            | EditError::InvertedRange { .. }
            | EditError::MoveInsideSelf { .. }
            | EditError::InvalidPattern(_) => ErrorKind::InvalidArgument,
            EditError::SplitEditedChunk { .. }
            | EditError::OverwriteAcrossSplit { .. }
            | EditError::MoveAcrossSplit { .. }
            | EditError::SliceAnchor { .. } => ErrorKind::ConflictingEdit,
        }
    }
}
