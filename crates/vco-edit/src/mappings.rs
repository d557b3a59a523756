//! Turning a chain walk into generated-line segment lists

use std::collections::HashSet;

use vco_source_map::{Location, Segment, SegmentLines};

use crate::chunk::Chunk;

/// How finely unedited text is mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingResolution {
    /// One segment at the start of each chunk and each original line
    #[default]
    Coarse,
    /// One segment per original character
    Hires,
    /// One segment per run of word characters, and one per other character
    Boundary,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Cursor over the generated text, collecting segments line by line
pub(crate) struct Mappings {
    resolution: MappingResolution,
    generated_column: u32,
    raw: SegmentLines,
}

impl Mappings {
    pub(crate) fn new(resolution: MappingResolution) -> Self {
        Mappings {
            resolution,
            generated_column: 0,
            raw: vec![Vec::new()],
        }
    }

    fn push(&mut self, segment: Segment) {
        if let Some(line) = self.raw.last_mut() {
            line.push(segment);
        }
    }

    fn new_line(&mut self) {
        self.raw.push(Vec::new());
        self.generated_column = 0;
    }

    /// Map replaced content back to the start of the range it replaced.
    ///
    /// Each generated line the content starts gets one segment; a trailing
    /// newline only moves the cursor, so the following line is not
    /// attributed to the replaced range.
    pub(crate) fn add_edit(
        &mut self,
        source_index: u32,
        content: &str,
        loc: Location,
        name_index: Option<u32>,
    ) {
        if content.is_empty() {
            return;
        }

        let segment_at = |column: u32| {
            let segment = Segment::mapped(column, source_index, loc.line as u32, loc.column as u32);
            match name_index {
                Some(name) => segment.with_name(name),
                None => segment,
            }
        };

        let mut rest = content;
        while let Some(pos) = rest.find('\n') {
            if pos + 1 >= rest.len() {
                break;
            }
            self.push(segment_at(self.generated_column));
            self.new_line();
            rest = &rest[pos + 1..];
        }

        self.push(segment_at(self.generated_column));
        self.advance(rest);
    }

    /// Map an untouched chunk character by character, emitting segments as
    /// the resolution requires.
    pub(crate) fn add_unedited_chunk(
        &mut self,
        source_index: u32,
        chunk: &Chunk,
        loc: Location,
        forced: &HashSet<usize>,
    ) {
        let mut line = loc.line as u32;
        let mut column = loc.column as u32;
        let mut first = true;
        let mut in_word = false;

        for (i, ch) in chunk.original.chars().enumerate() {
            if ch == '\n' {
                line += 1;
                column = 0;
                self.new_line();
                first = true;
                in_word = false;
                continue;
            }

            let wanted = self.resolution != MappingResolution::Coarse
                || first
                || forced.contains(&(chunk.start + i));
            if wanted {
                let segment = Segment::mapped(self.generated_column, source_index, line, column);
                if self.resolution == MappingResolution::Boundary && is_word_char(ch) {
                    if !in_word {
                        self.push(segment);
                        in_word = true;
                    }
                } else {
                    self.push(segment);
                    in_word = false;
                }
            }

            column += 1;
            self.generated_column += 1;
            first = false;
        }
    }

    /// Move the cursor over inserted text without emitting segments
    pub(crate) fn advance(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let mut lines = text.split('\n');
        let mut last = lines.next().unwrap_or_default();
        for line in lines {
            self.new_line();
            last = line;
        }
        self.generated_column += last.chars().count() as u32;
    }

    pub(crate) fn into_lines(self) -> SegmentLines {
        self.raw
    }
}
