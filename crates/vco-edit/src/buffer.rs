//! The edit buffer: the public editing surface over a chunk chain

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::Regex;
use vco_source_map::{DecodedMap, LineIndex, SourceMap, basename, char_slice, relative_path};

use crate::chain::ChunkChain;
use crate::chunk::Chunk;
use crate::error::{Anchor, EditError};
use crate::indent::guess_indent;
use crate::mappings::{MappingResolution, Mappings};

static WHITESPACE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());
static WHITESPACE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+$").unwrap());

/// Construction-time settings for an [`EditBuffer`]
#[derive(Debug, Clone, Default)]
pub struct BufferOptions {
    /// Name of the file the text came from
    pub filename: Option<String>,
    /// Added to every position argument before it is used
    pub offset: isize,
    /// Mark the source as ignorable (`x_google_ignoreList`) in generated maps
    pub ignore_list: bool,
    /// Original ranges `indent` leaves alone when no exclusions are given
    pub indent_exclusion_ranges: Option<Vec<(usize, usize)>>,
}

/// Options for [`EditBuffer::overwrite`]
#[derive(Debug, Clone, Copy, Default)]
pub struct OverwriteOptions {
    /// Record the replaced original text in the map's `names`
    pub store_name: bool,
    /// Keep text inserted next to the range instead of discarding it
    pub content_only: bool,
}

/// Options for [`EditBuffer::update`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Record the replaced original text in the map's `names`
    pub store_name: bool,
    /// Also discard text inserted next to the range
    pub overwrite: bool,
}

/// Options for map generation
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    /// Path of the generated file; only its basename is recorded
    pub file: Option<String>,
    /// Path of the original source, made relative to `file`
    pub source: Option<String>,
    /// Embed the original text as `sourcesContent`
    pub include_content: bool,
    pub hires: MappingResolution,
}

/// An immutable original text plus a record of edits against it.
///
/// All positions are character offsets into the original text. Edits can
/// be issued in any order; the buffer keeps track of where every piece of
/// the current text came from, so that it can render the result and a
/// source map back to the original.
///
/// ```
/// use vco_edit::{EditBuffer, MapOptions, MappingResolution};
///
/// let mut buffer = EditBuffer::new("const x = 1;");
/// buffer.overwrite(6, 7, "answer", Default::default())?;
/// buffer.prepend("// generated\n");
/// assert_eq!(buffer.to_string(), "// generated\nconst answer = 1;");
///
/// let map = buffer.generate_map(&MapOptions {
///     hires: MappingResolution::Hires,
///     ..Default::default()
/// });
/// assert_eq!(map.mappings.split(';').count(), 2);
/// # Ok::<(), vco_edit::EditError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EditBuffer {
    original: Arc<str>,
    line_index: Arc<LineIndex>,
    chain: ChunkChain,
    intro: String,
    outro: String,
    filename: Option<String>,
    offset: isize,
    ignore_list: bool,
    indent_exclusion_ranges: Option<Vec<(usize, usize)>>,
    sourcemap_locations: HashSet<usize>,
    stored_names: IndexSet<String>,
    indent_str: OnceCell<Option<String>>,
}

impl EditBuffer {
    pub fn new(original: impl Into<String>) -> Self {
        Self::with_options(original, BufferOptions::default())
    }

    pub fn with_options(original: impl Into<String>, options: BufferOptions) -> Self {
        let original: Arc<str> = Arc::from(original.into());
        let line_index = Arc::new(LineIndex::new(&original));
        let chain = ChunkChain::new(&original, Arc::clone(&line_index));

        EditBuffer {
            original,
            line_index,
            chain,
            intro: String::new(),
            outro: String::new(),
            filename: options.filename,
            offset: options.offset,
            ignore_list: options.ignore_list,
            indent_exclusion_ranges: options.indent_exclusion_ranges,
            sourcemap_locations: HashSet::new(),
            stored_names: IndexSet::new(),
            indent_str: OnceCell::new(),
        }
    }

    /// The text the buffer was created from
    pub fn original(&self) -> &str {
        &self.original
    }

    pub(crate) fn original_arc(&self) -> Arc<str> {
        Arc::clone(&self.original)
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Length of the original text in characters
    pub fn original_len(&self) -> usize {
        self.line_index.total_length()
    }

    /// Chunks in render order
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chain.iter().map(|(_, chunk)| chunk)
    }

    /// Shift by the construction offset and wrap negative positions.
    pub(crate) fn resolve(&self, index: isize) -> Result<usize, EditError> {
        let length = self.original_len();
        let len = length as isize;
        let mut resolved = index
            .checked_add(self.offset)
            .ok_or(EditError::OutOfBounds { index, length })?;
        if len != 0 && resolved < 0 {
            resolved = resolved.rem_euclid(len);
        }
        if resolved < 0 || resolved > len {
            return Err(EditError::OutOfBounds { index, length });
        }
        Ok(resolved as usize)
    }

    fn resolve_range(&self, start: isize, end: isize) -> Result<(usize, usize), EditError> {
        Ok((self.resolve(start)?, self.resolve(end)?))
    }

    /// Always emit a segment for this original offset, whatever the resolution
    pub fn add_sourcemap_location(&mut self, offset: usize) {
        self.sourcemap_locations.insert(offset);
    }

    /// Add text at the very end, outside every original range
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.outro.push_str(text);
        self
    }

    /// Add text at the very start, outside every original range
    pub fn prepend(&mut self, text: &str) -> &mut Self {
        self.intro.insert_str(0, text);
        self
    }

    /// Insert text at `index`, attached to the chunk that ends there.
    ///
    /// Repeated calls at the same index append after earlier insertions.
    pub fn append_left(&mut self, index: isize, text: &str) -> Result<&mut Self, EditError> {
        let index = self.resolve(index)?;
        self.chain.split_at(index)?;
        match self.chain.by_end(index) {
            Some(id) => self.chain.get_mut(id).append_left(text),
            None => self.intro.push_str(text),
        }
        Ok(self)
    }

    /// Insert text at `index`, attached to the chunk that ends there, ahead
    /// of earlier insertions.
    pub fn prepend_left(&mut self, index: isize, text: &str) -> Result<&mut Self, EditError> {
        let index = self.resolve(index)?;
        self.chain.split_at(index)?;
        match self.chain.by_end(index) {
            Some(id) => self.chain.get_mut(id).prepend_left(text),
            None => self.intro.insert_str(0, text),
        }
        Ok(self)
    }

    /// Insert text at `index`, attached to the chunk that starts there.
    pub fn append_right(&mut self, index: isize, text: &str) -> Result<&mut Self, EditError> {
        let index = self.resolve(index)?;
        self.chain.split_at(index)?;
        match self.chain.by_start(index) {
            Some(id) => self.chain.get_mut(id).append_right(text),
            None => self.outro.push_str(text),
        }
        Ok(self)
    }

    /// Insert text at `index`, attached to the chunk that starts there,
    /// ahead of earlier insertions.
    pub fn prepend_right(&mut self, index: isize, text: &str) -> Result<&mut Self, EditError> {
        let index = self.resolve(index)?;
        self.chain.split_at(index)?;
        match self.chain.by_start(index) {
            Some(id) => self.chain.get_mut(id).prepend_right(text),
            None => self.outro.insert_str(0, text),
        }
        Ok(self)
    }

    #[deprecated(note = "use `append_left` instead")]
    pub fn insert_left(&mut self, index: isize, text: &str) -> Result<&mut Self, EditError> {
        self.append_left(index, text)
    }

    #[deprecated(note = "use `prepend_right` instead")]
    pub fn insert_right(&mut self, index: isize, text: &str) -> Result<&mut Self, EditError> {
        self.prepend_right(index, text)
    }

    /// Replace `[start, end)` with `content`.
    ///
    /// Text inserted at either end of the range is discarded unless
    /// `content_only` is set.
    pub fn overwrite(
        &mut self,
        start: isize,
        end: isize,
        content: &str,
        options: OverwriteOptions,
    ) -> Result<&mut Self, EditError> {
        self.update(
            start,
            end,
            content,
            UpdateOptions {
                store_name: options.store_name,
                overwrite: !options.content_only,
            },
        )
    }

    /// Replace `[start, end)` with `content`, keeping inserted text at
    /// either end unless `overwrite` is set.
    pub fn update(
        &mut self,
        start: isize,
        end: isize,
        content: &str,
        options: UpdateOptions,
    ) -> Result<&mut Self, EditError> {
        let (start, end) = self.resolve_range(start, end)?;
        self.update_range(start, end, content, options)?;
        Ok(self)
    }

    pub(crate) fn update_range(
        &mut self,
        start: usize,
        end: usize,
        content: &str,
        options: UpdateOptions,
    ) -> Result<(), EditError> {
        if start == end {
            return Err(EditError::ZeroLengthRange { at: start });
        }
        if start > end {
            return Err(EditError::InvertedRange { start, end });
        }

        self.chain.split_at(start)?;
        self.chain.split_at(end)?;

        if options.store_name {
            self.stored_names
                .insert(char_slice(&self.original, start, end).to_string());
        }

        let bounds = EditError::OutOfBounds {
            index: end as isize,
            length: self.original_len(),
        };
        let first = self.chain.by_start(start).ok_or_else(|| bounds.clone())?;
        let last = self.chain.by_end(end).ok_or(bounds)?;

        let mut current = first;
        while current != last {
            let chunk = self.chain.get(current);
            let next = chunk.next;
            if next.is_none() || next != self.chain.by_start(chunk.end) {
                return Err(EditError::OverwriteAcrossSplit { start, end });
            }
            if let Some(next) = next {
                current = next;
                self.chain.get_mut(current).edit(String::new(), false, false);
            }
        }

        self.chain
            .get_mut(first)
            .edit(content.to_string(), options.store_name, !options.overwrite);
        Ok(())
    }

    /// Remove `[start, end)` together with any text inserted inside it.
    ///
    /// Removing an already removed range is a no-op.
    pub fn remove(&mut self, start: isize, end: isize) -> Result<&mut Self, EditError> {
        let (start, end) = self.resolve_range(start, end)?;
        self.remove_range(start, end)?;
        Ok(self)
    }

    pub(crate) fn remove_range(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        if start == end {
            return Ok(());
        }
        if start > end {
            return Err(EditError::InvertedRange { start, end });
        }

        self.chain.split_at(start)?;
        self.chain.split_at(end)?;

        let mut current = self.chain.by_start(start);
        while let Some(id) = current {
            let chunk = self.chain.get_mut(id);
            chunk.edit(String::new(), false, false);
            let chunk_end = chunk.end;
            current = if end > chunk_end {
                self.chain.by_start(chunk_end)
            } else {
                None
            };
        }
        Ok(())
    }

    /// Undo every edit and insertion within `[start, end)`
    pub fn reset(&mut self, start: isize, end: isize) -> Result<&mut Self, EditError> {
        let (start, end) = self.resolve_range(start, end)?;
        if start == end {
            return Ok(self);
        }
        if start > end {
            return Err(EditError::InvertedRange { start, end });
        }

        self.chain.split_at(start)?;
        self.chain.split_at(end)?;

        let mut current = self.chain.by_start(start);
        while let Some(id) = current {
            let chunk = self.chain.get_mut(id);
            chunk.reset();
            let chunk_end = chunk.end;
            current = if end > chunk_end {
                self.chain.by_start(chunk_end)
            } else {
                None
            };
        }
        Ok(self)
    }

    /// Move `[start, end)` so it renders just before original offset `index`
    pub fn move_range(
        &mut self,
        start: isize,
        end: isize,
        index: isize,
    ) -> Result<&mut Self, EditError> {
        let (start, end) = self.resolve_range(start, end)?;
        let index = self.resolve(index)?;
        if index >= start && index <= end {
            return Err(EditError::MoveInsideSelf { start, end, index });
        }
        if start > end {
            return Err(EditError::InvertedRange { start, end });
        }
        if start == end {
            return Ok(self);
        }

        self.chain.split_at(start)?;
        self.chain.split_at(end)?;
        self.chain.split_at(index)?;
        self.chain.move_range(start, end, index)?;
        Ok(self)
    }

    /// Render the current text between two original offsets.
    ///
    /// Text inserted at the edges is included when it belongs to the
    /// inside of the range. Either anchor landing inside replaced content
    /// is an error.
    pub fn slice(&self, start: isize, end: isize) -> Result<String, EditError> {
        let (start, end) = self.resolve_range(start, end)?;
        self.slice_range(start, end)
    }

    /// [`EditBuffer::slice`] through to the end of the original
    pub fn slice_from(&self, start: isize) -> Result<String, EditError> {
        let start = self.resolve(start)?;
        self.slice_range(start, self.original_len())
    }

    fn slice_range(&self, start: usize, end: usize) -> Result<String, EditError> {
        if start > end {
            return Err(EditError::InvertedRange { start, end });
        }
        let mut result = String::new();

        let mut current = Some(self.chain.first());
        while let Some(id) = current {
            let chunk = self.chain.get(id);
            if chunk.start <= start && start < chunk.end {
                break;
            }
            if chunk.start < end && chunk.end >= end {
                return Ok(result);
            }
            current = chunk.next;
        }

        if let Some(id) = current {
            let chunk = self.chain.get(id);
            if chunk.edited && chunk.start != start {
                return Err(EditError::SliceAnchor {
                    index: start,
                    anchor: Anchor::Start,
                });
            }
        }

        let start_chunk = current;
        while let Some(id) = current {
            let chunk = self.chain.get(id);
            let is_start = start_chunk == Some(id);

            if !chunk.intro.is_empty() && (!is_start || chunk.start == start) {
                result.push_str(&chunk.intro);
            }

            let contains_end = chunk.start < end && chunk.end >= end;
            if contains_end && chunk.edited && chunk.end != end {
                return Err(EditError::SliceAnchor {
                    index: end,
                    anchor: Anchor::End,
                });
            }

            let content_len = chunk.content.chars().count();
            let slice_start = if is_start { start - chunk.start } else { 0 };
            let slice_end = if contains_end {
                content_len.saturating_sub(chunk.end - end)
            } else {
                content_len
            };
            result.push_str(char_slice(&chunk.content, slice_start, slice_end));

            if !chunk.outro.is_empty() && (!contains_end || chunk.end == end) {
                result.push_str(&chunk.outro);
            }

            if contains_end {
                break;
            }
            current = chunk.next;
        }

        Ok(result)
    }

    /// A copy of the buffer with everything outside `[start, end)` removed
    pub fn snip(&self, start: isize, end: isize) -> Result<EditBuffer, EditError> {
        let (start, end) = self.resolve_range(start, end)?;
        if start > end {
            return Err(EditError::InvertedRange { start, end });
        }
        let mut clone = self.clone();
        clone.remove_range(0, start)?;
        clone.remove_range(end, clone.original_len())?;
        Ok(clone)
    }

    /// Strip leading and trailing whitespace from the rendered text
    pub fn trim(&mut self) -> &mut Self {
        self.trim_start_with(&WHITESPACE_START);
        self.trim_end_with(&WHITESPACE_END);
        self
    }

    pub fn trim_start(&mut self) -> &mut Self {
        self.trim_start_with(&WHITESPACE_START);
        self
    }

    pub fn trim_end(&mut self) -> &mut Self {
        self.trim_end_with(&WHITESPACE_END);
        self
    }

    /// Strip leading and trailing blank lines
    pub fn trim_lines(&mut self) -> &mut Self {
        static LINES_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\r\n]+").unwrap());
        static LINES_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+$").unwrap());
        self.trim_start_with(&LINES_START);
        self.trim_end_with(&LINES_END);
        self
    }

    /// Strip repetitions of `pattern` (a regex fragment such as `[\r\n]`)
    /// from both ends
    pub fn trim_pattern(&mut self, pattern: &str) -> Result<&mut Self, EditError> {
        self.trim_start_pattern(pattern)?;
        self.trim_end_pattern(pattern)
    }

    pub fn trim_start_pattern(&mut self, pattern: &str) -> Result<&mut Self, EditError> {
        let rx = compile_trim_pattern(&format!("^(?:{pattern})+"))?;
        self.trim_start_with(&rx);
        Ok(self)
    }

    pub fn trim_end_pattern(&mut self, pattern: &str) -> Result<&mut Self, EditError> {
        let rx = compile_trim_pattern(&format!("(?:{pattern})+$"))?;
        self.trim_end_with(&rx);
        Ok(self)
    }

    /// Returns true if trimming stopped at non-matching text
    fn trim_start_with(&mut self, rx: &Regex) -> bool {
        self.intro = rx.replace(&self.intro, "").into_owned();
        if !self.intro.is_empty() {
            return true;
        }

        let mut current = Some(self.chain.first());
        while let Some(id) = current {
            if self.chain.trim_chunk_start(id, rx) {
                return true;
            }
            current = self.chain.get(id).next;
        }

        self.outro = rx.replace(&self.outro, "").into_owned();
        !self.outro.is_empty()
    }

    fn trim_end_with(&mut self, rx: &Regex) -> bool {
        self.outro = rx.replace(&self.outro, "").into_owned();
        if !self.outro.is_empty() {
            return true;
        }

        let mut current = Some(self.chain.last());
        while let Some(id) = current {
            if self.chain.trim_chunk_end(id, rx) {
                return true;
            }
            current = self.chain.get(id).previous;
        }

        self.intro = rx.replace(&self.intro, "").into_owned();
        !self.intro.is_empty()
    }

    /// Last character of the rendered text
    pub fn last_char(&self) -> Option<char> {
        if let Some(ch) = self.outro.chars().last() {
            return Some(ch);
        }
        let mut current = Some(self.chain.last());
        while let Some(id) = current {
            let chunk = self.chain.get(id);
            for part in [&chunk.outro, &chunk.content, &chunk.intro] {
                if let Some(ch) = part.chars().last() {
                    return Some(ch);
                }
            }
            current = chunk.previous;
        }
        self.intro.chars().last()
    }

    /// Rendered text after the last newline
    pub fn last_line(&self) -> String {
        let mut line = String::new();
        let mut collect = |part: &str| -> bool {
            match part.rfind('\n') {
                Some(pos) => {
                    line.insert_str(0, &part[pos + 1..]);
                    true
                }
                None => {
                    line.insert_str(0, part);
                    false
                }
            }
        };

        if collect(&self.outro) {
            return line;
        }
        let mut current = Some(self.chain.last());
        while let Some(id) = current {
            let chunk = self.chain.get(id);
            for part in [&chunk.outro, &chunk.content, &chunk.intro] {
                if collect(part) {
                    return line;
                }
            }
            current = chunk.previous;
        }
        collect(&self.intro);
        line
    }

    /// True if the rendered text is empty or whitespace only
    pub fn is_empty(&self) -> bool {
        self.intro.trim().is_empty()
            && self.outro.trim().is_empty()
            && self.chunks().all(|chunk| {
                chunk.intro.trim().is_empty()
                    && chunk.content.trim().is_empty()
                    && chunk.outro.trim().is_empty()
            })
    }

    /// Length of the rendered text in characters
    pub fn len(&self) -> usize {
        self.intro.chars().count()
            + self.chunks().map(Chunk::rendered_len).sum::<usize>()
            + self.outro.chars().count()
    }

    pub fn has_changed(&self) -> bool {
        *self.original != self.to_string()
    }

    /// The indentation the original text appears to use, tab by default
    pub fn get_indent_string(&self) -> &str {
        self.raw_indent_string().unwrap_or("\t")
    }

    pub(crate) fn raw_indent_string(&self) -> Option<&str> {
        self.indent_str
            .get_or_init(|| guess_indent(&self.original))
            .as_deref()
    }

    pub(crate) fn indent_exclusion_ranges(&self) -> Option<&[(usize, usize)]> {
        self.indent_exclusion_ranges.as_deref()
    }

    pub(crate) fn chain_mut(&mut self) -> &mut ChunkChain {
        &mut self.chain
    }

    pub(crate) fn edges_mut(&mut self) -> (&mut String, &mut String) {
        (&mut self.intro, &mut self.outro)
    }

    /// Build the segment table for the current state of the buffer
    pub fn generate_decoded_map(&self, options: &MapOptions) -> DecodedMap {
        let source_index = 0;
        let names: Vec<String> = self.stored_names.iter().cloned().collect();
        let mut mappings = Mappings::new(options.hires);

        mappings.advance(&self.intro);
        for (_, chunk) in self.chain.iter() {
            let loc = self.line_index.locate_saturating(chunk.start);
            mappings.advance(&chunk.intro);
            if chunk.edited {
                let name_index = if chunk.store_name {
                    self.stored_names
                        .get_index_of(&chunk.original)
                        .map(|idx| idx as u32)
                } else {
                    None
                };
                mappings.add_edit(source_index, &chunk.content, loc, name_index);
            } else {
                mappings.add_unedited_chunk(source_index, chunk, loc, &self.sourcemap_locations);
            }
            mappings.advance(&chunk.outro);
        }
        mappings.advance(&self.outro);

        let source = match (&options.source, &options.file) {
            (Some(source), file) => relative_path(file.as_deref().unwrap_or_default(), source),
            (None, Some(file)) => file.clone(),
            (None, None) => String::new(),
        };

        DecodedMap {
            file: options.file.as_deref().map(|f| basename(f).to_string()),
            sources: vec![source],
            sources_content: options
                .include_content
                .then(|| vec![self.original.to_string()]),
            names,
            mappings: mappings.into_lines(),
            x_google_ignore_list: self.ignore_list.then(|| vec![source_index]),
        }
    }

    /// Build the encoded source map for the current state of the buffer
    pub fn generate_map(&self, options: &MapOptions) -> SourceMap {
        let decoded = self.generate_decoded_map(options);
        tracing::debug!(
            lines = decoded.mappings.len(),
            names = decoded.names.len(),
            "generated source map"
        );
        SourceMap::from(decoded)
    }
}

fn compile_trim_pattern(pattern: &str) -> Result<Regex, EditError> {
    Regex::new(pattern).map_err(|e| EditError::InvalidPattern(e.to_string()))
}

impl fmt::Display for EditBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.intro)?;
        for (_, chunk) in self.chain.iter() {
            write!(f, "{}", chunk)?;
        }
        f.write_str(&self.outro)
    }
}
