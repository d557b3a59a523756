//! A span of the original text and what currently stands in for it

use std::fmt;

use vco_source_map::char_to_byte;

/// Index of a chunk in its chain's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub(crate) usize);

/// A contiguous range `[start, end)` of the original text.
///
/// `original` never changes once the chunk exists; `content` is what is
/// rendered in its place. `intro` and `outro` hold text inserted right
/// before and after the chunk, and survive content-only edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) original: String,
    pub(crate) intro: String,
    pub(crate) outro: String,
    pub(crate) content: String,
    pub(crate) store_name: bool,
    pub(crate) edited: bool,
    pub(crate) previous: Option<ChunkId>,
    pub(crate) next: Option<ChunkId>,
}

impl Chunk {
    pub(crate) fn new(start: usize, end: usize, content: impl Into<String>) -> Self {
        let content = content.into();
        Chunk {
            start,
            end,
            original: content.clone(),
            intro: String::new(),
            outro: String::new(),
            content,
            store_name: false,
            edited: false,
            previous: None,
            next: None,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn intro(&self) -> &str {
        &self.intro
    }

    pub fn outro(&self) -> &str {
        &self.outro
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn stores_name(&self) -> bool {
        self.store_name
    }

    /// True if `index` lies strictly inside the chunk
    pub fn contains(&self, index: usize) -> bool {
        self.start < index && index < self.end
    }

    pub(crate) fn append_left(&mut self, text: &str) {
        self.outro.push_str(text);
    }

    pub(crate) fn append_right(&mut self, text: &str) {
        self.intro.push_str(text);
    }

    pub(crate) fn prepend_left(&mut self, text: &str) {
        self.outro.insert_str(0, text);
    }

    pub(crate) fn prepend_right(&mut self, text: &str) {
        self.intro.insert_str(0, text);
    }

    /// Replace the content. A full edit also drops intro and outro.
    pub(crate) fn edit(&mut self, content: String, store_name: bool, content_only: bool) {
        self.content = content;
        if !content_only {
            self.intro.clear();
            self.outro.clear();
        }
        self.store_name = store_name;
        self.edited = true;
    }

    pub(crate) fn reset(&mut self) {
        self.intro.clear();
        self.outro.clear();
        if self.edited {
            self.content = self.original.clone();
            self.store_name = false;
            self.edited = false;
        }
    }

    /// Cut the chunk at original offset `index`, returning the tail.
    ///
    /// The outro moves to the tail. An edited chunk splits into two empty
    /// edited halves. Links are left for the chain to wire up, except that
    /// the tail inherits `next`.
    pub(crate) fn split_off(&mut self, index: usize) -> Chunk {
        debug_assert!(self.contains(index));
        let byte = char_to_byte(&self.original, index - self.start);
        let original_after = self.original.split_off(byte);

        let mut tail = Chunk::new(index, self.end, original_after);
        tail.outro = std::mem::take(&mut self.outro);
        tail.next = self.next;
        self.end = index;

        if self.edited {
            tail.edit(String::new(), false, true);
            self.content.clear();
        } else {
            self.content = self.original.clone();
        }

        tail
    }

    /// Number of characters this chunk renders to
    pub(crate) fn rendered_len(&self) -> usize {
        self.intro.chars().count() + self.content.chars().count() + self.outro.chars().count()
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.intro)?;
        f.write_str(&self.content)?;
        f.write_str(&self.outro)
    }
}
