//! The ordered chain of chunks and its offset indices
//!
//! Chunks live in an arena and refer to their neighbours by [`ChunkId`].
//! Two maps index chunks by their start and end offsets; together with the
//! chain links they always describe a cover of `[0, len)` with no gaps or
//! overlaps. Chain order can differ from offset order after a move, so
//! lookups by offset go through the indices rather than the links.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use vco_source_map::LineIndex;

use crate::chunk::{Chunk, ChunkId};
use crate::error::EditError;

#[derive(Debug, Clone)]
pub(crate) struct ChunkChain {
    chunks: Vec<Chunk>,
    first: ChunkId,
    last: ChunkId,
    last_searched: ChunkId,
    by_start: HashMap<usize, ChunkId>,
    by_end: HashMap<usize, ChunkId>,
    line_index: Arc<LineIndex>,
}

impl ChunkChain {
    pub(crate) fn new(original: &str, line_index: Arc<LineIndex>) -> Self {
        let len = line_index.total_length();
        let head = ChunkId(0);
        let mut by_start = HashMap::new();
        let mut by_end = HashMap::new();
        by_start.insert(0, head);
        by_end.insert(len, head);

        ChunkChain {
            chunks: vec![Chunk::new(0, len, original)],
            first: head,
            last: head,
            last_searched: head,
            by_start,
            by_end,
            line_index,
        }
    }

    pub(crate) fn get(&self, id: ChunkId) -> &Chunk {
        &self.chunks[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: ChunkId) -> &mut Chunk {
        &mut self.chunks[id.0]
    }

    pub(crate) fn first(&self) -> ChunkId {
        self.first
    }

    pub(crate) fn last(&self) -> ChunkId {
        self.last
    }

    pub(crate) fn by_start(&self, offset: usize) -> Option<ChunkId> {
        self.by_start.get(&offset).copied()
    }

    pub(crate) fn by_end(&self, offset: usize) -> Option<ChunkId> {
        self.by_end.get(&offset).copied()
    }

    /// Chunks in chain (render) order
    pub(crate) fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            chain: self,
            current: Some(self.first),
        }
    }

    /// Find the chunk strictly containing `offset`, walking outward from
    /// the last chunk searched.
    fn locate(&self, offset: usize) -> Option<ChunkId> {
        let mut current = Some(self.last_searched);
        let forward = offset > self.get(self.last_searched).end;

        while let Some(id) = current {
            let chunk = self.get(id);
            if chunk.contains(offset) {
                return Some(id);
            }
            let next = if forward {
                self.by_start(chunk.end)
            } else {
                self.by_end(chunk.start)
            };
            // An empty original is a single zero-length chunk indexed both ways
            if next == Some(id) {
                return None;
            }
            current = next;
        }

        None
    }

    /// Ensure `offset` is a chunk boundary.
    pub(crate) fn split_at(&mut self, offset: usize) -> Result<(), EditError> {
        if self.by_start.contains_key(&offset) || self.by_end.contains_key(&offset) {
            return Ok(());
        }

        match self.locate(offset) {
            Some(id) => self.split_chunk(id, offset).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Split `id` at `offset`, refusing to cut through replaced content.
    pub(crate) fn split_chunk(&mut self, id: ChunkId, offset: usize) -> Result<ChunkId, EditError> {
        let chunk = self.get(id);
        if chunk.edited && !chunk.content.is_empty() {
            let location = self.line_index.locate_saturating(offset);
            return Err(EditError::SplitEditedChunk {
                line: location.line,
                column: location.column,
                original: chunk.original.clone(),
            });
        }

        Ok(self.split_unchecked(id, offset))
    }

    fn split_unchecked(&mut self, id: ChunkId, offset: usize) -> ChunkId {
        let tail = self.chunks[id.0].split_off(offset);
        let tail_end = tail.end;
        let tail_next = tail.next;
        let tail_id = ChunkId(self.chunks.len());
        self.chunks.push(tail);

        if let Some(next) = tail_next {
            self.get_mut(next).previous = Some(tail_id);
        }
        self.get_mut(tail_id).previous = Some(id);
        self.get_mut(id).next = Some(tail_id);

        self.by_end.insert(offset, id);
        self.by_start.insert(offset, tail_id);
        self.by_end.insert(tail_end, tail_id);

        if id == self.last {
            self.last = tail_id;
        }
        self.last_searched = id;

        tracing::trace!(offset, chunks = self.chunks.len(), "split chunk");
        tail_id
    }

    /// Relink the chunks covering `[start, end)` in front of the chunk
    /// starting at `index` (or at the tail if none does). All three offsets
    /// must already be boundaries, and the chunks covering the range must
    /// still be adjacent in chain order.
    pub(crate) fn move_range(
        &mut self,
        start: usize,
        end: usize,
        index: usize,
    ) -> Result<(), EditError> {
        let (Some(first), Some(last)) = (self.by_start(start), self.by_end(end)) else {
            return Ok(());
        };

        let mut current = first;
        while current != last {
            let chunk = self.get(current);
            match chunk.next {
                Some(next) if Some(next) == self.by_start(chunk.end) => current = next,
                _ => return Err(EditError::MoveAcrossSplit { start, end }),
            }
        }

        let old_left = self.get(first).previous;
        let old_right = self.get(last).next;
        let new_right = self.by_start(index);
        if new_right.is_none() && last == self.last {
            return Ok(());
        }
        let new_left = match new_right {
            Some(right) => self.get(right).previous,
            None => Some(self.last),
        };
        // Already in place
        if new_left == Some(last) {
            return Ok(());
        }

        if let Some(left) = old_left {
            self.get_mut(left).next = old_right;
        }
        if let Some(right) = old_right {
            self.get_mut(right).previous = old_left;
        }
        if let Some(left) = new_left {
            self.get_mut(left).next = Some(first);
        }
        if let Some(right) = new_right {
            self.get_mut(right).previous = Some(last);
        }

        if old_left.is_none() {
            if let Some(right) = old_right {
                self.first = right;
            }
        }
        if old_right.is_none() {
            if let Some(left) = old_left {
                self.last = left;
                self.get_mut(left).next = None;
            }
        }

        self.get_mut(first).previous = new_left;
        self.get_mut(last).next = new_right;

        if new_left.is_none() {
            self.first = first;
        }
        if new_right.is_none() {
            self.last = last;
        }

        tracing::trace!(start, end, index, "moved range");
        Ok(())
    }

    /// Trim the end of a single chunk. Returns true once non-matching text
    /// remains, meaning trimming should stop.
    pub(crate) fn trim_chunk_end(&mut self, id: ChunkId, pattern: &Regex) -> bool {
        let chunk = self.get_mut(id);
        chunk.outro = pattern.replace(&chunk.outro, "").into_owned();
        if !chunk.outro.is_empty() {
            return true;
        }

        let trimmed = pattern.replace(&chunk.content, "").into_owned();
        if trimmed.is_empty() {
            chunk.edit(String::new(), false, true);
            chunk.intro = pattern.replace(&chunk.intro, "").into_owned();
            return !chunk.intro.is_empty();
        }

        if trimmed != chunk.content {
            if chunk.edited {
                let store_name = chunk.store_name;
                chunk.edit(trimmed, store_name, true);
            } else {
                let at = chunk.start + trimmed.chars().count();
                let tail = self.split_unchecked(id, at);
                self.get_mut(tail).edit(String::new(), false, true);
            }
        }
        true
    }

    /// Trim the start of a single chunk; see [`ChunkChain::trim_chunk_end`].
    pub(crate) fn trim_chunk_start(&mut self, id: ChunkId, pattern: &Regex) -> bool {
        let chunk = self.get_mut(id);
        chunk.intro = pattern.replace(&chunk.intro, "").into_owned();
        if !chunk.intro.is_empty() {
            return true;
        }

        let trimmed = pattern.replace(&chunk.content, "").into_owned();
        if trimmed.is_empty() {
            chunk.edit(String::new(), false, true);
            chunk.outro = pattern.replace(&chunk.outro, "").into_owned();
            return !chunk.outro.is_empty();
        }

        if trimmed != chunk.content {
            if chunk.edited {
                let store_name = chunk.store_name;
                chunk.edit(trimmed, store_name, true);
            } else {
                let at = chunk.end - trimmed.chars().count();
                self.split_unchecked(id, at);
                self.get_mut(id).edit(String::new(), false, true);
            }
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut covered = Vec::new();
        for (id, chunk) in self.iter() {
            assert_eq!(self.by_start(chunk.start), Some(id));
            assert_eq!(self.by_end(chunk.end), Some(id));
            covered.push((chunk.start, chunk.end));
        }
        covered.sort_unstable();
        let mut expected_start = 0;
        for (start, end) in covered {
            assert_eq!(start, expected_start, "gap or overlap at {}", start);
            expected_start = end;
        }
        assert_eq!(expected_start, self.line_index.total_length());
    }
}

/// Iterator over a chain in render order
pub(crate) struct ChainIter<'a> {
    chain: &'a ChunkChain,
    current: Option<ChunkId>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (ChunkId, &'a Chunk);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let chunk = self.chain.get(id);
        self.current = chunk.next;
        Some((id, chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(text: &str) -> ChunkChain {
        ChunkChain::new(text, Arc::new(LineIndex::new(text)))
    }

    fn render(chain: &ChunkChain) -> String {
        chain.iter().map(|(_, c)| c.to_string()).collect()
    }

    #[test]
    fn test_split_updates_indices() {
        let mut c = chain("abcdef");
        c.split_at(2).unwrap();
        c.split_at(4).unwrap();
        c.assert_consistent();

        let spans: Vec<_> = c.iter().map(|(_, ch)| (ch.start, ch.end)).collect();
        assert_eq!(spans, vec![(0, 2), (2, 4), (4, 6)]);
        assert_eq!(c.get(c.last()).start, 4);
    }

    #[test]
    fn test_split_backwards_from_last_searched() {
        let mut c = chain("abcdefgh");
        c.split_at(6).unwrap();
        c.split_at(1).unwrap();
        c.split_at(3).unwrap();
        c.assert_consistent();
        assert_eq!(render(&c), "abcdefgh");
        assert_eq!(c.iter().count(), 4);
    }

    #[test]
    fn test_split_at_boundary_is_noop() {
        let mut c = chain("abc");
        c.split_at(0).unwrap();
        c.split_at(3).unwrap();
        assert_eq!(c.iter().count(), 1);
    }

    #[test]
    fn test_split_empty_original() {
        let mut c = chain("");
        c.split_at(0).unwrap();
        assert_eq!(c.iter().count(), 1);
        c.assert_consistent();
    }

    #[test]
    fn test_split_edited_chunk_fails() {
        let mut c = chain("ab\ncdef");
        let id = c.first();
        c.get_mut(id).edit("x".to_string(), false, false);
        let err = c.split_at(4).unwrap_err();
        assert_eq!(
            err,
            EditError::SplitEditedChunk {
                line: 1,
                column: 1,
                original: "ab\ncdef".to_string()
            }
        );
    }

    #[test]
    fn test_move_to_front() {
        let mut c = chain("abcdef");
        for at in [2, 4] {
            c.split_at(at).unwrap();
        }
        c.move_range(4, 6, 0).unwrap();
        assert_eq!(render(&c), "efabcd");
        assert_eq!(c.get(c.first()).start, 4);
        assert_eq!(c.get(c.last()).start, 2);
        c.assert_consistent();
    }

    #[test]
    fn test_move_in_front_of_current_successor() {
        let mut c = chain("abcdef");
        for at in [2, 4] {
            c.split_at(at).unwrap();
        }
        c.move_range(4, 6, 0).unwrap();
        c.move_range(4, 6, 0).unwrap();
        assert_eq!(render(&c), "efabcd");
        c.assert_consistent();
    }

    #[test]
    fn test_move_to_end() {
        let mut c = chain("abcdef");
        c.split_at(2).unwrap();
        c.move_range(0, 2, 6).unwrap();
        assert_eq!(render(&c), "cdefab");
        c.assert_consistent();
    }

    #[test]
    fn test_trim_end_splits_unedited_chunk() {
        let mut c = chain("abc  ");
        let pattern = Regex::new(r"\s+$").unwrap();
        assert!(c.trim_chunk_end(c.first(), &pattern));
        assert_eq!(render(&c), "abc");
        assert_eq!(c.iter().count(), 2);
        c.assert_consistent();
    }

    #[test]
    fn test_trim_start_splits_unedited_chunk() {
        let mut c = chain("  abc");
        let pattern = Regex::new(r"^\s+").unwrap();
        assert!(c.trim_chunk_start(c.first(), &pattern));
        assert_eq!(render(&c), "abc");
        let spans: Vec<_> = c.iter().map(|(_, ch)| (ch.start, ch.end)).collect();
        assert_eq!(spans, vec![(0, 2), (2, 5)]);
    }

    #[test]
    fn test_trim_all_whitespace_continues() {
        let mut c = chain("   ");
        let pattern = Regex::new(r"\s+$").unwrap();
        assert!(!c.trim_chunk_end(c.first(), &pattern));
        assert_eq!(render(&c), "");
    }
}
