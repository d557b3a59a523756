//! Search-and-replace over the original text

use regex::{Regex, Replacer};
use vco_source_map::byte_to_char;

use crate::buffer::{EditBuffer, UpdateOptions};
use crate::error::EditError;

const REPLACE: UpdateOptions = UpdateOptions {
    store_name: false,
    overwrite: true,
};

impl EditBuffer {
    /// Overwrite the first occurrence of `needle` in the original text
    pub fn replace(&mut self, needle: &str, replacement: &str) -> Result<&mut Self, EditError> {
        self.replace_with(needle, |_, _, _| replacement.to_string())
    }

    /// Like [`EditBuffer::replace`], computing the replacement from the
    /// matched text, its character offset, and the whole original.
    pub fn replace_with<F>(&mut self, needle: &str, mut replacement: F) -> Result<&mut Self, EditError>
    where
        F: FnMut(&str, usize, &str) -> String,
    {
        if needle.is_empty() {
            return Ok(self);
        }
        let original = self.original_arc();
        if let Some(byte) = original.find(needle) {
            let start = byte_to_char(&original, byte);
            let content = replacement(needle, start, &original);
            self.overwrite_match(start, needle, &content)?;
        }
        Ok(self)
    }

    /// Overwrite every non-overlapping occurrence of `needle`
    pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Result<&mut Self, EditError> {
        self.replace_all_with(needle, |_, _, _| replacement.to_string())
    }

    pub fn replace_all_with<F>(
        &mut self,
        needle: &str,
        mut replacement: F,
    ) -> Result<&mut Self, EditError>
    where
        F: FnMut(&str, usize, &str) -> String,
    {
        if needle.is_empty() {
            return Ok(self);
        }
        let original = self.original_arc();
        for (byte, matched) in original.match_indices(needle) {
            let start = byte_to_char(&original, byte);
            let content = replacement(matched, start, &original);
            self.overwrite_match(start, matched, &content)?;
        }
        Ok(self)
    }

    /// Overwrite the first match of `pattern`.
    ///
    /// `replacer` is anything the `regex` crate accepts: a template such as
    /// `"$1"` or a closure over the captures.
    pub fn replace_regex<R: Replacer>(
        &mut self,
        pattern: &Regex,
        replacer: R,
    ) -> Result<&mut Self, EditError> {
        self.replace_regex_n(pattern, replacer, 1)
    }

    /// Overwrite every match of `pattern`
    pub fn replace_all_regex<R: Replacer>(
        &mut self,
        pattern: &Regex,
        replacer: R,
    ) -> Result<&mut Self, EditError> {
        self.replace_regex_n(pattern, replacer, usize::MAX)
    }

    fn replace_regex_n<R: Replacer>(
        &mut self,
        pattern: &Regex,
        mut replacer: R,
        limit: usize,
    ) -> Result<&mut Self, EditError> {
        let original = self.original_arc();
        let mut found = 0;
        for caps in pattern.captures_iter(&original) {
            if found == limit {
                break;
            }
            found += 1;

            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.is_empty() {
                continue;
            }
            let mut content = String::new();
            replacer.replace_append(&caps, &mut content);
            let start = byte_to_char(&original, whole.start());
            self.overwrite_match(start, whole.as_str(), &content)?;
        }
        Ok(self)
    }

    fn overwrite_match(&mut self, start: usize, matched: &str, content: &str) -> Result<(), EditError> {
        if matched == content {
            return Ok(());
        }
        let end = start + matched.chars().count();
        self.update_range(start, end, content, REPLACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Captures;

    #[test]
    fn test_replace_first_only() {
        let mut buffer = EditBuffer::new("a-b-a");
        buffer.replace("a", "x").unwrap();
        assert_eq!(buffer.to_string(), "x-b-a");
    }

    #[test]
    fn test_replace_all_counts_characters() {
        let mut buffer = EditBuffer::new("é.é.é");
        buffer.replace_all("é", "e").unwrap();
        assert_eq!(buffer.to_string(), "e.e.e");
        assert!(buffer.chunks().any(|c| c.start() == 4 && c.is_edited()));
    }

    #[test]
    fn test_replace_with_sees_offset() {
        let mut buffer = EditBuffer::new("one two");
        buffer
            .replace_with("two", |matched, index, _| format!("{matched}@{index}"))
            .unwrap();
        assert_eq!(buffer.to_string(), "one two@4");
    }

    #[test]
    fn test_replace_regex_template() {
        let mut buffer = EditBuffer::new("let a = 1; let b = 2;");
        let pattern = Regex::new(r"let (\w)").unwrap();
        buffer.replace_all_regex(&pattern, "const $1").unwrap();
        assert_eq!(buffer.to_string(), "const a = 1; const b = 2;");

        let mut first = EditBuffer::new("let a = 1; let b = 2;");
        first.replace_regex(&pattern, "var $1").unwrap();
        assert_eq!(first.to_string(), "var a = 1; let b = 2;");
    }

    #[test]
    fn test_replace_regex_closure_and_identity() {
        let mut buffer = EditBuffer::new("x1 y2");
        let pattern = Regex::new(r"[a-z](\d)").unwrap();
        buffer
            .replace_all_regex(&pattern, |caps: &Captures| {
                if &caps[1] == "1" {
                    caps[0].to_string()
                } else {
                    "z9".to_string()
                }
            })
            .unwrap();
        assert_eq!(buffer.to_string(), "x1 z9");
        assert!(!buffer.chunks().next().unwrap().is_edited());
    }

    #[test]
    fn test_zero_length_matches_skipped() {
        let mut buffer = EditBuffer::new("abc");
        let pattern = Regex::new(r"x*").unwrap();
        buffer.replace_all_regex(&pattern, "-").unwrap();
        assert_eq!(buffer.to_string(), "abc");
        assert!(!buffer.has_changed());
    }
}
