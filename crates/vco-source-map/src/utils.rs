//! Utility functions for paths and character offsets

/// Path of `to` relative to the directory containing `from`.
///
/// Both paths are split on `/` and `\`; the result always uses `/`.
pub fn relative_path(from: &str, to: &str) -> String {
    let mut from_parts: Vec<&str> = from.split(['/', '\\']).collect();
    let to_parts: Vec<&str> = to.split(['/', '\\']).collect();
    from_parts.pop();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_parts.len() - common];
    parts.extend(&to_parts[common..]);
    parts.join("/")
}

/// Last component of a `/` or `\` separated path
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Byte offset of the character at `char_offset`, or `text.len()` past the end
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Character offset of the byte position `byte_offset`
///
/// `byte_offset` must lie on a character boundary.
pub fn byte_to_char(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

/// Substring between two character offsets
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(text, start);
    let end_byte = start_byte + char_to_byte(&text[start_byte..], end.saturating_sub(start));
    &text[start_byte..end_byte]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_sibling() {
        assert_eq!(relative_path("dist/out.js", "dist/in.js"), "in.js");
    }

    #[test]
    fn test_relative_path_climbs_out() {
        assert_eq!(
            relative_path("dist/js/out.js", "src/main.js"),
            "../../src/main.js"
        );
    }

    #[test]
    fn test_relative_path_without_file() {
        assert_eq!(
            relative_path("", "/project/src/App.vue"),
            "/project/src/App.vue"
        );
    }

    #[test]
    fn test_relative_path_windows_separators() {
        assert_eq!(relative_path("a\\b\\out.js", "a\\c\\in.js"), "../c/in.js");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("dist/out.js"), "out.js");
        assert_eq!(basename("C:\\dist\\out.js"), "out.js");
        assert_eq!(basename("out.js"), "out.js");
    }

    #[test]
    fn test_char_offsets() {
        let text = "héllo wörld";
        assert_eq!(char_to_byte(text, 2), 3);
        assert_eq!(char_to_byte(text, 100), text.len());
        assert_eq!(byte_to_char(text, 3), 2);
        assert_eq!(char_slice(text, 1, 5), "éllo");
        assert_eq!(char_slice(text, 6, 11), "wörld");
    }
}
