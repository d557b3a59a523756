//! Re-indenting the rendered text

use crate::buffer::EditBuffer;
use crate::error::EditError;

/// Options for [`EditBuffer::indent`]
#[derive(Debug, Clone)]
pub struct IndentOptions {
    /// Original ranges to leave alone. Defaults to the buffer's
    /// `indent_exclusion_ranges`.
    pub exclude: Option<Vec<(usize, usize)>>,
    /// Indent the first line as well
    pub indent_start: bool,
}

impl Default for IndentOptions {
    fn default() -> Self {
        IndentOptions {
            exclude: None,
            indent_start: true,
        }
    }
}

/// Guess the indentation unit of `text`.
///
/// Tabs win if at least as many lines start with a tab as start with two
/// or more spaces. Otherwise the shortest run of leading spaces is used.
pub fn guess_indent(text: &str) -> Option<String> {
    let mut tabbed = 0usize;
    let mut min_spaces: Option<usize> = None;
    let mut spaced = 0usize;

    for line in text.split('\n') {
        if line.starts_with('\t') {
            tabbed += 1;
            continue;
        }
        let spaces = line.chars().take_while(|&ch| ch == ' ').count();
        if spaces >= 2 {
            spaced += 1;
            min_spaces = Some(min_spaces.map_or(spaces, |min| min.min(spaces)));
        }
    }

    if tabbed == 0 && spaced == 0 {
        return None;
    }
    if tabbed >= spaced {
        return Some("\t".to_string());
    }
    min_spaces.map(|n| " ".repeat(n))
}

/// Prefix each line start in `text` that carries content. The line-start
/// state is threaded through consecutive pieces of the rendering.
pub(crate) fn indent_lines(text: &str, indent: &str, at_line_start: &mut bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\n' {
            *at_line_start = true;
        } else if ch != '\r' && *at_line_start {
            out.push_str(indent);
            *at_line_start = false;
        }
        out.push(ch);
    }
    out
}

impl EditBuffer {
    /// Indent every line of the current text that has content.
    ///
    /// With no `indent_str` the guessed indentation of the original is
    /// used. Unedited chunks are split at each line start so the indent is
    /// inserted text rather than an edit; edited content and text added
    /// with `prepend`/`append` are indented in place.
    pub fn indent(
        &mut self,
        indent_str: Option<&str>,
        options: &IndentOptions,
    ) -> Result<&mut Self, EditError> {
        let indent = match indent_str {
            Some(indent) => indent.to_string(),
            None => self.get_indent_string().to_string(),
        };
        if indent.is_empty() {
            return Ok(self);
        }

        let exclude: Vec<(usize, usize)> = options
            .exclude
            .clone()
            .or_else(|| self.indent_exclusion_ranges().map(<[_]>::to_vec))
            .unwrap_or_default();
        let is_excluded = |offset: usize| exclude.iter().any(|&(s, e)| s <= offset && offset < e);
        let mut at_line_start = options.indent_start;

        let (intro, _) = self.edges_mut();
        *intro = indent_lines(intro, &indent, &mut at_line_start);

        let chain = self.chain_mut();
        let mut current = Some(chain.first());
        while let Some(mut id) = current {
            let chunk = chain.get(id);
            if chunk.edited {
                if !chunk.content.is_empty() && !is_excluded(chunk.start) {
                    let content = indent_lines(&chunk.content, &indent, &mut at_line_start);
                    chain.get_mut(id).content = content;
                }
            } else {
                let start = chunk.start;
                let chars: Vec<char> = chunk.original.chars().collect();
                for (i, ch) in chars.into_iter().enumerate() {
                    let offset = start + i;
                    if is_excluded(offset) {
                        continue;
                    }
                    if ch == '\n' {
                        at_line_start = true;
                    } else if ch != '\r' && at_line_start {
                        at_line_start = false;
                        if offset != chain.get(id).start {
                            id = chain.split_chunk(id, offset)?;
                        }
                        chain.get_mut(id).prepend_right(&indent);
                    }
                }
            }
            current = chain.get(id).next;
        }

        let (_, outro) = self.edges_mut();
        *outro = indent_lines(outro, &indent, &mut at_line_start);
        Ok(self)
    }
}
