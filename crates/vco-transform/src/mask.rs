//! Hiding comments from the import scanners

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)//.*$").unwrap());

fn blank(caps: &Captures) -> String {
    " ".repeat(caps[0].chars().count())
}

/// Replace every comment with as many spaces as it has characters.
///
/// Character offsets found in the result are valid in `code`, so matches
/// can be edited in the original directly. Anything that looks like a
/// comment is masked, including `//` inside string literals.
pub fn mask_comments(code: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(code, blank);
    LINE_COMMENT.replace_all(&without_blocks, blank).into_owned()
}
