//! Base64-VLQ encoding of decoded mappings
//!
//! Every field of a segment is written relative to the previous value of
//! the same field. The generated column restarts at 0 on each line; the
//! source index, original line, original column and name index run across
//! the whole mappings string. Each delta is zig-zag encoded and emitted in
//! 5-bit groups, least significant first, with bit 5 of every output unit
//! set when more groups follow.

use crate::types::{OriginalPosition, Segment, SegmentLines};
use thiserror::Error;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const CONTINUATION_BIT: u64 = 0b10_0000;
const GROUP_MASK: u64 = 0b01_1111;

/// Errors produced while decoding a mappings string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VlqError {
    #[error("invalid base64 character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("mappings end in the middle of a value")]
    UnexpectedEnd,

    #[error("segment with {fields} fields on line {line}; expected 1, 4 or 5")]
    InvalidSegmentLength { line: usize, fields: usize },

    #[error("value out of range on line {line}")]
    ValueOutOfRange { line: usize },
}

fn char_to_digit(byte: u8) -> Option<u64> {
    let digit = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u64::from(digit))
}

/// Append `value - previous` to `out`, returning `value` as the new previous
fn encode_integer(out: &mut String, value: i64, previous: i64) -> i64 {
    let delta = value - previous;
    let mut zigzag = if delta < 0 {
        (delta.unsigned_abs() << 1) | 1
    } else {
        delta.unsigned_abs() << 1
    };

    loop {
        let mut digit = zigzag & GROUP_MASK;
        zigzag >>= 5;
        if zigzag > 0 {
            digit |= CONTINUATION_BIT;
        }
        out.push(char::from(ALPHABET[digit as usize]));
        if zigzag == 0 {
            break;
        }
    }

    value
}

/// Encode decoded mappings into the compact `mappings` string.
///
/// ```
/// use vco_source_map::{encode, Segment};
///
/// let lines = vec![vec![Segment::mapped(0, 0, 0, 0)], vec![], vec![Segment::mapped(0, 0, 1, 0)]];
/// assert_eq!(encode(&lines), "AAAA;;AACA");
/// ```
pub fn encode(lines: &[Vec<Segment>]) -> String {
    let mut out = String::new();
    let mut source_index = 0;
    let mut original_line = 0;
    let mut original_column = 0;
    let mut name_index = 0;

    for (line_idx, line) in lines.iter().enumerate() {
        if line_idx > 0 {
            out.push(';');
        }

        let mut generated_column = 0;
        for (segment_idx, segment) in line.iter().enumerate() {
            if segment_idx > 0 {
                out.push(',');
            }

            generated_column = encode_integer(
                &mut out,
                i64::from(segment.generated_column),
                generated_column,
            );

            let Some(original) = &segment.original else {
                continue;
            };
            source_index = encode_integer(&mut out, i64::from(original.source_index), source_index);
            original_line = encode_integer(&mut out, i64::from(original.line), original_line);
            original_column =
                encode_integer(&mut out, i64::from(original.column), original_column);

            if let Some(name) = original.name_index {
                name_index = encode_integer(&mut out, i64::from(name), name_index);
            }
        }
    }

    out
}

/// Reads zig-zag VLQ values out of one segment's text
struct ValueReader<'a> {
    bytes: &'a [u8],
    position: usize,
    base: usize,
    line: usize,
}

impl ValueReader<'_> {
    fn next_value(&mut self) -> Result<Option<i64>, VlqError> {
        if self.position >= self.bytes.len() {
            return Ok(None);
        }

        let mut accumulated: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = *self.bytes.get(self.position).ok_or(VlqError::UnexpectedEnd)?;
            let digit = char_to_digit(byte).ok_or(VlqError::InvalidCharacter {
                character: char::from(byte),
                position: self.base + self.position,
            })?;
            self.position += 1;

            if shift > 60 {
                return Err(VlqError::ValueOutOfRange { line: self.line });
            }
            accumulated |= (digit & GROUP_MASK) << shift;
            shift += 5;

            if digit & CONTINUATION_BIT == 0 {
                break;
            }
        }

        let magnitude = i64::try_from(accumulated >> 1)
            .map_err(|_| VlqError::ValueOutOfRange { line: self.line })?;
        Ok(Some(if accumulated & 1 == 1 {
            -magnitude
        } else {
            magnitude
        }))
    }
}

fn to_field(value: i64, line: usize) -> Result<u32, VlqError> {
    u32::try_from(value).map_err(|_| VlqError::ValueOutOfRange { line })
}

/// Add a decoded delta to a running field total
fn accumulate(total: &mut i64, delta: i64, line: usize) -> Result<(), VlqError> {
    *total = total
        .checked_add(delta)
        .ok_or(VlqError::ValueOutOfRange { line })?;
    Ok(())
}

/// Decode a `mappings` string back into per-line segments.
///
/// This is the inverse of [`encode`] for any table with at least one line.
pub fn decode(mappings: &str) -> Result<SegmentLines, VlqError> {
    let mut lines = Vec::new();
    let mut source_index: i64 = 0;
    let mut original_line: i64 = 0;
    let mut original_column: i64 = 0;
    let mut name_index: i64 = 0;
    let mut base = 0;

    for (line_idx, line_text) in mappings.split(';').enumerate() {
        let mut segments = Vec::new();
        let mut generated_column: i64 = 0;
        let mut segment_base = base;

        for segment_text in line_text.split(',') {
            if segment_text.is_empty() {
                segment_base += 1;
                continue;
            }

            let mut reader = ValueReader {
                bytes: segment_text.as_bytes(),
                position: 0,
                base: segment_base,
                line: line_idx,
            };
            let mut fields = Vec::with_capacity(5);
            while let Some(value) = reader.next_value()? {
                fields.push(value);
            }

            accumulate(&mut generated_column, fields[0], line_idx)?;
            let mut segment = Segment::generated(to_field(generated_column, line_idx)?);
            match fields.len() {
                1 => {}
                4 | 5 => {
                    accumulate(&mut source_index, fields[1], line_idx)?;
                    accumulate(&mut original_line, fields[2], line_idx)?;
                    accumulate(&mut original_column, fields[3], line_idx)?;
                    let name = if fields.len() == 5 {
                        accumulate(&mut name_index, fields[4], line_idx)?;
                        Some(to_field(name_index, line_idx)?)
                    } else {
                        None
                    };
                    segment.original = Some(OriginalPosition {
                        source_index: to_field(source_index, line_idx)?,
                        line: to_field(original_line, line_idx)?,
                        column: to_field(original_column, line_idx)?,
                        name_index: name,
                    });
                }
                other => {
                    return Err(VlqError::InvalidSegmentLength {
                        line: line_idx,
                        fields: other,
                    });
                }
            }

            segments.push(segment);
            segment_base += segment_text.len() + 1;
        }

        base += line_text.len() + 1;
        lines.push(segments);
    }

    Ok(lines)
}
