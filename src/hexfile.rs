//! Line syntax of the `@`-addressed hex listing (the `$readmemh`-style output
//! of `objcopy -O verilog`):
//!
//! ```text
//! @00000000
//! 13 05 00 00 93 05 10 00
//! ```
//!
//! `@XXXX` sets the byte address, every other non-blank line carries byte
//! tokens that are consumed four at a time as little-endian words.

use std::fmt::Write as _;
use std::num::IntErrorKind;

use crate::error::RecordError;
use crate::image::MemoryImage;

pub const DIRECTIVE_MARKER: char = '@';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<'a> {
    Blank,
    /// Byte address following `@`.
    Address(u64),
    Data(DataLine<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLine<'a> {
    tokens: Vec<&'a str>,
}

/// Four consecutive byte tokens, first token = least significant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteGroup<'a> {
    pub tokens: [&'a str; 4],
}

pub fn parse_line(line: &str) -> Result<Record<'_>, RecordError> {
    let s = line.trim();
    if s.is_empty() {
        return Ok(Record::Blank);
    }
    if let Some(rest) = s.strip_prefix(DIRECTIVE_MARKER) {
        return parse_address(rest).map(Record::Address);
    }
    Ok(Record::Data(DataLine {
        tokens: s.split_whitespace().collect(),
    }))
}

/// Hex byte address after `@`. Offsets too wide for `u64` saturate to
/// `u64::MAX` so they land past any memory depth instead of being rejected.
pub fn parse_address(text: &str) -> Result<u64, RecordError> {
    let t = text.trim();
    let digits = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")).unwrap_or(t);
    match u64::from_str_radix(digits, 16) {
        Ok(addr) => Ok(addr),
        Err(e)
            if *e.kind() == IntErrorKind::PosOverflow
                && digits.chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            Ok(u64::MAX)
        }
        Err(source) => Err(RecordError::BadAddress {
            text: text.to_string(),
            source,
        }),
    }
}

pub fn parse_byte(token: &str) -> Result<u8, RecordError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u8::from_str_radix(digits, 16).map_err(|source| RecordError::BadByte {
        token: token.to_string(),
        source,
    })
}

impl<'a> DataLine<'a> {
    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    /// Complete groups of four, left to right. A short tail is not yielded.
    pub fn groups(&self) -> impl Iterator<Item = ByteGroup<'a>> + '_ {
        self.tokens.chunks_exact(4).map(|c| ByteGroup {
            tokens: [c[0], c[1], c[2], c[3]],
        })
    }

    pub fn dropped_tokens(&self) -> usize {
        self.tokens.len() % 4
    }
}

impl ByteGroup<'_> {
    pub fn bytes(&self) -> Result<[u8; 4], RecordError> {
        Ok([
            parse_byte(self.tokens[0])?,
            parse_byte(self.tokens[1])?,
            parse_byte(self.tokens[2])?,
            parse_byte(self.tokens[3])?,
        ])
    }

    pub fn word(&self) -> Result<u32, RecordError> {
        self.bytes().map(u32::from_le_bytes)
    }
}

const WORDS_PER_LINE: usize = 4;

/// Writes `image` back in the `@`-addressed syntax. Slots holding the fill
/// value are skipped and each run of other words starts with a directive, so
/// converting the result with the same fill value reproduces `image`.
pub fn render_hex(image: &MemoryImage) -> String {
    let mut out = String::new();
    let mut line_words = 0usize;
    let mut next: Option<usize> = None; // index that would follow the last emitted word
    for (idx, &word) in image.words().iter().enumerate() {
        if word == image.fill_value() {
            continue;
        }
        if next != Some(idx) {
            if line_words > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "{DIRECTIVE_MARKER}{:08X}", idx * 4);
            line_words = 0;
        } else if line_words == WORDS_PER_LINE {
            out.push('\n');
            line_words = 0;
        }
        let [b0, b1, b2, b3] = word.to_le_bytes();
        if line_words > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b0:02X} {b1:02X} {b2:02X} {b3:02X}");
        line_words += 1;
        next = Some(idx + 1);
    }
    if line_words > 0 {
        out.push('\n');
    }
    out
}
