use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ConvertConfig;
use crate::error::{ConvertError, Warning};
use crate::hexfile::{parse_line, ByteGroup, DataLine, Record};
use crate::image::MemoryImage;

const ECHO_WORDS: u64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub lines: usize,
    pub directives: usize,
    pub words_decoded: usize,
    pub words_written: usize,
    pub words_dropped: usize,
    pub groups_rejected: usize,
    pub tokens_dropped: usize,
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub image: MemoryImage,
    pub warnings: Vec<Warning>,
    pub stats: ConversionStats,
}

/// Single-pass line dispatcher: `@` directives move the cursor, data lines
/// deposit words at it.
#[derive(Debug)]
pub struct Converter {
    image: MemoryImage,
    cursor: u64, // word address
    line_no: usize,
    warnings: Vec<Warning>,
    stats: ConversionStats,
}

impl Converter {
    pub fn new(cfg: &ConvertConfig) -> Result<Self, ConvertError> {
        cfg.validate()?;
        info!(
            "Initializing {} words with fill value {:#010x}",
            cfg.mem_depth, cfg.fill_value
        );
        Ok(Self {
            image: MemoryImage::new(cfg.mem_depth, cfg.fill_value),
            cursor: 0,
            line_no: 0,
            warnings: Vec::new(),
            stats: ConversionStats::default(),
        })
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn image(&self) -> &MemoryImage {
        &self.image
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn feed_line(&mut self, line: &str) {
        self.line_no += 1;
        self.stats.lines += 1;
        match parse_line(line) {
            Ok(Record::Blank) => {}
            Ok(Record::Address(byte_addr)) => {
                self.cursor = byte_addr / 4;
                self.stats.directives += 1;
                info!(
                    "Line {}: Address directive @{byte_addr:08X} -> Word address {}",
                    self.line_no, self.cursor
                );
            }
            Ok(Record::Data(data)) => self.feed_data(&data),
            Err(e) => {
                debug!("line {}: {e}", self.line_no);
                self.warn(Warning::InvalidAddress {
                    line: self.line_no,
                    text: line.trim().to_string(),
                });
            }
        }
    }

    fn feed_data(&mut self, data: &DataLine<'_>) {
        for group in data.groups() {
            self.feed_group(&group);
        }
        let tail = data.dropped_tokens();
        if tail > 0 {
            self.stats.tokens_dropped += tail;
            debug!("line {}: dropping {tail} trailing token(s) short of a word", self.line_no);
        }
    }

    fn feed_group(&mut self, group: &ByteGroup<'_>) {
        let word = match group.word() {
            Ok(w) => w,
            Err(e) => {
                // cursor stays put for a rejected group
                debug!("line {}: {e}", self.line_no);
                self.stats.groups_rejected += 1;
                self.warn(Warning::InvalidByte {
                    line: self.line_no,
                    group: group.tokens.iter().map(|t| t.to_string()).collect(),
                });
                return;
            }
        };
        self.stats.words_decoded += 1;

        let in_bounds = usize::try_from(self.cursor)
            .map(|idx| self.image.write(idx, word))
            .unwrap_or(false);
        if in_bounds {
            self.stats.words_written += 1;
            if self.cursor < ECHO_WORDS {
                let [b0, b1, b2, b3] = word.to_le_bytes();
                info!(
                    "Word[{:04}] = 0x{word:08X} (bytes: {b3:02X} {b2:02X} {b1:02X} {b0:02X})",
                    self.cursor
                );
            }
        } else {
            self.stats.words_dropped += 1;
            self.warn(Warning::OutOfBounds {
                line: self.line_no,
                address: self.cursor,
                depth: self.image.depth(),
            });
        }
        self.cursor += 1;
    }

    fn warn(&mut self, w: Warning) {
        warn!("{w}");
        self.warnings.push(w);
    }

    pub fn finish(self) -> Conversion {
        Conversion {
            image: self.image,
            warnings: self.warnings,
            stats: self.stats,
        }
    }
}

pub fn convert_lines<I, S>(lines: I, cfg: &ConvertConfig) -> Result<Conversion, ConvertError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut conv = Converter::new(cfg)?;
    for line in lines {
        conv.feed_line(line.as_ref());
    }
    Ok(conv.finish())
}

/// Reads the listing line by line, accepting `\n`, `\r\n` and bare `\r`
/// endings. Any I/O error (including invalid UTF-8) aborts the conversion and
/// the partial image is discarded.
pub fn convert_reader<R: BufRead>(reader: R, cfg: &ConvertConfig) -> Result<Conversion, ConvertError> {
    let mut conv = Converter::new(cfg)?;
    for chunk in reader.split(b'\n') {
        let line = conv.line_no + 1;
        let chunk = chunk.map_err(|source| ConvertError::Read { line, source })?;
        let text = String::from_utf8(chunk).map_err(|e| ConvertError::Read {
            line,
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        let text = text.strip_suffix('\r').unwrap_or(&text);
        for part in text.split('\r') {
            conv.feed_line(part);
        }
    }
    Ok(conv.finish())
}

pub fn convert_file(path: &Path, cfg: &ConvertConfig) -> Result<Conversion, ConvertError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConvertError::InputNotFound { path: path.to_path_buf() },
        _ => ConvertError::Open { path: path.to_path_buf(), source },
    })?;
    convert_reader(BufReader::new(file), cfg)
}
