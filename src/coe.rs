//! Xilinx coefficient (COE) files for block memory initialization.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CoeError, ConvertError};
use crate::image::MemoryImage;

pub const RADIX_KEY: &str = "memory_initialization_radix";
pub const VECTOR_KEY: &str = "memory_initialization_vector";

pub fn write_coe<W: Write>(image: &MemoryImage, mut w: W) -> io::Result<()> {
    writeln!(w, "{RADIX_KEY}=16;")?;
    writeln!(w, "{VECTOR_KEY}=")?;
    let last = image.depth().saturating_sub(1);
    for (i, word) in image.words().iter().enumerate() {
        let term = if i == last { ';' } else { ',' };
        writeln!(w, "{word:08x}{term}")?;
    }
    w.flush()
}

pub fn render(image: &MemoryImage) -> String {
    let mut buf = Vec::with_capacity(64 + image.depth() * 10);
    // writing into a Vec cannot fail
    let _ = write_coe(image, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes next to `path` first and renames into place, so a failed write never
/// leaves a truncated COE file behind.
pub fn write_coe_file(path: &Path, image: &MemoryImage) -> Result<(), ConvertError> {
    let tmp = temp_path(path);
    let res = File::create(&tmp)
        .and_then(|f| {
            let mut w = BufWriter::new(f);
            write_coe(image, &mut w)?;
            w.into_inner().map_err(|e| e.into_error())?.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));
    res.map_err(|source| {
        let _ = fs::remove_file(&tmp);
        ConvertError::Write { path: path.to_path_buf(), source }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoeFile {
    pub radix: u32,
    pub words: Vec<u32>,
}

impl CoeFile {
    pub fn depth(&self) -> usize {
        self.words.len()
    }

    pub fn into_image(self, fill: u32) -> MemoryImage {
        MemoryImage::from_words(self.words, fill)
    }
}

pub fn parse_coe(text: &str) -> Result<CoeFile, CoeError> {
    // ';' at the start of a line is a comment, elsewhere it ends a statement
    let body: String = text
        .lines()
        .filter(|l| !l.trim_start().starts_with(';'))
        .flat_map(|l| [l, "\n"])
        .collect();

    let mut radix = None;
    let mut vector = None;
    for stmt in body.split(';') {
        let stmt = stmt.trim();
        if stmt.is_empty() {
            continue;
        }
        let (key, value) = stmt.split_once('=').unwrap_or((stmt, ""));
        match key.trim() {
            RADIX_KEY => {
                let v = value.trim();
                radix = Some(match v {
                    "2" => 2,
                    "10" => 10,
                    "16" => 16,
                    _ => return Err(CoeError::BadRadix(v.to_string())),
                });
            }
            VECTOR_KEY => vector = Some(value),
            other => return Err(CoeError::UnknownKeyword(other.to_string())),
        }
    }

    let radix = radix.ok_or(CoeError::MissingRadix)?;
    let vector = vector.ok_or(CoeError::MissingVector)?;
    let words = vector
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(index, t)| {
            u32::from_str_radix(t, radix).map_err(|_| CoeError::BadWord {
                index,
                text: t.to_string(),
                radix,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if words.is_empty() {
        return Err(CoeError::EmptyVector);
    }
    Ok(CoeFile { radix, words })
}
