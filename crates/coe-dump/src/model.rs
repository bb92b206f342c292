use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use hex2coe_rs::{parse_coe, MemoryImage};

#[derive(Debug, Clone)]
pub struct Image {
    pub radix: u32,
    pub mem: MemoryImage,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub radix: u32,
    pub depth: usize,
    pub bytes: usize,
    pub fill: u32,
    pub non_fill_words: usize,
    pub last_non_fill: Option<u32>, // byte address
}

pub fn load_coe(path: &Path, fill: u32) -> Result<Image> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let coe = parse_coe(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Image { radix: coe.radix, mem: coe.into_image(fill) })
}

pub fn read_u8(img: &Image, addr: u32) -> Option<u8> {
    img.mem.read_u8(addr as usize)
}

pub fn read_u32(img: &Image, addr: u32) -> Option<u32> {
    let b0 = read_u8(img, addr)?;
    let b1 = read_u8(img, addr.wrapping_add(1))?;
    let b2 = read_u8(img, addr.wrapping_add(2))?;
    let b3 = read_u8(img, addr.wrapping_add(3))?;
    Some(u32::from_le_bytes([b0, b1, b2, b3]))
}

pub fn summarize(img: &Image) -> Summary {
    let last = (0..img.mem.depth()).rev().find(|&i| img.mem.is_written(i));
    Summary {
        radix: img.radix,
        depth: img.mem.depth(),
        bytes: img.mem.byte_size(),
        fill: img.mem.fill_value(),
        non_fill_words: img.mem.written_count(),
        last_non_fill: last.map(|i| (i * 4) as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_decodes_words_and_bytes() {
        let cwd = std::env::current_dir().unwrap();
        let path = cwd.join("_test_load.coe");
        std::fs::write(
            &path,
            "memory_initialization_radix=16;\nmemory_initialization_vector=\n00000033,\ndeadbeef,\n00000033;\n",
        )
        .unwrap();
        let img = load_coe(&path, 0x33).unwrap();
        assert_eq!(img.radix, 16);
        assert_eq!(img.mem.depth(), 3);
        assert_eq!(read_u32(&img, 4).unwrap(), 0xDEAD_BEEF);
        assert_eq!(read_u8(&img, 4).unwrap(), 0xEF);
        // unaligned read straddles two words
        assert_eq!(read_u32(&img, 2).unwrap(), 0xBEEF_0000);
        assert!(read_u32(&img, 10).is_none());

        let s = summarize(&img);
        assert_eq!(s.non_fill_words, 1);
        assert_eq!(s.last_non_fill, Some(4));
        assert_eq!(s.bytes, 12);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn loader_reports_bad_file() {
        let cwd = std::env::current_dir().unwrap();
        let path = cwd.join("_test_bad.coe");
        std::fs::write(&path, "memory_initialization_vector=1;").unwrap();
        assert!(load_coe(&path, 0).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
