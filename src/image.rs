use bitvec::prelude::*;

/// Fixed-depth array of 32-bit words backing one block memory.
///
/// The depth is set at construction and never changes; writes past the end are
/// refused rather than growing the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryImage {
    words: Vec<u32>,
    written: BitVec,
    fill: u32,
}

impl MemoryImage {
    pub fn new(depth: usize, fill: u32) -> Self {
        Self {
            words: vec![fill; depth],
            written: bitvec![0; depth],
            fill,
        }
    }

    /// Wraps words decoded elsewhere (e.g. a COE listing). Slots that differ
    /// from `fill` count as written.
    pub fn from_words(words: Vec<u32>, fill: u32) -> Self {
        let written = words.iter().map(|&w| w != fill).collect();
        Self { words, written, fill }
    }

    pub fn depth(&self) -> usize {
        self.words.len()
    }

    pub fn fill_value(&self) -> u32 {
        self.fill
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.words.get(index).copied()
    }

    /// Stores `word` at `index`. Returns false and leaves the image untouched
    /// when `index >= depth`.
    pub fn write(&mut self, index: usize, word: u32) -> bool {
        match self.words.get_mut(index) {
            Some(slot) => {
                *slot = word;
                self.written.set(index, true);
                true
            }
            None => false,
        }
    }

    pub fn is_written(&self, index: usize) -> bool {
        self.written.get(index).map(|b| *b).unwrap_or(false)
    }

    pub fn written_count(&self) -> usize {
        self.written.count_ones()
    }

    pub fn byte_size(&self) -> usize {
        self.words.len() * 4
    }

    pub fn read_u8(&self, addr: usize) -> Option<u8> {
        let word = self.get(addr / 4)?;
        Some(word.to_le_bytes()[addr % 4])
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_filled_and_unwritten() {
        let img = MemoryImage::new(4, 0x33);
        assert_eq!(img.words(), &[0x33; 4]);
        assert_eq!(img.written_count(), 0);
        assert_eq!(img.byte_size(), 16);
    }

    #[test]
    fn write_out_of_bounds_is_refused() {
        let mut img = MemoryImage::new(2, 0);
        assert!(img.write(1, 0xDEAD_BEEF));
        assert!(!img.write(2, 0x1234));
        assert_eq!(img.depth(), 2);
        assert_eq!(img.words(), &[0, 0xDEAD_BEEF]);
        assert!(img.is_written(1));
        assert!(!img.is_written(0));
        assert!(!img.is_written(7));
    }

    #[test]
    fn rewrite_counts_once() {
        let mut img = MemoryImage::new(3, 0);
        img.write(0, 1);
        img.write(0, 2);
        assert_eq!(img.written_count(), 1);
        assert_eq!(img.get(0), Some(2));
    }

    #[test]
    fn byte_view_is_little_endian() {
        let mut img = MemoryImage::new(2, 0x33);
        img.write(1, 0xDEAD_BEEF);
        assert_eq!(img.to_le_bytes(), vec![0x33, 0, 0, 0, 0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(img.read_u8(4), Some(0xEF));
        assert_eq!(img.read_u8(7), Some(0xDE));
        assert_eq!(img.read_u8(8), None);
    }

    #[test]
    fn from_words_marks_non_fill_slots() {
        let img = MemoryImage::from_words(vec![0x33, 0x13, 0x33], 0x33);
        assert_eq!(img.written_count(), 1);
        assert!(img.is_written(1));
    }
}
