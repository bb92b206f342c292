use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// 2048 words of 32 bits (8 KiB of block RAM).
pub const DEFAULT_MEM_DEPTH: usize = 2048;
/// `add x0, x0, x0`, the RISC-V no-op used for slots the input never touches.
pub const NOP_WORD: u32 = 0x0000_0033;

pub const DEFAULT_INPUT: &str = "game.hex";
pub const DEFAULT_OUTPUT: &str = "game.coe";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub mem_depth: usize, // word count, output is mem_depth * 4 bytes
    pub fill_value: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            mem_depth: DEFAULT_MEM_DEPTH,
            fill_value: NOP_WORD,
        }
    }
}

impl ConvertConfig {
    pub fn new(mem_depth: usize, fill_value: u32) -> Result<Self, ConvertError> {
        let cfg = Self { mem_depth, fill_value };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.mem_depth == 0 {
            return Err(ConvertError::ZeroDepth);
        }
        Ok(())
    }

    pub fn byte_size(&self) -> usize {
        self.mem_depth * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bram_layout() {
        let cfg = ConvertConfig::default();
        assert_eq!(cfg.mem_depth, 2048);
        assert_eq!(cfg.fill_value, 0x33);
        assert_eq!(cfg.byte_size(), 8192);
    }

    #[test]
    fn zero_depth_rejected() {
        assert!(matches!(ConvertConfig::new(0, NOP_WORD), Err(ConvertError::ZeroDepth)));
        assert!(ConvertConfig::new(1, 0).is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: ConvertConfig = serde_json::from_str(r#"{ "mem_depth": 16 }"#).unwrap();
        assert_eq!(cfg.mem_depth, 16);
        assert_eq!(cfg.fill_value, NOP_WORD);
    }
}
