pub mod coe;
pub mod config;
pub mod convert;
pub mod error;
pub mod hexfile;
pub mod image;

pub use coe::{parse_coe, render, write_coe, write_coe_file, CoeFile};
pub use config::{ConvertConfig, DEFAULT_MEM_DEPTH, NOP_WORD};
pub use convert::{convert_file, convert_lines, convert_reader, Conversion, ConversionStats, Converter};
pub use error::{CoeError, ConvertError, RecordError, Warning};
pub use image::MemoryImage;
