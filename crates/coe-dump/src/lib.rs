pub mod model;

pub use model::{load_coe, read_u8, read_u32, summarize, Image, Summary};
