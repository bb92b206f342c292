use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use serde::Serialize;

/// Failures that abort a conversion. No output is produced.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("memory depth must be a positive word count")]
    ZeroDepth,
    #[error("input file '{}' not found", path.display())]
    InputNotFound { path: PathBuf },
    #[error("cannot open input file '{}': {source}", path.display())]
    Open { path: PathBuf, #[source] source: io::Error },
    #[error("error reading HEX input at line {line}: {source}")]
    Read { line: usize, #[source] source: io::Error },
    #[error("error writing COE file '{}': {source}", path.display())]
    Write { path: PathBuf, #[source] source: io::Error },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("invalid address directive '{text}': {source}")]
    BadAddress { text: String, #[source] source: ParseIntError },
    #[error("invalid hex byte '{token}': {source}")]
    BadByte { token: String, #[source] source: ParseIntError },
}

/// Recoverable per-line problems. The conversion continues past each one.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error("line {line}: invalid address directive '{text}'")]
    InvalidAddress { line: usize, text: String },
    #[error("line {line}: invalid hex byte in {group:?}")]
    InvalidByte { line: usize, group: Vec<String> },
    #[error("line {line}: address {address} exceeds memory depth {depth}, skipping")]
    OutOfBounds { line: usize, address: u64, depth: usize },
}

impl Warning {
    pub fn line(&self) -> usize {
        match self {
            Warning::InvalidAddress { line, .. }
            | Warning::InvalidByte { line, .. }
            | Warning::OutOfBounds { line, .. } => *line,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoeError {
    #[error("missing memory_initialization_radix")]
    MissingRadix,
    #[error("unsupported radix {0} (expected 2, 10 or 16)")]
    BadRadix(String),
    #[error("missing memory_initialization_vector")]
    MissingVector,
    #[error("unknown COE keyword '{0}'")]
    UnknownKeyword(String),
    #[error("vector entry {index} '{text}' is not a 32-bit value in radix {radix}")]
    BadWord { index: usize, text: String, radix: u32 },
    #[error("memory_initialization_vector is empty")]
    EmptyVector,
}
