// Error handling for PTF reader

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PtfError>;

#[derive(Error, Debug)]
pub enum PtfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed plot file: {0}")]
    Format(#[from] FormatError),

    /// Every requested name that is absent from the catalog, in request order.
    #[error("Variables not found: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(&'static str),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Reader lock was poisoned by a panicking thread")]
    LockPoisoned,
}

/// Structural problems in the record stream. Always fatal to the current call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("truncated record at offset {offset}")]
    TruncatedRecord { offset: u64 },

    #[error("record length mismatch at offset {offset}: expected {expected}, found {found}")]
    LengthMismatch { offset: u64, expected: u64, found: u64 },

    #[error("count mismatch for {what}: expected {expected}, found {found}")]
    ItemCountMismatch {
        what: &'static str,
        expected: u64,
        found: u64,
    },

    #[error("second KEY group at offset {offset}")]
    MultipleKeyGroups { offset: u64 },

    #[error("no KEY group in file")]
    MissingKeyGroup,

    #[error("unsupported byte order (file is big-endian)")]
    UnsupportedByteOrder,

    #[error("truncated data block {block} at offset {offset}")]
    TruncatedData { block: usize, offset: u64 },
}

impl PtfError {
    /// Returns the format error, if this is one.
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            PtfError::Format(e) => Some(e),
            _ => None,
        }
    }
}
