use serde::{Deserialize, Serialize};

/// Tunables for opening and scanning a plot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Reject records whose length trailer differs from the prefix.
    pub verify_trailers: bool,
    /// Read buffer size for on-disk files, in bytes.
    pub buffer_capacity: usize,
    /// Inflate gzip-wrapped files instead of rejecting them.
    pub decompress: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            verify_trailers: true,
            buffer_capacity: 64 * 1024,
            decompress: true,
        }
    }
}
