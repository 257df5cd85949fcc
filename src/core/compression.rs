// Transparent inflation of gzip-wrapped plot files

use crate::core::constants::GZIP_MAGIC;
use crate::core::error::{PtfError, Result};
use std::io::Read;

pub fn is_gzip(header: &[u8]) -> bool {
    header.starts_with(&GZIP_MAGIC)
}

/// Inflates a whole gzip stream into memory.
#[cfg(feature = "gzip")]
pub fn inflate_gzip<R: Read>(reader: R) -> Result<Vec<u8>> {
    use flate2::read::MultiGzDecoder;

    let mut decoder = MultiGzDecoder::new(reader);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| PtfError::DecompressionFailed(format!("Gzip: {}", e)))?;
    Ok(inflated)
}

#[cfg(not(feature = "gzip"))]
pub fn inflate_gzip<R: Read>(_reader: R) -> Result<Vec<u8>> {
    Err(PtfError::UnsupportedCompression("gzip"))
}
