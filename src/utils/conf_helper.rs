use crate::core::error::Result;
use crate::models::reader_config::ReaderConfig;
use std::fs;
use std::path::Path;
use tracing::info;

impl ReaderConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        info!("Reader config loaded from {}", path.display());
        Ok(config)
    }
}
