// Byte source behind a reader: a buffered file or an inflated copy in memory

use crate::core::compression::{inflate_gzip, is_gzip};
use crate::core::error::{PtfError, Result};
use crate::models::reader_config::ReaderConfig;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

pub enum PlotSource {
    File(BufReader<File>),
    Memory(Cursor<Vec<u8>>),
}

impl PlotSource {
    pub fn open(path: &Path, config: &ReaderConfig) -> Result<Self> {
        let mut file = File::open(path)?;

        let mut magic = [0u8; 2];
        let peeked = file.read(&mut magic)?;
        file.seek(SeekFrom::Start(0))?;

        if !is_gzip(&magic[..peeked]) {
            return Ok(PlotSource::File(BufReader::with_capacity(config.buffer_capacity, file)));
        }
        if !config.decompress {
            return Err(PtfError::UnsupportedCompression("gzip"));
        }

        let inflated = inflate_gzip(BufReader::new(file))?;
        debug!("Inflated {} to {} bytes", path.display(), inflated.len());
        Ok(PlotSource::Memory(Cursor::new(inflated)))
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, PlotSource::Memory(_))
    }
}

impl Read for PlotSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            PlotSource::File(r) => r.read(buf),
            PlotSource::Memory(r) => r.read(buf),
        }
    }
}

impl Seek for PlotSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            PlotSource::File(r) => r.seek(pos),
            PlotSource::Memory(r) => r.seek(pos),
        }
    }

    // BufReader keeps its buffer on relative seeks that stay inside it
    fn seek_relative(&mut self, offset: i64) -> io::Result<()> {
        match self {
            PlotSource::File(r) => r.seek_relative(offset),
            PlotSource::Memory(r) => r.seek_relative(offset),
        }
    }
}
