// Main PTF reader: scans once at open, extracts on demand

use crate::core::catalog::build_catalog;
use crate::core::constants::TIME_INDEX;
use crate::core::error::{PtfError, Result};
use crate::core::extract::ReadPlan;
use crate::core::format::{ProblemCatalog, SeriesTable, TimeRecordIndex};
use crate::core::scanner::Scanner;
use crate::core::source::PlotSource;
use crate::models::reader_config::ReaderConfig;
use std::fmt;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// An open plot file. Catalog and index are fixed at open time; the byte
/// source is only touched again by [`PtfReader::extract`].
pub struct PtfReader<R = PlotSource> {
    path: Option<PathBuf>,
    source: Mutex<R>,
    catalog: ProblemCatalog,
    index: TimeRecordIndex,
}

impl PtfReader<PlotSource> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &ReaderConfig::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let source = PlotSource::open(&path, config)?;
        let compressed = source.is_compressed();
        let mut reader = Self::from_reader(source, config)?;
        info!("Opened {} (gzip: {})", path.display(), compressed);
        reader.path = Some(path);
        Ok(reader)
    }
}

impl<R: Read + Seek> PtfReader<R> {
    /// Scans any seekable byte source, e.g. a `Cursor` over an in-memory file.
    pub fn from_reader(mut source: R, config: &ReaderConfig) -> Result<Self> {
        let scan = Scanner::new(&mut source, config.verify_trailers)?.scan()?;
        let catalog = build_catalog(scan.title, &scan.key)?;

        info!(
            "Plot file '{}': {} variables, {} timesteps",
            catalog.title(),
            catalog.len(),
            scan.index.len()
        );

        Ok(Self {
            path: None,
            source: Mutex::new(source),
            catalog,
            index: scan.index,
        })
    }

    /// Reads the named variables from every timestep.
    ///
    /// The time axis is always returned separately; asking for `TIME` adds it
    /// as an ordinary column too. Names may repeat and are matched after
    /// trimming.
    pub fn extract<S: AsRef<str>>(&self, names: &[S]) -> Result<SeriesTable> {
        let plan = ReadPlan::new(&self.catalog, names)?;
        let mut source = self.source.lock().map_err(|_| PtfError::LockPoisoned)?;
        plan.execute(&mut *source, &self.index)
    }

    /// Every variable except `TIME`, in catalog order.
    pub fn extract_all(&self) -> Result<SeriesTable> {
        let names: Vec<&str> = self
            .catalog
            .entries()
            .iter()
            .filter(|e| e.catalog_index != TIME_INDEX)
            .map(|e| e.display_name.as_str())
            .collect();
        self.extract(names.as_slice())
    }
}

impl<R> PtfReader<R> {
    pub fn title(&self) -> &str {
        self.catalog.title()
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.catalog.names().collect()
    }

    pub fn catalog(&self) -> &ProblemCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &TimeRecordIndex {
        &self.index
    }

    pub fn timestep_count(&self) -> usize {
        self.index.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.catalog.get(name).is_some()
    }

    pub fn unit_of(&self, name: &str) -> Option<&str> {
        self.catalog.get(name).map(|d| d.unit.as_str())
    }

    /// Path the reader was opened from; `None` for in-memory sources.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl<R> fmt::Display for PtfReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PTF file titled {}", self.title())
    }
}

impl<R> fmt::Debug for PtfReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PtfReader")
            .field("path", &self.path)
            .field("title", &self.title())
            .field("variables", &self.catalog.len())
            .field("timesteps", &self.index.len())
            .finish()
    }
}
