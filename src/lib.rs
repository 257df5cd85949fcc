// MELCOR PTF Rust Reader
// Main library entry point

pub mod core;
pub mod models;
pub mod utils;

// Re-export main types
pub use crate::core::error::{FormatError, PtfError, Result};
pub use crate::core::format::{BaseVariable, DataBlock, ProblemCatalog, SeriesTable, TimeRecordIndex, VariableDescriptor};
pub use crate::core::reader::PtfReader;
pub use crate::core::source::PlotSource;
pub use models::reader_config::ReaderConfig;
