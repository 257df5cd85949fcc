// Second pass: reads selected samples out of every data block

use crate::core::constants::{SAMPLE_SIZE, TIME_INDEX};
use crate::core::error::{FormatError, PtfError, Result};
use crate::core::format::{ProblemCatalog, SeriesTable, TimeRecordIndex};
use std::collections::BTreeSet;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use tracing::{debug, trace};

/// Which samples to read from each block and where each one lands.
#[derive(Debug, Clone)]
pub struct ReadPlan {
    names: Vec<String>,
    units: Vec<String>,
    // distinct catalog indices, ascending; TIME is always first
    slots: Vec<usize>,
    // output column -> position in `slots`
    columns: Vec<usize>,
}

impl ReadPlan {
    /// Resolves requested names against the catalog. Fails with every
    /// missing name, not just the first.
    pub fn new<S: AsRef<str>>(catalog: &ProblemCatalog, requested: &[S]) -> Result<Self> {
        let mut missing: Vec<String> = Vec::new();
        let mut indices = Vec::with_capacity(requested.len());
        let mut units = Vec::with_capacity(requested.len());

        for name in requested {
            let name = name.as_ref().trim();
            match catalog.get(name) {
                Some(descriptor) => {
                    indices.push(descriptor.catalog_index);
                    units.push(descriptor.unit.clone());
                }
                None => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                }
            }
        }
        if !missing.is_empty() {
            return Err(PtfError::MissingVariables(missing));
        }

        let slots: Vec<usize> = std::iter::once(TIME_INDEX)
            .chain(indices.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = indices
            .iter()
            .filter_map(|index| slots.binary_search(index).ok())
            .collect();

        let names = requested.iter().map(|n| n.as_ref().trim().to_string()).collect();

        debug!("Read plan: {} columns from {} distinct samples", indices.len(), slots.len());

        Ok(Self {
            names,
            units,
            slots,
            columns,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Minimum data block length able to serve this plan.
    fn required_block_len(&self) -> u64 {
        let last = self.slots.last().copied().unwrap_or(TIME_INDEX) as u64;
        (last + 1) * SAMPLE_SIZE
    }

    /// Reads the planned samples from every indexed block. Either the whole
    /// table is produced or an error is returned.
    pub fn execute<R: Read + Seek>(&self, reader: &mut R, index: &TimeRecordIndex) -> Result<SeriesTable> {
        let rows = index.len();
        let mut time = Vec::with_capacity(rows);
        let mut values = Vec::with_capacity(rows * self.columns());
        let mut samples = vec![0f64; self.slots.len()];
        let required = self.required_block_len();

        // where the reader is; None until the first absolute seek
        let mut position: Option<u64> = None;

        for (block_no, block) in index.blocks().iter().enumerate() {
            let truncated = || PtfError::from(FormatError::TruncatedData {
                block: block_no,
                offset: block.offset,
            });
            if block.len < required {
                return Err(truncated());
            }

            let start = block.offset + self.slots[0] as u64 * SAMPLE_SIZE;
            match position {
                Some(current) => reader.seek_relative(start as i64 - current as i64)?,
                None => {
                    reader.seek(SeekFrom::Start(start))?;
                }
            }

            let mut previous = self.slots[0];
            for (slot, &catalog_index) in self.slots.iter().enumerate() {
                let gap = catalog_index.saturating_sub(previous + 1);
                if slot > 0 && gap > 0 {
                    reader.seek_relative(gap as i64 * SAMPLE_SIZE as i64)?;
                }
                samples[slot] = read_sample(reader).map_err(|e| match e.kind() {
                    ErrorKind::UnexpectedEof => truncated(),
                    _ => PtfError::from(e),
                })?;
                previous = catalog_index;
            }
            position = Some(block.offset + (previous as u64 + 1) * SAMPLE_SIZE);

            trace!("Block {} at t={}", block_no, samples[0]);
            time.push(samples[0]);
            values.extend(self.columns.iter().map(|&slot| samples[slot]));
        }

        Ok(SeriesTable::new(self.names.clone(), self.units.clone(), time, values))
    }
}

fn read_sample<R: Read>(reader: &mut R) -> std::io::Result<f64> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f64::from(f32::from_le_bytes(buf)))
}
