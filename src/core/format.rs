// Data structures for the PTF format

use serde::Serialize;
use std::collections::HashMap;

/// One named variable group declared by the KEY group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseVariable {
    pub name: String,
    pub item_count: usize,
    pub unit: String,
}

/// One column of a timestep's sample array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableDescriptor {
    pub display_name: String,
    pub unit: String,
    pub catalog_index: usize,
}

/// The raw KEY group as stored in the file, before any interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyGroup {
    pub group_count: u32,
    pub total_item_count: u32,
    pub names: Vec<String>,
    pub positions: Vec<u32>,
    pub units: Vec<String>,
    pub items: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProblemCatalog {
    title: String,
    base_variables: Vec<BaseVariable>,
    entries: Vec<VariableDescriptor>,
    #[serde(skip)]
    lookup: HashMap<String, usize>,
}

impl ProblemCatalog {
    pub(crate) fn new(
        title: String,
        base_variables: Vec<BaseVariable>,
        entries: Vec<VariableDescriptor>,
        lookup: HashMap<String, usize>,
    ) -> Self {
        Self {
            title,
            base_variables,
            entries,
            lookup,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn base_variables(&self) -> &[BaseVariable] {
        &self.base_variables
    }

    pub fn entries(&self) -> &[VariableDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks a variable up by name, ignoring surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&VariableDescriptor> {
        self.lookup
            .get(name.trim())
            .map(|&index| &self.entries[index])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.display_name.as_str())
    }
}

/// Location of one `.TR/` payload in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataBlock {
    /// Byte offset of the first payload byte.
    pub offset: u64,
    pub len: u64,
}

/// File offsets of every stored timestep, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeRecordIndex {
    blocks: Vec<DataBlock>,
}

impl TimeRecordIndex {
    pub(crate) fn new(blocks: Vec<DataBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[DataBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Result of an extraction: a time axis and one column per requested name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesTable {
    names: Vec<String>,
    units: Vec<String>,
    time: Vec<f64>,
    // row-major, rows() x columns()
    values: Vec<f64>,
}

impl SeriesTable {
    pub(crate) fn new(names: Vec<String>, units: Vec<String>, time: Vec<f64>, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), time.len() * names.len());
        Self {
            names,
            units,
            time,
            values,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn rows(&self) -> usize {
        self.time.len()
    }

    pub fn columns(&self) -> usize {
        self.names.len()
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.columns();
        &self.values[row * width..(row + 1) * width]
    }

    pub fn column(&self, column: usize) -> Vec<f64> {
        (0..self.rows()).map(|row| self.row(row)[column]).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
