// Test-only writer for synthetic plot files

use crate::core::constants::*;

pub struct PtfBuilder {
    bytes: Vec<u8>,
    block_offsets: Vec<u64>,
}

impl PtfBuilder {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            block_offsets: Vec::new(),
        }
    }

    /// One KEY group "FOO" with items 1..=3 in "K", two timesteps.
    pub fn foo_example() -> Self {
        Self::new()
            .title("Test problem")
            .key(&["FOO"], &[1], &["K"], &[1, 2, 3])
            .data_block(&[0.0, 0.5, 0.125, 0.0, 1.0, 2.0, 3.0])
            .data_block(&[10.0, 0.75, 0.125, 0.0, 4.0, 5.0, 6.0])
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn record(mut self, payload: &[u8]) -> Self {
        let len = payload.len() as u32;
        self.bytes.extend_from_slice(&len.to_le_bytes());
        self.bytes.extend_from_slice(payload);
        self.bytes.extend_from_slice(&len.to_le_bytes());
        self
    }

    pub fn tag(self, tag: &[u8; 4]) -> Self {
        self.record(tag)
    }

    pub fn title(self, title: &str) -> Self {
        let mut padded = title.as_bytes().to_vec();
        padded.resize(title.len() + 8, b' ');
        self.tag(TITLE_TAG).record(&padded)
    }

    pub fn key(self, names: &[&str], positions: &[u32], units: &[&str], items: &[u32]) -> Self {
        let width = names.iter().map(|n| n.len()).max().unwrap_or(0) + 2;
        let mut counts = Vec::new();
        counts.extend_from_slice(&(names.len() as u32).to_le_bytes());
        counts.extend_from_slice(&(items.len() as u32).to_le_bytes());

        self.tag(KEY_TAG)
            .record(&counts)
            .record(&padded_strings(names, width))
            .record(&u32s(positions))
            .record(&padded_strings(units, UNIT_WIDTH))
            .record(&u32s(items))
    }

    pub fn data_block(mut self, samples: &[f32]) -> Self {
        let payload: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        self = self.tag(DATA_TAG);
        self.block_offsets.push(self.bytes.len() as u64 + LENGTH_FIELD_SIZE);
        self.record(&payload)
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    pub fn build_with_offsets(self) -> (Vec<u8>, Vec<u64>) {
        (self.bytes, self.block_offsets)
    }
}

fn padded_strings(values: &[&str], width: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * width);
    for value in values {
        let mut field = value.as_bytes().to_vec();
        field.resize(width, b' ');
        out.extend_from_slice(&field);
    }
    out
}

fn u32s(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
