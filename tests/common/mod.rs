// Writes synthetic plot files for the integration tests

use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Default)]
pub struct PlotFile {
    bytes: Vec<u8>,
}

impl PlotFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, payload: &[u8]) -> Self {
        let len = (payload.len() as u32).to_le_bytes();
        self.bytes.extend_from_slice(&len);
        self.bytes.extend_from_slice(payload);
        self.bytes.extend_from_slice(&len);
        self
    }

    pub fn title(self, title: &str) -> Self {
        self.record(b"TITL").record(format!("{:<40}", title).as_bytes())
    }

    pub fn key(self, groups: &[(&str, &str, &[u32])]) -> Self {
        let total: usize = groups.iter().map(|(_, _, items)| items.len()).sum();

        let mut counts = Vec::new();
        counts.extend_from_slice(&(groups.len() as u32).to_le_bytes());
        counts.extend_from_slice(&(total as u32).to_le_bytes());

        let mut names = Vec::new();
        let mut positions = Vec::new();
        let mut units = Vec::new();
        let mut items = Vec::new();
        let mut next = 1u32;
        for (name, unit, group_items) in groups {
            names.extend_from_slice(format!("{:<24}", name).as_bytes());
            positions.extend_from_slice(&next.to_le_bytes());
            units.extend_from_slice(format!("{:<16}", unit).as_bytes());
            for item in group_items.iter() {
                items.extend_from_slice(&item.to_le_bytes());
            }
            next += group_items.len() as u32;
        }

        self.record(b"KEY ")
            .record(&counts)
            .record(&names)
            .record(&positions)
            .record(&units)
            .record(&items)
    }

    pub fn step(self, samples: &[f32]) -> Self {
        let payload: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        self.record(b".TR/").record(&payload)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&self.bytes).unwrap();
        file.flush().unwrap();
        file
    }
}

/// The FOO example: three items in K, two timesteps.
pub fn foo_file() -> PlotFile {
    PlotFile::new()
        .title("Station blackout")
        .key(&[("FOO", "K", &[1, 2, 3])])
        .step(&[0.0, 0.5, 0.25, 0.0, 1.0, 2.0, 3.0])
        .step(&[1.5, 1.0, 0.25, 0.0, 4.0, 5.0, 6.0])
}
