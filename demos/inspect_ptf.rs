// Example usage of the PTF reader
//
//   cargo run --example inspect_ptf -- run.ptf [VARIABLE ...]

use anyhow::{bail, Context, Result};
use ptf_reader::{PtfReader, ReaderConfig};
use tracing::{debug, info, Level};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: inspect_ptf <file.ptf> [VARIABLE ...]");
    };
    let requested: Vec<String> = args.collect();

    let config = match std::env::var("PTF_READER_CONFIG") {
        Ok(config_path) => ReaderConfig::from_json_file(&config_path)
            .with_context(|| format!("loading config {}", config_path))?,
        Err(_) => ReaderConfig::default(),
    };

    let reader = PtfReader::open_with(&path, &config)
        .with_context(|| format!("opening {}", path))?;

    info!("{}", reader);
    info!("{} timesteps", reader.timestep_count());
    for descriptor in reader.catalog().entries() {
        debug!(
            "  [{}] {} ({})",
            descriptor.catalog_index, descriptor.display_name, descriptor.unit
        );
    }

    if requested.is_empty() {
        return Ok(());
    }

    let table = reader.extract(requested.as_slice())?;
    info!("Extracted {} rows x {} columns", table.rows(), table.columns());

    if !table.is_empty() {
        let last = table.rows() - 1;
        info!("First record: t={} {:?}", table.time()[0], table.row(0));
        info!("Last record: t={} {:?}", table.time()[last], table.row(last));
    }
    for (name, unit) in table.names().iter().zip(table.units()) {
        info!("  {} [{}]", name, unit);
    }

    Ok(())
}
