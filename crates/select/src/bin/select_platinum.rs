use anyhow::Result;
use select::{SelectionConfig, run_selection};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Optional JSON config file; defaults otherwise
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = SelectionConfig::load(config_path.as_deref())?;

    let report = run_selection(&config)?;

    println!("Created dataset with {} records.", report.selected);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
