use anyhow::Result;
use ingest::{ExtractionConfig, run_extraction};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Optional JSON config file; defaults otherwise
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ExtractionConfig::load(config_path.as_deref())?;

    let stats = run_extraction(&config)?;

    println!("Finished. High-quality data saved to {}", config.output.display());
    println!("Total comments processed: {}", stats.total_comments);
    println!("High-quality comments retained: {}", stats.high_quality_comments);
    println!("Comments with tags: {}", stats.comments_with_tags);

    Ok(())
}
