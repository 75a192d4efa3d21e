pub mod config;
pub mod record;
pub mod selector;
pub mod tags;

pub use config::{GroupSpec, SelectionConfig};
pub use record::ScoredRecord;
pub use selector::{GroupReport, Selection, SelectionReport, StratifiedSelector, tag_distribution};
pub use tags::{RawTags, TagKey};

use anyhow::Result;
use curate::{JsonlWriter, read_jsonl};
use std::path::Path;
use tracing::info;

/// Read the scored pool, sample every group and write the platinum dataset.
pub fn run_selection(config: &SelectionConfig) -> Result<SelectionReport> {
    config.validate()?;

    let pool: Vec<ScoredRecord> = read_jsonl(&config.input)?;
    let selector = StratifiedSelector::new(config);

    let keyed = selector.keyed_above_threshold(&pool);
    for (key, count) in tag_distribution(keyed.iter().map(|(key, _)| key)) {
        info!(tags = %key, count, "High-quality records per tag combination");
    }

    let selection = selector.select_keyed(pool.len(), &keyed);

    let mut sink = JsonlWriter::create(&config.output)?;
    for record in &selection.records {
        sink.write(record)?;
    }
    sink.finish()?;

    for group in &selection.report.groups {
        info!(
            group = %group.label,
            tags = %group.tags,
            available = group.available,
            selected = group.selected,
            "Sampled group"
        );
    }
    info!(
        selected = selection.report.selected,
        output = ?config.output,
        "Created platinum dataset"
    );

    Ok(selection.report)
}

/// Copy records that carry at least one tag. Returns how many were kept.
pub fn keep_tagged(input: &Path, output: &Path, tags_field: &str) -> Result<usize> {
    let records: Vec<ScoredRecord> = read_jsonl(input)?;
    let mut sink = JsonlWriter::create(output)?;

    for record in records.iter().filter(|r| !r.tag_key(tags_field).is_empty()) {
        sink.write(record)?;
    }

    let kept = sink.finish()?;
    info!(total = records.len(), kept, "Kept tagged records");
    Ok(kept)
}
