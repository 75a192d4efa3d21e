use anyhow::{Context, Result};
use curate::CurationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// A `.jsonl` file or a directory searched recursively for them
    pub input: PathBuf,
    pub output: PathBuf,
    pub curation: CurationConfig,
    /// Write records even when no category matched
    pub keep_untagged: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("annotated_pgn"),
            output: PathBuf::from("data/chess_annotation_filtered.jsonl"),
            curation: CurationConfig::default(),
            keep_untagged: true,
        }
    }
}

impl ExtractionConfig {
    /// Defaults, overridden by a JSON file when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .context(format!("Failed to read config: {:?}", path))?;
                serde_json::from_str(&content)
                    .context(format!("Failed to parse config: {:?}", path))?
            }
            None => Self::default(),
        };
        config.curation.validate()?;
        Ok(config)
    }

    /// Only records with at least one category.
    pub fn tagged_only() -> Self {
        Self {
            output: PathBuf::from("data/chess_reasoning_tagged.jsonl"),
            keep_untagged: false,
            ..Self::default()
        }
    }
}
