use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::tags::TagKey;

/// One stratum of the final dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupSpec {
    pub label: String,
    /// Exact tag combination; order does not matter
    pub tags: Vec<String>,
    pub cap: usize,
}

impl GroupSpec {
    pub fn new(label: &str, tags: &[&str], cap: usize) -> Self {
        Self {
            label: label.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            cap,
        }
    }

    pub fn key(&self) -> TagKey {
        TagKey::new(self.tags.iter().cloned())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub score_field: String,
    pub tags_field: String,
    /// Records need `score >= score_threshold`
    pub score_threshold: f64,
    pub seed: u64,
    pub groups: Vec<GroupSpec>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/step2_qwen3_scored.jsonl"),
            output: PathBuf::from("data/platinum_qwen3_1k.jsonl"),
            score_field: "slm_score".to_string(),
            tags_field: "slm_tags".to_string(),
            score_threshold: 4.0,
            seed: 42,
            groups: vec![
                GroupSpec::new("tactical", &["Tactical"], 300),
                GroupSpec::new("positional", &["Positional"], 300),
                GroupSpec::new("both", &["Tactical", "Positional"], 400),
            ],
        }
    }
}

impl SelectionConfig {
    /// Single-tag scoring runs: one `slm_tag` string per record.
    pub fn legacy() -> Self {
        Self {
            input: PathBuf::from("data/step2_tagged.jsonl"),
            output: PathBuf::from("data/platinum_1k.jsonl"),
            tags_field: "slm_tag".to_string(),
            score_threshold: 5.0,
            groups: vec![
                GroupSpec::new("tactical", &["Tactical"], 500),
                GroupSpec::new("positional", &["Positional"], 500),
            ],
            ..Self::default()
        }
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .context(format!("Failed to read config: {:?}", path))?;
                serde_json::from_str(&content)
                    .context(format!("Failed to parse config: {:?}", path))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.score_threshold.is_finite() {
            anyhow::bail!("score_threshold must be a finite number");
        }
        if self.score_field.is_empty() || self.tags_field.is_empty() {
            anyhow::bail!("score_field and tags_field must be set");
        }

        let mut labels = HashSet::new();
        let mut keys = HashSet::new();
        for group in &self.groups {
            if group.label.trim().is_empty() {
                anyhow::bail!("group labels must not be empty");
            }
            if !labels.insert(group.label.as_str()) {
                anyhow::bail!("duplicate group label: {}", group.label);
            }
            // Groups must stay disjoint or the same records are sampled twice
            let key = group.key();
            if !keys.insert(key.clone()) {
                anyhow::bail!("group {} repeats the tag combination {}", group.label, key);
            }
        }
        Ok(())
    }

    /// Upper bound on the size of the selected dataset
    pub fn total_cap(&self) -> usize {
        self.groups.iter().map(|g| g.cap).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let current = SelectionConfig::default();
        assert!(current.validate().is_ok());
        assert_eq!(current.total_cap(), 1000);
        assert_eq!(current.groups[2].key(), TagKey::new(["Positional", "Tactical"]));

        let legacy = SelectionConfig::legacy();
        assert!(legacy.validate().is_ok());
        assert_eq!(legacy.tags_field, "slm_tag");
        assert_eq!(legacy.score_threshold, 5.0);
        assert_eq!(legacy.seed, 42);
        assert_eq!(legacy.total_cap(), 1000);
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let mut config = SelectionConfig::default();
        config.groups.push(GroupSpec::new("both", &["Tactical"], 1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_tag_combinations_rejected() {
        let mut config = SelectionConfig::default();
        config.groups = vec![
            GroupSpec::new("a", &["Tactical"], 2),
            GroupSpec::new("b", &["Tactical"], 2),
        ];
        assert!(config.validate().is_err());

        // Order and repeats inside a group do not make it a new combination
        config.groups = vec![
            GroupSpec::new("mixed", &["Tactical", "Positional"], 2),
            GroupSpec::new("mixed again", &["Positional", "Tactical", "Tactical"], 2),
        ];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("select.json");
        std::fs::write(&path, r#"{"score_threshold": 3, "groups": [{"label": "t", "tags": ["Tactical"], "cap": 2}]}"#)
            .unwrap();

        let config = SelectionConfig::load(Some(&path)).unwrap();
        assert_eq!(config.score_threshold, 3.0);
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.tags_field, "slm_tags");
    }
}
