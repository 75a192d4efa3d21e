use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{GroupSpec, SelectionConfig};
use crate::record::ScoredRecord;
use crate::tags::TagKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    pub label: String,
    pub tags: TagKey,
    pub available: usize,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    pub pool_size: usize,
    pub above_threshold: usize,
    pub groups: Vec<GroupReport>,
    pub selected: usize,
}

#[derive(Debug, Clone)]
pub struct Selection {
    /// Group samples concatenated in group order
    pub records: Vec<ScoredRecord>,
    pub report: SelectionReport,
}

pub struct StratifiedSelector<'a> {
    score_field: &'a str,
    tags_field: &'a str,
    threshold: f64,
    seed: u64,
    groups: &'a [GroupSpec],
}

impl<'a> StratifiedSelector<'a> {
    pub fn new(config: &'a SelectionConfig) -> Self {
        Self {
            score_field: &config.score_field,
            tags_field: &config.tags_field,
            threshold: config.score_threshold,
            seed: config.seed,
            groups: &config.groups,
        }
    }

    /// Records passing the score threshold, each paired with its tag key
    pub fn keyed_above_threshold<'r>(&self, pool: &'r [ScoredRecord]) -> Vec<(TagKey, &'r ScoredRecord)> {
        pool.iter()
            .filter(|r| r.score(self.score_field).is_some_and(|s| s >= self.threshold))
            .map(|r| (r.tag_key(self.tags_field), r))
            .collect()
    }

    pub fn select(&self, pool: &[ScoredRecord]) -> Selection {
        let keyed = self.keyed_above_threshold(pool);
        self.select_keyed(pool.len(), &keyed)
    }

    /// Sample from records already filtered by `keyed_above_threshold`.
    pub fn select_keyed(&self, pool_size: usize, keyed: &[(TagKey, &ScoredRecord)]) -> Selection {
        let mut records = Vec::new();
        let mut groups = Vec::with_capacity(self.groups.len());

        for group in self.groups {
            let target = group.key();
            // Exact combination only: ("Positional", "Tactical") is not part of ("Tactical")
            let members: Vec<&ScoredRecord> = keyed
                .iter()
                .filter(|(key, _)| *key == target)
                .map(|(_, record)| *record)
                .collect();

            // Fresh generator per group so each sample only depends on the seed and its members
            let mut rng = StdRng::seed_from_u64(self.seed);
            let amount = members.len().min(group.cap);
            let sample: Vec<ScoredRecord> = members
                .choose_multiple(&mut rng, amount)
                .map(|record| (*record).clone())
                .collect();

            groups.push(GroupReport {
                label: group.label.clone(),
                tags: target,
                available: members.len(),
                selected: sample.len(),
            });
            records.extend(sample);
        }

        let report = SelectionReport {
            pool_size,
            above_threshold: keyed.len(),
            selected: records.len(),
            groups,
        };

        Selection { records, report }
    }
}

/// How many records carry each tag combination
pub fn tag_distribution<'r, I>(keys: I) -> BTreeMap<TagKey, usize>
where
    I: IntoIterator<Item = &'r TagKey>,
{
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key.clone()).or_insert(0) += 1;
    }
    counts
}
