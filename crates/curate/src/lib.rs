pub mod config;
pub mod filter;
pub mod jsonl;
pub mod normalizer;
pub mod schema;
pub mod tagger;

pub use config::{CurationConfig, FilterConfig, TaggerConfig};
pub use filter::{QualityFilter, Rejection};
pub use jsonl::{JsonlWriter, read_jsonl};
pub use normalizer::{clean_comment, strip_annotation_tags};
pub use schema::{AnnotatedMoveRecord, Category, GameProvenance};
pub use tagger::Tagger;

use anyhow::Result;
use rand::Rng;
use tracing::debug;

/// A comment that survived the quality filter
#[derive(Debug, Clone, PartialEq)]
pub struct CuratedComment {
    pub explanation: String,
    pub tags: Vec<Category>,
}

/// Filter, normalizer and tagger wired together for per-move use
pub struct CommentCurator {
    filter: QualityFilter,
    tagger: Tagger,
    debug_sample_rate: f64,
}

impl CommentCurator {
    pub fn new(config: &CurationConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            filter: QualityFilter::new(config.filter.clone()),
            tagger: Tagger::new(&config.tagger)?,
            debug_sample_rate: config.debug_sample_rate,
        })
    }

    /// Decide on a raw comment; `Err` carries the rejection reason.
    pub fn curate(&self, raw: &str) -> std::result::Result<CuratedComment, Rejection> {
        if let Err(reason) = self.filter.check(raw) {
            self.sample_rejection(raw, reason);
            return Err(reason);
        }

        let explanation = clean_comment(raw);
        // Brace removal can drop tokens the filter counted as words
        if let Err(reason) = self.filter.check(&explanation) {
            self.sample_rejection(raw, reason);
            return Err(reason);
        }

        let tags = self.tagger.get_tags(&explanation);
        Ok(CuratedComment { explanation, tags })
    }

    pub fn filter(&self) -> &QualityFilter {
        &self.filter
    }

    fn sample_rejection(&self, raw: &str, reason: Rejection) {
        if self.debug_sample_rate > 0.0 && rand::thread_rng().gen_bool(self.debug_sample_rate) {
            let preview: String = raw.trim().chars().take(60).collect();
            debug!(?reason, comment = %preview, "Skipped comment");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_and_tags_prose() {
        let curator = CommentCurator::new(&CurationConfig::default()).unwrap();
        let raw = "  White sacrifices a piece for a strong attack and a lasting initiative against the king.  ";

        let curated = curator.curate(raw).unwrap();

        assert_eq!(curated.explanation, raw.trim());
        assert_eq!(curated.tags, vec![Category::Tactical, Category::Positional]);
    }

    #[test]
    fn test_rejects_move_list() {
        let curator = CommentCurator::new(&CurationConfig::default()).unwrap();
        assert_eq!(curator.curate("1. e4 e5 2. Nf3 Nc6"), Err(Rejection::MoveList));
    }

    #[test]
    fn test_untagged_comment_is_still_kept() {
        let curator = CommentCurator::new(&CurationConfig::default()).unwrap();
        let curated = curator
            .curate("A quiet and sensible reply that keeps everything together")
            .unwrap();

        assert!(curated.tags.is_empty());
    }

    #[test]
    fn test_explanation_satisfies_filter() {
        let curator = CommentCurator::new(&CurationConfig::default()).unwrap();
        // Five words only while the lone braces count
        assert!(curator.curate("{ good idea for White }").is_err());

        let curated = curator
            .curate("{ The [%eval 0.4] bishop is stronger than the knight here }")
            .unwrap();
        assert_eq!(curated.explanation, "The bishop is stronger than the knight here");
        assert!(curator.filter().is_high_quality(&curated.explanation));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = CurationConfig::default();
        config.debug_sample_rate = 2.0;
        assert!(CommentCurator::new(&config).is_err());
    }
}
