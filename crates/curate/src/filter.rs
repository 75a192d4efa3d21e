use regex::Regex;
use std::sync::LazyLock;

use crate::config::FilterConfig;
use crate::normalizer::strip_annotation_tags;

/// Algebraic move tokens: optional piece, disambiguation, capture, destination
static MOVE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8]\b").expect("move token pattern")
});

/// Why a comment was turned down. Only used for logging and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    Spam,
    MoveList,
}

pub struct QualityFilter {
    config: FilterConfig,
    spam_keywords: Vec<String>,
}

impl QualityFilter {
    pub fn new(config: FilterConfig) -> Self {
        let spam_keywords = config
            .spam_keywords
            .iter()
            .map(|kw| kw.to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();

        Self {
            config,
            spam_keywords,
        }
    }

    pub fn is_high_quality(&self, comment: &str) -> bool {
        self.check(comment).is_ok()
    }

    /// Run the checks in order, stopping at the first failure.
    pub fn check(&self, comment: &str) -> Result<(), Rejection> {
        let text = strip_annotation_tags(comment);

        let word_count = text.split_whitespace().count();
        if word_count < self.config.min_word_count {
            return Err(Rejection::TooShort);
        }

        let lower = text.to_lowercase();
        if self.spam_keywords.iter().any(|kw| lower.contains(kw.as_str())) {
            return Err(Rejection::Spam);
        }

        // Mostly a move list ("1. e4 e5 2. Nf3"), not prose
        let move_tokens = MOVE_TOKEN.find_iter(&text).count();
        if move_tokens as f64 > word_count as f64 * self.config.max_move_token_ratio {
            return Err(Rejection::MoveList);
        }

        Ok(())
    }
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_prose() {
        let filter = QualityFilter::default();
        assert!(filter.is_high_quality(
            "White sacrifices a piece for a strong attack and a lasting initiative against the king."
        ));
    }

    #[test]
    fn test_rejects_short_comments() {
        let filter = QualityFilter::default();
        assert_eq!(filter.check("Good move."), Err(Rejection::TooShort));
        assert_eq!(filter.check("one two three four"), Err(Rejection::TooShort));
        assert!(filter.is_high_quality("one two three four five"));
    }

    #[test]
    fn test_annotation_tags_do_not_count_as_words() {
        let filter = QualityFilter::default();
        assert_eq!(
            filter.check("Nice idea here [%eval 0.3] [%clk 0:05:00] [%csl Ge4]"),
            Err(Rejection::TooShort)
        );
    }

    #[test]
    fn test_rejects_spam_regardless_of_case() {
        let filter = QualityFilter::default();
        assert_eq!(
            filter.check("Please SUBSCRIBE to the channel for more great content"),
            Err(Rejection::Spam)
        );
        assert_eq!(
            filter.check("The full analysis is at https://example.org for everyone"),
            Err(Rejection::Spam)
        );
        // Substring match, not word boundary
        assert_eq!(
            filter.check("A heartbreaking loss after a long and tense struggle"),
            Err(Rejection::Spam)
        );
    }

    #[test]
    fn test_rejects_move_lists() {
        let filter = QualityFilter::default();
        assert_eq!(filter.check("1. e4 e5 2. Nf3 Nc6"), Err(Rejection::MoveList));
        assert_eq!(
            filter.check("Better was Rxe5 Bxe5 Qh5 Qxh7 Kg1 to follow"),
            Err(Rejection::MoveList)
        );
    }

    #[test]
    fn test_move_ratio_at_half_is_kept() {
        let filter = QualityFilter::default();
        // 4 move tokens out of 8 words
        assert!(filter.is_high_quality("After e4 and d4 White eyes c5 f5"));
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let filter = QualityFilter::new(FilterConfig {
            min_word_count: 2,
            max_move_token_ratio: 1.0,
            spam_keywords: vec!["Patreon".to_string()],
        });

        assert!(filter.is_high_quality("1. e4 e5"));
        assert!(filter.is_high_quality("watch this video now"));
        assert_eq!(filter.check("support me on patreon"), Err(Rejection::Spam));
    }
}
