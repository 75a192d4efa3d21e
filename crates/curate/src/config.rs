use anyhow::Result;
use serde::{Deserialize, Serialize};

const SPAM_KEYWORDS: &[&str] = &[
    "click", "subscribe", "video", "chapter", "lichess", "study",
    "heart", "donate", "check out", "http", "www.",
];

const TACTICAL_KEYWORDS: &[&str] = &[
    "pin", "fork", "skewer", "hanging", "mate", "checkmate", "threat",
    "tactic", "sacrifice", "blunder", "trap", "discovery", "discovered",
    "double attack", "capture", "exchange", "forcing", "combination",
    "intermezzo", "zwischenzug", "deflect", "decoy", "overloaded",
    "perpetual", "stalemate", "promotion", "remove the defender",
    "win material", "loose piece",
];

const POSITIONAL_KEYWORDS: &[&str] = &[
    "weakness", "weak", "outpost", "space", "structure", "control", "file",
    "diagonal", "open file", "rank", "bishop pair", "develop", "development",
    "prophylaxis", "prophylactic", "initiative", "maneuver", "pawn chain",
    "isolated", "doubled", "backward", "hole", "square", "mobility",
    "activity", "passive", "active", "coordination", "blockade", "block",
    "compensation", "majority", "minority", "color complex",
    "good bishop", "bad bishop", "tempo", "restrict", "bind",
];

fn to_owned_list(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub min_word_count: usize,
    /// Reject when move-notation tokens exceed this share of the words
    pub max_move_token_ratio: f64,
    /// Case-insensitive substrings marking promotional or meta comments
    pub spam_keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_word_count: 5,
            max_move_token_ratio: 0.5,
            spam_keywords: to_owned_list(SPAM_KEYWORDS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaggerConfig {
    pub tactical_keywords: Vec<String>,
    pub positional_keywords: Vec<String>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            tactical_keywords: to_owned_list(TACTICAL_KEYWORDS),
            positional_keywords: to_owned_list(POSITIONAL_KEYWORDS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurationConfig {
    pub filter: FilterConfig,
    pub tagger: TaggerConfig,
    /// Probability of logging a rejected comment at debug level
    pub debug_sample_rate: f64,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            tagger: TaggerConfig::default(),
            debug_sample_rate: 0.0,
        }
    }
}

impl CurationConfig {
    pub fn validate(&self) -> Result<()> {
        let ratio = self.filter.max_move_token_ratio;
        if !ratio.is_finite() || ratio < 0.0 {
            anyhow::bail!("max_move_token_ratio must be a non-negative number, got {}", ratio);
        }
        if !(0.0..=1.0).contains(&self.debug_sample_rate) {
            anyhow::bail!(
                "debug_sample_rate must be within [0, 1], got {}",
                self.debug_sample_rate
            );
        }
        if self.tagger.tactical_keywords.iter().chain(&self.tagger.positional_keywords)
            .any(|kw| kw.trim().is_empty())
        {
            anyhow::bail!("tagger keywords must not be blank");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CurationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.filter.min_word_count, 5);
        assert!(config.tagger.tactical_keywords.contains(&"fork".to_string()));
        assert!(config.tagger.positional_keywords.contains(&"outpost".to_string()));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: CurationConfig =
            serde_json::from_str(r#"{"filter": {"min_word_count": 8}}"#).unwrap();

        assert_eq!(config.filter.min_word_count, 8);
        assert_eq!(config.filter.max_move_token_ratio, 0.5);
        assert_eq!(config.tagger, TaggerConfig::default());
    }

    #[test]
    fn test_rejects_bad_ratio() {
        let mut config = CurationConfig::default();
        config.filter.max_move_token_ratio = f64::NAN;
        assert!(config.validate().is_err());

        config.filter.max_move_token_ratio = -0.1;
        assert!(config.validate().is_err());
    }
}
