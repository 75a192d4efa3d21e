use anyhow::{Context, Result};
use regex::Regex;

use crate::config::TaggerConfig;
use crate::schema::Category;

/// Whole-word keyword matching per category. A keyword also matches with a
/// regular inflection ("sacrifices", "forked", "blocking").
pub struct Tagger {
    tactical: Option<Regex>,
    positional: Option<Regex>,
}

impl Tagger {
    pub fn new(config: &TaggerConfig) -> Result<Self> {
        Ok(Self {
            tactical: build_keyword_pattern(&config.tactical_keywords)
                .context("Invalid tactical keyword list")?,
            positional: build_keyword_pattern(&config.positional_keywords)
                .context("Invalid positional keyword list")?,
        })
    }

    pub fn get_tags(&self, comment: &str) -> Vec<Category> {
        let lower = comment.to_lowercase();
        let mut tags = Vec::new();

        if matches_any(&self.tactical, &lower) {
            tags.push(Category::Tactical);
        }
        if matches_any(&self.positional, &lower) {
            tags.push(Category::Positional);
        }

        tags
    }
}

fn matches_any(pattern: &Option<Regex>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

fn build_keyword_pattern(keywords: &[String]) -> Result<Option<Regex>> {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| !kw.is_empty())
        .map(|kw| {
            kw.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    let pattern = format!(r"\b(?:{})(?:s|es|d|ed|ing)?\b", alternatives.join("|"));
    let re = Regex::new(&pattern)?;
    Ok(Some(re))
}
