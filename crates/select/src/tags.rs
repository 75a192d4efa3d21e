use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// One quoted item of a Python-style list literal, e.g. `'Tactical'`
static QUOTED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")\s*"#).expect("quoted item pattern")
});

/// Canonical tag combination: sorted, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TagKey(Vec<String>);

impl TagKey {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        tags.sort();
        tags.dedup();
        Self(tags)
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// The shapes a tag field shows up in across scoring runs.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTags {
    Missing,
    List(Vec<String>),
    /// A string: either one bare tag or a serialized list
    Text(String),
    /// Any other JSON scalar or object, kept as its JSON text
    Scalar(String),
}

impl RawTags {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => RawTags::Missing,
            Some(Value::Array(items)) => RawTags::List(items.iter().filter_map(item_to_tag).collect()),
            Some(Value::String(text)) => RawTags::Text(text.clone()),
            Some(other) => RawTags::Scalar(other.to_string()),
        }
    }

    pub fn normalize(self) -> TagKey {
        match self {
            RawTags::Missing => TagKey::default(),
            RawTags::List(items) => TagKey::new(items),
            RawTags::Scalar(text) => TagKey::new([text]),
            RawTags::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return TagKey::default();
                }
                if text.starts_with('[') && text.ends_with(']') {
                    if let Some(items) = parse_list_literal(text) {
                        return TagKey::new(items);
                    }
                }
                // Unparseable lists fall back to a single bare tag
                TagKey::new([text])
            }
        }
    }
}

fn item_to_tag(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse `["a", "b"]` as JSON, or `['a', "b"]` as a list of quoted strings.
fn parse_list_literal(text: &str) -> Option<Vec<String>> {
    if let Ok(items) = serde_json::from_str::<Vec<Value>>(text) {
        return Some(items.iter().filter_map(item_to_tag).collect());
    }

    let mut rest = text.strip_prefix('[')?.strip_suffix(']')?;
    let mut items = Vec::new();

    while !rest.trim().is_empty() {
        let caps = QUOTED_ITEM.captures(rest)?;
        let quoted = caps.get(1).or_else(|| caps.get(2))?;
        items.push(unescape(quoted.as_str()));

        rest = &rest[caps.get(0)?.end()..];
        match rest.strip_prefix(',') {
            Some(after) => rest = after,
            None if rest.trim().is_empty() => break,
            None => return None,
        }
    }

    Some(items)
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
