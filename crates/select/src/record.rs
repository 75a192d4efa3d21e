use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tags::{RawTags, TagKey};

/// A scored pool entry. Every field is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoredRecord(pub Map<String, Value>);

impl ScoredRecord {
    /// Numeric score, `None` when absent or not a number
    pub fn score(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    pub fn raw_tags(&self, field: &str) -> RawTags {
        RawTags::from_value(self.0.get(field))
    }

    pub fn tag_key(&self, field: &str) -> TagKey {
        self.raw_tags(field).normalize()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl From<Value> for ScoredRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                Self(map)
            }
        }
    }
}
