//! Entities (users, agents, runs) under which the service groups memories.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One entity as returned by `GET /v1/entities/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity kind as used in the delete path, e.g. "user", "agent".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Remaining fields (name, counts, timestamps) passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            extra: Map::new(),
        }
    }
}

/// `{ "results": [...] }` envelope of the entity listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityList {
    #[serde(default)]
    pub results: Vec<Entity>,
}

impl EntityList {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "entity id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_list_keeps_extra_fields() {
        let list: EntityList = serde_json::from_value(serde_json::json!({
            "results": [
                { "type": "user", "id": "alex", "total_memories": 3 },
                { "type": "agent", "id": 42 }
            ]
        }))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.results[0].kind, "user");
        assert_eq!(list.results[0].extra["total_memories"], 3);
        assert_eq!(list.results[1].id, "42");
    }

    #[test]
    fn missing_results_is_empty() {
        let list: EntityList = serde_json::from_str("{}").unwrap();
        assert!(list.is_empty());
    }
}
