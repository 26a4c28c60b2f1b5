//! Core types for vecgate

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for an indexed chunk, assigned at upsert time. Dense and
/// sparse indexes share the same id space because ingestion upserts identical
/// records to both.
pub type HitId = String;

/// Payload field holding the chunk body on every indexed record.
pub const CHUNK_TEXT_FIELD: &str = "chunk_text";

/// A raw hit as returned by the search backend.
///
/// The score scale is backend-defined and differs between the dense and
/// sparse indexes (and again when server-side reranking is on); callers must
/// not compare scores across sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id")]
    pub id: HitId,
    #[serde(rename = "_score")]
    pub score: f64,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

/// A normalized search result, the shape every retrieval mode produces.
///
/// Serializes as `{_id, score, chunk_text}`, the API response item shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(rename = "_id")]
    pub id: HitId,
    pub score: f64,
    pub chunk_text: String,
}

/// A chunk record destined for upsert during ingestion.
///
/// Ids follow the `item#<item_idx>#<chunk_idx>` scheme so the same source
/// sentence maps to the same id in both indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub chunk_text: String,
}

impl ChunkRecord {
    pub fn new(item_idx: usize, chunk_idx: usize, chunk_text: impl Into<String>) -> Self {
        Self {
            id: format!("item#{}#{}", item_idx, chunk_idx),
            chunk_text: chunk_text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_record_serializes_with_wire_field_names() {
        let record = SearchRecord {
            id: "item#0#1".to_string(),
            score: 0.87,
            chunk_text: "The home team won by twelve points.".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["_id"], "item#0#1");
        assert_eq!(json["score"], 0.87);
        assert_eq!(json["chunk_text"], "The home team won by twelve points.");
    }

    #[test]
    fn raw_hit_deserializes_backend_shape() {
        let json = r#"{"_id": "item#3#0", "_score": 0.42, "fields": {"chunk_text": "text"}}"#;
        let hit: RawHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.id, "item#3#0");
        assert_eq!(hit.score, 0.42);
        assert_eq!(hit.fields.get(CHUNK_TEXT_FIELD).unwrap(), "text");
    }

    #[test]
    fn raw_hit_tolerates_missing_fields_map() {
        let json = r#"{"_id": "item#3#0", "_score": 0.42}"#;
        let hit: RawHit = serde_json::from_str(json).unwrap();
        assert!(hit.fields.is_empty());
    }

    #[test]
    fn chunk_record_id_scheme() {
        let record = ChunkRecord::new(7, 2, "a sentence");
        assert_eq!(record.id, "item#7#2");
    }
}
