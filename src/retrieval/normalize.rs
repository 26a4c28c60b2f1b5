//! Raw hit normalization

use super::RetrievalError;
use crate::types::{RawHit, SearchRecord, CHUNK_TEXT_FIELD};

/// Project raw backend hits into canonical search records, preserving order.
///
/// A hit without a `chunk_text` payload field means the backend broke its
/// contract (every ingested record carries one); the whole batch fails
/// rather than silently dropping the hit.
pub fn normalize(hits: Vec<RawHit>) -> Result<Vec<SearchRecord>, RetrievalError> {
    hits.into_iter()
        .map(|mut hit| {
            let chunk_text = hit.fields.remove(CHUNK_TEXT_FIELD).ok_or_else(|| {
                RetrievalError::MalformedHit {
                    detail: format!("hit '{}' is missing the '{}' field", hit.id, CHUNK_TEXT_FIELD),
                }
            })?;
            Ok(SearchRecord {
                id: hit.id,
                score: hit.score,
                chunk_text,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn raw_hit(id: &str, score: f64, text: Option<&str>) -> RawHit {
        let mut fields = HashMap::new();
        if let Some(text) = text {
            fields.insert(CHUNK_TEXT_FIELD.to_string(), text.to_string());
        }
        RawHit {
            id: id.to_string(),
            score,
            fields,
        }
    }

    #[test]
    fn projects_fields_one_to_one() {
        let hits = vec![raw_hit("item#0#0", 0.93, Some("The visitors led at halftime."))];
        let records = normalize(hits).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "item#0#0");
        assert_eq!(records[0].score, 0.93);
        assert_eq!(records[0].chunk_text, "The visitors led at halftime.");
    }

    #[test]
    fn preserves_input_order() {
        let hits = vec![
            raw_hit("b", 0.2, Some("second by score")),
            raw_hit("a", 0.9, Some("first by score")),
        ];
        let records = normalize(hits).unwrap();
        assert_eq!(records[0].id, "b");
        assert_eq!(records[1].id, "a");
    }

    #[test]
    fn missing_chunk_text_fails_the_whole_batch() {
        let hits = vec![
            raw_hit("ok", 0.9, Some("fine")),
            raw_hit("broken", 0.5, None),
        ];
        let err = normalize(hits).unwrap_err();
        match err {
            RetrievalError::MalformedHit { detail } => {
                assert!(detail.contains("broken"));
                assert!(detail.contains("chunk_text"));
            }
            other => panic!("expected MalformedHit, got {:?}", other),
        }
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(normalize(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let mut hit = raw_hit("a", 0.5, Some("body"));
        hit.fields.insert("category".to_string(), "sports".to_string());
        let records = normalize(vec![hit]).unwrap();
        assert_eq!(records[0].chunk_text, "body");
    }
}
