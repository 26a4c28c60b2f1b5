//! Result fusion
//!
//! Merges independently ranked result lists into one deduplicated,
//! score-ordered list. Scores are taken at face value; no calibration is
//! attempted across sources.

use crate::types::{HitId, SearchRecord};
use std::collections::HashSet;

/// Fuse one or more result lists into a single ranked list.
///
/// Lists are concatenated in argument order and deduplicated by id keeping
/// the first occurrence: when an id appears in several lists, the earlier
/// list's score and text win even if a later duplicate scored higher. The
/// surviving set is then sorted by score descending (stable, so equal scores
/// keep first-encounter order) and truncated to `limit`.
///
/// Works for any number of lists, including one; in-list duplicates are
/// collapsed the same way.
pub fn fuse(lists: Vec<Vec<SearchRecord>>, limit: usize) -> Vec<SearchRecord> {
    let mut seen: HashSet<HitId> = HashSet::new();
    let mut merged: Vec<SearchRecord> = Vec::new();

    for record in lists.into_iter().flatten() {
        if seen.insert(record.id.clone()) {
            merged.push(record);
        }
    }

    // Stable sort keeps first-encounter order on score ties
    merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    merged.truncate(limit);
    merged
}
