//! Sentence chunking for dataset records

use crate::types::ChunkRecord;
use unicode_segmentation::UnicodeSegmentation;

/// Split one dataset item's text into per-sentence chunk records.
///
/// Sentence boundaries follow UAX #29 segmentation. Whitespace-only
/// sentences are dropped; chunk indexes stay contiguous so ids are
/// `item#<item_idx>#0..n` with no gaps.
pub fn chunk_item(item_idx: usize, text: &str) -> Vec<ChunkRecord> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(chunk_idx, sentence)| ChunkRecord::new(item_idx, chunk_idx, sentence))
        .collect()
}
