//! Offline ingestion
//!
//! Chunks a text dataset into sentence records and upserts them to both
//! indexes so dense and sparse assign identical ids to identical chunks.

mod chunker;
mod loader;

pub use chunker::chunk_item;
pub use loader::{load_dataset, IngestStats, RecordSink, UPSERT_BATCH_SIZE};
