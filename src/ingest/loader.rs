//! Dataset loading and batch upsert

use super::chunk_item;
use crate::backend::{BackendError, IndexClient};
use crate::types::ChunkRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Records per upsert request. Bounded by the embedding model's batch limit
/// and the API's upsert limit.
pub const UPSERT_BATCH_SIZE: usize = 96;

/// Upsert destination for chunk records. Both index clients implement this;
/// tests substitute a mock.
pub trait RecordSink: Send + Sync {
    fn upsert_records(
        &self,
        namespace: &str,
        records: &[ChunkRecord],
    ) -> impl std::future::Future<Output = Result<(), BackendError>> + Send;
}

impl RecordSink for IndexClient {
    async fn upsert_records(
        &self,
        namespace: &str,
        records: &[ChunkRecord],
    ) -> Result<(), BackendError> {
        IndexClient::upsert_records(self, namespace, records).await
    }
}

/// Counters for one ingestion run
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestStats {
    pub items_read: usize,
    pub chunks_created: usize,
    pub batches_upserted: usize,
    pub batches_failed: usize,
}

/// Read a JSONL dataset, sentence-chunk the named text field of every item,
/// and upsert the chunks to both indexes in batches.
///
/// A failed batch is logged with its record range and skipped; ingestion
/// carries on with the next batch. This is deliberately more forgiving than
/// the query path, which fails whole requests.
pub async fn load_dataset<S: RecordSink>(
    path: &Path,
    text_field: &str,
    namespace: &str,
    dense: &S,
    sparse: &S,
) -> Result<IngestStats> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset '{}'", path.display()))?;
    let reader = BufReader::new(file);

    let mut stats = IngestStats::default();
    let mut records: Vec<ChunkRecord> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read dataset line")?;
        if line.trim().is_empty() {
            continue;
        }
        let item: serde_json::Value = serde_json::from_str(&line)
            .with_context(|| format!("Invalid JSON on dataset line {}", line_no + 1))?;
        let text = item
            .get(text_field)
            .and_then(|v| v.as_str())
            .with_context(|| {
                format!("Dataset line {} has no text field '{}'", line_no + 1, text_field)
            })?;

        // Item indexes count dataset items, not file lines, so ids stay
        // contiguous even when blank lines appear
        let chunks = chunk_item(stats.items_read, text);
        stats.items_read += 1;
        stats.chunks_created += chunks.len();
        records.extend(chunks);
    }

    info!(
        "Chunked {} items into {} records, upserting in batches of {}",
        stats.items_read,
        stats.chunks_created,
        UPSERT_BATCH_SIZE
    );

    for batch in records.chunks(UPSERT_BATCH_SIZE) {
        match upsert_batch(namespace, dense, sparse, batch).await {
            Ok(()) => stats.batches_upserted += 1,
            Err(e) => {
                stats.batches_failed += 1;
                warn!(
                    "Failed to upsert batch {}..{}: {:#}",
                    batch.first().map(|r| r.id.as_str()).unwrap_or(""),
                    batch.last().map(|r| r.id.as_str()).unwrap_or(""),
                    e
                );
            }
        }
    }

    Ok(stats)
}

async fn upsert_batch<S: RecordSink>(
    namespace: &str,
    dense: &S,
    sparse: &S,
    batch: &[ChunkRecord],
) -> Result<()> {
    dense
        .upsert_records(namespace, batch)
        .await
        .context("dense index upsert failed")?;
    sparse
        .upsert_records(namespace, batch)
        .await
        .context("sparse index upsert failed")?;
    Ok(())
}
