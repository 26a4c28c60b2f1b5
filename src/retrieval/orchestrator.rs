//! Query orchestration across the dense and sparse indexes

use super::{fuse, normalize, QuerySource, RetrievalError};
use crate::backend::{QueryParams, RerankParams, SearchIndex};
use crate::config::RetrievalConfig;
use crate::types::SearchRecord;
use crate::util::truncate_str;
use tracing::debug;

/// Retrieval orchestrator holding one handle per backend index.
///
/// Constructed once at startup with explicit handles (no process-wide client
/// state) and shared across requests; handles only need to support concurrent
/// independent calls.
pub struct Retriever<I: SearchIndex> {
    dense: I,
    sparse: I,
    config: RetrievalConfig,
}

impl<I: SearchIndex> Retriever<I> {
    pub fn new(dense: I, sparse: I, config: RetrievalConfig) -> Self {
        Self {
            dense,
            sparse,
            config,
        }
    }

    /// Query the dense index only. Backend score order is kept as-is.
    pub async fn semantic_search(
        &self,
        query_text: &str,
    ) -> Result<Vec<SearchRecord>, RetrievalError> {
        let query_text = validated(query_text)?;
        let hits = self.query_one(&self.dense, QuerySource::Dense, query_text).await?;
        normalize(hits)
    }

    /// Query the sparse index only. Backend score order is kept as-is.
    pub async fn lexical_search(
        &self,
        query_text: &str,
    ) -> Result<Vec<SearchRecord>, RetrievalError> {
        let query_text = validated(query_text)?;
        let hits = self.query_one(&self.sparse, QuerySource::Sparse, query_text).await?;
        normalize(hits)
    }

    /// Query both indexes concurrently and fuse the results.
    ///
    /// Both queries are in flight at once, so end-to-end latency is bounded
    /// by the slower index rather than the sum. Either branch failing aborts
    /// the whole operation; a partial hybrid result is never returned.
    pub async fn hybrid_search(
        &self,
        query_text: &str,
    ) -> Result<Vec<SearchRecord>, RetrievalError> {
        let query_text = validated(query_text)?;

        let dense_fut = self.query_one(&self.dense, QuerySource::Dense, query_text);
        let sparse_fut = self.query_one(&self.sparse, QuerySource::Sparse, query_text);
        let (dense_hits, sparse_hits) = tokio::try_join!(dense_fut, sparse_fut)?;

        let dense_records = normalize(dense_hits)?;
        let sparse_records = normalize(sparse_hits)?;

        let fused = fuse(vec![dense_records, sparse_records], self.config.top_k);
        debug!(
            "Hybrid search for '{}': {} fused results",
            truncate_str(query_text, 50),
            fused.len()
        );
        Ok(fused)
    }

    async fn query_one(
        &self,
        index: &I,
        source_index: QuerySource,
        query_text: &str,
    ) -> Result<Vec<crate::types::RawHit>, RetrievalError> {
        let params = self.query_params();
        index
            .search_by_text(query_text, &params)
            .await
            .map_err(|source| RetrievalError::BackendQuery {
                source_index,
                source,
            })
    }

    fn query_params(&self) -> QueryParams {
        QueryParams {
            namespace: self.config.namespace.clone(),
            top_k: self.config.top_k,
            rerank: self.config.rerank_enabled.then(|| RerankParams {
                model: self.config.rerank_model.clone(),
                rank_fields: self.config.rerank_fields.clone(),
            }),
        }
    }
}

fn validated(query_text: &str) -> Result<&str, RetrievalError> {
    if query_text.trim().is_empty() {
        return Err(RetrievalError::EmptyQuery);
    }
    Ok(query_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::types::{RawHit, CHUNK_TEXT_FIELD};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Mock index with a scripted response, an artificial delay, and a call
    /// counter.
    #[derive(Clone)]
    struct MockIndex {
        hits: Vec<RawHit>,
        fail: bool,
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl MockIndex {
        fn returning(hits: Vec<RawHit>) -> Self {
            Self {
                hits,
                fail: false,
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                hits: Vec::new(),
                fail: true,
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SearchIndex for MockIndex {
        async fn search_by_text(
            &self,
            _query_text: &str,
            _params: &QueryParams,
        ) -> Result<Vec<RawHit>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(BackendError::Decode("mock backend failure".to_string()));
            }
            Ok(self.hits.clone())
        }
    }

    /// Mock index that records the query parameters it receives.
    #[derive(Clone, Default)]
    struct CapturingIndex {
        captured: Arc<Mutex<Option<QueryParams>>>,
    }

    impl CapturingIndex {
        fn captured_params(&self) -> QueryParams {
            self.captured
                .lock()
                .unwrap()
                .clone()
                .expect("index was never queried")
        }
    }

    impl SearchIndex for CapturingIndex {
        async fn search_by_text(
            &self,
            _query_text: &str,
            params: &QueryParams,
        ) -> Result<Vec<RawHit>, BackendError> {
            *self.captured.lock().unwrap() = Some(params.clone());
            Ok(Vec::new())
        }
    }

    fn raw_hit(id: &str, score: f64) -> RawHit {
        let mut fields = HashMap::new();
        fields.insert(CHUNK_TEXT_FIELD.to_string(), format!("text for {}", id));
        RawHit {
            id: id.to_string(),
            score,
            fields,
        }
    }

    fn test_config(top_k: usize) -> RetrievalConfig {
        RetrievalConfig {
            namespace: "test".to_string(),
            top_k,
            ..RetrievalConfig::default()
        }
    }

    #[tokio::test]
    async fn semantic_search_keeps_backend_order() {
        let dense = MockIndex::returning(vec![raw_hit("b", 0.2), raw_hit("a", 0.9)]);
        let sparse = MockIndex::returning(vec![]);
        let retriever = Retriever::new(dense, sparse.clone(), test_config(10));

        let records = retriever.semantic_search("playoff game").await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        // No fusion, no re-sort on the single-source path
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(sparse.call_count(), 0);
    }

    #[tokio::test]
    async fn lexical_search_hits_only_the_sparse_index() {
        let dense = MockIndex::returning(vec![raw_hit("d", 0.9)]);
        let sparse = MockIndex::returning(vec![raw_hit("s", 0.4)]);
        let retriever = Retriever::new(dense.clone(), sparse.clone(), test_config(10));

        let records = retriever.lexical_search("halftime lead").await.unwrap();
        assert_eq!(records[0].id, "s");
        assert_eq!(dense.call_count(), 0);
        assert_eq!(sparse.call_count(), 1);
    }

    #[tokio::test]
    async fn hybrid_search_fuses_with_first_source_wins() {
        let dense = MockIndex::returning(vec![raw_hit("a", 0.9), raw_hit("b", 0.5)]);
        let sparse = MockIndex::returning(vec![raw_hit("b", 0.95), raw_hit("c", 0.3)]);
        let retriever = Retriever::new(dense, sparse, test_config(10));

        let records = retriever.hybrid_search("fourth quarter").await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[1].id, "b");
        assert_eq!(records[1].score, 0.5);
        assert_eq!(records[2].id, "c");
    }

    #[tokio::test]
    async fn hybrid_search_truncates_to_top_k() {
        let dense = MockIndex::returning(vec![raw_hit("a", 0.9), raw_hit("b", 0.5)]);
        let sparse = MockIndex::returning(vec![raw_hit("c", 0.3)]);
        let retriever = Retriever::new(dense, sparse, test_config(1));

        let records = retriever.hybrid_search("rebounds").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn hybrid_queries_run_concurrently() {
        let dense =
            MockIndex::returning(vec![raw_hit("a", 0.9)]).with_delay(Duration::from_millis(80));
        let sparse =
            MockIndex::returning(vec![raw_hit("b", 0.5)]).with_delay(Duration::from_millis(100));
        let retriever = Retriever::new(dense, sparse, test_config(10));

        let start = tokio::time::Instant::now();
        retriever.hybrid_search("final score").await.unwrap();
        let elapsed = start.elapsed();

        // Join semantics: latency tracks the slower branch, not the sum
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(180));
    }

    #[tokio::test]
    async fn hybrid_fails_fast_when_dense_fails() {
        let dense = MockIndex::failing();
        let sparse = MockIndex::returning(vec![raw_hit("b", 0.5)]);
        let retriever = Retriever::new(dense, sparse, test_config(10));

        let err = retriever.hybrid_search("turnovers").await.unwrap_err();
        match err {
            RetrievalError::BackendQuery { source_index, .. } => {
                assert_eq!(source_index, QuerySource::Dense);
            }
            other => panic!("expected BackendQuery, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn hybrid_fails_fast_when_sparse_fails() {
        let dense = MockIndex::returning(vec![raw_hit("a", 0.9)]);
        let sparse = MockIndex::failing();
        let retriever = Retriever::new(dense, sparse, test_config(10));

        let err = retriever.hybrid_search("assists").await.unwrap_err();
        match err {
            RetrievalError::BackendQuery { source_index, .. } => {
                assert_eq!(source_index, QuerySource::Sparse);
            }
            other => panic!("expected BackendQuery, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_backend_call() {
        let dense = MockIndex::returning(vec![raw_hit("a", 0.9)]);
        let sparse = MockIndex::returning(vec![raw_hit("b", 0.5)]);
        let retriever = Retriever::new(dense.clone(), sparse.clone(), test_config(10));

        for query in ["", "   ", "\t\n"] {
            assert!(matches!(
                retriever.hybrid_search(query).await,
                Err(RetrievalError::EmptyQuery)
            ));
            assert!(matches!(
                retriever.semantic_search(query).await,
                Err(RetrievalError::EmptyQuery)
            ));
            assert!(matches!(
                retriever.lexical_search(query).await,
                Err(RetrievalError::EmptyQuery)
            ));
        }
        assert_eq!(dense.call_count(), 0);
        assert_eq!(sparse.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_hit_fails_the_request() {
        let mut bad = raw_hit("broken", 0.5);
        bad.fields.clear();
        let dense = MockIndex::returning(vec![bad]);
        let sparse = MockIndex::returning(vec![]);
        let retriever = Retriever::new(dense, sparse, test_config(10));

        let err = retriever.semantic_search("steals").await.unwrap_err();
        assert!(matches!(err, RetrievalError::MalformedHit { .. }));
    }

    #[tokio::test]
    async fn backend_params_carry_namespace_and_top_k_without_rerank_by_default() {
        let dense = CapturingIndex::default();
        let retriever = Retriever::new(dense.clone(), CapturingIndex::default(), test_config(7));

        retriever.semantic_search("blocked shots").await.unwrap();

        let params = dense.captured_params();
        assert_eq!(params.namespace, "test");
        assert_eq!(params.top_k, 7);
        assert!(params.rerank.is_none());
    }

    #[tokio::test]
    async fn rerank_block_is_forwarded_to_both_indexes_when_enabled() {
        let dense = CapturingIndex::default();
        let sparse = CapturingIndex::default();
        let config = RetrievalConfig {
            namespace: "test".to_string(),
            top_k: 10,
            rerank_enabled: true,
            ..RetrievalConfig::default()
        };
        let retriever = Retriever::new(dense.clone(), sparse.clone(), config);

        retriever.hybrid_search("triple double").await.unwrap();

        for index in [&dense, &sparse] {
            let rerank = index.captured_params().rerank.expect("rerank block missing");
            assert_eq!(rerank.model, "cohere-rerank-3.5");
            assert_eq!(rerank.rank_fields, vec!["chunk_text".to_string()]);
        }
    }
}
