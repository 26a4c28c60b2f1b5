//! Search backend client
//!
//! The managed vector-search backend is consumed, never reimplemented: it
//! owns embedding, indexing, and reranking. This module exposes the narrow
//! seam the rest of the crate depends on, plus the reqwest implementation.

mod client;

pub use client::IndexClient;

use crate::types::RawHit;
use thiserror::Error;

/// Query parameters forwarded to the backend on every search.
#[derive(Debug, Clone)]
pub struct QueryParams {
    /// Namespace to search within
    pub namespace: String,
    /// Maximum results to request
    pub top_k: usize,
    /// Optional server-side rerank block
    pub rerank: Option<RerankParams>,
}

/// Server-side reranking request block.
///
/// When present the backend reorders hits with the named model before
/// returning them; the returned `_score` is then a rerank relevance score
/// rather than a similarity score. Callers treat both uniformly.
#[derive(Debug, Clone)]
pub struct RerankParams {
    pub model: String,
    pub rank_fields: Vec<String>,
}

/// Errors from the backend client
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend client configuration: {0}")]
    InvalidConfig(String),

    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// One logical index on the search backend.
///
/// Implementations must be safe for concurrent independent calls: the hybrid
/// path issues two searches against two instances at once, and a shared HTTP
/// connection pool underneath is fine as long as calls don't race on mutable
/// state.
pub trait SearchIndex: Send + Sync {
    /// Search the index by query text, letting the backend embed the text
    /// with the model the index was created for.
    fn search_by_text(
        &self,
        query_text: &str,
        params: &QueryParams,
    ) -> impl std::future::Future<Output = Result<Vec<RawHit>, BackendError>> + Send;
}
