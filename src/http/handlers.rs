//! HTTP API Request Handlers
//!
//! Handlers that map HTTP requests to Retriever operations.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{debug, error};

use crate::backend::SearchIndex;
use crate::retrieval::{Retriever, RetrievalError};
use crate::types::SearchRecord;

use super::types::{ErrorResponse, HealthResponse, SearchParams, SearchResponse};

/// Shared application state
pub struct AppState<I: SearchIndex> {
    pub retriever: Arc<Retriever<I>>,
}

// Manual impl: `I` itself need not be Clone, only the Arc is cloned
impl<I: SearchIndex> Clone for AppState<I> {
    fn clone(&self) -> Self {
        Self {
            retriever: self.retriever.clone(),
        }
    }
}

/// Hybrid search across both indexes (also mounted at the bare search path)
pub async fn hybrid_search<I: SearchIndex + 'static>(
    State(state): State<AppState<I>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = params.text_query.unwrap_or_default();
    debug!("HTTP hybrid search: text_query={:?}", query);
    respond(state.retriever.hybrid_search(&query).await)
}

/// Dense (semantic) search only
pub async fn dense_search<I: SearchIndex + 'static>(
    State(state): State<AppState<I>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = params.text_query.unwrap_or_default();
    debug!("HTTP dense search: text_query={:?}", query);
    respond(state.retriever.semantic_search(&query).await)
}

/// Sparse (lexical) search only
pub async fn sparse_search<I: SearchIndex + 'static>(
    State(state): State<AppState<I>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = params.text_query.unwrap_or_default();
    debug!("HTTP sparse search: text_query={:?}", query);
    respond(state.retriever.lexical_search(&query).await)
}

/// Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn respond(result: Result<Vec<SearchRecord>, RetrievalError>) -> axum::response::Response {
    match result {
        Ok(results) => (StatusCode::OK, Json(SearchResponse { results })).into_response(),
        Err(RetrievalError::EmptyQuery) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::empty_query()),
        )
            .into_response(),
        Err(err) => {
            error!("Search failed: {:#}", anyhow::Error::new(err));
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::bad_gateway("Search backend query failed")),
            )
                .into_response()
        }
    }
}
