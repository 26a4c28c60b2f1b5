//! HTTP API Route Definitions

use axum::{routing::get, Router};

use crate::backend::SearchIndex;

use super::handlers::{self, AppState};

/// Create the API router with all routes.
///
/// The bare search path serves hybrid retrieval; the mode-specific paths pin
/// one index each.
pub fn create_router<I: SearchIndex + 'static>(app_state: AppState<I>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/search", get(handlers::hybrid_search::<I>))
        .route("/api/search/dense", get(handlers::dense_search::<I>))
        .route("/api/search/sparse", get(handlers::sparse_search::<I>))
        .route("/api/search/hybrid", get(handlers::hybrid_search::<I>))
        .with_state(app_state)
}
