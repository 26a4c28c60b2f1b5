//! Retrieval core: normalization, result fusion, and query orchestration

mod fusion;
mod normalize;
mod orchestrator;

pub use fusion::fuse;
pub use normalize::normalize;
pub use orchestrator::Retriever;

use crate::backend::BackendError;
use std::fmt;
use thiserror::Error;

/// Which backend index a query ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySource {
    Dense,
    Sparse,
}

impl fmt::Display for QuerySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySource::Dense => write!(f, "dense"),
            QuerySource::Sparse => write!(f, "sparse"),
        }
    }
}

/// Errors from the retrieval path
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The query text was empty or whitespace-only. Rejected before any
    /// backend I/O.
    #[error("text query cannot be empty")]
    EmptyQuery,

    /// The backend returned a hit missing a required field. A contract
    /// violation worth surfacing, not something to silently skip.
    #[error("malformed hit from backend: {detail}")]
    MalformedHit { detail: String },

    /// A backend query failed. In hybrid mode either branch failing aborts
    /// the whole operation; no partial results.
    #[error("{source_index} index query failed")]
    BackendQuery {
        source_index: QuerySource,
        #[source]
        source: BackendError,
    },
}
