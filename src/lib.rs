//! vecgate: HTTP gateway for managed vector search
//!
//! A thin HTTP façade over a managed vector-search backend, featuring:
//! - Dense (semantic), sparse (lexical), and hybrid retrieval endpoints
//! - Concurrent dual-index querying with deduplicating result fusion
//! - Optional server-side reranking forwarded to the backend
//! - Offline ingestion: sentence-chunk a dataset and upsert to both indexes

pub mod backend;
pub mod config;
pub mod http;
pub mod ingest;
pub mod retrieval;
pub mod types;
pub mod util;

pub use config::Config;
pub use types::*;
