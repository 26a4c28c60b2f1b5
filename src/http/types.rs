//! HTTP API Request/Response Types
//!
//! JSON-serializable types for the HTTP API.

use crate::types::SearchRecord;
use serde::{Deserialize, Serialize};

/// Query string accepted by every search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// The text to search for. Missing and empty are treated the same.
    #[serde(default)]
    pub text_query: Option<String>,
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Results ordered by relevance, at most one entry per id
    pub results: Vec<SearchRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn empty_query() -> Self {
        Self::new("EMPTY_QUERY", "Text query cannot be empty")
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new("BACKEND_ERROR", message)
    }
}
