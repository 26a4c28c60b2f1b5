//! HTTP client for one backend index host

use super::{BackendError, QueryParams, RerankParams};
use crate::types::{ChunkRecord, RawHit};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "Api-Key";

/// Client for a single index host on the managed search backend.
///
/// Built once at startup and cloned into request handlers; the underlying
/// `reqwest::Client` holds a shared connection pool and is safe for
/// concurrent in-flight requests, so the hybrid path can query two
/// `IndexClient`s at the same time without locking.
#[derive(Debug, Clone)]
pub struct IndexClient {
    client: Client,
    base_url: String,
}

/// Search request wire format
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: QueryBlock<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rerank: Option<RerankBlock<'a>>,
}

#[derive(Debug, Serialize)]
struct QueryBlock<'a> {
    inputs: QueryInputs<'a>,
    top_k: usize,
}

#[derive(Debug, Serialize)]
struct QueryInputs<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct RerankBlock<'a> {
    model: &'a str,
    rank_fields: &'a [String],
}

/// Search response wire format
#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    hits: Vec<RawHit>,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    records: &'a [ChunkRecord],
}

impl IndexClient {
    /// Create a client for the given index host.
    ///
    /// The API key is baked into default headers so every request carries it.
    pub fn new(host: &str, api_key: &str, timeout_secs: u64) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut key_value = HeaderValue::from_str(api_key)
            .map_err(|e| BackendError::InvalidConfig(format!("invalid API key format: {}", e)))?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()?;

        // Index hosts are usually given without a scheme
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host.trim_end_matches('/'))
        };

        Ok(Self { client, base_url })
    }

    /// Search the index by query text.
    pub async fn search_by_text(
        &self,
        query_text: &str,
        params: &QueryParams,
    ) -> Result<Vec<RawHit>, BackendError> {
        let url = format!(
            "{}/records/namespaces/{}/search",
            self.base_url, params.namespace
        );

        let request = SearchRequest {
            query: QueryBlock {
                inputs: QueryInputs { text: query_text },
                top_k: params.top_k,
            },
            rerank: params.rerank.as_ref().map(|r: &RerankParams| RerankBlock {
                model: &r.model,
                rank_fields: &r.rank_fields,
            }),
        };

        debug!("Searching {} (top_k={})", url, params.top_k);

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(parsed.result.hits)
    }

    /// Upsert chunk records into the index, letting the backend embed them.
    pub async fn upsert_records(
        &self,
        namespace: &str,
        records: &[ChunkRecord],
    ) -> Result<(), BackendError> {
        let url = format!("{}/records/namespaces/{}/upsert", self.base_url, namespace);

        let response = self
            .client
            .post(&url)
            .json(&UpsertRequest { records })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Upsert to {} failed with {}", url, status);
            return Err(BackendError::Status { status, body });
        }

        Ok(())
    }
}

impl super::SearchIndex for IndexClient {
    async fn search_by_text(
        &self,
        query_text: &str,
        params: &QueryParams,
    ) -> Result<Vec<RawHit>, BackendError> {
        IndexClient::search_by_text(self, query_text, params).await
    }
}
