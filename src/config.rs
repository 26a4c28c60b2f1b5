//! Configuration for vecgate
//!
//! All settings are environment-sourced and read once at startup; nothing is
//! mutated afterwards.

use anyhow::Result;
use std::env;

/// Default number of results requested from each index per query.
pub const DEFAULT_TOP_K: usize = 10;

/// Default HTTP listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

/// Server-side reranking model applied by the backend when enabled.
pub const DEFAULT_RERANK_MODEL: &str = "cohere-rerank-3.5";

/// Main configuration for the vecgate service
#[derive(Debug, Clone)]
pub struct Config {
    /// Search backend connection settings
    pub backend: BackendConfig,
    /// Retrieval parameters shared by every query mode
    pub retrieval: RetrievalConfig,
    /// HTTP server settings
    pub http: HttpConfig,
}

/// Connection settings for the managed search backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// API key sent with every backend request
    pub api_key: String,
    /// Host address of the dense (semantic) index
    pub dense_index_host: String,
    /// Host address of the sparse (lexical) index
    pub sparse_index_host: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Retrieval parameters
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Namespace queried and upserted into
    pub namespace: String,
    /// Maximum results requested from each index
    pub top_k: usize,
    /// Whether the backend should rerank hits server-side before returning
    pub rerank_enabled: bool,
    /// Reranking model name
    pub rerank_model: String,
    /// Record fields the reranker scores on
    pub rerank_fields: Vec<String>,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Listen address (host:port)
    pub listen_addr: String,
    /// Whether to add a permissive CORS layer
    pub cors_enabled: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            top_k: DEFAULT_TOP_K,
            rerank_enabled: false,
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
            rerank_fields: vec![crate::types::CHUNK_TEXT_FIELD.to_string()],
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            cors_enabled: false,
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Required: `VECGATE_API_KEY`, `VECGATE_DENSE_INDEX_HOST`,
    /// `VECGATE_SPARSE_INDEX_HOST`, `VECGATE_NAMESPACE`. Everything else has
    /// a default. Validation runs before returning so a misconfigured process
    /// fails at startup, not on the first request.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            backend: BackendConfig {
                api_key: env::var("VECGATE_API_KEY").unwrap_or_default(),
                dense_index_host: env::var("VECGATE_DENSE_INDEX_HOST").unwrap_or_default(),
                sparse_index_host: env::var("VECGATE_SPARSE_INDEX_HOST").unwrap_or_default(),
                timeout_secs: parse_env("VECGATE_TIMEOUT_SECS", 30)?,
            },
            retrieval: RetrievalConfig {
                namespace: env::var("VECGATE_NAMESPACE").unwrap_or_default(),
                top_k: parse_env("VECGATE_TOP_K", DEFAULT_TOP_K)?,
                rerank_enabled: parse_env("VECGATE_RERANK_ENABLED", false)?,
                ..RetrievalConfig::default()
            },
            http: HttpConfig {
                listen_addr: env::var("VECGATE_LISTEN_ADDR")
                    .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string()),
                cors_enabled: parse_env("VECGATE_CORS_ENABLED", false)?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects every validation error and reports them together so the user
    /// can fix the whole environment in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.backend.api_key.is_empty() {
            errors.push("VECGATE_API_KEY must be set".to_string());
        }
        if self.backend.dense_index_host.is_empty() {
            errors.push("VECGATE_DENSE_INDEX_HOST must be set".to_string());
        }
        if self.backend.sparse_index_host.is_empty() {
            errors.push("VECGATE_SPARSE_INDEX_HOST must be set".to_string());
        }
        if self.backend.timeout_secs == 0 {
            errors.push("VECGATE_TIMEOUT_SECS must be positive".to_string());
        }
        if self.retrieval.namespace.is_empty() {
            errors.push("VECGATE_NAMESPACE must be set".to_string());
        }
        if self.retrieval.top_k == 0 {
            errors.push("VECGATE_TOP_K must be positive".to_string());
        }
        if self.retrieval.rerank_enabled && self.retrieval.rerank_fields.is_empty() {
            errors.push("rerank_fields must not be empty when reranking is enabled".to_string());
        }
        if self.http.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!(
                "VECGATE_LISTEN_ADDR must be a host:port address, got '{}'",
                self.http.listen_addr
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
