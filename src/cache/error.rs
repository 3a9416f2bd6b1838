//! Error types for upstream fetches, backing stores and cache reads

use reqwest::StatusCode;
use thiserror::Error;

use super::domain::Domain;

/// Classified failure of an upstream fetch
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// Upstream confirmed the requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or rejected API credential
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Network error, timeout, 5xx or unusable response
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl UpstreamError {
    /// Maps a non-success HTTP status to a failure class
    pub fn from_status(status: StatusCode, context: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => UpstreamError::NotFound(context.to_string()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                UpstreamError::Unauthorized(format!("{} (HTTP {})", context, status.as_u16()))
            }
            _ => UpstreamError::Unavailable(format!("{} (HTTP {})", context, status.as_u16())),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::NotFound(_))
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => UpstreamError::from_status(status, &err.to_string()),
            None if err.is_timeout() => UpstreamError::Unavailable(format!("timed out: {}", err)),
            None => UpstreamError::Unavailable(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Unavailable(format!("invalid response body: {}", err))
    }
}

/// Errors from a backing store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry could not be encoded or decoded
    #[error("store serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// The store did not answer in time
    #[error("store operation timed out")]
    Timeout,
}

/// Errors returned to callers of the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Upstream failed and the domain has no fallback; retrying may help
    #[error("{domain} service unavailable: {reason}")]
    UpstreamUnavailable { domain: Domain, reason: String },

    /// Credential missing or rejected; retrying will not help
    #[error("{domain} is misconfigured: {message}")]
    Configuration { domain: Domain, message: String },

    /// Upstream confirmed the entity does not exist
    #[error("{domain}: {what} not found")]
    NotFound { domain: Domain, what: String },

    /// The dataset exists but lacks the requested sub-key
    #[error("{domain}: {message}")]
    DataError { domain: Domain, message: String },

    /// Rejected before any lookup
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CacheError {
    /// Classifies an upstream failure for `domain`
    pub fn from_upstream(domain: Domain, err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound(what) => CacheError::NotFound { domain, what },
            UpstreamError::Unauthorized(message) => CacheError::Configuration { domain, message },
            UpstreamError::Unavailable(reason) => CacheError::UpstreamUnavailable { domain, reason },
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, CacheError::UpstreamUnavailable { .. })
    }

    /// Short machine-readable kind, used in CLI error output
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::UpstreamUnavailable { .. } => "upstream_unavailable",
            CacheError::Configuration { .. } => "configuration",
            CacheError::NotFound { .. } => "not_found",
            CacheError::DataError { .. } => "data_error",
            CacheError::InvalidInput(_) => "invalid_input",
        }
    }
}
