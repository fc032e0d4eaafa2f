//! Page fetchers
//!
//! This module contains everything that touches the network:
//! - The `PageFetcher` trait the engine drives
//! - An HTTP implementation built on reqwest
//! - Decoding of a JSON page body into media items
//! - An optional retry wrapper for transient failures

mod decode;
mod http;
mod retry;

pub use decode::{decode_page, decode_response, DecodeError};
pub use http::{build_http_client, HttpPageFetcher};
pub use retry::RetryingFetcher;

use crate::engine::{Page, PageRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Failure to produce a page for one request
///
/// Never fatal to an aggregation: the lineage that produced it simply ends.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {message}")]
    Transport {
        url: String,
        message: String,
        timed_out: bool,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("API error {code} for {url}: {message}")]
    Api {
        url: String,
        code: u16,
        message: String,
    },

    #[error("Failed to decode page from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: DecodeError,
    },

    #[error("Worker pool closed before {url} could be fetched")]
    PoolClosed { url: String },
}

impl FetchError {
    /// Returns true if repeating the same request might succeed
    ///
    /// Timeouts, connection failures, HTTP 429 and 5xx responses are transient;
    /// decode failures and other client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Api { code, .. } => *code == 429 || *code >= 500,
            Self::Decode { .. } | Self::PoolClosed { .. } => false,
        }
    }

    /// The location that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Api { url, .. }
            | Self::Decode { url, .. }
            | Self::PoolClosed { url } => url,
        }
    }
}

/// Performs one round trip for one page
///
/// Implementations are shared across every fetch worker of an aggregation and
/// may be called concurrently; they must not rely on state shared between calls.
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    /// The domain record a page is made of
    type Item: Send + 'static;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>, FetchError>;
}
