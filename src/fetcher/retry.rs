//! Retry wrapper for page fetchers
//!
//! The engine never retries on its own; a failed page ends its lineage. Callers
//! that want retries wrap their fetcher in `RetryingFetcher`.

use crate::engine::{Page, PageRequest};
use crate::fetcher::{FetchError, PageFetcher};
use async_trait::async_trait;
use std::time::Duration;

/// Retries transient failures a fixed number of times with a fixed delay
///
/// | Failure | Action |
/// |---------|--------|
/// | Timeout / connection error | Retry |
/// | HTTP 429, 5xx | Retry |
/// | Other HTTP status | Return immediately |
/// | Malformed body | Return immediately |
#[derive(Debug, Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    attempts: u32,
    delay: Duration,
}

impl<F> RetryingFetcher<F> {
    /// `attempts` counts the first try; values below 1 are treated as 1
    pub fn new(inner: F, attempts: u32, delay: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RetryingFetcher<F> {
    type Item = F::Item;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>, FetchError> {
        let mut attempt = 1;
        loop {
            match self.inner.fetch_page(request).await {
                Ok(page) => return Ok(page),
                Err(err) if err.is_transient() && attempt < self.attempts => {
                    tracing::debug!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempt,
                        self.attempts,
                        request,
                        err,
                        self.delay
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
