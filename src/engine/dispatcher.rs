//! Work dispatcher
//!
//! Launches one task per page fetch. Tasks share a bounded pool of permits so
//! that no more than `max_concurrent_fetches` requests are ever in flight, no
//! matter how many lineages are active or how long their chains grow.

use crate::engine::{PageRequest, PageResult};
use crate::fetcher::{FetchError, PageFetcher};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

pub(crate) struct Dispatcher<F: PageFetcher> {
    fetcher: Arc<F>,

    /// Worker pool; a permit is held for the duration of one fetch
    permits: Arc<Semaphore>,

    /// Completion channel back to the aggregator
    results: mpsc::Sender<PageResult<F::Item>>,
}

impl<F: PageFetcher> Dispatcher<F> {
    pub(crate) fn new(
        fetcher: Arc<F>,
        max_concurrent_fetches: usize,
        results: mpsc::Sender<PageResult<F::Item>>,
    ) -> Self {
        Self {
            fetcher,
            permits: Arc::new(Semaphore::new(max_concurrent_fetches)),
            results,
        }
    }

    /// Launches a fetch for `request` on behalf of `lineage`
    ///
    /// The caller must count the fetch as outstanding before calling this. The
    /// spawned task delivers exactly one `PageResult`, success or failure, and
    /// is never cancelled; if the aggregator has gone away by the time it
    /// finishes, the result is dropped.
    pub(crate) fn dispatch(&self, lineage: usize, request: PageRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let permits = Arc::clone(&self.permits);
        let results = self.results.clone();

        tracing::debug!("Dispatching fetch for lineage {}: {}", lineage, request);

        tokio::spawn(async move {
            let outcome = match permits.acquire_owned().await {
                Ok(_permit) => fetcher.fetch_page(&request).await,
                Err(_) => Err(FetchError::PoolClosed {
                    url: request.to_string(),
                }),
            };

            let result = PageResult {
                lineage,
                request,
                outcome,
            };

            if let Err(returned) = results.send(result).await {
                tracing::trace!(
                    "Aggregator finished before {} arrived; discarding",
                    returned.0.request
                );
            }
        });
    }

    /// Closes the worker pool
    ///
    /// Fetches already holding a permit run to completion. Fetches still
    /// waiting for one never start; they report `FetchError::PoolClosed`
    /// straight away instead.
    pub(crate) fn close(&self) {
        self.permits.close();
    }

    /// Number of workers currently free
    #[cfg(test)]
    pub(crate) fn idle_workers(&self) -> usize {
        self.permits.available_permits()
    }
}
