//! Result aggregator - the engine's coordinating loop
//!
//! The aggregator is the only place aggregation state lives. It:
//! - Launches one fetch per seed
//! - Folds each arriving page through the acceptance predicate
//! - Asks the satisfaction policy whether to stop
//! - Dispatches the continuation of unsatisfied lineages
//! - Stops on satisfaction, exhaustion or timeout, then drains in-flight fetches

use crate::config::validate_engine_config;
use crate::engine::dispatcher::Dispatcher;
use crate::engine::drain::drain;
use crate::engine::{
    AcceptancePredicate, PageRequest, PageResult, SatisfactionPolicy, ThresholdPolicy,
};
use crate::fetcher::PageFetcher;
use crate::state::{AggregationState, Phase};
use crate::{ConfigError, RippleError};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runtime configuration of one engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Default policy: stop once more than this many items are accepted
    pub max_accepted_items: usize,

    /// Default policy: stop once more than this many pages are folded
    pub max_iterations: u32,

    /// Forced stop for the whole call
    pub timeout: Duration,

    /// Upper bound on draining after the stop decision
    pub drain_grace: Duration,

    /// Size of the fetch worker pool
    pub max_concurrent_fetches: usize,

    /// Page size hint for request construction
    pub page_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_accepted_items: 30,
            max_iterations: 5,
            timeout: Duration::from_secs(10),
            drain_grace: Duration::from_secs(2),
            max_concurrent_fetches: 8,
            page_size: 100,
        }
    }
}

impl EngineConfig {
    /// The threshold policy described by this configuration
    pub fn threshold_policy(&self) -> ThresholdPolicy {
        ThresholdPolicy::new(self.max_accepted_items, self.max_iterations)
    }
}

/// Why an aggregation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The satisfaction policy fired
    Satisfied,

    /// Every lineage ran out of pages or failed
    Exhausted,

    /// The call-scoped timeout fired first
    TimedOut,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Satisfied => "satisfied",
            Self::Exhausted => "exhausted",
            Self::TimedOut => "timed out",
        };
        f.write_str(name)
    }
}

/// Counters describing one finished aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    pub fetches_issued: u32,
    pub pages_folded: u32,
    pub pages_failed: u32,
    pub items_seen: usize,
    pub drained: usize,
    pub abandoned: usize,
    pub elapsed_ms: u64,
}

/// Output of one aggregation call
#[derive(Debug, Clone)]
pub struct Aggregation<I> {
    /// Accepted items; page order is kept, pages of different lineages may interleave
    pub items: Vec<I>,
    pub reason: CompletionReason,
    pub stats: AggregationStats,
}

/// Concurrent paginated aggregation engine
///
/// One engine runs one aggregation: `aggregate` consumes it.
pub struct Engine<F: PageFetcher> {
    config: EngineConfig,
    fetcher: Arc<F>,
}

impl<F: PageFetcher> Engine<F> {
    /// Creates an engine, rejecting invalid configuration up front
    pub fn new(config: EngineConfig, fetcher: F) -> Result<Self, ConfigError> {
        Self::with_shared_fetcher(config, Arc::new(fetcher))
    }

    /// Creates an engine around a fetcher that outlives it
    pub fn with_shared_fetcher(config: EngineConfig, fetcher: Arc<F>) -> Result<Self, ConfigError> {
        validate_engine_config(&config)?;
        Ok(Self { config, fetcher })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the aggregation to completion
    ///
    /// # Arguments
    ///
    /// * `seeds` - One request per independent lineage, launched concurrently
    /// * `predicate` - Decides which items are kept
    /// * `policy` - Decides, after every folded page, whether to stop
    ///
    /// # Returns
    ///
    /// * `Ok(Aggregation)` - Accepted items plus why collection stopped; per-page
    ///   failures are reflected in the stats, not returned as errors
    /// * `Err(RippleError)` - No seeds, or every fetch failed and nothing was collected
    pub async fn aggregate(
        self,
        seeds: Vec<PageRequest>,
        predicate: &AcceptancePredicate<F::Item>,
        policy: &dyn SatisfactionPolicy<F::Item>,
    ) -> Result<Aggregation<F::Item>, RippleError> {
        if seeds.is_empty() {
            return Err(ConfigError::Validation("at least one seed is required".to_string()).into());
        }

        let started = std::time::Instant::now();

        // A lineage has at most one fetch in flight, so this capacity means sends never wait
        let (tx, mut rx) = mpsc::channel(seeds.len());
        let dispatcher = Dispatcher::new(
            Arc::clone(&self.fetcher),
            self.config.max_concurrent_fetches,
            tx,
        );
        let mut state = AggregationState::new();

        tracing::info!(
            "Starting aggregation over {} seeds (timeout {:?})",
            seeds.len(),
            self.config.timeout
        );

        for (lineage, request) in seeds.into_iter().enumerate() {
            state.record_dispatch();
            dispatcher.dispatch(lineage, request);
        }

        let reason = self
            .collect(&mut rx, &mut state, &dispatcher, predicate, policy)
            .await?;

        // Fetches still queued for a worker must not start once the call has stopped
        dispatcher.close();

        tracing::info!(
            "Aggregation {} after {} pages: {} items accepted, {} fetches outstanding",
            reason,
            state.pages_folded(),
            state.accepted_count(),
            state.outstanding()
        );

        state.transition(Phase::Stopping)?;
        let items = state.take_accepted();

        state.transition(Phase::Draining)?;
        let report = drain(&mut rx, &mut state, self.config.drain_grace).await?;

        state.transition(Phase::Done)?;

        if reason == CompletionReason::Exhausted && items.is_empty() && state.pages_folded() == 0 {
            return Err(RippleError::AllFetchesFailed {
                failures: state.pages_failed(),
            });
        }

        Ok(Aggregation {
            items,
            reason,
            stats: AggregationStats {
                fetches_issued: state.fetches_issued(),
                pages_folded: state.pages_folded(),
                pages_failed: state.pages_failed(),
                items_seen: state.items_seen(),
                drained: report.drained,
                abandoned: report.abandoned,
                elapsed_ms: started.elapsed().as_millis() as u64,
            },
        })
    }

    /// The collecting phase: runs until a stop reason is found
    async fn collect(
        &self,
        rx: &mut mpsc::Receiver<PageResult<F::Item>>,
        state: &mut AggregationState<F::Item>,
        dispatcher: &Dispatcher<F>,
        predicate: &AcceptancePredicate<F::Item>,
        policy: &dyn SatisfactionPolicy<F::Item>,
    ) -> Result<CompletionReason, RippleError> {
        let deadline = tokio::time::sleep(self.config.timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                // Checked first so a steady stream of results cannot starve the timeout
                biased;

                _ = &mut deadline => {
                    tracing::info!(
                        "Timed out after {:?} with {} fetches outstanding",
                        self.config.timeout,
                        state.outstanding()
                    );
                    return Ok(CompletionReason::TimedOut);
                }

                received = rx.recv() => {
                    let Some(result) = received else {
                        // Unreachable while the dispatcher holds a sender
                        return Ok(CompletionReason::Exhausted);
                    };

                    let stop = fold_result(result, state, dispatcher, predicate, policy)?;
                    if let Some(reason) = stop {
                        return Ok(reason);
                    }
                }
            }
        }
    }
}

/// Folds one result into the state; returns a stop reason if collection should end
fn fold_result<F: PageFetcher>(
    result: PageResult<F::Item>,
    state: &mut AggregationState<F::Item>,
    dispatcher: &Dispatcher<F>,
    predicate: &AcceptancePredicate<F::Item>,
    policy: &dyn SatisfactionPolicy<F::Item>,
) -> Result<Option<CompletionReason>, RippleError> {
    state.record_observed()?;
    let lineage = result.lineage;

    match result.outcome {
        Ok(page) => {
            let offered = page.items.len();
            let accepted = state.fold(page.items, predicate);
            let iteration = state.pages_folded();

            tracing::debug!(
                "Lineage {} page #{}: accepted {}/{} items ({} total)",
                lineage,
                iteration,
                accepted,
                offered,
                state.accepted_count()
            );

            if policy.is_satisfied(state, iteration) {
                return Ok(Some(CompletionReason::Satisfied));
            }

            match page.next {
                Some(next) => {
                    state.record_dispatch();
                    dispatcher.dispatch(lineage, next);
                }
                None => {
                    tracing::debug!("Lineage {} has no further pages", lineage);
                }
            }
        }
        Err(err) => {
            state.record_failure();
            tracing::warn!("Lineage {} abandoned: {}", lineage, err);
        }
    }

    if state.outstanding() == 0 {
        return Ok(Some(CompletionReason::Exhausted));
    }

    Ok(None)
}
