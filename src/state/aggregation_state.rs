use crate::engine::AcceptancePredicate;
use crate::state::Phase;
use crate::RippleError;

/// Mutable state of one aggregation call
///
/// Owned exclusively by the aggregator task. Fetch workers never see it; they
/// only send page results, so none of these fields need synchronization.
#[derive(Debug)]
pub struct AggregationState<I> {
    /// Accepted items, append-only while collecting
    accepted: Vec<I>,

    /// Fetches launched since the call started
    fetches_issued: u32,

    /// Fetches launched but not yet observed
    outstanding: usize,

    /// Successful pages folded into `accepted`
    pages_folded: u32,

    /// Fetches that came back as failures
    pages_failed: u32,

    /// Items looked at by the predicate, accepted or not
    items_seen: usize,

    phase: Phase,
}

impl<I> Default for AggregationState<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> AggregationState<I> {
    pub fn new() -> Self {
        Self {
            accepted: Vec::new(),
            fetches_issued: 0,
            outstanding: 0,
            pages_folded: 0,
            pages_failed: 0,
            items_seen: 0,
            phase: Phase::Collecting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn accepted(&self) -> &[I] {
        &self.accepted
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn fetches_issued(&self) -> u32 {
        self.fetches_issued
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn pages_folded(&self) -> u32 {
        self.pages_folded
    }

    pub fn pages_failed(&self) -> u32 {
        self.pages_failed
    }

    pub fn items_seen(&self) -> usize {
        self.items_seen
    }

    /// Records a fetch about to be launched
    ///
    /// Must be called before the fetch can possibly deliver its result.
    pub fn record_dispatch(&mut self) {
        self.fetches_issued += 1;
        self.outstanding += 1;
    }

    /// Records that one launched fetch has delivered its result
    ///
    /// Returns the new outstanding count.
    pub fn record_observed(&mut self) -> Result<usize, RippleError> {
        self.outstanding = self
            .outstanding
            .checked_sub(1)
            .ok_or(RippleError::OutstandingUnderflow)?;
        Ok(self.outstanding)
    }

    pub fn record_failure(&mut self) {
        self.pages_failed += 1;
    }

    /// Applies the predicate to every item of a page and appends the accepted ones
    ///
    /// Item order within the page is preserved. Returns how many items were accepted.
    /// Once the phase has left `Collecting`, pages are ignored.
    pub fn fold(&mut self, items: Vec<I>, predicate: &AcceptancePredicate<I>) -> usize {
        if !self.phase.accepts_results() {
            return 0;
        }

        self.pages_folded += 1;
        self.items_seen += items.len();

        let before = self.accepted.len();
        self.accepted
            .extend(items.into_iter().filter(|item| predicate.accepts(item)));
        self.accepted.len() - before
    }

    /// Moves to the next lifecycle phase
    pub fn transition(&mut self, next: Phase) -> Result<(), RippleError> {
        if !self.phase.can_transition_to(next) {
            return Err(RippleError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::trace!("Aggregation phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Hands the accepted items over as the call's output
    ///
    /// Only valid once collection has stopped; afterwards the state holds no items.
    pub fn take_accepted(&mut self) -> Vec<I> {
        debug_assert!(!self.phase.accepts_results());
        std::mem::take(&mut self.accepted)
    }
}
