//! Acceptance predicates and satisfaction policies
//!
//! Both are pure functions supplied by the caller. The aggregator evaluates
//! them from its own task only, so neither needs interior synchronization.

use crate::state::AggregationState;
use std::fmt;

/// Decides whether a single item belongs in the output
///
/// Evaluated exactly once per item, in arrival order. The closure must be
/// free of side effects.
pub struct AcceptancePredicate<I> {
    accept: Box<dyn Fn(&I) -> bool + Send + Sync>,
}

impl<I> AcceptancePredicate<I> {
    pub fn new<F>(accept: F) -> Self
    where
        F: Fn(&I) -> bool + Send + Sync + 'static,
    {
        Self {
            accept: Box::new(accept),
        }
    }

    /// Keeps every item
    pub fn accept_all() -> Self {
        Self::new(|_| true)
    }

    pub fn accepts(&self, item: &I) -> bool {
        (self.accept)(item)
    }
}

impl<I> fmt::Debug for AcceptancePredicate<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AcceptancePredicate")
    }
}

/// Decides, after each folded page, whether aggregation should stop
pub trait SatisfactionPolicy<I>: Send + Sync {
    /// `iteration` is the number of pages folded so far, starting at 1
    fn is_satisfied(&self, state: &AggregationState<I>, iteration: u32) -> bool;
}

/// Default policy: stop once either threshold is exceeded
///
/// Thresholds are strict ("more than"), so a page that pushes the accepted
/// count past `max_accepted_items` is kept whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    pub max_accepted_items: usize,
    pub max_iterations: u32,
}

impl ThresholdPolicy {
    pub fn new(max_accepted_items: usize, max_iterations: u32) -> Self {
        Self {
            max_accepted_items,
            max_iterations,
        }
    }
}

impl<I> SatisfactionPolicy<I> for ThresholdPolicy {
    fn is_satisfied(&self, state: &AggregationState<I>, iteration: u32) -> bool {
        state.accepted_count() > self.max_accepted_items || iteration > self.max_iterations
    }
}

/// Adapter that lets a closure act as a satisfaction policy
pub struct FnPolicy<F>(F);

impl<I, F> SatisfactionPolicy<I> for FnPolicy<F>
where
    F: Fn(&AggregationState<I>, u32) -> bool + Send + Sync,
{
    fn is_satisfied(&self, state: &AggregationState<I>, iteration: u32) -> bool {
        (self.0)(state, iteration)
    }
}

/// Builds a satisfaction policy from a closure
///
/// # Example
///
/// ```
/// use page_ripple::engine::policy_fn;
/// use page_ripple::state::AggregationState;
///
/// // Never satisfied: run until exhausted or timed out
/// let policy = policy_fn(|_: &AggregationState<u32>, _| false);
/// # let _ = policy;
/// ```
pub fn policy_fn<I, F>(policy: F) -> FnPolicy<F>
where
    F: Fn(&AggregationState<I>, u32) -> bool + Send + Sync,
{
    FnPolicy(policy)
}
