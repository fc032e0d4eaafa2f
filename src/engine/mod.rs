//! Concurrent paginated aggregation engine
//!
//! This module contains the core of the crate:
//! - Page-level types exchanged between workers and the aggregator
//! - The work dispatcher and its bounded worker pool
//! - The result aggregator state machine
//! - Acceptance predicates and satisfaction policies
//! - Draining of in-flight fetches after a stop
//!
//! Data flows one way: dispatcher → fetch workers → completion channel →
//! aggregator, which either dispatches continuations or stops.

mod aggregator;
mod dispatcher;
mod drain;
mod page;
mod policy;

pub use aggregator::{Aggregation, AggregationStats, CompletionReason, Engine, EngineConfig};
pub use drain::DrainReport;
pub use page::{Page, PageRequest, PageResult};
pub use policy::{policy_fn, AcceptancePredicate, FnPolicy, SatisfactionPolicy, ThresholdPolicy};
