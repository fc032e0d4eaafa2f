//! State module for tracking aggregation progress
//!
//! # Components
//!
//! - `Phase`: Lifecycle of one aggregation call (collecting, stopping, draining, done)
//! - `AggregationState`: Accepted items plus the fetch counters the aggregator reasons about

mod aggregation_state;
mod phase;

// Re-export main types
pub use aggregation_state::AggregationState;
pub use phase::Phase;
