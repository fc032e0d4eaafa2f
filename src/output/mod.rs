//! Output module for presenting aggregation results
//!
//! This module handles:
//! - Building a report from a finished aggregation
//! - Rendering it for a terminal or as JSON

mod report;

pub use report::{render_text, to_json, AggregationReport};
