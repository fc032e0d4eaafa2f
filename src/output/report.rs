//! Aggregation reports
//!
//! A report is the aggregation outcome plus the context needed to read it
//! later: which seeds were used and when the call ran.

use crate::endpoint::Seed;
use crate::engine::{Aggregation, AggregationStats, CompletionReason};
use crate::media::MediaItem;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

/// Serializable summary of one aggregation call
#[derive(Debug, Clone, Serialize)]
pub struct AggregationReport {
    pub seeds: Vec<String>,
    pub reason: CompletionReason,
    pub item_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stats: AggregationStats,
    pub items: Vec<MediaItem>,
}

impl AggregationReport {
    /// Builds a report for an aggregation that finished just now
    pub fn new(
        seeds: &[Seed],
        started_at: DateTime<Utc>,
        aggregation: Aggregation<MediaItem>,
    ) -> Self {
        Self {
            seeds: seeds.iter().map(Seed::to_string).collect(),
            reason: aggregation.reason,
            item_count: aggregation.items.len(),
            started_at,
            finished_at: Utc::now(),
            stats: aggregation.stats,
            items: aggregation.items,
        }
    }
}

/// Renders a report as human readable text
pub fn render_text(report: &AggregationReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Aggregation Report ===\n");
    let _ = writeln!(out, "Seeds: {}", report.seeds.join(", "));
    let _ = writeln!(out, "Completed: {} ({} items)", report.reason, report.item_count);
    let _ = writeln!(
        out,
        "Started: {}  Finished: {}",
        report.started_at.to_rfc3339(),
        report.finished_at.to_rfc3339()
    );

    let stats = &report.stats;
    let _ = writeln!(out, "\nStatistics:");
    let _ = writeln!(out, "  Fetches issued: {}", stats.fetches_issued);
    let _ = writeln!(out, "  Pages folded: {}", stats.pages_folded);
    let _ = writeln!(out, "  Pages failed: {}", stats.pages_failed);
    let _ = writeln!(out, "  Items seen: {}", stats.items_seen);
    let _ = writeln!(
        out,
        "  Drained: {}, abandoned: {}",
        stats.drained, stats.abandoned
    );
    let _ = writeln!(out, "  Elapsed: {}ms", stats.elapsed_ms);

    if !report.items.is_empty() {
        let _ = writeln!(out, "\nItems:");
        for item in &report.items {
            let _ = writeln!(out, "  {}", describe_item(item));
        }
    }

    out
}

fn describe_item(item: &MediaItem) -> String {
    let mut line = format!("[{}] {}", item.id, item.kind);
    if !item.user.username.is_empty() {
        let _ = write!(line, " by @{}", item.user.username);
    }
    let _ = write!(line, " at {}", item.created().format("%Y-%m-%d %H:%M"));
    let _ = write!(line, ", {} likes", item.likes.count);
    if !item.tags.is_empty() {
        let tags: Vec<String> = item.tags.iter().map(|t| format!("#{}", t)).collect();
        let _ = write!(line, " {}", tags.join(" "));
    }
    if !item.link.is_empty() {
        let _ = write!(line, " {}", item.link);
    }
    line
}

/// Renders a report as pretty-printed JSON
pub fn to_json(report: &AggregationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> AggregationReport {
        let aggregation = Aggregation {
            items: vec![MediaItem {
                id: "1".to_string(),
                kind: "image".to_string(),
                tags: vec!["cats".to_string()],
                created_time: "0".to_string(),
                ..Default::default()
            }],
            reason: CompletionReason::Satisfied,
            stats: AggregationStats {
                fetches_issued: 2,
                pages_folded: 2,
                ..Default::default()
            },
        };
        AggregationReport::new(&[Seed::tag("cats")], Utc::now(), aggregation)
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&report());
        assert!(text.contains("Seeds: tag:cats"));
        assert!(text.contains("Completed: satisfied (1 items)"));
        assert!(text.contains("Fetches issued: 2"));
        assert!(text.contains("[1] image at 1970-01-01 00:00, 0 likes #cats"));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["reason"], "satisfied");
        assert_eq!(value["item_count"], 1);
        assert_eq!(value["items"][0]["type"], "image");
        assert_eq!(value["stats"]["pages_folded"], 2);
    }
}
