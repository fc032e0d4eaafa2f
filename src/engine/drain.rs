//! Drain of in-flight fetches after the stop decision
//!
//! The completion channel is never closed to signal shutdown. Instead the
//! aggregator knows exactly how many fetches it launched but has not yet
//! observed, and keeps receiving until that count reaches zero or the grace
//! period runs out.

use crate::engine::PageResult;
use crate::state::AggregationState;
use crate::RippleError;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// What happened to the fetches still outstanding at the stop decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct DrainReport {
    /// Results received and discarded
    pub drained: usize,

    /// Fetches still running when the grace period expired
    pub abandoned: usize,
}

/// Receives and discards results until nothing is outstanding or `grace` elapses
///
/// Every discarded result is counted as observed on `state`. Results are never
/// folded, so the accepted items cannot change while draining.
pub(crate) async fn drain<I>(
    results: &mut mpsc::Receiver<PageResult<I>>,
    state: &mut AggregationState<I>,
    grace: Duration,
) -> Result<DrainReport, RippleError> {
    let deadline = Instant::now() + grace;
    let mut report = DrainReport::default();

    while state.outstanding() > 0 {
        match tokio::time::timeout_at(deadline, results.recv()).await {
            Ok(Some(result)) => {
                state.record_observed()?;
                report.drained += 1;
                tracing::debug!(
                    "Drained result for lineage {} ({} still outstanding)",
                    result.lineage,
                    state.outstanding()
                );
            }
            Ok(None) => {
                // Every sender is gone, so nothing else can arrive
                break;
            }
            Err(_) => {
                tracing::warn!(
                    "Drain grace period of {:?} expired with {} fetches still in flight",
                    grace,
                    state.outstanding()
                );
                break;
            }
        }
    }

    report.abandoned = state.outstanding();
    Ok(report)
}
