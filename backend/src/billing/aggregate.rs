//! Call statistics
//!
//! `aggregate` reduces a record set to the four totals behind the call
//! history cards. Float fields are summed in sorted order, so the totals
//! are bit-identical for any ordering of the same records.

use super::records::{CallRecord, DataShapeError};
use crate::core::ordered_sum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Totals over a set of call records
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStats {
    pub total_calls: u64,
    pub connected_calls: u64,
    /// Sum of call durations in seconds
    pub total_duration: f64,
    /// Sum of per-call costs
    pub total_cost: f64,
}

impl CallStats {
    /// Connected calls as a percentage of all calls, 0 for an empty set
    ///
    /// # Example
    /// ```
    /// use callwave_core_rs::CallStats;
    ///
    /// let stats = CallStats { total_calls: 8, connected_calls: 2, ..Default::default() };
    /// assert_eq!(stats.pickup_rate(), 25.0);
    /// assert_eq!(CallStats::default().pickup_rate(), 0.0);
    /// ```
    pub fn pickup_rate(&self) -> f64 {
        if self.total_calls == 0 {
            return 0.0;
        }
        self.connected_calls as f64 / self.total_calls as f64 * 100.0
    }

    /// Mean duration of connected calls, 0 when none connected
    pub fn average_connected_duration(&self) -> f64 {
        if self.connected_calls == 0 {
            return 0.0;
        }
        self.total_duration / self.connected_calls as f64
    }
}

/// Aggregate call records into totals
///
/// # Example
/// ```
/// use callwave_core_rs::{aggregate, CallRecord, CallStatus};
///
/// let records = vec![
///     CallRecord::new(CallStatus::Completed, 120.0, 5.04),
///     CallRecord::new(CallStatus::NoAnswer, 0.0, 0.0),
/// ];
/// let stats = aggregate(&records);
/// assert_eq!(stats.total_calls, 2);
/// assert_eq!(stats.connected_calls, 1);
/// assert_eq!(stats.total_duration, 120.0);
/// assert_eq!(stats.pickup_rate(), 50.0);
/// ```
pub fn aggregate(records: &[CallRecord]) -> CallStats {
    let mut connected_calls = 0u64;
    let mut durations = Vec::with_capacity(records.len());
    let mut costs = Vec::with_capacity(records.len());

    for record in records {
        if record.status.is_connected() {
            connected_calls += 1;
        }
        durations.push(sanitize(record.duration_seconds));
        costs.push(sanitize(record.cost));
    }

    let stats = CallStats {
        total_calls: records.len() as u64,
        connected_calls,
        total_duration: finite_total(durations, "duration"),
        total_cost: finite_total(costs, "cost"),
    };
    debug!(
        total_calls = stats.total_calls,
        connected_calls = stats.connected_calls,
        "aggregated call records"
    );
    stats
}

/// Records built in code bypass lenient decoding; hold them to the same rule
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Sum non-negative values, saturating at `f64::MAX`
///
/// Every input is finite, but enough huge ones still overflow to infinity.
pub(crate) fn finite_total(values: Vec<f64>, field: &'static str) -> f64 {
    let total = ordered_sum(values);
    if total.is_finite() {
        return total;
    }
    let issue = DataShapeError::OutOfRange {
        field,
        value: total,
    };
    warn!(%issue, "total saturated");
    f64::MAX
}

/// Per-segment statistics plus the grand total
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
    pub segments: BTreeMap<String, CallStats>,
    pub total: CallStats,
}

/// Aggregate records grouped by campaign segment
///
/// The grand total is aggregated from the flattened records rather than by
/// adding segment totals, so it matches `aggregate` over the same records.
pub fn aggregate_segments(segments: &BTreeMap<String, Vec<CallRecord>>) -> SegmentReport {
    let per_segment = segments
        .iter()
        .map(|(name, records)| (name.clone(), aggregate(records)))
        .collect();

    let all: Vec<CallRecord> = segments.values().flatten().cloned().collect();

    SegmentReport {
        segments: per_segment,
        total: aggregate(&all),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::records::CallStatus;

    #[test]
    fn test_empty_records() {
        let stats = aggregate(&[]);
        assert_eq!(stats, CallStats::default());
        assert_eq!(stats.pickup_rate(), 0.0);
        assert_eq!(stats.average_connected_duration(), 0.0);
    }

    #[test]
    fn test_unknown_status_not_connected() {
        let records = vec![
            CallRecord::new(CallStatus::Unknown, 10.0, 1.0),
            CallRecord::new(CallStatus::Other("voicemail".into()), 5.0, 0.5),
            CallRecord::new(CallStatus::Connected, 20.0, 2.0),
        ];
        let stats = aggregate(&records);
        assert_eq!(stats.connected_calls, 1);
        assert_eq!(stats.total_duration, 35.0);
        assert_eq!(stats.total_cost, 3.5);
    }

    #[test]
    fn test_non_finite_values_count_as_zero() {
        let records = vec![
            CallRecord::new(CallStatus::Completed, f64::NAN, -1.0),
            CallRecord::new(CallStatus::Completed, 10.0, 1.0),
        ];
        let stats = aggregate(&records);
        assert_eq!(stats.total_duration, 10.0);
        assert_eq!(stats.total_cost, 1.0);
    }

    #[test]
    fn test_overflowing_totals_saturate() {
        let records = vec![
            CallRecord::new(CallStatus::Completed, 1e308, 1e308),
            CallRecord::new(CallStatus::Completed, 1e308, 1e308),
        ];
        let stats = aggregate(&records);
        assert_eq!(stats.total_duration, f64::MAX);
        assert_eq!(stats.total_cost, f64::MAX);
        assert_eq!(stats.average_connected_duration(), f64::MAX / 2.0);
    }

    #[test]
    fn test_segments_total_matches_flat_aggregate() {
        let mut segments = BTreeMap::new();
        segments.insert(
            "spring-promo".to_string(),
            vec![
                CallRecord::new(CallStatus::Completed, 30.0, 1.26),
                CallRecord::new(CallStatus::Failed, 0.0, 0.0),
            ],
        );
        segments.insert(
            "win-back".to_string(),
            vec![CallRecord::new(CallStatus::Connected, 45.0, 1.89)],
        );

        let report = aggregate_segments(&segments);
        assert_eq!(report.segments.len(), 2);
        assert_eq!(report.segments["spring-promo"].connected_calls, 1);
        assert_eq!(report.total.total_calls, 3);
        assert_eq!(report.total.connected_calls, 2);

        let flat: Vec<CallRecord> = segments.values().flatten().cloned().collect();
        assert_eq!(report.total, aggregate(&flat));
    }
}
