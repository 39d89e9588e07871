//! Derived campaign metrics
//!
//! Reductions over a finished wave sequence. Any metric whose factors are
//! zero, missing or non-finite reports zero rather than NaN.

use super::waves::WaveResult;
use serde::{Deserialize, Serialize};

/// Summary cards shown under the wave table
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    /// Cohort size at wave 1
    pub total_calls: u64,
    /// Sum of converted calls across all waves
    pub total_converted: u64,
    /// Calls still pending after the last wave
    pub final_pending: u64,
    /// `total_converted / total_calls * 100`
    pub conversion_percent: f64,
    /// `(waves - 1) * retry_interval_minutes`
    pub total_time_span_minutes: u64,
    /// `total_converted * average_talk_time_per_call`
    pub total_talk_time: f64,
}

impl ProjectionSummary {
    /// Reduce a wave sequence into summary metrics
    ///
    /// # Arguments
    /// * `waves` - Output of `simulate`, possibly empty
    /// * `retry_interval_minutes` - Spacing between waves, `None` if unset
    /// * `average_talk_time_per_call` - Talk time per converted call, `None` if unset
    ///
    /// # Example
    /// ```
    /// use callwave_core_rs::{simulate, ProjectionSummary};
    ///
    /// let waves = simulate(1000, 0.6, 3);
    /// let summary = ProjectionSummary::from_waves(&waves, Some(30), Some(2.0));
    /// assert_eq!(summary.total_converted, 936);
    /// assert_eq!(summary.final_pending, 64);
    /// assert_eq!(summary.total_time_span_minutes, 60);
    /// assert_eq!(summary.total_talk_time, 1872.0);
    /// ```
    pub fn from_waves(
        waves: &[WaveResult],
        retry_interval_minutes: Option<u32>,
        average_talk_time_per_call: Option<f64>,
    ) -> Self {
        let Some(first) = waves.first() else {
            return Self::default();
        };

        let total_calls = first.calls_initiated;
        let total_converted: u64 = waves.iter().map(|w| w.calls_converted).sum();
        let final_pending = waves.last().map_or(total_calls, |w| w.calls_pending);

        let conversion_percent = if total_calls == 0 {
            0.0
        } else {
            total_converted as f64 / total_calls as f64 * 100.0
        };

        let total_time_span_minutes = match retry_interval_minutes {
            Some(interval) if interval > 0 => (waves.len() as u64 - 1) * u64::from(interval),
            _ => 0,
        };

        let total_talk_time = match average_talk_time_per_call {
            Some(avg) if avg.is_finite() && avg > 0.0 => total_converted as f64 * avg,
            _ => 0.0,
        };

        Self {
            total_calls,
            total_converted,
            final_pending,
            conversion_percent,
            total_time_span_minutes,
            total_talk_time,
        }
    }
}
