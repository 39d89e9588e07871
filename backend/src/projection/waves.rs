//! Wave simulator
//!
//! Each wave re-attempts everything still pending. The converted count is
//! `round(pending * pickup_rate)` and `pending` is only ever updated by
//! subtraction, so the cohort is conserved exactly:
//!
//! `sum(calls_converted) + final calls_pending == total_calls`

use crate::core::round_half_away;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Fewest waves a projection may run
pub const MIN_RETRIES: u32 = 1;

/// Most waves a projection may run
pub const MAX_RETRIES: u32 = 20;

/// Outcome of a single retry wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveResult {
    /// 1-based wave number
    pub wave_index: u32,
    /// Calls attempted this wave (everything pending at wave start)
    pub calls_initiated: u64,
    /// Calls that connected this wave
    pub calls_converted: u64,
    /// Calls still unconverted after this wave
    pub calls_pending: u64,
}

/// Reasons a projection input is rejected
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("Total calls must be greater than zero")]
    NoCalls,

    #[error("Pickup rate {0} must be greater than 0 and at most 1")]
    InvalidPickupRate(f64),

    #[error("Retries {actual} outside allowed range {min}..={max}")]
    RetriesOutOfRange { actual: u32, min: u32, max: u32 },
}

/// Treat pickup rates in (1, 100] as percentages
///
/// Values already in fraction form, and values that are out of range either
/// way, are returned unchanged so validation can reject them.
///
/// # Example
/// ```
/// use callwave_core_rs::projection::normalize_pickup_rate;
///
/// assert_eq!(normalize_pickup_rate(60.0), 0.6);
/// assert_eq!(normalize_pickup_rate(0.6), 0.6);
/// assert_eq!(normalize_pickup_rate(150.0), 150.0);
/// ```
pub fn normalize_pickup_rate(rate: f64) -> f64 {
    if rate > 1.0 && rate <= 100.0 {
        rate / 100.0
    } else {
        rate
    }
}

pub(crate) fn check_preconditions(
    total_calls: u64,
    pickup_rate: f64,
    retries: u32,
) -> Result<(), ProjectionError> {
    if total_calls == 0 {
        return Err(ProjectionError::NoCalls);
    }
    // NaN fails both comparisons
    if !(pickup_rate > 0.0 && pickup_rate <= 1.0) {
        return Err(ProjectionError::InvalidPickupRate(pickup_rate));
    }
    if !(MIN_RETRIES..=MAX_RETRIES).contains(&retries) {
        return Err(ProjectionError::RetriesOutOfRange {
            actual: retries,
            min: MIN_RETRIES,
            max: MAX_RETRIES,
        });
    }
    Ok(())
}

/// Run the wave simulation, reporting why an input was rejected
///
/// `pickup_rate` is a fraction in (0, 1]. Use `normalize_pickup_rate` or
/// `CampaignProjectionInput::from_form` for percentage input.
///
/// # Example
/// ```
/// use callwave_core_rs::try_simulate;
///
/// let waves = try_simulate(1000, 0.6, 3).unwrap();
/// assert_eq!(waves[0].calls_converted, 600);
/// assert_eq!(waves[2].calls_pending, 64);
///
/// assert!(try_simulate(0, 0.6, 3).is_err());
/// ```
pub fn try_simulate(
    total_calls: u64,
    pickup_rate: f64,
    retries: u32,
) -> Result<Vec<WaveResult>, ProjectionError> {
    check_preconditions(total_calls, pickup_rate, retries)?;

    let mut pending = total_calls;
    let mut waves = Vec::with_capacity(retries as usize);

    for wave_index in 1..=retries {
        let calls_initiated = pending;
        let converted = round_half_away(pending as f64 * pickup_rate) as u64;
        // rate <= 1 keeps this within pending; clamp against float drift on huge cohorts
        let calls_converted = converted.min(pending);
        pending -= calls_converted;

        waves.push(WaveResult {
            wave_index,
            calls_initiated,
            calls_converted,
            calls_pending: pending,
        });
    }

    debug!(
        total_calls,
        pickup_rate,
        retries,
        final_pending = pending,
        "projected retry waves"
    );

    Ok(waves)
}

/// Run the wave simulation
///
/// Invalid input yields an empty vector so callers can render a validation
/// message in place of the table.
///
/// # Example
/// ```
/// use callwave_core_rs::simulate;
///
/// assert_eq!(simulate(1000, 0.6, 3).len(), 3);
/// assert!(simulate(1000, 1.5, 3).is_empty());
/// ```
pub fn simulate(total_calls: u64, pickup_rate: f64, retries: u32) -> Vec<WaveResult> {
    try_simulate(total_calls, pickup_rate, retries).unwrap_or_else(|err| {
        debug!(%err, "projection input rejected");
        Vec::new()
    })
}
