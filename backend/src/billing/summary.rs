//! Usage and channel billing
//!
//! `bill` never rounds. Amounts keep full precision so repeated billing of
//! the same inputs is exact; `BillingSummary::rounded` is for display.

use super::rates::UsageRateSchedule;
use crate::core::round_currency;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Charges for one billing period
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSummary {
    /// Seconds used times the per-second rate
    pub usage_charges: f64,
    /// Billable channels times the monthly channel fee
    pub channel_charges: f64,
    /// `usage_charges + channel_charges`
    pub combined_total: f64,
}

impl BillingSummary {
    /// Copy with every amount rounded to `decimals` places
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            usage_charges: round_currency(self.usage_charges, decimals),
            channel_charges: round_currency(self.channel_charges, decimals),
            combined_total: round_currency(self.combined_total, decimals),
        }
    }
}

/// Compute usage and channel charges
///
/// Negative or non-finite usage is billed as zero seconds. Charges too
/// large to represent saturate at `f64::MAX`.
///
/// # Example
/// ```
/// use callwave_core_rs::{bill, UsageRateSchedule};
///
/// let summary = bill(10_000.0, 5, &UsageRateSchedule::default());
/// assert_eq!(summary.rounded(2).usage_charges, 420.0);
/// assert_eq!(summary.channel_charges, 3600.0);
/// assert_eq!(summary.rounded(2).combined_total, 4020.0);
/// ```
pub fn bill(
    total_seconds_used: f64,
    channels_used: u32,
    rates: &UsageRateSchedule,
) -> BillingSummary {
    let seconds = if total_seconds_used.is_finite() && total_seconds_used > 0.0 {
        total_seconds_used
    } else {
        0.0
    };

    let usage_charges = (seconds * rates.per_second_rate).min(f64::MAX);
    let billable_channels = rates.billable_channels(channels_used);
    let channel_charges = (f64::from(billable_channels) * rates.channel_monthly_fee).min(f64::MAX);

    debug!(seconds, channels_used, billable_channels, "computed bill");

    BillingSummary {
        usage_charges,
        channel_charges,
        combined_total: (usage_charges + channel_charges).min(f64::MAX),
    }
}
