//! Usage Rate Schedule
//!
//! Rates are configuration supplied by the rate source, never constants
//! inside the billing arithmetic. `Default` carries the current product
//! pricing so callers without a rate source still bill consistently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in a rate schedule loaded from configuration
#[derive(Debug, Error, PartialEq)]
pub enum RateScheduleError {
    #[error("Rate schedule JSON is malformed: {0}")]
    Parse(String),

    #[error("Rate '{field}' must be finite and non-negative, got {value}")]
    InvalidRate { field: &'static str, value: f64 },
}

/// Pricing used to turn usage into charges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRateSchedule {
    /// Charge per second of call time
    pub per_second_rate: f64,

    /// Monthly fee per billable channel
    pub channel_monthly_fee: f64,

    /// Channels included at no charge
    #[serde(default)]
    pub free_channels: u32,
}

impl Default for UsageRateSchedule {
    fn default() -> Self {
        Self {
            per_second_rate: 0.042,      // per connected second
            channel_monthly_fee: 1200.0, // per channel per month
            free_channels: 2,
        }
    }
}

impl UsageRateSchedule {
    /// Load and validate a schedule from JSON
    ///
    /// # Example
    /// ```
    /// use callwave_core_rs::UsageRateSchedule;
    ///
    /// let rates = UsageRateSchedule::from_json_str(
    ///     r#"{"perSecondRate": 0.05, "channelMonthlyFee": 900}"#,
    /// ).unwrap();
    /// assert_eq!(rates.free_channels, 0);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, RateScheduleError> {
        let schedule: Self =
            serde_json::from_str(json).map_err(|e| RateScheduleError::Parse(e.to_string()))?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check that every rate is a usable amount
    pub fn validate(&self) -> Result<(), RateScheduleError> {
        for (field, value) in [
            ("perSecondRate", self.per_second_rate),
            ("channelMonthlyFee", self.channel_monthly_fee),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RateScheduleError::InvalidRate { field, value });
            }
        }
        Ok(())
    }

    /// Channels charged at the monthly fee
    pub fn billable_channels(&self, channels_used: u32) -> u32 {
        channels_used.saturating_sub(self.free_channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let rates = UsageRateSchedule::default();
        assert_eq!(rates.per_second_rate, 0.042);
        assert_eq!(rates.channel_monthly_fee, 1200.0);
        assert_eq!(rates.free_channels, 2);
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_billable_channels_never_negative() {
        let rates = UsageRateSchedule::default();
        assert_eq!(rates.billable_channels(0), 0);
        assert_eq!(rates.billable_channels(2), 0);
        assert_eq!(rates.billable_channels(5), 3);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = UsageRateSchedule::from_json_str(
            r#"{"perSecondRate": -0.01, "channelMonthlyFee": 1200, "freeChannels": 2}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RateScheduleError::InvalidRate {
                field: "perSecondRate",
                value: -0.01
            }
        );
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            UsageRateSchedule::from_json_str("{\"perSecondRate\": }"),
            Err(RateScheduleError::Parse(_))
        ));
    }

    #[test]
    fn test_serialize_deserialize() {
        let rates = UsageRateSchedule::default();
        let json = serde_json::to_string(&rates).unwrap();
        let restored: UsageRateSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(rates, restored);
    }
}
