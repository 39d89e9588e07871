//! Projection input as submitted by the retry calculator form

use super::waves::{
    check_preconditions, normalize_pickup_rate, simulate, try_simulate, ProjectionError, WaveResult,
};
use serde::{Deserialize, Serialize};

/// Inputs to a retry-wave projection
///
/// `pickup_rate` is held as a fraction. Build from raw form values with
/// `from_form` to accept percentages as well.
///
/// # Example
/// ```
/// use callwave_core_rs::CampaignProjectionInput;
///
/// let input = CampaignProjectionInput::from_form(1000, 60.0, 3);
/// assert_eq!(input.pickup_rate, 0.6);
/// assert_eq!(input.project().len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProjectionInput {
    /// Size of the cohort at wave 1
    pub total_calls: u64,
    /// Fraction of attempted calls that connect per wave
    pub pickup_rate: f64,
    /// Number of waves to project
    pub retries: u32,
}

impl CampaignProjectionInput {
    /// Create an input, treating a pickup rate in (1, 100] as a percentage
    pub fn from_form(total_calls: u64, pickup_rate: f64, retries: u32) -> Self {
        Self {
            total_calls,
            pickup_rate: normalize_pickup_rate(pickup_rate),
            retries,
        }
    }

    /// Check the input without running the projection
    pub fn validate(&self) -> Result<(), ProjectionError> {
        check_preconditions(self.total_calls, self.pickup_rate, self.retries)
    }

    /// Project the waves; empty when the input is invalid
    pub fn project(&self) -> Vec<WaveResult> {
        simulate(self.total_calls, self.pickup_rate, self.retries)
    }

    /// Project the waves, reporting why an input was rejected
    pub fn try_project(&self) -> Result<Vec<WaveResult>, ProjectionError> {
        try_simulate(self.total_calls, self.pickup_rate, self.retries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_form_keeps_fraction() {
        let input = CampaignProjectionInput::from_form(50, 0.25, 2);
        assert_eq!(input.pickup_rate, 0.25);
    }

    #[test]
    fn test_from_form_out_of_range_percent_rejected() {
        let input = CampaignProjectionInput::from_form(50, 250.0, 2);
        assert_eq!(
            input.validate(),
            Err(ProjectionError::InvalidPickupRate(250.0))
        );
        assert!(input.project().is_empty());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"totalCalls": 1000, "pickupRate": 0.6, "retries": 3}"#;
        let input: CampaignProjectionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.total_calls, 1000);
        assert_eq!(input.try_project().unwrap().len(), 3);
    }
}
