//! Python bindings
//!
//! JSON in, JSON out. Input that cannot be decoded raises `ValueError`;
//! input that decodes but fails validation comes back as
//! `{"valid": false, "errors": [...]}` so the dashboard can render it.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde_json::json;

use crate::billing::{aggregate, bill, parse_records, UsageRateSchedule};
use crate::policy::{advisories, validate};
use crate::projection::{CampaignProjectionInput, ProjectionSummary};
use crate::RetryPolicy;

fn value_error(context: &str, err: impl std::fmt::Display) -> PyErr {
    PyErr::new::<PyValueError, _>(format!("{}: {}", context, err))
}

/// Project retry waves from a `CampaignProjectionInput` JSON object
///
/// Pickup rates in (1, 100] are read as percentages.
#[pyfunction]
#[pyo3(signature = (input_json, retry_interval_minutes=None, average_talk_time=None))]
pub fn simulate_waves(
    input_json: &str,
    retry_interval_minutes: Option<u32>,
    average_talk_time: Option<f64>,
) -> PyResult<String> {
    let raw: CampaignProjectionInput = serde_json::from_str(input_json)
        .map_err(|e| value_error("JSON parsing failed", e))?;
    let input = CampaignProjectionInput::from_form(raw.total_calls, raw.pickup_rate, raw.retries);

    let result = match input.try_project() {
        Ok(waves) => {
            let summary =
                ProjectionSummary::from_waves(&waves, retry_interval_minutes, average_talk_time);
            json!({ "valid": true, "waves": waves, "summary": summary })
        }
        Err(e) => json!({
            "valid": false,
            "waves": [],
            "errors": [{ "type": "InputValidationError", "message": e.to_string() }]
        }),
    };
    Ok(result.to_string())
}

/// Aggregate a JSON array of call records
#[pyfunction]
pub fn aggregate_calls(records_json: &str) -> PyResult<String> {
    let records =
        parse_records(records_json).map_err(|e| value_error("JSON parsing failed", e))?;
    let stats = aggregate(&records);
    let result = json!({ "stats": stats, "pickupRate": stats.pickup_rate() });
    Ok(result.to_string())
}

/// Bill usage against a rate schedule (product defaults when omitted)
#[pyfunction]
#[pyo3(signature = (total_seconds_used, channels_used, rates_json=None))]
pub fn compute_bill(
    total_seconds_used: f64,
    channels_used: u32,
    rates_json: Option<&str>,
) -> PyResult<String> {
    let rates = match rates_json {
        Some(json) => UsageRateSchedule::from_json_str(json)
            .map_err(|e| value_error("Invalid rate schedule", e))?,
        None => UsageRateSchedule::default(),
    };
    let summary = bill(total_seconds_used, channels_used, &rates);
    serde_json::to_string(&summary).map_err(|e| value_error("Serialization failed", e))
}

/// Validate a retry policy JSON object
///
/// # Returns
///
/// - On success: `{"valid": true, "advisories": [...]}`
/// - On failure: `{"valid": false, "errors": [{"type": "...", "message": "..."}]}`
#[pyfunction]
pub fn validate_policy(policy_json: &str) -> PyResult<String> {
    let policy: RetryPolicy = match serde_json::from_str(policy_json) {
        Ok(policy) => policy,
        Err(e) => {
            let result = json!({
                "valid": false,
                "errors": [{
                    "type": "ParseError",
                    "message": format!("JSON parsing failed: {}", e)
                }]
            });
            return Ok(result.to_string());
        }
    };

    let result = match validate(&policy) {
        Ok(()) => json!({ "valid": true, "advisories": advisories(&policy) }),
        Err(errors) => {
            let error_list: Vec<_> = errors
                .iter()
                .map(|e| json!({ "type": "InputValidationError", "message": e.to_string() }))
                .collect();
            json!({ "valid": false, "errors": error_list })
        }
    };
    Ok(result.to_string())
}
