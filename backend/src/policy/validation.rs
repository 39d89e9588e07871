// Retry Policy Validation
//
// Pre-submission checks that a retry policy is well-formed:
// - Retry count bounds
// - Retry interval bounds
// - Outcome retry cap sign
// - Calling window time format
// - Timezone identifier

use super::types::{parse_time_of_day, parse_timezone, RetryPolicy};
use serde::Serialize;
use thiserror::Error;

/// Highest accepted `maxRetries`
pub const MAX_RETRIES_LIMIT: i64 = 10;

/// Lowest accepted `retryIntervalMinutes`
pub const MIN_RETRY_INTERVAL_MINUTES: i64 = 1;

/// Intervals below this are accepted but flagged
pub const SUGGESTED_MIN_INTERVAL_MINUTES: i64 = 2;

/// Intervals above one day are accepted but flagged
pub const SUGGESTED_MAX_INTERVAL_MINUTES: i64 = 1440;

/// Validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("maxRetries {actual} outside allowed range 0..={max}")]
    MaxRetriesOutOfRange { actual: i64, max: i64 },

    #[error("retryIntervalMinutes {actual} is below minimum {min}")]
    RetryIntervalTooShort { actual: i64, min: i64 },

    #[error("maxOutcomeRetries must be unset or non-negative, got {0}")]
    NegativeMaxOutcomeRetries(i64),

    #[error("{field} '{value}' is not a valid HH:MM time")]
    InvalidTimeOfDay { field: &'static str, value: String },

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),
}

/// Validation result
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Non-blocking notes shown next to the policy form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicyAdvisory {
    /// Interval shorter than the suggested minimum
    IntervalBelowSuggested,
    /// Interval longer than one day
    IntervalAboveSuggested,
    /// Window end is before its start; the scheduler decides how to read it
    WindowCrossesMidnight,
    /// Window start equals its end
    EmptyWindow,
}

/// Validate a retry policy
///
/// Runs every check and returns all violations found. The policy is never
/// modified.
///
/// # Example
///
/// ```rust
/// use callwave_core_rs::{validate, RetryPolicy, ValidationError};
///
/// let policy = RetryPolicy {
///     max_retries: 12,
///     timezone: "Nowhere/Special".to_string(),
///     ..RetryPolicy::default()
/// };
///
/// let errors = validate(&policy).unwrap_err();
/// assert_eq!(errors.len(), 2);
/// assert!(errors.contains(&ValidationError::UnknownTimezone("Nowhere/Special".to_string())));
/// ```
pub fn validate(policy: &RetryPolicy) -> ValidationResult {
    let mut errors = Vec::new();

    if !(0..=MAX_RETRIES_LIMIT).contains(&policy.max_retries) {
        errors.push(ValidationError::MaxRetriesOutOfRange {
            actual: policy.max_retries,
            max: MAX_RETRIES_LIMIT,
        });
    }

    if policy.retry_interval_minutes < MIN_RETRY_INTERVAL_MINUTES {
        errors.push(ValidationError::RetryIntervalTooShort {
            actual: policy.retry_interval_minutes,
            min: MIN_RETRY_INTERVAL_MINUTES,
        });
    }

    if let Some(cap) = policy.max_outcome_retries {
        if cap < 0 {
            errors.push(ValidationError::NegativeMaxOutcomeRetries(cap));
        }
    }

    for (field, value) in [
        ("allowedTimeStart", &policy.allowed_time_start),
        ("allowedTimeEnd", &policy.allowed_time_end),
    ] {
        if parse_time_of_day(value).is_none() {
            errors.push(ValidationError::InvalidTimeOfDay {
                field,
                value: value.clone(),
            });
        }
    }

    if parse_timezone(&policy.timezone).is_none() {
        errors.push(ValidationError::UnknownTimezone(policy.timezone.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Collect advisories for a policy
///
/// Window advisories need a parseable window and are skipped otherwise;
/// `validate` reports the parse problem.
pub fn advisories(policy: &RetryPolicy) -> Vec<PolicyAdvisory> {
    let mut notes = Vec::new();

    let interval = policy.retry_interval_minutes;
    if (MIN_RETRY_INTERVAL_MINUTES..SUGGESTED_MIN_INTERVAL_MINUTES).contains(&interval) {
        notes.push(PolicyAdvisory::IntervalBelowSuggested);
    }
    if interval > SUGGESTED_MAX_INTERVAL_MINUTES {
        notes.push(PolicyAdvisory::IntervalAboveSuggested);
    }

    if let Some(window) = policy.calling_window() {
        if window.is_empty() {
            notes.push(PolicyAdvisory::EmptyWindow);
        } else if window.crosses_midnight() {
            notes.push(PolicyAdvisory::WindowCrossesMidnight);
        }
    }

    notes
}
