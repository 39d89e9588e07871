//! Retry policy model
//!
//! Numeric limits are signed so that out-of-range input coming from the
//! dashboard survives decoding and is reported by `validate` instead of
//! failing as a parse error.

use chrono::{NaiveTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Retry configuration for an outbound campaign
///
/// # Example
/// ```
/// use callwave_core_rs::RetryPolicy;
///
/// let policy: RetryPolicy = serde_json::from_str(r#"{
///     "maxRetries": 3,
///     "retryIntervalMinutes": 30,
///     "autoCancelOnMaxRetries": true,
///     "maxOutcomeRetries": null,
///     "allowedTimeStart": "09:00",
///     "allowedTimeEnd": "20:00",
///     "timezone": "Europe/Berlin"
/// }"#).unwrap();
/// assert!(callwave_core_rs::validate(&policy).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Retries after the first attempt, 0-10
    pub max_retries: i64,

    /// Minutes between attempts
    pub retry_interval_minutes: i64,

    /// Cancel the call once retries are exhausted
    #[serde(default)]
    pub auto_cancel_on_max_retries: bool,

    /// Retries per call outcome; `None` means unlimited
    #[serde(default)]
    pub max_outcome_retries: Option<i64>,

    /// Start of the calling window, wall-clock `HH:MM` in `timezone`
    pub allowed_time_start: String,

    /// End of the calling window, wall-clock `HH:MM` in `timezone`
    pub allowed_time_end: String,

    /// IANA zone name the window is evaluated in
    pub timezone: String,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_interval_minutes: 60,
            auto_cancel_on_max_retries: true,
            max_outcome_retries: None,
            allowed_time_start: "09:00".to_string(),
            allowed_time_end: "20:00".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl RetryPolicy {
    /// Parse the calling window, or `None` if any part is malformed
    pub fn calling_window(&self) -> Option<CallingWindow> {
        Some(CallingWindow {
            start: parse_time_of_day(&self.allowed_time_start)?,
            end: parse_time_of_day(&self.allowed_time_end)?,
            timezone: parse_timezone(&self.timezone)?,
        })
    }
}

/// Parse a strict two-digit `HH:MM` time of day
///
/// # Example
/// ```
/// use callwave_core_rs::policy::parse_time_of_day;
///
/// assert!(parse_time_of_day("08:30").is_some());
/// assert!(parse_time_of_day("8:30").is_none());
/// assert!(parse_time_of_day("24:00").is_none());
/// ```
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
    if !well_formed {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

/// Resolve an IANA zone identifier
pub fn parse_timezone(raw: &str) -> Option<Tz> {
    raw.trim().parse::<Tz>().ok()
}

/// A parsed calling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub timezone: Tz,
}

impl CallingWindow {
    /// Whether the window wraps past midnight, e.g. 22:00-06:00
    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }

    /// Start and end are the same instant
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Window length in minutes, reading a wrapped window as overnight
    pub fn span_minutes(&self) -> u32 {
        let start = self.start.num_seconds_from_midnight() / 60;
        let end = self.end.num_seconds_from_midnight() / 60;
        if end >= start {
            end - start
        } else {
            24 * 60 - start + end
        }
    }
}
