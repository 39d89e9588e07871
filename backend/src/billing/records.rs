//! Call records
//!
//! A `CallRecord` decodes from any JSON value. Fields that are missing,
//! null, non-numeric or negative fall back to safe defaults and each
//! substitution is reported as a `DataShapeError`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Call status as reported by the calling backend
///
/// Only `Completed` and `Connected` count as connected calls. Missing and
/// unrecognized statuses are treated as not connected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallStatus {
    Completed,
    Connected,
    Failed,
    NoAnswer,
    Busy,
    InProgress,
    /// Status absent from the record
    #[default]
    Unknown,
    /// Any status label not listed above
    Other(String),
}

impl CallStatus {
    /// Parse a backend status label (case-insensitive)
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "completed" => CallStatus::Completed,
            "connected" => CallStatus::Connected,
            "failed" => CallStatus::Failed,
            "no-answer" | "noanswer" => CallStatus::NoAnswer,
            "busy" => CallStatus::Busy,
            "in-progress" | "ringing" | "queued" => CallStatus::InProgress,
            "" | "unknown" => CallStatus::Unknown,
            _ => CallStatus::Other(label.trim().to_string()),
        }
    }

    /// Label used on the wire
    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Completed => "completed",
            CallStatus::Connected => "connected",
            CallStatus::Failed => "failed",
            CallStatus::NoAnswer => "no-answer",
            CallStatus::Busy => "busy",
            CallStatus::InProgress => "in-progress",
            CallStatus::Unknown => "unknown",
            CallStatus::Other(label) => label,
        }
    }

    /// Whether the call reached a person
    pub fn is_connected(&self) -> bool {
        matches!(self, CallStatus::Completed | CallStatus::Connected)
    }
}

impl From<String> for CallStatus {
    fn from(label: String) -> Self {
        CallStatus::from_label(&label)
    }
}

impl From<CallStatus> for String {
    fn from(status: CallStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record field that had to be replaced by a default
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataShapeError {
    #[error("Record is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("Field '{0}' is missing")]
    MissingField(&'static str),

    #[error("Field '{field}' is not numeric: {raw}")]
    NonNumeric { field: &'static str, raw: String },

    #[error("Field '{field}' is negative or non-finite: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Field 'startedAt' is not a timestamp: {0}")]
    BadTimestamp(String),

    #[error("Field 'date' is not a YYYY-MM-DD date: {0}")]
    BadDate(String),
}

impl DataShapeError {
    /// Absent fields are routine for in-flight calls, the rest point at a bad feed
    fn is_routine(&self) -> bool {
        matches!(self, DataShapeError::MissingField(_))
    }
}

/// One call as returned by the records source
///
/// # Example
/// ```
/// use callwave_core_rs::CallRecord;
///
/// let record: CallRecord = serde_json::from_str(
///     r#"{"status": "completed", "duration": 42, "cost": "n/a"}"#,
/// ).unwrap();
/// assert!(record.status.is_connected());
/// assert_eq!(record.duration_seconds, 42.0);
/// assert_eq!(record.cost, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", rename_all = "camelCase")]
pub struct CallRecord {
    pub status: CallStatus,
    pub duration_seconds: f64,
    pub cost: f64,
    pub started_at: Option<DateTime<Utc>>,
}

const DURATION_KEYS: [&str; 3] = ["durationSeconds", "duration", "duration_seconds"];
const STARTED_AT_KEYS: [&str; 3] = ["startedAt", "started_at", "createdAt"];

impl CallRecord {
    /// Create a well-formed record
    pub fn new(status: CallStatus, duration_seconds: f64, cost: f64) -> Self {
        Self {
            status,
            duration_seconds,
            cost,
            started_at: None,
        }
    }

    /// Set the call start timestamp
    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// Decode a raw JSON value, returning every default that was substituted
    ///
    /// Never fails: whatever cannot be read becomes a default.
    pub fn from_json_value(value: &Value) -> (Self, Vec<DataShapeError>) {
        let mut issues = Vec::new();

        let Some(object) = value.as_object() else {
            issues.push(DataShapeError::NotAnObject(truncate(value)));
            return (Self::default(), issues);
        };

        let status = match object.get("status") {
            Some(Value::String(label)) => CallStatus::from_label(label),
            Some(Value::Null) | None => CallStatus::Unknown,
            Some(other) => CallStatus::from_label(&other.to_string()),
        };

        let duration_seconds = read_amount(
            first_present(object, &DURATION_KEYS),
            "duration",
            &mut issues,
        );
        let cost = read_amount(object.get("cost"), "cost", &mut issues);

        let started_at = match first_present(object, &STARTED_AT_KEYS) {
            Some(Value::String(raw)) => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    issues.push(DataShapeError::BadTimestamp(raw.clone()));
                }
                parsed
            }
            Some(Value::Null) | None => None,
            Some(other) => {
                issues.push(DataShapeError::BadTimestamp(truncate(other)));
                None
            }
        };

        (
            Self {
                status,
                duration_seconds,
                cost,
                started_at,
            },
            issues,
        )
    }
}

impl From<Value> for CallRecord {
    fn from(value: Value) -> Self {
        let (record, issues) = CallRecord::from_json_value(&value);
        report_defaults(&issues, "call record field defaulted");
        record
    }
}

/// Log substituted defaults, routine ones at debug
pub(crate) fn report_defaults(issues: &[DataShapeError], message: &str) {
    for issue in issues {
        if issue.is_routine() {
            debug!(%issue, "{}", message);
        } else {
            warn!(%issue, "{}", message);
        }
    }
}

/// Parse a JSON array of call records
///
/// `null` is treated as an empty collection. Only a document that is not
/// JSON at all, or not an array, is an error.
pub fn parse_records(json: &str) -> Result<Vec<CallRecord>, serde_json::Error> {
    let records: Option<Vec<CallRecord>> = serde_json::from_str(json)?;
    Ok(records.unwrap_or_default())
}

pub(crate) fn first_present<'a>(
    object: &'a serde_json::Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

pub(crate) fn read_amount(
    value: Option<&Value>,
    field: &'static str,
    issues: &mut Vec<DataShapeError>,
) -> f64 {
    let parsed = match value {
        None | Some(Value::Null) => {
            issues.push(DataShapeError::MissingField(field));
            return 0.0;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(v) => {
            issues.push(DataShapeError::OutOfRange { field, value: v });
            0.0
        }
        None => {
            // value is Some here; the None arm returned above
            let raw = value.map(truncate).unwrap_or_default();
            issues.push(DataShapeError::NonNumeric { field, raw });
            0.0
        }
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

pub(crate) fn truncate(value: &Value) -> String {
    let mut text = value.to_string();
    if text.len() > 64 {
        let mut cut = 64;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
