//! Daily rollups
//!
//! Usage screens show one row per day. The records source provides either
//! pre-rolled `DailyUsage` entries or raw call records with start times;
//! both reduce here.

use super::aggregate::{aggregate, finite_total, CallStats};
use super::rates::UsageRateSchedule;
use super::records::{
    first_present, parse_timestamp, read_amount, report_defaults, truncate, CallRecord,
    DataShapeError,
};
use super::summary::{bill, BillingSummary};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Usage for one calendar day
///
/// Decodes leniently: `seconds` and `amount` that are missing, null or
/// non-numeric become 0. Only an unreadable `date` rejects the entry.
///
/// # Example
/// ```
/// use callwave_core_rs::DailyUsage;
///
/// let usage: DailyUsage =
///     serde_json::from_str(r#"{"date": "2026-03-02", "seconds": "n/a", "amount": null}"#)
///         .unwrap();
/// assert_eq!(usage.seconds, 0.0);
/// assert_eq!(usage.amount, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct DailyUsage {
    pub date: NaiveDate,
    /// Call seconds used that day
    pub seconds: f64,
    /// Amount charged that day
    pub amount: f64,
}

impl DailyUsage {
    /// Decode a raw JSON value, returning every default that was substituted
    ///
    /// Fails only when the entry has no usable date.
    pub fn from_json_value(value: &Value) -> Result<(Self, Vec<DataShapeError>), DataShapeError> {
        let Some(object) = value.as_object() else {
            return Err(DataShapeError::NotAnObject(truncate(value)));
        };

        let date = match object.get("date") {
            Some(Value::String(raw)) => parse_date(raw)
                .ok_or_else(|| DataShapeError::BadDate(raw.clone()))?,
            Some(Value::Null) | None => return Err(DataShapeError::MissingField("date")),
            Some(other) => return Err(DataShapeError::BadDate(truncate(other))),
        };

        let mut issues = Vec::new();
        let seconds = read_amount(
            first_present(object, &["seconds", "totalSeconds"]),
            "seconds",
            &mut issues,
        );
        let amount = read_amount(object.get("amount"), "amount", &mut issues);

        Ok((
            Self {
                date,
                seconds,
                amount,
            },
            issues,
        ))
    }
}

impl TryFrom<Value> for DailyUsage {
    type Error = DataShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let (usage, issues) = DailyUsage::from_json_value(&value)?;
        report_defaults(&issues, "daily usage field defaulted");
        Ok(usage)
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

/// Parse a JSON array of daily usage entries
///
/// `null` is treated as an empty feed. Entries without a usable date are
/// dropped and logged; the rest of the feed is kept.
pub fn parse_daily_usage(json: &str) -> Result<Vec<DailyUsage>, serde_json::Error> {
    let entries: Option<Vec<Value>> = serde_json::from_str(json)?;
    let usage = entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match DailyUsage::try_from(entry) {
            Ok(usage) => Some(usage),
            Err(issue) => {
                warn!(%issue, "daily usage entry dropped");
                None
            }
        })
        .collect();
    Ok(usage)
}

/// Totals over a run of daily usage entries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageTotals {
    /// Distinct dates covered
    pub days: usize,
    pub total_seconds: f64,
    pub total_amount: f64,
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Sum daily usage entries
///
/// # Example
/// ```
/// use callwave_core_rs::billing::{summarize_daily, DailyUsage};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
/// let days = vec![
///     DailyUsage { date: day(1), seconds: 600.0, amount: 25.2 },
///     DailyUsage { date: day(2), seconds: 400.0, amount: 16.8 },
/// ];
/// let totals = summarize_daily(&days);
/// assert_eq!(totals.days, 2);
/// assert_eq!(totals.total_seconds, 1000.0);
/// ```
pub fn summarize_daily(usage: &[DailyUsage]) -> UsageTotals {
    let days: BTreeSet<NaiveDate> = usage.iter().map(|u| u.date).collect();
    let seconds = usage.iter().map(|u| non_negative(u.seconds)).collect();
    let amounts = usage.iter().map(|u| non_negative(u.amount)).collect();
    UsageTotals {
        days: days.len(),
        total_seconds: finite_total(seconds, "seconds"),
        total_amount: finite_total(amounts, "amount"),
    }
}

/// Bill a period from its daily usage entries
pub fn period_bill(
    usage: &[DailyUsage],
    channels_used: u32,
    rates: &UsageRateSchedule,
) -> BillingSummary {
    bill(summarize_daily(usage).total_seconds, channels_used, rates)
}

/// Aggregate call records per local calendar day in `tz`
///
/// Records without a start time cannot be placed on a day and are left out
/// of this view; `aggregate` over the full set still counts them.
pub fn group_by_day(records: &[CallRecord], tz: Tz) -> BTreeMap<NaiveDate, CallStats> {
    let mut by_day: BTreeMap<NaiveDate, Vec<CallRecord>> = BTreeMap::new();
    for record in records {
        if let Some(started_at) = record.started_at {
            let day = started_at.with_timezone(&tz).date_naive();
            by_day.entry(day).or_default().push(record.clone());
        }
    }

    by_day
        .into_iter()
        .map(|(day, records)| (day, aggregate(&records)))
        .collect()
}
