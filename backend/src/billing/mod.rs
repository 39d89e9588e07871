//! Billing aggregation
//!
//! This module provides:
//! - Call records with lenient decoding (`records`)
//! - Single-pass call statistics (`aggregate`)
//! - Usage rate schedules (`rates`)
//! - Usage + channel billing (`summary`)
//! - Per-day and per-segment rollups (`daily`)
//!
//! # Malformed Data
//!
//! Records arrive from an external backend and may be partially loaded.
//! Missing or non-numeric fields decode to zero and are reported through
//! `tracing`; one bad record never stops the rest of the set from counting.

pub mod aggregate;
pub mod daily;
pub mod rates;
pub mod records;
pub mod summary;

// Re-exports
pub use aggregate::{aggregate, aggregate_segments, CallStats, SegmentReport};
pub use daily::{
    group_by_day, parse_daily_usage, period_bill, summarize_daily, DailyUsage, UsageTotals,
};
pub use rates::{RateScheduleError, UsageRateSchedule};
pub use records::{parse_records, CallRecord, CallStatus, DataShapeError};
pub use summary::{bill, BillingSummary};
