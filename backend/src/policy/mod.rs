//! Retry Policy Module
//!
//! Configuration for how an external scheduler retries unanswered calls.
//!
//! # Overview
//!
//! The scheduler that places calls lives outside this crate. This module
//! guarantees the configuration is well-formed before it leaves:
//!
//! - `types`: `RetryPolicy` and the parsed `CallingWindow`
//! - `validation`: rule checks that collect every violation
//! - `submission`: validated envelope handed to the persistence sink
//!
//! Calling-window enforcement is the scheduler's job. A window whose end is
//! before its start is reported as crossing midnight, nothing more.

pub mod submission;
pub mod types;
pub mod validation;

// Re-exports
pub use submission::{config_hash, PolicySubmission, SubmissionError};
pub use types::{parse_time_of_day, parse_timezone, CallingWindow, RetryPolicy};
pub use validation::{
    advisories, validate, PolicyAdvisory, ValidationError, ValidationResult,
    MAX_RETRIES_LIMIT, MIN_RETRY_INTERVAL_MINUTES, SUGGESTED_MAX_INTERVAL_MINUTES,
    SUGGESTED_MIN_INTERVAL_MINUTES,
};
