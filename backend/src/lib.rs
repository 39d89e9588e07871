//! Callwave Core - Rust Engine
//!
//! Deterministic projection and billing engine behind the outbound-calling
//! operator dashboard.
//!
//! # Architecture
//!
//! - **core**: Shared numeric helpers (rounding, order-independent sums)
//! - **projection**: Retry-wave simulation and derived campaign metrics
//! - **billing**: Call record aggregation, daily usage rollups, rate schedules
//! - **policy**: Retry policy model, validation and submission envelopes
//!
//! # Critical Invariants
//!
//! 1. Every operation is a pure function of its arguments
//! 2. Wave conservation: converted + final pending == total calls
//! 3. Malformed records default to zero, they never abort an aggregation
//! 4. Currency is rounded only at the presentation edge

// Module declarations
pub mod billing;
pub mod core;
pub mod policy;
pub mod projection;

// Re-exports for convenience
pub use billing::{
    aggregate, bill, BillingSummary, CallRecord, CallStats, CallStatus, DailyUsage,
    DataShapeError, UsageRateSchedule,
};
pub use policy::{validate, PolicySubmission, RetryPolicy, ValidationError};
pub use projection::{
    simulate, try_simulate, CampaignProjectionInput, ProjectionError, ProjectionSummary,
    WaveResult,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn callwave_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::simulate_waves, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::aggregate_calls, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::compute_bill, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::validate_policy, m)?)?;
    Ok(())
}
