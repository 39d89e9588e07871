//! Retry-wave projection
//!
//! Projects how a cohort of outbound calls converts across successive retry
//! waves at a fixed pickup rate.
//!
//! - `waves`: the simulator itself (`simulate`, `try_simulate`)
//! - `input`: form-facing input with percentage normalization
//! - `summary`: derived campaign metrics reduced from a wave sequence

pub mod input;
pub mod summary;
pub mod waves;

// Re-exports
pub use input::CampaignProjectionInput;
pub use summary::ProjectionSummary;
pub use waves::{
    normalize_pickup_rate, simulate, try_simulate, ProjectionError, WaveResult, MAX_RETRIES,
    MIN_RETRIES,
};
