//! Numeric helpers shared by the projection and billing engines

pub mod rounding;

pub use rounding::{ordered_sum, round_currency, round_half_away};
