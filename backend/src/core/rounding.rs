//! Rounding and summation rules
//!
//! Wave conversion rounds half away from zero. Currency amounts are never
//! rounded inside the engine; `round_currency` exists for the display edge.

/// Round to the nearest integer, ties away from zero
///
/// # Example
/// ```
/// use callwave_core_rs::core::round_half_away;
///
/// assert_eq!(round_half_away(2.5), 3.0);
/// assert_eq!(round_half_away(-2.5), -3.0);
/// assert_eq!(round_half_away(2.49), 2.0);
/// ```
pub fn round_half_away(value: f64) -> f64 {
    value.round()
}

/// Round a currency amount to `decimals` places for presentation
///
/// Non-finite input renders as zero.
///
/// # Example
/// ```
/// use callwave_core_rs::core::round_currency;
///
/// assert_eq!(round_currency(419.996, 2), 420.0);
/// assert_eq!(round_currency(f64::NAN, 2), 0.0);
/// ```
pub fn round_currency(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // already integral at this magnitude
        return value;
    }
    scaled.round() / factor
}

/// Sum floats in ascending order
///
/// Float addition is not associative, so summing in input order would make
/// totals depend on how records were fetched. Sorting first gives the same
/// bits for any permutation of the same values.
pub fn ordered_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    values.into_iter().sum()
}
