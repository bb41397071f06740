//! Float/integer conversions used by weight tables and cost curves.
//!
//! Coin balances are integers; weights, curves and accrual are `f64`. Every
//! crossing between the two goes through these helpers so the saturating
//! behaviour is in one place.

/// Tolerance used when comparing normalized weights.
pub const WEIGHT_EPSILON: f64 = 1e-4;

/// Round to four decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// `floor(value)` as a `u64`. Negative and NaN inputs give 0; values past
/// `u64::MAX` saturate.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn floor_to_u64(value: f64) -> u64 {
    value.max(0.0).floor() as u64
}

/// `ceil(value)` as a `u64`, with the same saturation as [`floor_to_u64`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn ceil_to_u64(value: f64) -> u64 {
    value.max(0.0).ceil() as u64
}

/// Lossy widening for display and ratio math.
#[allow(clippy::cast_precision_loss)]
pub const fn u64_to_f64(value: u64) -> f64 {
    value as f64
}

/// Whether two weights are equal within [`WEIGHT_EPSILON`].
pub fn weights_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= WEIGHT_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round4_keeps_four_places() {
        assert!((round4(33.333_333) - 33.3333).abs() < 1e-9);
        assert!((round4(0.000_04) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn floor_saturates() {
        assert_eq!(floor_to_u64(-3.5), 0);
        assert_eq!(floor_to_u64(f64::NAN), 0);
        assert_eq!(floor_to_u64(6.99), 6);
        assert_eq!(floor_to_u64(f64::INFINITY), u64::MAX);
        assert_eq!(ceil_to_u64(0.2), 1);
    }
}
