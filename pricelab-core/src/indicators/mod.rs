//! Moving-average indicators.
//!
//! `Sma` computes a shrinking-window average over one ordered series;
//! `grouped::compute_series` applies two of them per stock across a whole
//! coerced table.

pub mod grouped;
pub mod sma;

pub use grouped::compute_series;
pub use sma::{RollingMean, Sma};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
