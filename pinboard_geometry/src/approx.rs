// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Epsilon-tolerant scalar comparisons.
//!
//! Card coordinates are repeatedly scaled into and out of nested coordinate
//! spaces, so values that should be equal drift apart by a few ULPs. Every
//! comparison in this workspace goes through these helpers instead of raw
//! `==` and `<`.

/// Tolerance used by all comparisons in this module.
pub const EPSILON: f64 = 1e-6;

/// Whether `a` is within [`EPSILON`] of zero.
#[inline]
pub fn is_zero(a: f64) -> bool {
    a.abs() < EPSILON
}

/// Whether `a` and `b` are within [`EPSILON`] of each other.
#[inline]
pub fn is_equal(a: f64, b: f64) -> bool {
    is_zero(a - b)
}

/// Whether `a` exceeds `b` by more than [`EPSILON`].
#[inline]
pub fn is_greater(a: f64, b: f64) -> bool {
    a - b >= EPSILON
}

/// Whether `a` is below `b` by more than [`EPSILON`].
#[inline]
pub fn is_less(a: f64, b: f64) -> bool {
    b - a >= EPSILON
}

/// `a >= b`, tolerating [`EPSILON`] of error.
#[inline]
pub fn is_greater_or_equal(a: f64, b: f64) -> bool {
    !is_less(a, b)
}

/// `a <= b`, tolerating [`EPSILON`] of error.
#[inline]
pub fn is_less_or_equal(a: f64, b: f64) -> bool {
    !is_greater(a, b)
}

/// Sort key that groups `a` into [`EPSILON`]-wide buckets.
///
/// Values that differ only by float noise share a key, so sorting by it with
/// `total_cmp` falls through to the next tie-breaker instead of reordering.
#[inline]
pub fn bucket(a: f64) -> f64 {
    (a / EPSILON).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_noise_shares_a_bucket() {
        assert_eq!(bucket(0.1 + 0.2), bucket(0.3));
        assert_eq!(bucket(1e-9), bucket(0.0));
        assert!(bucket(1.0) < bucket(1.0 + 2.0 * EPSILON));
    }

    #[test]
    fn scaled_roundtrip_compares_equal() {
        let v = 0.1 + 0.2;
        assert!(is_equal(v, 0.3));
        assert!(!is_greater(v, 0.3));
        assert!(!is_less(v, 0.3));
        assert!(is_less_or_equal(v, 0.3));
        assert!(is_greater_or_equal(v, 0.3));
    }

    #[test]
    fn distinct_values_order() {
        assert!(is_less(1.0, 1.5));
        assert!(is_greater(1.5, 1.0));
        assert!(!is_zero(1e-3));
        assert!(is_zero(-1e-9));
    }
}
