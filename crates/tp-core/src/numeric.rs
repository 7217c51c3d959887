//! Float helpers shared by the property layer.

use crate::TpError;

/// Floating point type of every property value.
pub type Real = f64;

/// Absolute and relative tolerance pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    /// Accepted deviation of a composition sum from the whole.
    pub const FRACTION_SUM: Self = Self { abs: 1e-6, rel: 0.0 };
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// `0 < v < 1`; false for NaN.
pub fn in_open_unit_interval(v: Real) -> bool {
    v > 0.0 && v < 1.0
}

/// Rejects NaN and infinities coming out of a property evaluation.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TpError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TpError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_uses_either_tolerance() {
        let tol = Tolerances::default();
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(nearly_equal(101_325.0, 101_325.000_000_01, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn fraction_sum_tolerance_is_absolute() {
        assert!(nearly_equal(0.6 + 0.3 + 0.1, 1.0, Tolerances::FRACTION_SUM));
        assert!(nearly_equal(99.999_999_5, 100.0, Tolerances::FRACTION_SUM));
        assert!(!nearly_equal(99.99, 100.0, Tolerances::FRACTION_SUM));
    }

    #[test]
    fn open_unit_interval_excludes_bounds() {
        assert!(in_open_unit_interval(0.8));
        assert!(!in_open_unit_interval(0.0));
        assert!(!in_open_unit_interval(1.0));
        assert!(!in_open_unit_interval(Real::NAN));
    }

    #[test]
    fn ensure_finite_rejects_nan_and_inf() {
        let err = ensure_finite(Real::NAN, "density").unwrap_err();
        assert!(format!("{err}").contains("Non-finite"));
        assert!(ensure_finite(Real::INFINITY, "density").is_err());
        assert_eq!(ensure_finite(2.5, "density"), Ok(2.5));
    }
}
