use crate::TlError;

/// Floating point type used throughout the model
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
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
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TlError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TlError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, TlError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(TlError::NonPositive { what, value: v })
    }
}

/// Round to a fixed number of decimal places. Display only.
pub fn round_to(v: Real, places: u32) -> Real {
    let scale = 10f64.powi(places as i32);
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        assert!(err.to_string().contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(0.5, "d").is_ok());
        assert!(matches!(
            ensure_positive(0.0, "d"),
            Err(TlError::NonPositive { .. })
        ));
        assert!(matches!(
            ensure_positive(-1.0, "d"),
            Err(TlError::NonPositive { .. })
        ));
        assert!(matches!(
            ensure_positive(Real::INFINITY, "d"),
            Err(TlError::NonFinite { .. })
        ));
    }

    #[test]
    fn round_to_four_places() {
        assert_eq!(round_to(1.013_888_9, 4), 1.0139);
        assert_eq!(round_to(0.468_68, 4), 0.4687);
    }
}
