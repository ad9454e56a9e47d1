/// Floating point type used for sample values
pub type Real = f64;

/// Absolute/relative comparison tolerance
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
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

/// Replace a non-finite value with `fallback`.
pub fn finite_or(v: Real, fallback: Real) -> Real {
    if v.is_finite() { v } else { fallback }
}

/// Use `v` as a denominator, substituting 1.0 when it is zero or not finite.
pub fn nonzero_or_one(v: Real) -> Real {
    if v.is_finite() && v.abs() > Real::EPSILON {
        v
    } else {
        1.0
    }
}

/// Round to one decimal place (display precision of logged values).
pub fn round_tenth(v: Real) -> Real {
    (v * 10.0).round() / 10.0
}

pub fn lerp(a: Real, b: Real, t: Real) -> Real {
    a + (b - a) * t
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean(values: &[Real]) -> Option<Real> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<Real>() / values.len() as Real)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn lerp_hits_endpoints(a in -100.0_f64..100.0, b in -100.0_f64..100.0) {
            let tol = Tolerances::default();
            prop_assert!(nearly_equal(lerp(a, b, 0.0), a, tol));
            prop_assert!(nearly_equal(lerp(a, b, 1.0), b, tol));
        }
    }
}
