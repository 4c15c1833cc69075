//! Range checks and small transforms for binary probabilities.
//!
//! Everything here works on a single probability `p` of the "first" outcome
//! of a two-outcome variable. The complementary outcome is always `1 - p`.

/// True if `p` is finite and in the closed interval [0, 1].
pub fn is_unit_interval(p: f64) -> bool {
    p.is_finite() && (0.0..=1.0).contains(&p)
}

/// True if `p` is finite and in the open interval (0, 1).
///
/// A prior must be strictly inside the interval: a prior of exactly 0 or 1
/// can never be moved by evidence.
pub fn is_open_unit_interval(p: f64) -> bool {
    p.is_finite() && p > 0.0 && p < 1.0
}

/// Probability of the complementary outcome.
pub fn complement(p: f64) -> f64 {
    1.0 - p
}

/// Weighted mixture `w * a + (1 - w) * b`.
///
/// This is the expectation of a two-outcome variable taking value `a` with
/// probability `w` and `b` otherwise.
pub fn mix(w: f64, a: f64, b: f64) -> f64 {
    w * a + (1.0 - w) * b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn unit_interval_bounds() {
        assert!(is_unit_interval(0.0));
        assert!(is_unit_interval(1.0));
        assert!(is_unit_interval(0.42));
        assert!(!is_unit_interval(-1e-12));
        assert!(!is_unit_interval(1.0 + 1e-12));
        assert!(!is_unit_interval(f64::NAN));
        assert!(!is_unit_interval(f64::INFINITY));
    }

    #[test]
    fn open_unit_interval_excludes_endpoints() {
        assert!(!is_open_unit_interval(0.0));
        assert!(!is_open_unit_interval(1.0));
        assert!(is_open_unit_interval(0.3));
        assert!(!is_open_unit_interval(f64::NAN));
    }

    #[test]
    fn complement_basic() {
        assert!(approx_eq(complement(0.3), 0.7, 1e-12));
        assert_eq!(complement(0.0), 1.0);
        assert_eq!(complement(1.0), 0.0);
    }

    #[test]
    fn mix_is_expectation() {
        // 0.3 * 70 + 0.7 * 20 = 35
        assert!(approx_eq(mix(0.3, 70.0, 20.0), 35.0, 1e-12));
        assert_eq!(mix(1.0, 5.0, 9.0), 5.0);
        assert_eq!(mix(0.0, 5.0, 9.0), 9.0);
    }
}
