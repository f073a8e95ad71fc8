//! Scalar logistic function.
//!
//! The logistic sigmoid σ(z) = 1/(1 + e⁻ᶻ) maps the real line onto the open
//! interval (0, 1). It is the inverse of the logit link and turns a linear
//! predictor into a probability.
//!
//! # Numerical Stability
//!
//! The exponential is only ever evaluated at a non-positive argument, so the
//! intermediate term lies in `[0, 1]` for every non-NaN input and `exp` can
//! never overflow. Large-magnitude inputs saturate to exactly `0.0` or `1.0`
//! through underflow of the bounded term rather than through `inf`
//! arithmetic.

/// Logistic sigmoid (inverse logit) σ(z) = 1/(1 + e⁻ᶻ).
///
/// # Algorithm
/// With `e = exp(−|z|)`:
/// ```text
/// σ(z) = 1 / (1 + e)   for z ≥ 0
///      = e / (1 + e)   for z < 0
/// ```
/// Both branches are algebraically identical to 1/(1 + e⁻ᶻ); picking the
/// branch by sign keeps `e ≤ 1`.
///
/// # Special values
/// - `σ(0) = 0.5` exactly
/// - `σ(+∞) = 1`, `σ(−∞) = 0`
/// - `σ(NaN) = NaN`
///
/// # Examples
/// ```
/// use kvaser::special::expit;
/// assert_eq!(expit(0.0), 0.5);
/// assert!((expit(1.0) - 0.7310585786300049).abs() < 1e-15);
/// assert_eq!(expit(-1000.0), 0.0);
/// assert_eq!(expit(1000.0), 1.0);
/// ```
#[inline]
pub fn expit(z: f64) -> f64 {
    let e = bounded_exp(z);
    if z >= 0.0 {
        1.0 / (1.0 + e)
    } else {
        e / (1.0 + e)
    }
}

/// exp(−|z|), the only exponential `expit` evaluates.
#[inline]
fn bounded_exp(z: f64) -> f64 {
    (-z.abs()).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expit_at_zero() {
        assert_eq!(expit(0.0), 0.5);
        assert_eq!(expit(-0.0), 0.5);
    }

    #[test]
    fn test_expit_infinities() {
        assert_eq!(expit(f64::INFINITY), 1.0);
        assert_eq!(expit(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_expit_nan() {
        assert!(expit(f64::NAN).is_nan());
        assert!(expit(-f64::NAN).is_nan());
    }

    #[test]
    fn test_expit_known_values() {
        let cases = [
            (-1.0, 0.2689414213699951),
            (1.0, 0.7310585786300049),
            (2.0, 0.8807970779778823),
            (-5.0, 0.0066928509242848554),
        ];
        for (z, expected) in cases {
            let y = expit(z);
            assert!(
                (y - expected).abs() < 1e-15,
                "expit({z}) = {y}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_expit_saturation_without_overflow() {
        for z in [-1000.0, 1000.0, -f64::MAX, f64::MAX] {
            let e = bounded_exp(z);
            assert!(
                e.is_finite() && (0.0..=1.0).contains(&e),
                "exp term {e} at z={z}"
            );
        }
        assert_eq!(expit(-1000.0), 0.0);
        assert_eq!(expit(1000.0), 1.0);
        assert_eq!(expit(-f64::MAX), 0.0);
        assert_eq!(expit(f64::MAX), 1.0);
    }

    #[test]
    fn test_expit_tiny_negative_is_positive() {
        // exp(-700) is still a normal f64, so the result must not collapse to 0.
        let y = expit(-700.0);
        assert!(y > 0.0 && y < 1e-300, "expit(-700) = {y}");
    }

    #[test]
    fn test_expit_symmetry() {
        for &z in &[0.1, 0.5, 1.0, 3.0, 10.0, 25.0] {
            let sum = expit(z) + expit(-z);
            assert!(
                (sum - 1.0).abs() < 1e-12,
                "σ({z}) + σ(-{z}) = {sum}, expected 1.0"
            );
        }
    }

    #[test]
    fn test_expit_monotonic() {
        let zs: Vec<f64> = (-400..=400).map(|i| i as f64 * 0.1).collect();
        for w in zs.windows(2) {
            assert!(
                expit(w[0]) <= expit(w[1]),
                "expit not monotonic at z = {}, {}",
                w[0],
                w[1]
            );
        }
    }
}
