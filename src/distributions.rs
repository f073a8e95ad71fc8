//! Outcome distributions with inverse link functions.
//!
//! Each distribution maps a linear predictor `lp` to its mean parameter
//! through an inverse link, then draws one value per predictor entry.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Inverse link | Draw |
//! |---|---|---|---|
//! | [`Normal`] | σ | identity | N(lp, σ²) |
//! | [`Bernoulli`] | — | logistic ([`expit`](crate::special::expit)) | Bernoulli(σ(lp)) |
//! | [`Poisson`] | — | exp | Poisson(exp(lp)) |
//! | [`Discrete`] | values, p | identity (unused) | values\[i\] w.p. p\[i\] |
//!
//! # Design Notes
//!
//! Draws are returned as `f64` regardless of support so that the columns of a
//! simulated data set share one element type. Bernoulli draws are `0.0`/`1.0`
//! and Poisson draws are non-negative integers stored as `f64`.

use std::fmt;

use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution as _, StandardNormal};

use crate::error::{Error, Result};
use crate::random::WeightedSampler;
use crate::special;

/// Inverse link function g⁻¹ mapping a linear predictor to a mean parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Identity,
    /// Logit link; the inverse is the logistic sigmoid.
    Logit,
    /// Log link; the inverse is `exp`.
    Log,
}

impl Link {
    /// Evaluates g⁻¹(lp).
    ///
    /// # Examples
    /// ```
    /// use kvaser::distributions::Link;
    /// assert_eq!(Link::Identity.inverse(2.5), 2.5);
    /// assert_eq!(Link::Logit.inverse(0.0), 0.5);
    /// assert_eq!(Link::Log.inverse(0.0), 1.0);
    /// ```
    pub fn inverse(self, lp: f64) -> f64 {
        match self {
            Link::Identity => lp,
            Link::Logit => special::expit(lp),
            Link::Log => lp.exp(),
        }
    }

    pub fn inverse_array(self, lp: &Array1<f64>) -> Array1<f64> {
        lp.mapv(|v| self.inverse(v))
    }
}

// ============================================================================
// Normal Distribution
// ============================================================================

/// Normal outcome N(lp, σ²) with identity link.
#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    scale: f64,
}

impl Normal {
    /// Creates a normal outcome with standard deviation `scale`.
    ///
    /// # Errors
    /// Returns `Err` if `scale ≤ 0` or is not finite.
    pub fn new(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::invalid_parameters(format!(
                "Normal requires finite scale > 0, got scale={scale}"
            )));
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn link(&self) -> Link {
        Link::Identity
    }

    /// One draw of N(mean, σ²).
    pub fn draw<R: Rng + ?Sized>(&self, mean: f64, rng: &mut R) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        mean + self.scale * z
    }
}

impl Default for Normal {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

// ============================================================================
// Bernoulli Distribution
// ============================================================================

/// Binary outcome with success probability σ(lp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bernoulli;

impl Bernoulli {
    pub fn new() -> Self {
        Self
    }

    pub fn link(&self) -> Link {
        Link::Logit
    }

    /// One draw with success probability `p`; a NaN probability yields NaN.
    pub fn draw<R: Rng + ?Sized>(&self, p: f64, rng: &mut R) -> f64 {
        if p.is_nan() {
            return f64::NAN;
        }
        if rng.random_bool(p.clamp(0.0, 1.0)) {
            1.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// Poisson Distribution
// ============================================================================

/// Count outcome with rate exp(lp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Poisson;

impl Poisson {
    pub fn new() -> Self {
        Self
    }

    pub fn link(&self) -> Link {
        Link::Log
    }

    /// One draw with rate `lambda`.
    ///
    /// A rate of exactly zero (e.g. `exp` underflow) always draws `0.0`.
    /// Rates the sampler cannot represent (NaN, infinite or beyond its
    /// supported range) yield NaN.
    pub fn draw<R: Rng + ?Sized>(&self, lambda: f64, rng: &mut R) -> f64 {
        if lambda == 0.0 {
            return 0.0;
        }
        match rand_distr::Poisson::new(lambda) {
            Ok(poisson) => poisson.sample(rng),
            Err(_) => f64::NAN,
        }
    }
}

// ============================================================================
// Discrete Distribution
// ============================================================================

/// Draws from a fixed finite set of values, ignoring the linear predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct Discrete {
    values: Vec<f64>,
    p: Vec<f64>,
    sampler: WeightedSampler,
}

impl Discrete {
    /// Creates a discrete distribution over `values` with probabilities
    /// proportional to `p`.
    ///
    /// # Errors
    /// Returns `Err` if `values` is empty, the lengths differ, any value or
    /// weight is not finite, any weight is negative, or all weights are zero.
    pub fn new(values: Vec<f64>, p: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::invalid_parameters(
                "Discrete requires at least one value",
            ));
        }
        if values.len() != p.len() {
            return Err(Error::invalid_parameters(format!(
                "Discrete requires one probability per value, got {} values and {} probabilities",
                values.len(),
                p.len()
            )));
        }
        if !values.iter().chain(p.iter()).all(|v| v.is_finite()) {
            return Err(Error::invalid_parameters(
                "Discrete values and probabilities must be finite",
            ));
        }
        if p.iter().any(|&w| w < 0.0) {
            return Err(Error::invalid_parameters(format!(
                "Discrete probabilities must be non-negative, got {p:?}"
            )));
        }
        let sampler = WeightedSampler::new(&p).ok_or_else(|| {
            Error::invalid_parameters("Discrete probabilities must have a positive sum")
        })?;
        Ok(Self { values, p, sampler })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.p
    }

    pub fn link(&self) -> Link {
        Link::Identity
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.values[self.sampler.sample(rng)]
    }
}

impl Default for Discrete {
    /// A fair coin over `{0, 1}`.
    fn default() -> Self {
        Self::new(vec![0.0, 1.0], vec![0.5, 0.5]).expect("fair coin parameters are valid")
    }
}

// ============================================================================
// Distribution
// ============================================================================

/// Any outcome distribution a DAG node can be simulated from.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Normal(Normal),
    Bernoulli(Bernoulli),
    Poisson(Poisson),
    Discrete(Discrete),
}

impl Distribution {
    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Normal(_) => "Normal",
            Distribution::Bernoulli(_) => "Bernoulli",
            Distribution::Poisson(_) => "Poisson",
            Distribution::Discrete(_) => "Discrete",
        }
    }

    pub fn link(&self) -> Link {
        match self {
            Distribution::Normal(d) => d.link(),
            Distribution::Bernoulli(d) => d.link(),
            Distribution::Poisson(d) => d.link(),
            Distribution::Discrete(d) => d.link(),
        }
    }

    /// Mean parameter for a single linear predictor value.
    pub fn invlink(&self, lp: f64) -> f64 {
        self.link().inverse(lp)
    }

    /// Mean parameters for a vector of linear predictor values.
    pub fn invlink_array(&self, lp: &Array1<f64>) -> Array1<f64> {
        self.link().inverse_array(lp)
    }

    /// Draws one value per entry of `lp`.
    ///
    /// # Examples
    /// ```
    /// use kvaser::distributions::{Bernoulli, Distribution};
    /// use kvaser::random::create_rng;
    /// use ndarray::Array1;
    ///
    /// let mut rng = create_rng(7);
    /// let lp = Array1::from(vec![-1000.0, 1000.0]);
    /// let y = Distribution::from(Bernoulli::new()).simulate(&lp, &mut rng);
    /// assert_eq!(y.to_vec(), vec![0.0, 1.0]);
    /// ```
    pub fn simulate<R: Rng + ?Sized>(&self, lp: &Array1<f64>, rng: &mut R) -> Array1<f64> {
        let mean = self.invlink_array(lp);
        match self {
            Distribution::Normal(d) => mean.mapv(|m| d.draw(m, &mut *rng)),
            Distribution::Bernoulli(d) => mean.mapv(|p| d.draw(p, &mut *rng)),
            Distribution::Poisson(d) => mean.mapv(|lambda| d.draw(lambda, &mut *rng)),
            Distribution::Discrete(d) => mean.mapv(|_| d.draw(&mut *rng)),
        }
    }
}

impl Default for Distribution {
    /// Standard normal noise around the linear predictor.
    fn default() -> Self {
        Distribution::Normal(Normal::default())
    }
}

impl From<Normal> for Distribution {
    fn from(d: Normal) -> Self {
        Distribution::Normal(d)
    }
}

impl From<Bernoulli> for Distribution {
    fn from(d: Bernoulli) -> Self {
        Distribution::Bernoulli(d)
    }
}

impl From<Poisson> for Distribution {
    fn from(d: Poisson) -> Self {
        Distribution::Poisson(d)
    }
}

impl From<Discrete> for Distribution {
    fn from(d: Discrete) -> Self {
        Distribution::Discrete(d)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} distribution", self.name())?;
        match self {
            Distribution::Normal(d) => write!(f, " (scale={})", d.scale),
            Distribution::Discrete(d) => {
                write!(f, " (values={:?}, p={:?})", d.values, d.p)
            }
            Distribution::Bernoulli(_) | Distribution::Poisson(_) => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn simulate_preserves_length(
            seed in 0_u64..10000,
            lp in proptest::collection::vec(-20.0_f64..20.0, 0..50),
        ) {
            let lp = Array1::from(lp);
            let mut rng = create_rng(seed);
            for d in [
                Distribution::default(),
                Bernoulli::new().into(),
                Poisson::new().into(),
                Discrete::default().into(),
            ] {
                prop_assert_eq!(d.simulate(&lp, &mut rng).len(), lp.len());
            }
        }

        #[test]
        fn logit_inverse_in_unit_interval(lp in -1e6_f64..1e6) {
            let p = Link::Logit.inverse(lp);
            prop_assert!((0.0..=1.0).contains(&p));
        }

        #[test]
        fn simulation_is_reproducible(
            seed in 0_u64..10000,
            lp in proptest::collection::vec(-5.0_f64..5.0, 1..30),
        ) {
            let lp = Array1::from(lp);
            let d = Distribution::from(Poisson::new());
            let a = d.simulate(&lp, &mut create_rng(seed));
            let b = d.simulate(&lp, &mut create_rng(seed));
            prop_assert_eq!(a, b);
        }
    }
}
