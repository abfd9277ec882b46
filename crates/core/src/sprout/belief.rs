//! Probability mass over the rate support.

use super::support::RateSupport;

/// Outcome of renormalising a belief.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Masses were scaled to sum to one.
    Scaled,
    /// The total was zero or not finite; the belief was reset to uniform.
    ResetUniform,
}

/// Probability mass per rate bucket.
///
/// After every public mutation the masses are non-negative and sum to one
/// within floating point tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefDistribution {
    mass: Vec<f64>,
}

impl BeliefDistribution {
    /// Uniform belief over `buckets` rates.
    pub fn uniform(buckets: usize) -> Self {
        let p = 1.0 / buckets.max(1) as f64;
        Self {
            mass: vec![p; buckets],
        }
    }

    /// Builds a belief from raw weights, normalising them.
    pub fn from_weights(weights: Vec<f64>) -> Self {
        let mut belief = Self { mass: weights };
        for m in belief.mass.iter_mut() {
            if !(m.is_finite() && *m > 0.0) {
                *m = 0.0;
            }
        }
        belief.normalize();
        belief
    }

    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }

    pub fn masses(&self) -> &[f64] {
        &self.mass
    }

    pub(crate) fn masses_mut(&mut self) -> &mut [f64] {
        &mut self.mass
    }

    pub fn mass(&self, index: usize) -> f64 {
        self.mass.get(index).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Rescales the masses to sum to one.
    ///
    /// A zero or non-finite total cannot be rescaled, so the belief falls back
    /// to uniform.
    pub fn normalize(&mut self) -> Normalization {
        let total = self.total();
        if !(total.is_finite() && total > 0.0) {
            let p = 1.0 / self.mass.len().max(1) as f64;
            self.mass.iter_mut().for_each(|m| *m = p);
            return Normalization::ResetUniform;
        }
        self.mass.iter_mut().for_each(|m| *m /= total);
        Normalization::Scaled
    }

    /// Expected rate under the belief.
    pub fn mean(&self, support: &RateSupport) -> f64 {
        self.mass
            .iter()
            .zip(support.values())
            .map(|(m, s)| m * s)
            .sum()
    }

    /// Index of the most probable bucket (lowest index on ties).
    pub fn mode_index(&self) -> usize {
        let mut best = 0;
        for (i, m) in self.mass.iter().enumerate() {
            if *m > self.mass[best] {
                best = i;
            }
        }
        best
    }

    /// Smallest bucket whose cumulative mass strictly exceeds `quantile`.
    pub fn quantile_index(&self, quantile: f64) -> Option<usize> {
        let mut cdf = 0.0;
        for (i, m) in self.mass.iter().enumerate() {
            cdf += m;
            if cdf > quantile {
                return Some(i);
            }
        }
        None
    }

    /// Total mass held by the first `buckets` buckets.
    pub fn lower_tail_mass(&self, buckets: usize) -> f64 {
        self.mass.iter().take(buckets).sum()
    }
}
