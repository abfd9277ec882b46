//! Poisson arrival likelihood and the Bayesian correction step.

use statrs::function::factorial::ln_factorial;

use super::belief::{BeliefDistribution, Normalization};
use super::config::SproutConfig;
use super::support::RateSupport;

/// Natural log of the Poisson probability of `k` arrivals with mean `lambda`.
///
/// Computed in the log domain so large counts do not overflow the factorial.
pub fn poisson_ln_pmf(k: u64, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 0.0 } else { f64::NEG_INFINITY };
    }
    k as f64 * lambda.ln() - lambda - ln_factorial(k)
}

/// Reweights the belief by the likelihood of one tick's arrival count.
#[derive(Debug, Clone)]
pub struct BayesUpdateStep {
    tick_seconds: f64,
    rate_offset: f64,
    epsilon: f64,
}

impl BayesUpdateStep {
    pub fn from_config(config: &SproutConfig) -> Self {
        Self {
            tick_seconds: config.tick_duration_ms as f64 / 1000.0,
            rate_offset: config.likelihood_rate_offset,
            epsilon: config.likelihood_epsilon,
        }
    }

    /// Expected arrivals in one tick for a link serving `rate_pps`.
    pub fn expected_arrivals(&self, rate_pps: f64) -> f64 {
        (rate_pps + self.rate_offset) * self.tick_seconds
    }

    /// Applies the update for `arrivals` observed in the tick.
    ///
    /// Posterior weights are shifted by their maximum before exponentiating,
    /// so the most likely bucket gets weight one and `epsilon` acts as a floor
    /// relative to it.
    pub fn apply(
        &self,
        belief: &mut BeliefDistribution,
        support: &RateSupport,
        arrivals: u64,
    ) -> Normalization {
        let log_weights: Vec<f64> = belief
            .masses()
            .iter()
            .zip(support.values())
            .map(|(m, s)| m.ln() + poisson_ln_pmf(arrivals, self.expected_arrivals(*s)))
            .collect();
        let max = log_weights
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        for (m, lw) in belief.masses_mut().iter_mut().zip(&log_weights) {
            let w = if max.is_finite() { (lw - max).exp() } else { 0.0 };
            *m = w + self.epsilon;
        }
        belief.normalize()
    }
}
