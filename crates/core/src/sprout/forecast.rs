//! Conservative capacity forecast across the feedback horizon.

use super::belief::BeliefDistribution;
use super::config::SproutConfig;
use super::diffusion::DiffusionStep;
use super::support::RateSupport;

/// A forecast extracted from the projected belief.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    /// Quantile rate of the projected belief (datagrams/sec).
    pub rate_pps: f64,
    /// Datagrams the link is expected to drain over the forecast horizon.
    pub packets: f64,
}

/// Projects the belief forward without new evidence and reads off a low quantile.
#[derive(Debug, Clone)]
pub struct Forecaster {
    steps: usize,
    horizon_ms: u64,
    quantile: f64,
}

impl Forecaster {
    pub fn from_config(config: &SproutConfig) -> Self {
        Self {
            steps: config.forecast_steps().max(1),
            horizon_ms: config.forecast_horizon_ms,
            quantile: config.quantile_threshold,
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn quantile(&self) -> f64 {
        self.quantile
    }

    /// Time-averaged belief over the projection steps.
    ///
    /// Each step diffuses the running projection once and contributes
    /// `1 / steps` of its mass.
    pub fn project(&self, belief: &BeliefDistribution, diffusion: &DiffusionStep) -> Vec<f64> {
        let mut projected = belief.clone();
        let mut averaged = vec![0.0; belief.len()];
        let steps = self.steps as f64;
        for _ in 0..self.steps {
            diffusion.apply(&mut projected);
            for (acc, m) in averaged.iter_mut().zip(projected.masses()) {
                *acc += m / steps;
            }
        }
        averaged
    }

    /// Forecast at the configured quantile.
    pub fn forecast(
        &self,
        belief: &BeliefDistribution,
        support: &RateSupport,
        diffusion: &DiffusionStep,
    ) -> Option<Forecast> {
        self.forecast_with_quantile(belief, support, diffusion, self.quantile)
    }

    /// Forecast at an explicit quantile.
    ///
    /// Returns `None` when the cumulative projected mass never exceeds
    /// `quantile`.
    pub fn forecast_with_quantile(
        &self,
        belief: &BeliefDistribution,
        support: &RateSupport,
        diffusion: &DiffusionStep,
        quantile: f64,
    ) -> Option<Forecast> {
        let averaged = self.project(belief, diffusion);
        let mut cdf = 0.0;
        for (m, rate_pps) in averaged.iter().zip(support.values()) {
            cdf += m;
            if cdf > quantile {
                return Some(Forecast {
                    rate_pps: *rate_pps,
                    packets: rate_pps * self.horizon_ms as f64 / 1000.0,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SproutConfig, RateSupport, DiffusionStep, Forecaster) {
        let config = SproutConfig::default();
        let support = RateSupport::new(config.support_buckets, config.max_rate_pps);
        let diffusion = DiffusionStep::from_config(&config, &support);
        let forecaster = Forecaster::from_config(&config);
        (config, support, diffusion, forecaster)
    }

    #[test]
    fn test_uniform_belief_forecast() {
        let (_, support, diffusion, forecaster) = setup();
        let belief = BeliefDistribution::uniform(200);

        // 20% of 200 uniform buckets is crossed around bucket 40 (160 pps)
        let forecast = forecaster.forecast(&belief, &support, &diffusion).unwrap();
        assert!((156.0..=160.0).contains(&forecast.rate_pps));
        assert!((forecast.packets - forecast.rate_pps / 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_projection_is_a_distribution() {
        let (_, _, diffusion, forecaster) = setup();
        let mut weights = vec![0.0; 200];
        weights[60] = 1.0;
        let belief = BeliefDistribution::from_weights(weights);

        let projected = forecaster.project(&belief, &diffusion);
        let total: f64 = projected.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        // Projection leaks mass away from a sharp peak
        assert!(projected[60] < 1.0);
        assert!(projected[0] > 0.0);
    }

    #[test]
    fn test_peaked_belief_forecasts_peak() {
        let (_, support, diffusion, forecaster) = setup();
        let mut weights = vec![0.0; 200];
        weights[50] = 1.0;
        let belief = BeliefDistribution::from_weights(weights);

        let forecast = forecaster.forecast(&belief, &support, &diffusion).unwrap();
        assert_eq!(forecast.rate_pps, 200.0);
        assert!((forecast.packets - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_quantile_returns_none() {
        let (_, support, diffusion, forecaster) = setup();
        let belief = BeliefDistribution::uniform(200);
        assert!(forecaster
            .forecast_with_quantile(&belief, &support, &diffusion, 1.5)
            .is_none());
    }

    #[test]
    fn test_forecast_non_decreasing_in_quantile() {
        let (_, support, diffusion, forecaster) = setup();
        let weights = (0..200).map(|i| ((i as f64 - 80.0) / 15.0).powi(2)).map(|x| (-x).exp());
        let belief = BeliefDistribution::from_weights(weights.collect());

        let mut previous = f64::NEG_INFINITY;
        for q in [0.0, 0.05, 0.1, 0.2, 0.35, 0.5, 0.75, 0.9, 0.99] {
            let rate = forecaster
                .forecast_with_quantile(&belief, &support, &diffusion, q)
                .unwrap()
                .rate_pps;
            assert!(rate >= previous, "q={q}: {rate} < {previous}");
            previous = rate;
        }
    }
}
