//! Sprout configuration and tuning constants.
//!
//! Every constant below is a default for a field of [`SproutConfig`]; nothing
//! in the algorithm reads a literal directly, so the controller can be retuned
//! from a config file without touching the inference code.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

// =============================================================================
// Timing
// =============================================================================

/// Length of one belief-update tick.
pub(crate) const DEFAULT_TICK_DURATION_MS: u64 = 20;

/// Time after which an acknowledgment is assumed to have reached the sender.
///
/// Receiver timestamps newer than `tick boundary - feedback delay` are kept in
/// the arrival log for a later tick. The first tick boundary is placed this far
/// after construction.
pub(crate) const DEFAULT_FEEDBACK_DELAY_MS: u64 = 150;

/// Horizon the forecast projects the belief across.
pub(crate) const DEFAULT_FORECAST_HORIZON_MS: u64 = 100;

/// Retransmission timeout reported to the sender.
pub(crate) const DEFAULT_TIMEOUT_MS: u32 = 150;

// =============================================================================
// Rate Support
// =============================================================================

/// Number of discrete candidate rates.
pub(crate) const DEFAULT_SUPPORT_BUCKETS: usize = 200;

/// Upper bound of the candidate rates, in datagrams per second (exclusive).
pub(crate) const DEFAULT_MAX_RATE_PPS: f64 = 800.0;

// =============================================================================
// Diffusion
// =============================================================================

/// Fraction of each bucket's mass kept per diffusion step.
pub(crate) const DEFAULT_DECAY_FACTOR: f64 = 0.9;

/// Total weight of the uniform floor; the per-bucket floor mass is this
/// divided by the bucket count.
pub(crate) const DEFAULT_FLOOR_WEIGHT: f64 = 1.0;

// =============================================================================
// Likelihood
// =============================================================================

/// Rate added to every candidate before computing the Poisson mean, so the
/// zero-rate bucket still explains the occasional arrival.
pub(crate) const DEFAULT_LIKELIHOOD_RATE_OFFSET: f64 = 2.5;

/// Added to every reweighted mass before renormalising.
pub(crate) const DEFAULT_LIKELIHOOD_EPSILON: f64 = 1e-12;

// =============================================================================
// Forecast and Window
// =============================================================================

/// Quantile of the projected belief used as the forecast rate.
pub(crate) const DEFAULT_QUANTILE_THRESHOLD: f64 = 0.2;

/// Multiplier applied to the forecast when sizing the window.
pub(crate) const DEFAULT_GAIN: f64 = 1.2;

/// Smallest window the controller will ever report.
pub(crate) const DEFAULT_MIN_WINDOW: u32 = 5;

/// Window reported before the first forecast.
pub(crate) const DEFAULT_INITIAL_WINDOW: u32 = 50;

// =============================================================================
// Configuration Types
// =============================================================================

/// How the belief spreads between observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiffusionKernel {
    /// Shrink every bucket towards a uniform floor (`decay-factor`, `floor-weight`).
    #[default]
    Decay,
    /// Convolve the belief with a normal density over rate distance.
    Gaussian {
        /// Standard deviation of the kernel, in datagrams per second.
        #[serde(rename = "std-dev-pps")]
        std_dev_pps: f64,
    },
}

/// What the controller does when the forecast finds no qualifying rate.
///
/// The quantile search only fails when the projected belief carries less total
/// mass than the threshold, which renormalisation should prevent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastFallback {
    /// Keep the previous window unchanged.
    #[default]
    PreserveWindow,
    /// Drop to the window floor.
    Floor,
}

/// Configuration for the Sprout controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SproutConfig {
    /// Tick length in milliseconds.
    pub tick_duration_ms: u64,
    /// Feedback delay in milliseconds.
    pub feedback_delay_ms: u64,
    /// Forecast horizon in milliseconds.
    pub forecast_horizon_ms: u64,
    /// Number of candidate rates.
    pub support_buckets: usize,
    /// Upper bound of the candidate rates (datagrams/sec).
    pub max_rate_pps: f64,
    /// Diffusion kernel.
    pub diffusion: DiffusionKernel,
    /// Decay factor of the decay kernel, in (0, 1).
    pub decay_factor: f64,
    /// Floor weight of the decay kernel.
    pub floor_weight: f64,
    /// Rate offset of the Poisson likelihood (datagrams/sec).
    pub likelihood_rate_offset: f64,
    /// Epsilon added after reweighting.
    pub likelihood_epsilon: f64,
    /// Forecast quantile, in [0, 1).
    pub quantile_threshold: f64,
    /// Window gain.
    pub gain: f64,
    /// Window floor (datagrams).
    pub min_window: u32,
    /// Window before the first forecast (datagrams).
    pub initial_window: u32,
    /// Retransmission timeout in milliseconds.
    pub timeout_ms: u32,
    /// Behaviour when the forecast finds no rate.
    pub forecast_fallback: ForecastFallback,
    /// Log every send and ack at debug level instead of trace.
    pub debug: bool,
}

impl Default for SproutConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms: DEFAULT_TICK_DURATION_MS,
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
            forecast_horizon_ms: DEFAULT_FORECAST_HORIZON_MS,
            support_buckets: DEFAULT_SUPPORT_BUCKETS,
            max_rate_pps: DEFAULT_MAX_RATE_PPS,
            diffusion: DiffusionKernel::Decay,
            decay_factor: DEFAULT_DECAY_FACTOR,
            floor_weight: DEFAULT_FLOOR_WEIGHT,
            likelihood_rate_offset: DEFAULT_LIKELIHOOD_RATE_OFFSET,
            likelihood_epsilon: DEFAULT_LIKELIHOOD_EPSILON,
            quantile_threshold: DEFAULT_QUANTILE_THRESHOLD,
            gain: DEFAULT_GAIN,
            min_window: DEFAULT_MIN_WINDOW,
            initial_window: DEFAULT_INITIAL_WINDOW,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            forecast_fallback: ForecastFallback::PreserveWindow,
            debug: false,
        }
    }
}

impl SproutConfig {
    /// Per-bucket floor mass used by the decay kernel.
    pub fn floor_mass(&self) -> f64 {
        self.floor_weight / self.support_buckets as f64
    }

    /// Number of diffusion steps the forecast projects across.
    pub fn forecast_steps(&self) -> usize {
        self.forecast_horizon_ms.div_ceil(self.tick_duration_ms) as usize
    }

    pub fn with_tick_duration_ms(mut self, tick_duration_ms: u64) -> Self {
        self.tick_duration_ms = tick_duration_ms;
        self
    }

    pub fn with_feedback_delay_ms(mut self, feedback_delay_ms: u64) -> Self {
        self.feedback_delay_ms = feedback_delay_ms;
        self
    }

    pub fn with_forecast_horizon_ms(mut self, forecast_horizon_ms: u64) -> Self {
        self.forecast_horizon_ms = forecast_horizon_ms;
        self
    }

    /// Set the rate support resolution and upper bound.
    pub fn with_support(mut self, buckets: usize, max_rate_pps: f64) -> Self {
        self.support_buckets = buckets;
        self.max_rate_pps = max_rate_pps;
        self
    }

    pub fn with_diffusion(mut self, diffusion: DiffusionKernel) -> Self {
        self.diffusion = diffusion;
        self
    }

    pub fn with_decay(mut self, decay_factor: f64, floor_weight: f64) -> Self {
        self.decay_factor = decay_factor;
        self.floor_weight = floor_weight;
        self
    }

    pub fn with_likelihood_rate_offset(mut self, offset: f64) -> Self {
        self.likelihood_rate_offset = offset;
        self
    }

    pub fn with_quantile_threshold(mut self, quantile: f64) -> Self {
        self.quantile_threshold = quantile;
        self
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_min_window(mut self, min_window: u32) -> Self {
        self.min_window = min_window;
        self
    }

    pub fn with_initial_window(mut self, initial_window: u32) -> Self {
        self.initial_window = initial_window;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_forecast_fallback(mut self, fallback: ForecastFallback) -> Self {
        self.forecast_fallback = fallback;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check that every parameter is inside the range the algorithm supports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_duration_ms == 0 {
            return Err(ConfigError::invalid("tick-duration-ms", "must be positive"));
        }
        if self.forecast_horizon_ms == 0 {
            return Err(ConfigError::invalid(
                "forecast-horizon-ms",
                "must be positive",
            ));
        }
        if self.support_buckets < 2 {
            return Err(ConfigError::invalid(
                "support-buckets",
                format!("need at least 2 buckets, got {}", self.support_buckets),
            ));
        }
        if !(self.max_rate_pps.is_finite() && self.max_rate_pps > 0.0) {
            return Err(ConfigError::invalid(
                "max-rate-pps",
                format!("must be a positive finite rate, got {}", self.max_rate_pps),
            ));
        }
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(ConfigError::invalid(
                "decay-factor",
                format!("must lie in (0, 1), got {}", self.decay_factor),
            ));
        }
        if !(self.floor_weight.is_finite() && self.floor_weight > 0.0) {
            return Err(ConfigError::invalid(
                "floor-weight",
                format!("must be positive, got {}", self.floor_weight),
            ));
        }
        if let DiffusionKernel::Gaussian { std_dev_pps } = self.diffusion {
            if !(std_dev_pps.is_finite() && std_dev_pps > 0.0) {
                return Err(ConfigError::invalid(
                    "diffusion.std-dev-pps",
                    format!("must be positive, got {std_dev_pps}"),
                ));
            }
        }
        if !(self.likelihood_rate_offset.is_finite() && self.likelihood_rate_offset >= 0.0) {
            return Err(ConfigError::invalid(
                "likelihood-rate-offset",
                format!("must be non-negative, got {}", self.likelihood_rate_offset),
            ));
        }
        if !(self.likelihood_epsilon.is_finite() && self.likelihood_epsilon >= 0.0) {
            return Err(ConfigError::invalid(
                "likelihood-epsilon",
                format!("must be non-negative, got {}", self.likelihood_epsilon),
            ));
        }
        if !(0.0..1.0).contains(&self.quantile_threshold) {
            return Err(ConfigError::invalid(
                "quantile-threshold",
                format!("must lie in [0, 1), got {}", self.quantile_threshold),
            ));
        }
        if !(self.gain.is_finite() && self.gain >= 0.0) {
            return Err(ConfigError::invalid(
                "gain",
                format!("must be non-negative, got {}", self.gain),
            ));
        }
        if self.min_window == 0 {
            return Err(ConfigError::invalid("min-window", "must be at least 1"));
        }
        if self.initial_window < self.min_window {
            return Err(ConfigError::invalid(
                "initial-window",
                format!(
                    "{} is below min-window {}",
                    self.initial_window, self.min_window
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SproutConfig::default();
        assert_eq!(config.tick_duration_ms, 20);
        assert_eq!(config.feedback_delay_ms, 150);
        assert_eq!(config.support_buckets, 200);
        assert_eq!(config.min_window, 5);
        assert_eq!(config.initial_window, 50);
        assert_eq!(config.timeout_ms, 150);
        assert_eq!(config.forecast_fallback, ForecastFallback::PreserveWindow);
        config.validate().unwrap();
    }

    #[test]
    fn test_floor_mass() {
        // Decay term per step is (1 - 0.9) * 0.005 = 0.0005
        let config = SproutConfig::default();
        assert!((config.floor_mass() - 0.005).abs() < 1e-15);
        assert!(((1.0 - config.decay_factor) * config.floor_mass() - 0.0005).abs() < 1e-15);
    }

    #[test]
    fn test_forecast_steps_round_up() {
        let config = SproutConfig::default();
        assert_eq!(config.forecast_steps(), 5);

        let config = config.with_forecast_horizon_ms(110);
        assert_eq!(config.forecast_steps(), 6);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let cases = [
            SproutConfig::default().with_tick_duration_ms(0),
            SproutConfig::default().with_forecast_horizon_ms(0),
            SproutConfig::default().with_support(1, 800.0),
            SproutConfig::default().with_support(200, f64::NAN),
            SproutConfig::default().with_decay(1.0, 1.0),
            SproutConfig::default().with_decay(0.9, 0.0),
            SproutConfig::default().with_quantile_threshold(1.0),
            SproutConfig::default().with_gain(-1.0),
            SproutConfig::default().with_min_window(0),
            SproutConfig::default().with_initial_window(2),
            SproutConfig::default().with_diffusion(DiffusionKernel::Gaussian { std_dev_pps: 0.0 }),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidParameter { .. })),
                "expected rejection for {config:?}"
            );
        }
    }

    #[test]
    fn test_toml_uses_kebab_case_and_defaults() {
        let config: SproutConfig = toml::from_str(
            r#"
            tick-duration-ms = 10
            quantile-threshold = 0.05
            forecast-fallback = "floor"
            diffusion = { kind = "gaussian", std-dev-pps = 12.5 }
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_duration_ms, 10);
        assert_eq!(config.quantile_threshold, 0.05);
        assert_eq!(config.forecast_fallback, ForecastFallback::Floor);
        assert_eq!(
            config.diffusion,
            DiffusionKernel::Gaussian { std_dev_pps: 12.5 }
        );
        // Unspecified fields keep their defaults
        assert_eq!(config.feedback_delay_ms, DEFAULT_FEEDBACK_DELAY_MS);
        assert_eq!(config.gain, DEFAULT_GAIN);
    }
}
