//! Delay-AIMD configuration and constants.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Multiplicative decrease factor applied on a slow round trip.
pub(crate) const DEFAULT_BETA: f64 = 0.75;

/// Round trips at or above this trigger a decrease (ms).
pub(crate) const DEFAULT_MAX_DELAY_MS: u64 = 100;

pub(crate) const DEFAULT_INITIAL_WINDOW: u32 = 50;

/// Ack credit earned by a round trip within a quarter of the delay ceiling.
pub(crate) const DEFAULT_FAST_ACK_BONUS: u64 = 10;

pub(crate) const DEFAULT_MIN_WINDOW: u32 = 1;

pub(crate) const DEFAULT_TIMEOUT_MS: u32 = 150;

/// Configuration for the delay-AIMD controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DelayAimdConfig {
    /// Window before any feedback (datagrams)
    pub initial_window: u32,
    /// Smallest window a decrease can produce (datagrams)
    pub min_window: u32,
    /// Multiplicative decrease factor, in (0, 1)
    pub beta: f64,
    /// Delay ceiling (ms)
    pub max_delay_ms: u64,
    /// Bonus ack credit for fast round trips
    pub fast_ack_bonus: u64,
    /// Retransmission timeout (ms)
    pub timeout_ms: u32,
}

impl Default for DelayAimdConfig {
    fn default() -> Self {
        Self {
            initial_window: DEFAULT_INITIAL_WINDOW,
            min_window: DEFAULT_MIN_WINDOW,
            beta: DEFAULT_BETA,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            fast_ack_bonus: DEFAULT_FAST_ACK_BONUS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl DelayAimdConfig {
    pub fn with_initial_window(mut self, window: u32) -> Self {
        self.initial_window = window;
        self
    }

    pub fn with_min_window(mut self, window: u32) -> Self {
        self.min_window = window;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_max_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    pub fn with_fast_ack_bonus(mut self, bonus: u64) -> Self {
        self.fast_ack_bonus = bonus;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Delay at or below which an ack earns the bonus credit.
    pub fn fast_ack_threshold_ms(&self) -> u64 {
        self.max_delay_ms / 4
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(ConfigError::invalid(
                "beta",
                format!("must be in (0, 1), got {}", self.beta),
            ));
        }
        if self.max_delay_ms == 0 {
            return Err(ConfigError::invalid("max-delay-ms", "must be positive"));
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
    fn test_defaults() {
        let config = DelayAimdConfig::default();
        assert_eq!(config.initial_window, 50);
        assert_eq!(config.beta, 0.75);
        assert_eq!(config.max_delay_ms, 100);
        assert_eq!(config.fast_ack_threshold_ms(), 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_beta() {
        assert!(DelayAimdConfig::default().with_beta(1.0).validate().is_err());
        assert!(DelayAimdConfig::default().with_beta(0.0).validate().is_err());
        assert!(DelayAimdConfig::default()
            .with_beta(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_initial_below_min() {
        let config = DelayAimdConfig::default()
            .with_min_window(10)
            .with_initial_window(5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "initial-window",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_toml() {
        let config: DelayAimdConfig = toml::from_str("beta = 0.5\nmax-delay-ms = 80").unwrap();
        assert_eq!(config.beta, 0.5);
        assert_eq!(config.max_delay_ms, 80);
        assert_eq!(config.initial_window, 50);
    }
}
