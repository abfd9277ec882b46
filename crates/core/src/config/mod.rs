//! File-level controller settings.
//!
//! A settings file names the algorithm and optionally carries one table of
//! parameters per algorithm:
//!
//! ```toml
//! congestion-control = "sprout"
//!
//! [sprout]
//! quantile-threshold = 0.1
//! forecast-horizon-ms = 120
//!
//! [delay-aimd]
//! beta = 0.5
//! ```
//!
//! Tables for algorithms other than the selected one are ignored. Missing
//! tables and missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::congestion_control::{CongestionControlAlgorithm, CongestionControlConfig};
use crate::delay_aimd::DelayAimdConfig;
use crate::errors::ConfigError;
use crate::fixed_window::FixedWindowConfig;
use crate::sprout::SproutConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ControllerConfig {
    /// Congestion control algorithm: "sprout", "delay-aimd" or "fixed-window".
    pub congestion_control: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprout: Option<SproutConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_aimd: Option<DelayAimdConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_window: Option<FixedWindowConfig>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            congestion_control: default_congestion_control(),
            sprout: None,
            delay_aimd: None,
            fixed_window: None,
        }
    }
}

fn default_congestion_control() -> String {
    "sprout".to_string()
}

impl ControllerConfig {
    /// Reads settings from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        tracing::debug!(path = ?path, "Reading controller configuration file");
        match ext.as_str() {
            "toml" => Self::from_toml_str(&std::fs::read_to_string(path)?),
            "json" => Self::from_json_str(&std::fs::read_to_string(path)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn algorithm(&self) -> Result<CongestionControlAlgorithm, ConfigError> {
        self.congestion_control.parse()
    }

    /// Builds the validated configuration for the selected algorithm.
    pub fn build_congestion_config(&self) -> Result<CongestionControlConfig, ConfigError> {
        let algo = self.algorithm()?;

        let config = match algo {
            CongestionControlAlgorithm::Sprout => CongestionControlConfig::from_sprout_config(
                self.sprout.clone().unwrap_or_default(),
            ),
            CongestionControlAlgorithm::DelayAimd => {
                CongestionControlConfig::from_delay_aimd_config(
                    self.delay_aimd.clone().unwrap_or_default(),
                )
            }
            CongestionControlAlgorithm::FixedWindow => {
                CongestionControlConfig::from_fixed_window_config(
                    self.fixed_window.clone().unwrap_or_default(),
                )
            }
        };

        config.validate()?;
        tracing::debug!(algorithm = %algo, "Using congestion control configuration");
        Ok(config)
    }
}
