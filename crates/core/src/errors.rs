use thiserror::Error;

/// Errors raised while loading or validating controller configuration.
///
/// Event handlers and window queries never fail; configuration is the only
/// fallible surface of the crate.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown congestion control algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
