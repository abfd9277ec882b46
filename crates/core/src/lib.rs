//! Window-based congestion control for datagram senders.
//!
//! The main algorithm is Sprout: the sender keeps a probability distribution
//! over the bottleneck link's service rate, updates it from receiver
//! timestamps once per tick, and sizes its window from a cautious forecast of
//! how much the link will drain before feedback can arrive. Two simpler
//! controllers share the same interface for comparison.
//!
//! ```ignore
//! use sprout_cc::{CongestionControl, CongestionControlConfig};
//!
//! let mut controller = CongestionControlConfig::default().build()?;
//! controller.on_datagram_sent(0, now_ms, false);
//! let window = controller.query_window_size();
//! ```

/// File-level controller settings (TOML or JSON).
pub mod config;

/// Algorithm selection, the shared controller trait and enum dispatch.
pub mod congestion_control;

/// Delay-triggered AIMD controller.
pub mod delay_aimd;

pub mod errors;

/// Constant-window baseline controller.
pub mod fixed_window;

/// Outstanding datagram tracking shared by the controllers.
pub mod queue;

/// Time sources, including virtual time for deterministic tests.
pub mod simulation;

/// Sprout stochastic forecast controller.
pub mod sprout;

/// Tracing subscriber setup.
#[cfg(feature = "trace")]
pub mod tracer;

pub use congestion_control::{
    AlgorithmConfig, CongestionControl, CongestionControlAlgorithm, CongestionControlConfig,
    CongestionControlStats, CongestionController,
};
pub use errors::ConfigError;
pub use sprout::{SproutConfig, SproutController, SproutStats};
