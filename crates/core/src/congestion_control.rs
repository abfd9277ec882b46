//! Congestion control interface for datagram senders.
//!
//! This module provides a pluggable interface for congestion control algorithms,
//! allowing selection between different algorithms via configuration.
//!
//! ## Design
//!
//! The design uses enum dispatch rather than trait objects since all algorithm
//! types are known at compile time. This provides:
//! - Zero-cost abstraction (no vtable indirection)
//! - Full access to algorithm-specific statistics via pattern matching
//! - Type-safe configuration
//!
//! ## Supported Algorithms
//!
//! - **Sprout** (default): Bayesian rate inference over a discrete belief,
//!   with a conservative quantile forecast sizing the window.
//! - **DelayAimd**: Additive increase per window of acks, multiplicative
//!   decrease when a round trip exceeds a delay ceiling.
//! - **FixedWindow**: Constant window, ignoring all feedback.
//!
//! ## Usage
//!
//! ```ignore
//! use sprout_cc::congestion_control::{
//!     CongestionControl, CongestionControlConfig, CongestionController,
//! };
//!
//! let mut controller = CongestionControlConfig::default().build()?;
//!
//! controller.on_datagram_sent(1, now, false);
//! controller.on_ack_received(1, now, receiver_ts, later);
//! let window = controller.query_window_size();
//!
//! if let Some(stats) = controller.sprout_stats() {
//!     println!("{stats}");
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use crate::delay_aimd::{DelayAimdConfig, DelayAimdController};
use crate::errors::ConfigError;
use crate::fixed_window::{FixedWindowConfig, FixedWindowController};
use crate::simulation::{RealTime, TimeSource};
use crate::sprout::{SproutConfig, SproutController, SproutStats};

// =============================================================================
// Algorithm Identification
// =============================================================================

/// Identifies the congestion control algorithm in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum CongestionControlAlgorithm {
    /// Stochastic forecast of the link rate from receiver timestamps.
    #[default]
    Sprout,

    /// Delay-triggered additive increase, multiplicative decrease.
    DelayAimd,

    /// Constant window.
    FixedWindow,
}

impl fmt::Display for CongestionControlAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CongestionControlAlgorithm::Sprout => write!(f, "Sprout"),
            CongestionControlAlgorithm::DelayAimd => write!(f, "DelayAIMD"),
            CongestionControlAlgorithm::FixedWindow => write!(f, "FixedWindow"),
        }
    }
}

impl FromStr for CongestionControlAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sprout" => Ok(Self::Sprout),
            "delay-aimd" | "delay_aimd" | "aimd" => Ok(Self::DelayAimd),
            "fixed-window" | "fixed_window" | "fixed" => Ok(Self::FixedWindow),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

// =============================================================================
// Algorithm-Agnostic Statistics
// =============================================================================

/// Algorithm-agnostic congestion control statistics.
///
/// For algorithm-specific statistics, pattern match on the `CongestionController`
/// enum to access the native stats type.
#[derive(Debug, Clone)]
pub struct CongestionControlStats {
    /// Algorithm identifier.
    pub algorithm: CongestionControlAlgorithm,
    /// Current window (datagrams).
    pub window: u32,
    /// Datagrams sent but not yet acknowledged.
    pub queue_estimate: u64,
    /// Retransmission timeout (ms).
    pub timeout_ms: u32,
    /// Rate the window was last sized for, where the algorithm models one
    /// (datagrams/sec).
    pub forecast_pps: Option<f64>,
}

impl CongestionControlStats {
    /// Datagrams that may be sent right now without exceeding the window.
    pub fn available_window(&self) -> u64 {
        u64::from(self.window).saturating_sub(self.queue_estimate)
    }
}

// =============================================================================
// Congestion Control Trait
// =============================================================================

/// Trait defining the interface for congestion control algorithms.
///
/// It's implemented by the concrete controllers and by the
/// `CongestionController` enum for dispatch.
///
/// ## Threading
///
/// Event handlers take `&mut self`. A controller belongs to one sending
/// session; callers that share it across threads wrap it in a lock.
pub trait CongestionControl: Send {
    // =========================================================================
    // Event Handlers
    // =========================================================================

    /// Called after a datagram is handed to the network.
    fn on_datagram_sent(
        &mut self,
        sequence_number: u64,
        send_timestamp_ms: u64,
        is_retransmit: bool,
    );

    /// Called when an acknowledgment arrives.
    ///
    /// `send_timestamp_ms` and `ack_received_timestamp_ms` are on the
    /// sender's clock, `receiver_timestamp_ms` on the receiver's.
    fn on_ack_received(
        &mut self,
        acked_sequence_number: u64,
        send_timestamp_ms: u64,
        receiver_timestamp_ms: u64,
        ack_received_timestamp_ms: u64,
    );

    // =========================================================================
    // Queries
    // =========================================================================

    /// Permitted number of datagrams in flight.
    ///
    /// Mutable because an algorithm may bring its model up to date lazily.
    fn query_window_size(&mut self) -> u32;

    /// Retransmission timeout (ms).
    fn query_timeout_ms(&self) -> u32;

    /// Datagrams sent but not yet acknowledged.
    fn queue_estimate(&self) -> u64;

    // =========================================================================
    // Statistics
    // =========================================================================

    fn stats(&self) -> CongestionControlStats;

    fn algorithm(&self) -> CongestionControlAlgorithm;
}

// =============================================================================
// Controller Dispatch
// =============================================================================

/// A congestion controller of any supported algorithm.
pub enum CongestionController<T: TimeSource = RealTime> {
    Sprout(Box<SproutController<T>>),
    DelayAimd(DelayAimdController<T>),
    FixedWindow(FixedWindowController<T>),
}

impl<T: TimeSource> fmt::Debug for CongestionController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sprout(c) => f
                .debug_struct("CongestionController::Sprout")
                .field("window", &c.current_window())
                .field("queue", &c.queue_estimate())
                .field("ticks", &c.ticks_processed())
                .finish_non_exhaustive(),
            Self::DelayAimd(c) => f
                .debug_struct("CongestionController::DelayAimd")
                .field("window", &c.query_window_size())
                .field("queue", &c.queue_estimate())
                .finish_non_exhaustive(),
            Self::FixedWindow(c) => f
                .debug_struct("CongestionController::FixedWindow")
                .field("window", &c.query_window_size())
                .field("queue", &c.queue_estimate())
                .finish_non_exhaustive(),
        }
    }
}

impl<T: TimeSource> CongestionControl for CongestionController<T> {
    fn on_datagram_sent(
        &mut self,
        sequence_number: u64,
        send_timestamp_ms: u64,
        is_retransmit: bool,
    ) {
        match self {
            Self::Sprout(c) => {
                c.on_datagram_sent(sequence_number, send_timestamp_ms, is_retransmit)
            }
            Self::DelayAimd(c) => {
                c.on_datagram_sent(sequence_number, send_timestamp_ms, is_retransmit)
            }
            Self::FixedWindow(c) => {
                c.on_datagram_sent(sequence_number, send_timestamp_ms, is_retransmit)
            }
        }
    }

    fn on_ack_received(
        &mut self,
        acked_sequence_number: u64,
        send_timestamp_ms: u64,
        receiver_timestamp_ms: u64,
        ack_received_timestamp_ms: u64,
    ) {
        match self {
            Self::Sprout(c) => c.on_ack_received(
                acked_sequence_number,
                send_timestamp_ms,
                receiver_timestamp_ms,
                ack_received_timestamp_ms,
            ),
            Self::DelayAimd(c) => c.on_ack_received(
                acked_sequence_number,
                send_timestamp_ms,
                receiver_timestamp_ms,
                ack_received_timestamp_ms,
            ),
            Self::FixedWindow(c) => c.on_ack_received(
                acked_sequence_number,
                send_timestamp_ms,
                receiver_timestamp_ms,
                ack_received_timestamp_ms,
            ),
        }
    }

    fn query_window_size(&mut self) -> u32 {
        match self {
            Self::Sprout(c) => c.query_window_size(),
            Self::DelayAimd(c) => c.query_window_size(),
            Self::FixedWindow(c) => c.query_window_size(),
        }
    }

    fn query_timeout_ms(&self) -> u32 {
        match self {
            Self::Sprout(c) => c.query_timeout_ms(),
            Self::DelayAimd(c) => c.query_timeout_ms(),
            Self::FixedWindow(c) => c.query_timeout_ms(),
        }
    }

    fn queue_estimate(&self) -> u64 {
        match self {
            Self::Sprout(c) => c.queue_estimate(),
            Self::DelayAimd(c) => c.queue_estimate(),
            Self::FixedWindow(c) => c.queue_estimate(),
        }
    }

    fn stats(&self) -> CongestionControlStats {
        match self {
            Self::Sprout(c) => CongestionControl::stats(&**c),
            Self::DelayAimd(c) => CongestionControl::stats(c),
            Self::FixedWindow(c) => CongestionControl::stats(c),
        }
    }

    fn algorithm(&self) -> CongestionControlAlgorithm {
        match self {
            Self::Sprout(_) => CongestionControlAlgorithm::Sprout,
            Self::DelayAimd(_) => CongestionControlAlgorithm::DelayAimd,
            Self::FixedWindow(_) => CongestionControlAlgorithm::FixedWindow,
        }
    }
}

// =============================================================================
// Trait Implementations for Concrete Controllers
// =============================================================================

impl<T: TimeSource> CongestionControl for SproutController<T> {
    fn on_datagram_sent(
        &mut self,
        sequence_number: u64,
        send_timestamp_ms: u64,
        is_retransmit: bool,
    ) {
        SproutController::on_datagram_sent(
            self,
            sequence_number,
            send_timestamp_ms,
            is_retransmit,
        )
    }

    fn on_ack_received(
        &mut self,
        acked_sequence_number: u64,
        send_timestamp_ms: u64,
        receiver_timestamp_ms: u64,
        ack_received_timestamp_ms: u64,
    ) {
        SproutController::on_ack_received(
            self,
            acked_sequence_number,
            send_timestamp_ms,
            receiver_timestamp_ms,
            ack_received_timestamp_ms,
        )
    }

    fn query_window_size(&mut self) -> u32 {
        SproutController::query_window_size(self)
    }

    fn query_timeout_ms(&self) -> u32 {
        SproutController::query_timeout_ms(self)
    }

    fn queue_estimate(&self) -> u64 {
        SproutController::queue_estimate(self)
    }

    fn stats(&self) -> CongestionControlStats {
        CongestionControlStats {
            algorithm: CongestionControlAlgorithm::Sprout,
            window: self.current_window(),
            queue_estimate: SproutController::queue_estimate(self),
            timeout_ms: SproutController::query_timeout_ms(self),
            forecast_pps: self.last_forecast().map(|f| f.rate_pps),
        }
    }

    fn algorithm(&self) -> CongestionControlAlgorithm {
        CongestionControlAlgorithm::Sprout
    }
}

impl<T: TimeSource> CongestionControl for DelayAimdController<T> {
    fn on_datagram_sent(
        &mut self,
        sequence_number: u64,
        send_timestamp_ms: u64,
        is_retransmit: bool,
    ) {
        DelayAimdController::on_datagram_sent(
            self,
            sequence_number,
            send_timestamp_ms,
            is_retransmit,
        )
    }

    fn on_ack_received(
        &mut self,
        acked_sequence_number: u64,
        send_timestamp_ms: u64,
        receiver_timestamp_ms: u64,
        ack_received_timestamp_ms: u64,
    ) {
        DelayAimdController::on_ack_received(
            self,
            acked_sequence_number,
            send_timestamp_ms,
            receiver_timestamp_ms,
            ack_received_timestamp_ms,
        )
    }

    fn query_window_size(&mut self) -> u32 {
        DelayAimdController::query_window_size(self)
    }

    fn query_timeout_ms(&self) -> u32 {
        DelayAimdController::query_timeout_ms(self)
    }

    fn queue_estimate(&self) -> u64 {
        DelayAimdController::queue_estimate(self)
    }

    fn stats(&self) -> CongestionControlStats {
        CongestionControlStats {
            algorithm: CongestionControlAlgorithm::DelayAimd,
            window: DelayAimdController::query_window_size(self),
            queue_estimate: DelayAimdController::queue_estimate(self),
            timeout_ms: DelayAimdController::query_timeout_ms(self),
            forecast_pps: None,
        }
    }

    fn algorithm(&self) -> CongestionControlAlgorithm {
        CongestionControlAlgorithm::DelayAimd
    }
}

impl<T: TimeSource> CongestionControl for FixedWindowController<T> {
    fn on_datagram_sent(
        &mut self,
        sequence_number: u64,
        send_timestamp_ms: u64,
        is_retransmit: bool,
    ) {
        FixedWindowController::on_datagram_sent(
            self,
            sequence_number,
            send_timestamp_ms,
            is_retransmit,
        )
    }

    fn on_ack_received(
        &mut self,
        acked_sequence_number: u64,
        send_timestamp_ms: u64,
        receiver_timestamp_ms: u64,
        ack_received_timestamp_ms: u64,
    ) {
        FixedWindowController::on_ack_received(
            self,
            acked_sequence_number,
            send_timestamp_ms,
            receiver_timestamp_ms,
            ack_received_timestamp_ms,
        )
    }

    fn query_window_size(&mut self) -> u32 {
        FixedWindowController::query_window_size(self)
    }

    fn query_timeout_ms(&self) -> u32 {
        FixedWindowController::query_timeout_ms(self)
    }

    fn queue_estimate(&self) -> u64 {
        FixedWindowController::queue_estimate(self)
    }

    fn stats(&self) -> CongestionControlStats {
        CongestionControlStats {
            algorithm: CongestionControlAlgorithm::FixedWindow,
            window: FixedWindowController::query_window_size(self),
            queue_estimate: FixedWindowController::queue_estimate(self),
            timeout_ms: FixedWindowController::query_timeout_ms(self),
            forecast_pps: None,
        }
    }

    fn algorithm(&self) -> CongestionControlAlgorithm {
        CongestionControlAlgorithm::FixedWindow
    }
}

// =============================================================================
// Algorithm-Specific Accessors
// =============================================================================

impl<T: TimeSource> CongestionController<T> {
    /// Get Sprout-specific stats if this is a Sprout controller.
    pub fn sprout_stats(&self) -> Option<SproutStats> {
        match self {
            Self::Sprout(c) => Some(c.stats()),
            _ => None,
        }
    }

    pub fn as_sprout(&self) -> Option<&SproutController<T>> {
        match self {
            Self::Sprout(c) => Some(&**c),
            _ => None,
        }
    }

    pub fn as_sprout_mut(&mut self) -> Option<&mut SproutController<T>> {
        match self {
            Self::Sprout(c) => Some(&mut **c),
            _ => None,
        }
    }

    pub fn as_delay_aimd(&self) -> Option<&DelayAimdController<T>> {
        match self {
            Self::DelayAimd(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_fixed_window(&self) -> Option<&FixedWindowController<T>> {
        match self {
            Self::FixedWindow(c) => Some(c),
            _ => None,
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for creating a congestion controller.
///
/// ```ignore
/// // Sprout with defaults
/// let controller = CongestionControlConfig::default().build()?;
///
/// // Sprout with a more conservative forecast
/// let config = CongestionControlConfig::from_sprout_config(
///     SproutConfig::default().with_quantile_threshold(0.05),
/// );
///
/// // Baseline
/// let controller = CongestionControlConfig::fixed_window(20).build()?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CongestionControlConfig {
    /// Which algorithm to use.
    pub algorithm: CongestionControlAlgorithm,
    /// Algorithm-specific configuration.
    pub algorithm_config: AlgorithmConfig,
}

/// Algorithm-specific configuration options.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AlgorithmConfig {
    Sprout(SproutConfig),
    DelayAimd(DelayAimdConfig),
    FixedWindow(FixedWindowConfig),
}

impl Default for CongestionControlConfig {
    fn default() -> Self {
        Self::from_sprout_config(SproutConfig::default())
    }
}

impl CongestionControlConfig {
    /// Create a new configuration for the specified algorithm with defaults.
    pub fn new(algorithm: CongestionControlAlgorithm) -> Self {
        match algorithm {
            CongestionControlAlgorithm::Sprout => Self::default(),
            CongestionControlAlgorithm::DelayAimd => {
                Self::from_delay_aimd_config(DelayAimdConfig::default())
            }
            CongestionControlAlgorithm::FixedWindow => {
                Self::from_fixed_window_config(FixedWindowConfig::default())
            }
        }
    }

    pub fn from_sprout_config(config: SproutConfig) -> Self {
        Self {
            algorithm: CongestionControlAlgorithm::Sprout,
            algorithm_config: AlgorithmConfig::Sprout(config),
        }
    }

    pub fn from_delay_aimd_config(config: DelayAimdConfig) -> Self {
        Self {
            algorithm: CongestionControlAlgorithm::DelayAimd,
            algorithm_config: AlgorithmConfig::DelayAimd(config),
        }
    }

    pub fn from_fixed_window_config(config: FixedWindowConfig) -> Self {
        Self {
            algorithm: CongestionControlAlgorithm::FixedWindow,
            algorithm_config: AlgorithmConfig::FixedWindow(config),
        }
    }

    /// Create a configuration for a fixed window of `window` datagrams.
    pub fn fixed_window(window: u32) -> Self {
        Self::from_fixed_window_config(FixedWindowConfig::new(window))
    }

    /// Check the algorithm parameters without building a controller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.algorithm_config {
            AlgorithmConfig::Sprout(config) => config.validate(),
            AlgorithmConfig::DelayAimd(config) => config.validate(),
            AlgorithmConfig::FixedWindow(config) => config.validate(),
        }
    }

    /// Build a congestion controller reading the wall clock.
    pub fn build(&self) -> Result<CongestionController<RealTime>, ConfigError> {
        self.build_with_time_source(RealTime::new())
    }

    /// Build a congestion controller with a custom time source.
    ///
    /// This is useful for deterministic testing with virtual time.
    pub fn build_with_time_source<T: TimeSource>(
        &self,
        time_source: T,
    ) -> Result<CongestionController<T>, ConfigError> {
        let controller = match (self.algorithm, &self.algorithm_config) {
            (CongestionControlAlgorithm::Sprout, AlgorithmConfig::Sprout(config)) => {
                CongestionController::Sprout(Box::new(SproutController::new_with_time_source(
                    config.clone(),
                    time_source,
                )?))
            }
            (CongestionControlAlgorithm::Sprout, _) => CongestionController::Sprout(Box::new(
                SproutController::new_with_time_source(SproutConfig::default(), time_source)?,
            )),
            (CongestionControlAlgorithm::DelayAimd, AlgorithmConfig::DelayAimd(config)) => {
                CongestionController::DelayAimd(DelayAimdController::new_with_time_source(
                    config.clone(),
                    time_source,
                )?)
            }
            (CongestionControlAlgorithm::DelayAimd, _) => CongestionController::DelayAimd(
                DelayAimdController::new_with_time_source(DelayAimdConfig::default(), time_source)?,
            ),
            (CongestionControlAlgorithm::FixedWindow, AlgorithmConfig::FixedWindow(config)) => {
                CongestionController::FixedWindow(FixedWindowController::new_with_time_source(
                    config.clone(),
                    time_source,
                )?)
            }
            (CongestionControlAlgorithm::FixedWindow, _) => CongestionController::FixedWindow(
                FixedWindowController::new_with_time_source(
                    FixedWindowConfig::default(),
                    time_source,
                )?,
            ),
        };

        tracing::debug!(algorithm = %self.algorithm, "Congestion controller built");
        Ok(controller)
    }

    /// Convert to the native SproutConfig if this is a Sprout configuration.
    pub fn as_sprout_config(&self) -> Option<&SproutConfig> {
        match &self.algorithm_config {
            AlgorithmConfig::Sprout(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_delay_aimd_config(&self) -> Option<&DelayAimdConfig> {
        match &self.algorithm_config {
            AlgorithmConfig::DelayAimd(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_fixed_window_config(&self) -> Option<&FixedWindowConfig> {
        match &self.algorithm_config {
            AlgorithmConfig::FixedWindow(config) => Some(config),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::VirtualTime;
    use rstest::rstest;

    #[test]
    fn test_default_config_creates_sprout() {
        let config = CongestionControlConfig::default();
        assert_eq!(config.algorithm, CongestionControlAlgorithm::Sprout);
        assert!(config.as_sprout_config().is_some());
    }

    #[rstest]
    #[case::sprout(CongestionControlAlgorithm::Sprout, 50)]
    #[case::delay_aimd(CongestionControlAlgorithm::DelayAimd, 50)]
    #[case::fixed_window(CongestionControlAlgorithm::FixedWindow, 50)]
    fn test_build_controller(#[case] algorithm: CongestionControlAlgorithm, #[case] window: u32) {
        let mut controller = CongestionControlConfig::new(algorithm)
            .build_with_time_source(VirtualTime::new())
            .unwrap();

        assert_eq!(controller.algorithm(), algorithm);
        assert_eq!(controller.query_window_size(), window);
        assert_eq!(controller.query_timeout_ms(), 150);
        assert_eq!(controller.queue_estimate(), 0);
    }

    #[test]
    fn test_build_with_real_time() {
        let controller = CongestionControlConfig::default().build().unwrap();
        assert_eq!(controller.algorithm(), CongestionControlAlgorithm::Sprout);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = CongestionControlConfig::from_sprout_config(
            SproutConfig::default().with_quantile_threshold(1.0),
        );
        assert!(config.validate().is_err());
        assert!(config.build().is_err());
    }

    #[test]
    fn test_mismatched_algorithm_config_uses_defaults() {
        let config = CongestionControlConfig {
            algorithm: CongestionControlAlgorithm::DelayAimd,
            algorithm_config: AlgorithmConfig::FixedWindow(FixedWindowConfig::new(3)),
        };
        let mut controller = config.build_with_time_source(VirtualTime::new()).unwrap();
        assert_eq!(controller.algorithm(), CongestionControlAlgorithm::DelayAimd);
        assert_eq!(controller.query_window_size(), 50);
    }

    #[test]
    fn test_basic_send_ack_flow() {
        let mut controller = CongestionControlConfig::default()
            .build_with_time_source(VirtualTime::new())
            .unwrap();

        controller.on_datagram_sent(1, 0, false);
        controller.on_datagram_sent(2, 0, false);
        assert_eq!(controller.queue_estimate(), 2);

        controller.on_ack_received(1, 0, 10, 20);
        assert_eq!(controller.queue_estimate(), 1);

        let stats = controller.stats();
        assert_eq!(stats.window, 50);
        assert_eq!(stats.available_window(), 49);
    }

    #[test]
    fn test_sprout_specific_stats_access() {
        let time = VirtualTime::new();
        let mut controller = CongestionControlConfig::default()
            .build_with_time_source(time.clone())
            .unwrap();

        time.advance_millis(170);
        controller.query_window_size();

        let stats = controller.sprout_stats().unwrap();
        assert_eq!(stats.ticks_processed, 1);
        assert!(controller.stats().forecast_pps.is_some());

        match &controller {
            CongestionController::Sprout(sprout) => assert_eq!(sprout.ticks_processed(), 1),
            other => panic!("expected Sprout, got {other:?}"),
        }
        assert!(controller.as_delay_aimd().is_none());
        assert!(controller.as_sprout_mut().is_some());
    }

    #[test]
    fn test_non_sprout_has_no_sprout_stats() {
        let controller = CongestionControlConfig::fixed_window(12)
            .build_with_time_source(VirtualTime::new())
            .unwrap();
        assert!(controller.sprout_stats().is_none());
        assert_eq!(controller.as_fixed_window().unwrap().query_window_size(), 12);
        assert_eq!(controller.stats().forecast_pps, None);
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(CongestionControlAlgorithm::Sprout.to_string(), "Sprout");
        assert_eq!(CongestionControlAlgorithm::DelayAimd.to_string(), "DelayAIMD");
        assert_eq!(
            CongestionControlAlgorithm::FixedWindow.to_string(),
            "FixedWindow"
        );
    }

    #[rstest]
    #[case("sprout", CongestionControlAlgorithm::Sprout)]
    #[case("SPROUT", CongestionControlAlgorithm::Sprout)]
    #[case("delay-aimd", CongestionControlAlgorithm::DelayAimd)]
    #[case("aimd", CongestionControlAlgorithm::DelayAimd)]
    #[case("fixed_window", CongestionControlAlgorithm::FixedWindow)]
    fn test_algorithm_from_str(#[case] input: &str, #[case] expected: CongestionControlAlgorithm) {
        assert_eq!(input.parse::<CongestionControlAlgorithm>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_algorithm() {
        let err = "bbr".parse::<CongestionControlAlgorithm>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAlgorithm(name) if name == "bbr"));
    }

    #[test]
    fn test_trait_object_usage() {
        let mut controllers: Vec<Box<dyn CongestionControl>> = vec![
            Box::new(
                SproutController::new_with_time_source(SproutConfig::default(), VirtualTime::new())
                    .unwrap(),
            ),
            Box::new(
                DelayAimdController::new_with_time_source(
                    DelayAimdConfig::default(),
                    VirtualTime::new(),
                )
                .unwrap(),
            ),
            Box::new(
                FixedWindowController::new_with_time_source(
                    FixedWindowConfig::default(),
                    VirtualTime::new(),
                )
                .unwrap(),
            ),
        ];

        for controller in controllers.iter_mut() {
            controller.on_datagram_sent(7, 0, false);
            assert_eq!(controller.queue_estimate(), 1);
            assert!(controller.query_window_size() >= 1);
        }
    }
}
