//! Delay-triggered AIMD congestion controller.
//!
//! A window-based controller that grows additively with acknowledged
//! datagrams and backs off multiplicatively when a round trip exceeds a delay
//! ceiling. It reads only sender-side timestamps and keeps no rate model.
//!
//! ## Window Rules
//!
//! For every acknowledgment:
//!
//! 1. Credit the ack counter with how far the acked sequence advanced
//! 2. Once the counter reaches the window, grow the window by one
//! 3. A round trip within a quarter of the delay ceiling earns a bonus credit
//! 4. A round trip at or above the ceiling clears the counter and scales the
//!    window by `beta`
//!
//! Fast paths grow the window several times quicker than one datagram per
//! window of acks, while a single slow round trip cuts it immediately.

mod config;
mod controller;

pub use config::DelayAimdConfig;
pub use controller::DelayAimdController;
