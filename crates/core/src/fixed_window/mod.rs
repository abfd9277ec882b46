//! Fixed-window congestion controller.
//!
//! A non-adaptive baseline that permits a constant number of datagrams in
//! flight regardless of feedback. Useful as a reference point when comparing
//! Sprout against a sender that ignores the link entirely.
//!
//! ## Usage
//!
//! ```ignore
//! let config = CongestionControlConfig::fixed_window(50);
//! let controller = config.build()?;
//! ```
//!
//! ## Caveats
//!
//! - No backpressure: a link slower than `window / rtt` builds a standing queue
//! - A link faster than that is left underused

mod controller;

pub use controller::{FixedWindowConfig, FixedWindowController, DEFAULT_FIXED_WINDOW};
