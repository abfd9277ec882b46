//! Subscriber setup for binaries and tests that want controller logs.
//!
//! Controllers only emit `tracing` events; nothing is printed unless a
//! subscriber is installed. Environment switches:
//!
//! - `RUST_LOG`: standard `EnvFilter` directives, e.g. `sprout_cc=trace`
//! - `SPROUT_LOG_FORMAT=json`: one JSON object per event
//! - `SPROUT_DISABLE_LOGS`: install nothing

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, Layer, Registry};

/// Installs a global fmt subscriber.
///
/// Defaults to `DEBUG` in test and debug builds and `INFO` otherwise when
/// neither `level` nor `RUST_LOG` says otherwise.
pub fn init_tracer(level: Option<LevelFilter>) -> anyhow::Result<()> {
    if std::env::var("SPROUT_DISABLE_LOGS").is_ok() {
        return Ok(());
    }

    let default_filter = if cfg!(any(test, debug_assertions)) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter_layer = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.unwrap_or(default_filter).into())
        .from_env_lossy();

    let use_json = std::env::var("SPROUT_LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);
    let with_location = cfg!(any(test, debug_assertions));

    let fmt_layer = if use_json {
        tracing_subscriber::fmt::layer()
            .with_level(true)
            .json()
            .with_file(with_location)
            .with_line_number(with_location)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_level(true)
            .pretty()
            .with_file(with_location)
            .with_line_number(with_location)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let subscriber = Registry::default().with(fmt_layer.with_filter(filter_layer));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
