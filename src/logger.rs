//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default directive; otherwise the given level
/// applies to this crate and `info` to everything else.
pub fn setup_logger(crate_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,{}={}",
            crate_name.replace('-', "_"),
            default_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
