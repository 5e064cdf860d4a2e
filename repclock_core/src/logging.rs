//! Logging infrastructure for repclock.
//!
//! Log lines go to stderr so hosts can keep stdout for rendering.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable consulted before `RUST_LOG`
pub const LOG_ENV: &str = "REPCLOCK_LOG";

/// Initialize logging at the default `warn` level
pub fn init() {
    init_with_level("warn")
}

/// Initialize logging with a specific default level
///
/// `REPCLOCK_LOG` wins over `RUST_LOG`, which wins over `default_level`.
pub fn init_with_level(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(default_level))
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        init_test();
        init_with_level("debug");
        tracing::debug!("logging initialised twice without panicking");
    }
}
