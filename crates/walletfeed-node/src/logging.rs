use crate::error::{Error, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Builds the log filter from the `--log` patterns.
///
/// Without patterns, `RUST_LOG` is used when set, `info` otherwise.
pub fn log_filter(patterns: &[String]) -> Result<EnvFilter> {
    if patterns.is_empty() {
        return Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)));
    }

    EnvFilter::try_new(patterns.join(",")).map_err(|err| Error::InvalidLogPattern(err.to_string()))
}

/// Installs the global subscriber, logs go to stderr.
pub fn init(patterns: &[String]) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(patterns)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| Error::Other(format!("Failed to initialize logging: {err}")))
}
