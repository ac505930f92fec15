//! Logging subscriber setup for the binary and the C entry point

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LogSettings};
use crate::error::{FramecatError, FramecatResult};

/// Build the event filter. `RUST_LOG` wins over the configured level.
pub fn build_filter(settings: &LogSettings) -> FramecatResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.level).map_err(|e| FramecatError::Config {
        message: format!("Invalid log level '{}': {}", settings.level, e),
    })
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(settings: &LogSettings) -> FramecatResult<()> {
    let filter = build_filter(settings)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match settings.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| FramecatError::Config {
        message: format!("Failed to initialize logging: {}", e),
    })
}
