//! Structured logging setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging with environment-based filtering.
///
/// Logs are written to stderr as JSON so stdout stays free for the run's
/// completion line.
///
/// # Arguments
/// * `log_level` - Optional log level override (e.g., "info", "debug", "error")
pub fn init_logging(log_level: Option<&str>) -> anyhow::Result<()> {
    let filter = if let Some(level) = log_level {
        EnvFilter::try_new(level)?
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
