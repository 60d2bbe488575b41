use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Environment variable naming the log file. Overrides `logging.file`.
pub const LOG_ENV_VAR: &str = "NAVKEEP_LOG";

/// Initialize tracing with optional file output.
///
/// Logging is disabled unless `NAVKEEP_LOG` or `logging.file` names a log
/// file, so replay output on stdout stays clean. The filter comes from
/// `RUST_LOG`, falling back to `logging.filter`.
///
/// Returns false if logging stayed disabled.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let Some(log_path) = std::env::var(LOG_ENV_VAR).ok().or_else(|| config.file.clone()) else {
        return false;
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: Failed to open log file {log_path}: {err}");
            return false;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .is_ok()
}
