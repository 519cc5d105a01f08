//! Structured logging and tracing for Strata.
//!
//! Console output with uptime timestamps and module paths, plus an optional
//! JSON log file for post-mortem analysis of save/load runs. The filter comes
//! from `RUST_LOG` when set, otherwise from the configured log level.

use std::path::Path;

use strata_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written inside `log_dir`.
pub const LOG_FILE_NAME: &str = "strata.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file
/// * `debug_build` - enables the file layer (also enabled by `debug.log_to_file`)
/// * `config` - optional configuration providing the log level
///
/// # Examples
///
/// ```no_run
/// use strata_log::init_logging;
///
/// init_logging(None, false, None);
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_string(config);
    let to_file = debug_build || config.is_some_and(|c| c.debug.log_to_file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true) // save/load workers are named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if to_file
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Resolves the filter directive from the config, falling back to [`DEFAULT_FILTER`].
pub fn filter_string(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.clone()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
