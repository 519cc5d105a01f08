//! Configuration system for Strata.
//!
//! Provides world, storage, and debug settings that persist to disk as RON
//! files. Supports CLI overrides via clap and hot-reload detection.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, StorageConfig, WorldConfig};
pub use error::ConfigError;
