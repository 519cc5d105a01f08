//! Command-line argument parsing for Strata.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "strata", about = "Strata voxel world")]
pub struct CliArgs {
    /// World save name.
    #[arg(long)]
    pub world: Option<String>,

    /// Root directory for save games.
    #[arg(long)]
    pub saved_dir: Option<PathBuf>,

    /// Chunks spawned around the origin, per direction.
    #[arg(long)]
    pub spawn_radius: Option<i32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref name) = args.world {
            self.world.name = name.clone();
        }
        if let Some(ref dir) = args.saved_dir {
            self.storage.saved_dir = dir.clone();
        }
        if let Some(radius) = args.spawn_radius {
            self.world.spawn_radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
