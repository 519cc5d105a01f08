//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "strata";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World layout settings.
    pub world: WorldConfig,
    /// Save/load settings.
    pub storage: StorageConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Name of the world save.
    pub name: String,
    /// Edge length of a voxel in world units.
    pub voxel_size: f32,
    /// Chunk width (X and Y) in voxels.
    pub chunk_width: u32,
    /// Chunk height (Z) in voxels. Must be a multiple of `chunk_width`.
    pub chunk_height: u32,
    /// Number of chunk columns along each side of a region.
    pub region_width: u32,
    /// Chunks spawned around the origin for a new world, per direction.
    pub spawn_radius: i32,
}

/// Save/load configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; saves go to `<saved_dir>/SaveGames/<world>/Region`.
    pub saved_dir: PathBuf,
    /// Interval between completion polls of background jobs, in seconds.
    pub poll_interval_secs: f32,
    /// Attempts a background job makes before reporting failure.
    pub max_attempts: u32,
    /// Pause between failed attempts, in milliseconds.
    pub retry_delay_ms: u64,
    /// Pause before a background job starts working, in milliseconds.
    pub startup_delay_ms: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: "DefaultWorld".to_string(),
            voxel_size: 100.0,
            chunk_width: 16,
            chunk_height: 128,
            region_width: 16,
            spawn_radius: 5,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let saved_dir = dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from("Saved"));
        Self {
            saved_dir,
            poll_interval_secs: 1.0,
            max_attempts: 1,
            retry_delay_ms: 30,
            startup_delay_ms: 30,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl StorageConfig {
    /// Poll interval as a [`Duration`]. Non-positive values fall back to one second.
    pub fn poll_interval(&self) -> Duration {
        if self.poll_interval_secs > 0.0 && self.poll_interval_secs.is_finite() {
            Duration::from_secs_f32(self.poll_interval_secs)
        } else {
            Duration::from_secs(1)
        }
    }

    /// Retry delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Startup delay as a [`Duration`].
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

// --- Load / Save / Reload ---

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    ron::from_str(&text).map_err(ConfigError::ParseError)
}

impl Config {
    /// Path of the config file inside `config_dir`.
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE)
    }

    /// Reads `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(config_dir);
        if !path.exists() {
            let config = Self::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = read_config(&path)?;
        if let Err(err) = config.validate() {
            log::warn!("{} holds an unusable setting: {err}", path.display());
        }
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes this config to `config_dir/config.ron` as pretty RON.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(Self::path_in(config_dir), text).map_err(ConfigError::WriteError)
    }

    /// Re-reads the file. Returns `Some` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&Self::path_in(config_dir))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk (world '{}')", fresh.world.name);
        Ok(Some(fresh))
    }

    /// Checks that the world layout can be stored in the region format.
    ///
    /// Widths and heights are written as single bytes, and a chunk must split
    /// into whole `chunk_width`-tall slabs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.chunk_width == 0 || world.chunk_width > 40 {
            return Err(ConfigError::InvalidValue {
                field: "world.chunk_width",
                reason: format!("{} is outside 1..=40", world.chunk_width),
            });
        }
        if world.chunk_height == 0
            || world.chunk_height > u8::MAX as u32
            || world.chunk_height % world.chunk_width != 0
        {
            return Err(ConfigError::InvalidValue {
                field: "world.chunk_height",
                reason: format!(
                    "{} must be a multiple of chunk_width {} and at most 255",
                    world.chunk_height, world.chunk_width
                ),
            });
        }
        if world.region_width == 0 || world.region_width > u8::MAX as u32 {
            return Err(ConfigError::InvalidValue {
                field: "world.region_width",
                reason: format!("{} is outside 1..=255", world.region_width),
            });
        }
        if !(world.voxel_size > 0.0 && world.voxel_size.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "world.voxel_size",
                reason: format!("{} is not a positive size", world.voxel_size),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_layout() {
        let config = Config::default();
        assert_eq!(config.world.name, "DefaultWorld");
        assert_eq!(config.world.voxel_size, 100.0);
        assert_eq!((config.world.chunk_width, config.world.chunk_height), (16, 128));
        assert_eq!(config.world.region_width, 16);
        assert_eq!(config.storage.max_attempts, 1);
        assert_eq!(config.storage.retry_delay(), Duration::from_millis(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = ron::from_str("(world: (name: \"Other\"), unknown_key: 3)").unwrap();
        assert_eq!(config.world.name, "Other");
        assert_eq!(config.world.region_width, 16);
        assert_eq!(config.storage.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        let text = std::fs::read_to_string(Config::path_in(dir.path())).unwrap();
        assert!(text.contains("chunk_height: 128"));
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.name = "Archipelago".to_string();
        config.world.spawn_radius = 2;
        config.storage.saved_dir = dir.path().join("saves");

        config.save(dir.path()).unwrap();
        assert_eq!(Config::load_or_create(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_reload_reports_only_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut edited = config.clone();
        edited.storage.poll_interval_secs = 0.25;
        edited.save(dir.path()).unwrap();
        let reloaded = config.reload(dir.path()).unwrap();
        assert_eq!(reloaded.map(|c| c.storage.poll_interval_secs), Some(0.25));
    }

    #[test]
    fn test_garbage_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(Config::path_in(dir.path()), "{{not valid}}").unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_height_not_multiple_of_width_rejected() {
        let mut config = Config::default();
        config.world.chunk_height = 100;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "world.chunk_height",
                ..
            })
        ));
    }

    #[test]
    fn test_poll_interval_falls_back_on_zero() {
        let mut storage = StorageConfig::default();
        storage.poll_interval_secs = 0.0;
        assert_eq!(storage.poll_interval(), Duration::from_secs(1));
        storage.poll_interval_secs = 0.5;
        assert_eq!(storage.poll_interval(), Duration::from_millis(500));
    }
}
