//! On-disk layout of a saved world.

use std::path::{Path, PathBuf};

use strata_voxel::RegionCoord;

/// Name of the world metadata file inside the region directory.
pub const WORLD_FILE_NAME: &str = "World.sav";

/// File locations of one world: `<saved>/SaveGames/<world>/Region/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavePaths {
    region_dir: PathBuf,
}

impl SavePaths {
    pub fn new(saved_dir: &Path, world_name: &str) -> Self {
        Self {
            region_dir: saved_dir.join("SaveGames").join(world_name).join("Region"),
        }
    }

    pub fn region_dir(&self) -> &Path {
        &self.region_dir
    }

    pub fn world_file(&self) -> PathBuf {
        self.region_dir.join(WORLD_FILE_NAME)
    }

    /// `Reg_(<x>)-(<y>).sav`
    pub fn region_file(&self, region: RegionCoord) -> PathBuf {
        self.region_dir
            .join(format!("Reg_({})-({}).sav", region.x, region.y))
    }
}
