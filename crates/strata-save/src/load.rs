//! Load job: reads the world file and reassembles every stored chunk.

use std::path::Path;

use crate::assemble::{ChunkRecord, assemble_region};
use crate::error::SaveError;
use crate::paths::SavePaths;
use crate::storage::{read_region, read_world};
use crate::worker::Job;
use crate::world::WorldInfo;

/// Result of a completed load. Nothing is installed by the job itself.
#[derive(Clone, Debug)]
pub struct LoadOutcome {
    pub world: WorldInfo,
    pub chunks: Vec<ChunkRecord>,
}

pub struct LoadJob {
    name: String,
    paths: SavePaths,
}

impl LoadJob {
    pub fn new(saved_dir: &Path, world_name: &str) -> Self {
        Self {
            name: world_name.to_string(),
            paths: SavePaths::new(saved_dir, world_name),
        }
    }

    pub fn run(&self) -> Result<LoadOutcome, SaveError> {
        let world = read_world(&self.paths)?;
        if world.name != self.name {
            tracing::warn!(
                "World file for '{}' is named '{}'",
                self.name,
                world.name
            );
        }

        let mut chunks = Vec::new();
        for &coord in &world.regions {
            let mut region = read_region(&self.paths, coord)?;
            if region.coord != coord {
                tracing::warn!(
                    "Region file ({}, {}) claims to be ({}, {})",
                    coord.x,
                    coord.y,
                    region.coord.x,
                    region.coord.y
                );
                region.coord = coord;
            }
            chunks.extend(assemble_region(&region, &world)?);
        }

        tracing::info!(
            "Loaded {} chunks from {} regions of world '{}'",
            chunks.len(),
            world.region_count(),
            world.name
        );
        Ok(LoadOutcome { world, chunks })
    }
}

impl Job for LoadJob {
    type Output = LoadOutcome;

    fn name(&self) -> &'static str {
        "load"
    }

    fn run_once(&mut self) -> Result<LoadOutcome, SaveError> {
        self.run()
    }
}
