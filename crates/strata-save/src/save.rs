//! Save job: packs chunk snapshots into region files and updates the world file.

use std::collections::BTreeMap;
use std::path::Path;

use strata_voxel::{Chunk, ChunkCoord, ChunkData, RegionCoord};

use crate::error::{CodecError, SaveError, StorageError};
use crate::paths::SavePaths;
use crate::region::RegionFile;
use crate::storage::{read_region, write_region, write_world};
use crate::sub_chunk::{SubChunk, pack_chunk};
use crate::worker::Job;
use crate::world::WorldInfo;

/// Owned copy of a chunk taken when the save was requested.
#[derive(Clone, Debug)]
pub struct ChunkSnapshot {
    pub coord: ChunkCoord,
    /// Chunk version at snapshot time.
    pub version: u64,
    pub data: ChunkData,
}

impl ChunkSnapshot {
    pub fn of(chunk: &Chunk) -> Self {
        Self {
            coord: chunk.coord(),
            version: chunk.version(),
            data: chunk.data().clone(),
        }
    }
}

/// Result of a completed save.
#[derive(Clone, Debug)]
pub struct SaveOutcome {
    /// World metadata as written, including every region now on disk.
    pub world: WorldInfo,
    /// `(coordinate, snapshot version)` of every chunk written.
    pub saved: Vec<(ChunkCoord, u64)>,
    pub regions_written: usize,
}

pub struct SaveJob {
    paths: SavePaths,
    world: WorldInfo,
    snapshots: Vec<ChunkSnapshot>,
}

impl SaveJob {
    pub fn new(saved_dir: &Path, world: WorldInfo, snapshots: Vec<ChunkSnapshot>) -> Self {
        Self {
            paths: SavePaths::new(saved_dir, &world.name),
            world,
            snapshots,
        }
    }

    pub fn paths(&self) -> &SavePaths {
        &self.paths
    }

    /// Writes every touched region, then the world file.
    ///
    /// Regions already on disk are merged: columns without a fresh snapshot
    /// keep their stored sub-chunks.
    pub fn run(&self) -> Result<SaveOutcome, SaveError> {
        let dims = self.world.dims()?;
        let mut fresh: BTreeMap<RegionCoord, Vec<SubChunk>> = BTreeMap::new();
        let mut saved = Vec::with_capacity(self.snapshots.len());

        for snapshot in &self.snapshots {
            if snapshot.data.dims() != dims || snapshot.data.len() != dims.volume() {
                return Err(CodecError::LayoutMismatch {
                    coord: snapshot.coord,
                }
                .into());
            }
            let location = snapshot.coord.location(self.world.region_width);
            fresh
                .entry(location.region)
                .or_default()
                .extend(pack_chunk(location.local, &snapshot.data)?);
            saved.push((snapshot.coord, snapshot.version));
        }

        let mut world = self.world.clone();
        let regions_written = fresh.len();
        for (coord, sub_chunks) in fresh {
            let mut region = self.existing_region(&world, coord)?;
            region.merge(sub_chunks);
            write_region(&self.paths, &region)?;
            world.regions.insert(coord);
        }
        write_world(&self.paths, &world)?;

        tracing::info!(
            "Saved {} chunks across {} regions of world '{}'",
            saved.len(),
            regions_written,
            world.name
        );
        Ok(SaveOutcome {
            world,
            saved,
            regions_written,
        })
    }

    fn existing_region(
        &self,
        world: &WorldInfo,
        coord: RegionCoord,
    ) -> Result<RegionFile, SaveError> {
        if !world.regions.contains(&coord) {
            return Ok(RegionFile::new(coord));
        }
        match read_region(&self.paths, coord) {
            Ok(mut region) => {
                region.coord = coord;
                Ok(region)
            }
            Err(StorageError::NotFound { path }) => {
                tracing::warn!(
                    "Region file {} is listed but missing, rewriting it",
                    path.display()
                );
                Ok(RegionFile::new(coord))
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl Job for SaveJob {
    type Output = SaveOutcome;

    fn name(&self) -> &'static str {
        "save"
    }

    fn run_once(&mut self) -> Result<SaveOutcome, SaveError> {
        self.run()
    }
}

#[cfg(test)]
mod tests {
    use strata_voxel::{ChunkDims, VoxelTypeId};

    use super::*;
    use crate::storage::read_world;

    fn world() -> WorldInfo {
        WorldInfo::new("SaveTest", 4, 4, 8)
    }

    fn snapshot(x: i32, y: i32, fill: u32) -> ChunkSnapshot {
        ChunkSnapshot {
            coord: ChunkCoord::new(x, y),
            version: 1,
            data: ChunkData::filled(ChunkDims::new(4, 8).unwrap(), VoxelTypeId(fill)),
        }
    }

    #[test]
    fn test_save_writes_regions_and_world() {
        let dir = tempfile::tempdir().unwrap();
        let job = SaveJob::new(
            dir.path(),
            world(),
            vec![snapshot(0, 0, 1), snapshot(-1, 0, 2), snapshot(5, 0, 3)],
        );
        let outcome = job.run().unwrap();

        assert_eq!(outcome.regions_written, 3);
        assert_eq!(outcome.saved.len(), 3);
        for region in [
            RegionCoord::new(0, 0),
            RegionCoord::new(-1, 0),
            RegionCoord::new(1, 0),
        ] {
            assert!(outcome.world.regions.contains(&region));
            assert!(job.paths().region_file(region).exists());
        }
        assert_eq!(read_world(job.paths()).unwrap(), outcome.world);
    }

    #[test]
    fn test_resave_merges_with_existing_region() {
        let dir = tempfile::tempdir().unwrap();
        let first = SaveJob::new(dir.path(), world(), vec![snapshot(0, 0, 1), snapshot(1, 0, 1)])
            .run()
            .unwrap();

        // Save only one of the two columns again.
        let second = SaveJob::new(dir.path(), first.world, vec![snapshot(1, 0, 2)])
            .run()
            .unwrap();
        let region = read_region(
            &SavePaths::new(dir.path(), "SaveTest"),
            RegionCoord::new(0, 0),
        )
        .unwrap();
        assert_eq!(region.columns().len(), 2);
        let col1: Vec<_> = region.sub_chunks.iter().filter(|s| s.x == 1).collect();
        assert!(col1.iter().all(|s| s.removed == VoxelTypeId(2)));
        assert_eq!(second.world.region_count(), 1);
    }

    #[test]
    fn test_mismatched_snapshot_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = snapshot(0, 0, 1);
        bad.data = ChunkData::new(ChunkDims::new(2, 8).unwrap());
        let result = SaveJob::new(dir.path(), world(), vec![bad]).run();
        assert!(matches!(
            result,
            Err(SaveError::Codec(CodecError::LayoutMismatch { .. }))
        ));
    }
}
