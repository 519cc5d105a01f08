//! A running voxel world: loaded chunks, their meshes and the background
//! save/load jobs.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use rustc_hash::FxHashMap;
use strata_config::{Config, StorageConfig, WorldConfig};
use strata_mesh::ChunkMesh;
use strata_save::{
    ChunkSnapshot, JobHandle, JobOptions, JobSlot, LoadJob, LoadOutcome, PollTimer, SaveJob,
    SaveOutcome, WorldInfo,
};
use strata_voxel::{
    Chunk, ChunkCoord, LayeredTerrain, SAVE_DIRTY, TerrainSource, VoxelTypeId, VoxelTypeRegistry,
    WorldIndex,
};

use crate::error::WorldError;
use crate::events::{JobKind, WorldEvent};
use crate::host::{generate_chunk, generate_chunk_from, initialize_chunk, replace_voxel};

/// Owns every loaded chunk of one world together with its mesh.
///
/// Chunk generation, edits and remeshing run on the caller's thread. Saving
/// and loading run on background jobs that work on owned snapshots; their
/// results are applied by [`VoxelWorld::poll_job`] or [`VoxelWorld::update`].
pub struct VoxelWorld {
    world: WorldConfig,
    storage: StorageConfig,
    registry: Arc<VoxelTypeRegistry>,
    terrain: Box<dyn TerrainSource>,
    index: WorldIndex,
    meshes: FxHashMap<ChunkCoord, ChunkMesh>,
    save_job: JobSlot<SaveOutcome>,
    load_job: JobSlot<LoadOutcome>,
    save_timer: PollTimer,
    load_timer: PollTimer,
}

impl VoxelWorld {
    /// Creates an empty world from a validated configuration.
    pub fn new(config: &Config, registry: Arc<VoxelTypeRegistry>) -> Result<Self, WorldError> {
        config.validate()?;
        if registry.is_empty() {
            tracing::warn!("World '{}' created with an empty voxel registry", config.world.name);
        }
        let interval = config.storage.poll_interval();
        Ok(Self {
            world: config.world.clone(),
            storage: config.storage.clone(),
            registry,
            terrain: Box::new(LayeredTerrain::default()),
            index: WorldIndex::new(),
            meshes: FxHashMap::default(),
            save_job: JobSlot::new(),
            load_job: JobSlot::new(),
            save_timer: PollTimer::new(interval),
            load_timer: PollTimer::new(interval),
        })
    }

    /// Replaces the terrain used for newly spawned chunks.
    pub fn with_terrain(mut self, terrain: impl TerrainSource + 'static) -> Self {
        self.terrain = Box::new(terrain);
        self
    }

    pub fn name(&self) -> &str {
        &self.world.name
    }

    pub fn world_config(&self) -> &WorldConfig {
        &self.world
    }

    pub fn registry(&self) -> &Arc<VoxelTypeRegistry> {
        &self.registry
    }

    pub fn index(&self) -> &WorldIndex {
        &self.index
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.index.chunk_at(coord)
    }

    pub fn mesh(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.meshes.get(&coord)
    }

    // -- chunks -------------------------------------------------------------

    /// Generates the chunk at `coord` and builds its mesh.
    ///
    /// A chunk that is already loaded is left alone and its mesh returned.
    pub fn spawn_chunk(&mut self, coord: ChunkCoord) -> Result<&ChunkMesh, WorldError> {
        if self.index.chunk_at(coord).is_none() {
            let mut chunk = initialize_chunk(
                &self.registry,
                self.world.voxel_size,
                self.world.chunk_width,
                self.world.chunk_height,
                coord,
                self.world.region_width,
            )?;
            let mesh = generate_chunk(&mut chunk, &self.registry, self.terrain.as_ref())?;
            self.index.insert_chunk(chunk);
            self.meshes.insert(coord, mesh);
        }
        self.meshes
            .get(&coord)
            .ok_or(WorldError::ChunkNotLoaded(coord))
    }

    /// Spawns every chunk within `radius` columns of the origin.
    ///
    /// Returns how many chunks were newly generated.
    pub fn spawn_area(&mut self, radius: i32) -> Result<usize, WorldError> {
        let radius = radius.max(0);
        let mut spawned = 0;
        for y in -radius..=radius {
            for x in -radius..=radius {
                let coord = ChunkCoord::new(x, y);
                if self.index.chunk_at(coord).is_some() {
                    continue;
                }
                self.spawn_chunk(coord)?;
                spawned += 1;
            }
        }
        tracing::info!(
            "Spawned {} chunks around the origin of '{}'",
            spawned,
            self.world.name
        );
        Ok(spawned)
    }

    /// Replaces the voxel at `world_position` in whichever loaded chunk holds it.
    ///
    /// On error the chunk and its previous mesh are unchanged.
    pub fn set_voxel(
        &mut self,
        world_position: Vec3,
        voxel: VoxelTypeId,
    ) -> Result<ChunkCoord, WorldError> {
        let coord = WorldIndex::chunk_coord_for(
            world_position,
            self.world.voxel_size,
            self.world.chunk_width,
        );
        let chunk = self
            .index
            .chunk_at_mut(coord)
            .ok_or(WorldError::ChunkNotLoaded(coord))?;
        let mesh = replace_voxel(chunk, world_position, voxel, &self.registry)?;
        self.meshes.insert(coord, mesh);
        Ok(coord)
    }

    /// Unloads the chunk at `coord` and drops its mesh.
    pub fn evict_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.meshes.remove(&coord);
        let chunk = self.index.remove_chunk(coord)?;
        if chunk.is_dirty(SAVE_DIRTY) {
            tracing::warn!(
                "Evicted chunk ({}, {}) with unsaved changes",
                coord.x,
                coord.y
            );
        }
        Some(chunk)
    }

    // -- save / load --------------------------------------------------------

    /// World metadata describing the current layout and regions on disk.
    pub fn world_info(&self) -> WorldInfo {
        world_info(&self.world, &self.index)
    }

    /// Starts saving every chunk with unsaved changes.
    ///
    /// Chunks are snapshotted before this returns, so edits made while the job
    /// runs stay dirty. While a save is in flight its handle is returned and
    /// no new job starts. Fails with [`WorldError::JobBusy`] while a load is
    /// outstanding.
    pub fn save_world(&mut self) -> Result<&JobHandle<SaveOutcome>, WorldError> {
        if self.load_job.is_busy() {
            return Err(WorldError::JobBusy(JobKind::Load));
        }
        let (world, index, storage) = (&self.world, &self.index, &self.storage);
        let handle = self.save_job.start_with(|| {
            let snapshots: Vec<ChunkSnapshot> = index
                .all_dirty_chunks()
                .into_iter()
                .filter_map(|coord| index.chunk_at(coord))
                .map(ChunkSnapshot::of)
                .collect();
            tracing::info!(
                "Saving {} dirty chunks of '{}'",
                snapshots.len(),
                world.name
            );
            let job = SaveJob::new(&storage.saved_dir, world_info(world, index), snapshots);
            JobHandle::spawn(job, JobOptions::from(storage))
        })?;
        self.save_timer.reset();
        Ok(&*handle)
    }

    /// Starts loading the world `name` from disk.
    ///
    /// Nothing changes until the job completes. The loaded world then replaces
    /// every chunk currently held. Fails with [`WorldError::JobBusy`] while a
    /// save is outstanding.
    pub fn load_world(&mut self, name: &str) -> Result<&JobHandle<LoadOutcome>, WorldError> {
        if self.save_job.is_busy() {
            return Err(WorldError::JobBusy(JobKind::Save));
        }
        let storage = &self.storage;
        let handle = self.load_job.start_with(|| {
            tracing::info!("Loading world '{}'", name);
            JobHandle::spawn(LoadJob::new(&storage.saved_dir, name), JobOptions::from(storage))
        })?;
        self.load_timer.reset();
        Ok(&*handle)
    }

    pub fn is_busy(&self, kind: JobKind) -> bool {
        match kind {
            JobKind::Save => self.save_job.is_busy(),
            JobKind::Load => self.load_job.is_busy(),
        }
    }

    /// Polls one job without blocking and applies its outcome if it finished.
    pub fn poll_job(&mut self, kind: JobKind) -> Option<WorldEvent> {
        match kind {
            JobKind::Save => match self.save_job.poll()? {
                Ok(outcome) => Some(self.finish_save(outcome)),
                Err(err) => {
                    tracing::error!("Saving '{}' failed: {}", self.world.name, err);
                    Some(WorldEvent::SaveFailed(err))
                }
            },
            JobKind::Load => match self.load_job.poll()? {
                Ok(outcome) => Some(self.finish_load(outcome)),
                Err(err) => {
                    tracing::error!("Loading world failed: {}", err);
                    Some(WorldEvent::LoadFailed(err))
                }
            },
        }
    }

    /// Advances the poll timers by `delta` and polls each job whose interval elapsed.
    pub fn update(&mut self, delta: Duration) -> Vec<WorldEvent> {
        let mut events = Vec::new();
        if self.save_timer.tick(delta)
            && self.save_job.is_busy()
            && let Some(event) = self.poll_job(JobKind::Save)
        {
            events.push(event);
        }
        if self.load_timer.tick(delta)
            && self.load_job.is_busy()
            && let Some(event) = self.poll_job(JobKind::Load)
        {
            events.push(event);
        }
        events
    }

    /// Stops both background jobs and waits for their threads.
    pub fn shutdown(&mut self) {
        self.save_job.shutdown();
        self.load_job.shutdown();
    }

    fn finish_save(&mut self, outcome: SaveOutcome) -> WorldEvent {
        if outcome.world.name != self.world.name {
            tracing::warn!(
                "Ignoring save of '{}' finished after switching to '{}'",
                outcome.world.name,
                self.world.name
            );
            return WorldEvent::SaveCompleted {
                chunks: outcome.saved.len(),
                regions: outcome.regions_written,
                still_dirty: self.index.all_dirty_chunks().len(),
            };
        }
        self.index.set_regions(outcome.world.regions.iter().copied());
        let cleared = self.index.clear_saved(outcome.saved.iter().copied());
        let still_dirty = self.index.all_dirty_chunks().len();
        tracing::debug!(
            "Save of '{}' finished: {} of {} chunks now clean",
            outcome.world.name,
            cleared,
            outcome.saved.len()
        );
        WorldEvent::SaveCompleted {
            chunks: outcome.saved.len(),
            regions: outcome.regions_written,
            still_dirty,
        }
    }

    fn finish_load(&mut self, outcome: LoadOutcome) -> WorldEvent {
        let LoadOutcome { world, chunks } = outcome;
        self.world.name = world.name.clone();
        self.world.chunk_width = world.chunk_width;
        self.world.chunk_height = world.chunk_height;
        self.world.region_width = world.region_width;

        let mut index = WorldIndex::new();
        index.set_regions(world.regions.iter().copied());
        let mut meshes = FxHashMap::default();
        let mut skipped = 0;

        for record in chunks {
            let installed = initialize_chunk(
                &self.registry,
                self.world.voxel_size,
                world.chunk_width,
                world.chunk_height,
                record.coord,
                world.region_width,
            )
            .and_then(|mut chunk| {
                let mesh = generate_chunk_from(&mut chunk, record.voxels, &self.registry)?;
                Ok((chunk, mesh))
            });
            match installed {
                Ok((chunk, mesh)) => {
                    meshes.insert(record.coord, mesh);
                    index.insert_chunk(chunk);
                }
                Err(err) => {
                    tracing::warn!(
                        "Skipping loaded chunk ({}, {}): {}",
                        record.coord.x,
                        record.coord.y,
                        err
                    );
                    skipped += 1;
                }
            }
        }

        let dropped = self.index.all_dirty_chunks().len();
        if dropped > 0 {
            tracing::warn!("Discarding {} unsaved chunks replaced by the load", dropped);
        }
        self.index = index;
        self.meshes = meshes;

        tracing::info!(
            "Installed {} chunks of '{}' ({} skipped)",
            self.index.loaded_count(),
            self.world.name,
            skipped
        );
        WorldEvent::LoadCompleted {
            chunks: self.index.loaded_count(),
            skipped,
        }
    }
}

impl Drop for VoxelWorld {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn world_info(world: &WorldConfig, index: &WorldIndex) -> WorldInfo {
    let mut info = WorldInfo::new(
        world.name.clone(),
        world.region_width,
        world.chunk_width,
        world.chunk_height,
    );
    info.regions = index.regions_on_disk().clone();
    info
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Instant;

    use strata_save::{SaveError, SavePaths, StorageError};
    use strata_voxel::{MESH_DIRTY, RegionCoord, UniformTerrain, ValidationError};

    use super::*;
    use crate::host::default_registry;

    fn config(saved_dir: &Path, name: &str) -> Config {
        let mut config = Config::default();
        config.world.name = name.to_string();
        config.world.chunk_width = 16;
        config.world.chunk_height = 16;
        config.storage.saved_dir = saved_dir.to_path_buf();
        config.storage.poll_interval_secs = 0.01;
        config.storage.startup_delay_ms = 0;
        config
    }

    fn world(config: &Config) -> VoxelWorld {
        VoxelWorld::new(config, Arc::new(default_registry().unwrap())).unwrap()
    }

    fn wait(world: &mut VoxelWorld, kind: JobKind) -> WorldEvent {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(event) = world.poll_job(kind) {
                return event;
            }
            assert!(Instant::now() < deadline, "{kind:?} job did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_save_and_reload_restores_grid_and_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "RoundTrip");
        let coord = ChunkCoord::new(0, 0);

        let mut original = world(&config).with_terrain(UniformTerrain(VoxelTypeId(3)));
        original.spawn_chunk(coord).unwrap();
        original.save_world().unwrap();
        match wait(&mut original, JobKind::Save) {
            WorldEvent::SaveCompleted {
                chunks,
                regions,
                still_dirty,
            } => assert_eq!((chunks, regions, still_dirty), (1, 1, 0)),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(original.index().regions_on_disk().contains(&RegionCoord::new(0, 0)));

        let mut restored = world(&config);
        restored.load_world("RoundTrip").unwrap();
        match wait(&mut restored, JobKind::Load) {
            WorldEvent::LoadCompleted { chunks, skipped } => assert_eq!((chunks, skipped), (1, 0)),
            other => panic!("unexpected event: {other:?}"),
        }

        let before = original.chunk(coord).unwrap();
        let after = restored.chunk(coord).unwrap();
        assert_eq!(after.data().as_slice(), before.data().as_slice());
        assert_eq!(after.dirty_flags(), 0);
        assert_eq!(restored.mesh(coord), original.mesh(coord));
        assert_eq!(restored.mesh(coord).unwrap().face_count(), 4 * 16 * 16);
    }

    #[test]
    fn test_edit_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "Edited");
        let mut world_a = world(&config);
        world_a.spawn_area(1).unwrap();
        let target = Vec3::new(-100.0, 300.0, 1500.0);
        let coord = world_a.set_voxel(target, VoxelTypeId(1)).unwrap();
        assert_eq!(coord, ChunkCoord::new(-1, 0));
        world_a.save_world().unwrap();
        assert!(!wait(&mut world_a, JobKind::Save).is_failure());

        let mut world_b = world(&config);
        world_b.load_world("Edited").unwrap();
        assert!(!wait(&mut world_b, JobKind::Load).is_failure());
        assert_eq!(world_b.index().loaded_count(), 9);
        assert_eq!(world_b.chunk(coord).unwrap().get(15, 3, 15), VoxelTypeId(1));
        assert_eq!(world_b.index().regions_on_disk().len(), 4);
    }

    #[test]
    fn test_edit_during_save_stays_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "Race");
        config.storage.startup_delay_ms = 200;
        let mut world = world(&config);
        let coord = ChunkCoord::new(0, 0);
        world.spawn_chunk(coord).unwrap();

        world.save_world().unwrap();
        world.set_voxel(Vec3::new(0.0, 0.0, 0.0), VoxelTypeId(2)).unwrap();

        match wait(&mut world, JobKind::Save) {
            WorldEvent::SaveCompleted {
                chunks, still_dirty, ..
            } => assert_eq!((chunks, still_dirty), (1, 1)),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(world.chunk(coord).unwrap().is_dirty(SAVE_DIRTY));
    }

    #[test]
    fn test_second_save_reuses_running_job() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "Busy");
        config.storage.startup_delay_ms = 100;
        let mut world = world(&config);
        world.spawn_chunk(ChunkCoord::new(0, 0)).unwrap();

        world.save_world().unwrap();
        world.spawn_chunk(ChunkCoord::new(1, 0)).unwrap();
        world.save_world().unwrap();
        assert!(world.is_busy(JobKind::Save));

        match wait(&mut world, JobKind::Save) {
            WorldEvent::SaveCompleted { chunks, still_dirty, .. } => {
                assert_eq!((chunks, still_dirty), (1, 1));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!world.is_busy(JobKind::Save));
        assert!(world.poll_job(JobKind::Save).is_none());
    }

    #[test]
    fn test_update_polls_on_interval() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "Ticking");
        let mut world = world(&config);
        world.spawn_chunk(ChunkCoord::new(0, 0)).unwrap();
        world.save_world().unwrap();

        assert!(world.update(Duration::ZERO).is_empty());
        let deadline = Instant::now() + Duration::from_secs(10);
        let events = loop {
            let events = world.update(Duration::from_millis(20));
            if !events.is_empty() {
                break events;
            }
            assert!(Instant::now() < deadline, "save never reported");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), JobKind::Save);
        assert!(world.index().all_dirty_chunks().is_empty());
    }

    #[test]
    fn test_load_missing_world_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = world(&config(dir.path(), "Nothing"));
        world.spawn_chunk(ChunkCoord::new(0, 0)).unwrap();
        world.load_world("Nothing").unwrap();
        match wait(&mut world, JobKind::Load) {
            WorldEvent::LoadFailed(SaveError::Storage(StorageError::NotFound { path })) => {
                assert_eq!(path, SavePaths::new(dir.path(), "Nothing").world_file());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        // A failed load leaves the current world alone.
        assert_eq!(world.index().loaded_count(), 1);
    }

    #[test]
    fn test_set_voxel_errors_keep_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = world(&config(dir.path(), "Errors"));
        let coord = ChunkCoord::new(0, 0);
        world.spawn_chunk(coord).unwrap();
        let mesh = world.mesh(coord).cloned();
        let grid = world.chunk(coord).unwrap().data().clone();

        assert!(matches!(
            world.set_voxel(Vec3::new(100.0, 0.0, 0.0), VoxelTypeId(77)),
            Err(WorldError::Validation(ValidationError::InvalidVoxelId { .. }))
        ));
        assert!(matches!(
            world.set_voxel(Vec3::new(5000.0, 0.0, 0.0), VoxelTypeId(1)),
            Err(WorldError::ChunkNotLoaded(_))
        ));
        assert!(matches!(
            world.set_voxel(Vec3::new(0.0, 0.0, 90_000.0), VoxelTypeId(1)),
            Err(WorldError::Validation(ValidationError::PositionOutOfRange { .. }))
        ));
        assert_eq!(world.chunk(coord).unwrap().data(), &grid);
        assert_eq!(world.mesh(coord).cloned(), mesh);
    }

    #[test]
    fn test_spawn_area_skips_loaded_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = world(&config(dir.path(), "Area"));
        assert_eq!(world.spawn_area(1).unwrap(), 9);
        assert_eq!(world.spawn_area(2).unwrap(), 16);
        assert_eq!(world.index().loaded_count(), 25);
        let chunk = world.chunk(ChunkCoord::new(-2, 2)).unwrap();
        assert!(!chunk.is_dirty(MESH_DIRTY));
        assert!(world.evict_chunk(ChunkCoord::new(-2, 2)).is_some());
        assert!(world.mesh(ChunkCoord::new(-2, 2)).is_none());
    }

    #[test]
    fn test_set_voxel_on_chunk_seams() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = world(&config(dir.path(), "Seams"));
        for x in -1..=1 {
            world.spawn_chunk(ChunkCoord::new(x, 0)).unwrap();
        }

        let cases = [
            (1549.0, ChunkCoord::new(0, 0)),
            (1550.0, ChunkCoord::new(1, 0)),
            (1551.0, ChunkCoord::new(1, 0)),
            (-50.0, ChunkCoord::new(-1, 0)),
        ];
        for (x, expected) in cases {
            let coord = world
                .set_voxel(Vec3::new(x, 0.0, 0.0), VoxelTypeId::AIR)
                .unwrap_or_else(|err| panic!("x = {x}: {err}"));
            assert_eq!(coord, expected, "x = {x}");
        }
        assert_eq!(world.chunk(ChunkCoord::new(1, 0)).unwrap().get(0, 0, 0), VoxelTypeId::AIR);
        assert_eq!(world.chunk(ChunkCoord::new(-1, 0)).unwrap().get(15, 0, 0), VoxelTypeId::AIR);
    }

    #[test]
    fn test_load_refused_while_save_outstanding() {
        let dir = tempfile::tempdir().unwrap();

        let mut other = world(&config(dir.path(), "Other"));
        other.spawn_chunk(ChunkCoord::new(80, 80)).unwrap();
        other.save_world().unwrap();
        assert!(!wait(&mut other, JobKind::Save).is_failure());

        let mut slow = config(dir.path(), "Current");
        slow.storage.startup_delay_ms = 300;
        let mut world = world(&slow);
        world.spawn_chunk(ChunkCoord::new(0, 0)).unwrap();
        world.save_world().unwrap();

        assert!(matches!(world.load_world("Other"), Err(WorldError::JobBusy(JobKind::Save))));
        assert!(!wait(&mut world, JobKind::Save).is_failure());

        world.load_world("Other").unwrap();
        assert!(matches!(world.save_world(), Err(WorldError::JobBusy(JobKind::Load))));
        assert!(!wait(&mut world, JobKind::Load).is_failure());
        assert_eq!(world.name(), "Other");
        let regions: Vec<_> = world.index().regions_on_disk().iter().copied().collect();
        assert_eq!(regions, vec![RegionCoord::new(5, 5)]);
    }

    #[test]
    fn test_save_of_previous_world_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = world(&config(dir.path(), "Current"));
        world.spawn_chunk(ChunkCoord::new(0, 0)).unwrap();
        world.index.set_regions([RegionCoord::new(5, 5)]);
        let version = world.chunk(ChunkCoord::new(0, 0)).unwrap().version();

        let mut stale = WorldInfo::new("Previous".to_string(), 16, 16, 16);
        stale.regions.insert(RegionCoord::new(0, 0));
        let event = world.finish_save(SaveOutcome {
            world: stale,
            saved: vec![(ChunkCoord::new(0, 0), version)],
            regions_written: 1,
        });

        assert!(matches!(event, WorldEvent::SaveCompleted { still_dirty: 1, .. }));
        let regions: Vec<_> = world.index().regions_on_disk().iter().copied().collect();
        assert_eq!(regions, vec![RegionCoord::new(5, 5)]);
        assert!(world.chunk(ChunkCoord::new(0, 0)).unwrap().is_dirty(SAVE_DIRTY));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), "Bad");
        config.world.chunk_height = 20;
        let result = VoxelWorld::new(&config, Arc::new(default_registry().unwrap()));
        assert!(matches!(result, Err(WorldError::Config(_))));
    }
}
