//! Central owner for all loaded chunks, keyed by [`ChunkCoord`].
//!
//! The [`WorldIndex`] provides O(1) chunk lookup, insert, and removal
//! using an [`FxHashMap`](rustc_hash::FxHashMap), and remembers which
//! regions already have a file on disk.

use std::collections::BTreeSet;

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::chunk_api::{Chunk, SAVE_DIRTY};
use crate::coords::{ChunkCoord, RegionCoord, voxel_cell};

/// Owns all currently-loaded chunks and the set of regions on disk.
///
/// A region missing from the on-disk set is never read back, so the set must
/// be updated whenever a region file is written.
pub struct WorldIndex {
    chunks: FxHashMap<ChunkCoord, Chunk>,
    regions: BTreeSet<RegionCoord>,
}

impl WorldIndex {
    /// Creates an empty index with no loaded chunks or known regions.
    pub fn new() -> Self {
        Self {
            chunks: FxHashMap::default(),
            regions: BTreeSet::new(),
        }
    }

    /// Inserts a chunk under its own coordinate, returning any chunk it replaced.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.coord(), chunk)
    }

    /// Evicts and returns the chunk at `coord`.
    ///
    /// Returns `None` if no chunk was loaded there.
    pub fn remove_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_at_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Number of currently loaded chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates over all loaded `(coordinate, chunk)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    /// Mutable iteration over all loaded `(coordinate, chunk)` pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ChunkCoord, &mut Chunk)> {
        self.chunks.iter_mut()
    }

    // -- dirty tracking -----------------------------------------------------

    /// Flags the chunk at `coord` for saving. Returns `false` if it is not loaded.
    pub fn mark_dirty(&mut self, coord: ChunkCoord) -> bool {
        match self.chunks.get_mut(&coord) {
            Some(chunk) => {
                chunk.mark_dirty(SAVE_DIRTY);
                true
            }
            None => false,
        }
    }

    /// Coordinates of every chunk waiting to be saved, in ascending order.
    pub fn all_dirty_chunks(&self) -> Vec<ChunkCoord> {
        let mut dirty: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(_, chunk)| chunk.is_dirty(SAVE_DIRTY))
            .map(|(coord, _)| *coord)
            .collect();
        dirty.sort_unstable();
        dirty
    }

    /// Marks the given chunks as saved.
    pub fn clear_dirty(&mut self, coords: impl IntoIterator<Item = ChunkCoord>) {
        for coord in coords {
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                chunk.clear_dirty(SAVE_DIRTY);
            }
        }
    }

    /// Marks chunks as saved only if they were not edited after their snapshot.
    ///
    /// Returns how many chunks were cleared.
    pub fn clear_saved(&mut self, saved: impl IntoIterator<Item = (ChunkCoord, u64)>) -> usize {
        let mut cleared = 0;
        for (coord, version) in saved {
            match self.chunks.get_mut(&coord) {
                Some(chunk) if chunk.version() == version => {
                    chunk.clear_dirty(SAVE_DIRTY);
                    cleared += 1;
                }
                Some(_) => {
                    tracing::debug!(
                        "Chunk ({}, {}) changed during save, keeping it dirty",
                        coord.x,
                        coord.y
                    );
                }
                None => {}
            }
        }
        cleared
    }

    // -- regions ------------------------------------------------------------

    /// Regions that have a file on disk.
    pub fn regions_on_disk(&self) -> &BTreeSet<RegionCoord> {
        &self.regions
    }

    /// Records that `region` has a file on disk. Returns `false` if it was already known.
    pub fn add_region(&mut self, region: RegionCoord) -> bool {
        self.regions.insert(region)
    }

    /// Replaces the on-disk region set, e.g. after reading a world file.
    pub fn set_regions(&mut self, regions: impl IntoIterator<Item = RegionCoord>) {
        self.regions = regions.into_iter().collect();
    }

    /// Chunk column holding the voxel nearest to `world_position`.
    ///
    /// Uses the same cell rounding as [`Chunk::index_at`], so a position maps
    /// to a chunk exactly when that chunk accepts it.
    pub fn chunk_coord_for(world_position: Vec3, voxel_size: f32, chunk_width: u32) -> ChunkCoord {
        let [x, y, _] = voxel_cell(world_position, voxel_size);
        let width = i64::from(chunk_width.max(1));
        ChunkCoord::new(x.div_euclid(width) as i32, y.div_euclid(width) as i32)
    }
}

impl Default for WorldIndex {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{VoxelTypeDef, VoxelTypeId, VoxelTypeRegistry};

    fn chunk(x: i32, y: i32) -> Chunk {
        Chunk::initialize(4, 8, 1.0, ChunkCoord::new(x, y), 16).unwrap()
    }

    fn edit(chunk: &mut Chunk) {
        let mut registry = VoxelTypeRegistry::new();
        registry.register(VoxelTypeDef::new("stone")).unwrap();
        let origin = chunk.origin();
        let result: Result<(), crate::ValidationError> =
            chunk.replace_voxel(origin, VoxelTypeId(1), &registry, |_| Ok(()));
        result.unwrap();
    }

    #[test]
    fn test_insert_then_get_returns_some() {
        let mut index = WorldIndex::new();
        let mut c = chunk(0, 0);
        c.data_mut().set(1, 2, 3, VoxelTypeId(7));
        assert!(index.insert_chunk(c).is_none());

        let got = index.chunk_at(ChunkCoord::new(0, 0));
        assert_eq!(got.map(|c| c.get(1, 2, 3)), Some(VoxelTypeId(7)));
    }

    #[test]
    fn test_remove_then_get_returns_none() {
        let mut index = WorldIndex::new();
        index.insert_chunk(chunk(1, 2));
        assert!(index.remove_chunk(ChunkCoord::new(1, 2)).is_some());
        assert!(index.chunk_at(ChunkCoord::new(1, 2)).is_none());
        assert!(index.remove_chunk(ChunkCoord::new(1, 2)).is_none());
    }

    #[test]
    fn test_loaded_count_tracks_correctly() {
        let mut index = WorldIndex::new();
        assert_eq!(index.loaded_count(), 0);
        index.insert_chunk(chunk(0, 0));
        index.insert_chunk(chunk(1, 0));
        index.insert_chunk(chunk(0, 1));
        assert_eq!(index.loaded_count(), 3);

        index.remove_chunk(ChunkCoord::new(1, 0));
        assert_eq!(index.loaded_count(), 2);

        // Removing a coordinate that was never loaded doesn't change count.
        index.remove_chunk(ChunkCoord::new(99, 99));
        assert_eq!(index.loaded_count(), 2);
    }

    #[test]
    fn test_double_insert_replaces() {
        let mut index = WorldIndex::new();
        index.insert_chunk(chunk(5, 5));
        let mut second = chunk(5, 5);
        second.data_mut().fill(VoxelTypeId(2));
        assert!(index.insert_chunk(second).is_some());
        assert_eq!(index.loaded_count(), 1);
        assert_eq!(
            index.chunk_at(ChunkCoord::new(5, 5)).map(|c| c.get(0, 0, 0)),
            Some(VoxelTypeId(2))
        );
    }

    #[test]
    fn test_dirty_tracking() {
        let mut index = WorldIndex::new();
        index.insert_chunk(chunk(2, 0));
        index.insert_chunk(chunk(0, 0));
        index.insert_chunk(chunk(1, 0));

        assert!(index.all_dirty_chunks().is_empty());
        assert!(index.mark_dirty(ChunkCoord::new(2, 0)));
        assert!(index.mark_dirty(ChunkCoord::new(0, 0)));
        assert!(!index.mark_dirty(ChunkCoord::new(9, 9)));
        assert_eq!(
            index.all_dirty_chunks(),
            vec![ChunkCoord::new(0, 0), ChunkCoord::new(2, 0)]
        );

        index.clear_dirty([ChunkCoord::new(0, 0)]);
        assert_eq!(index.all_dirty_chunks(), vec![ChunkCoord::new(2, 0)]);
    }

    #[test]
    fn test_clear_saved_skips_chunks_edited_since_snapshot() {
        let mut index = WorldIndex::new();
        let mut a = chunk(0, 0);
        let mut b = chunk(1, 0);
        edit(&mut a);
        edit(&mut b);
        let snapshot = [(a.coord(), a.version()), (b.coord(), b.version())];
        index.insert_chunk(a);
        index.insert_chunk(b);

        // Edit b again after the snapshot was taken.
        edit(index.chunk_at_mut(ChunkCoord::new(1, 0)).unwrap());

        assert_eq!(index.clear_saved(snapshot), 1);
        assert_eq!(index.all_dirty_chunks(), vec![ChunkCoord::new(1, 0)]);
    }

    #[test]
    fn test_regions_on_disk() {
        let mut index = WorldIndex::new();
        assert!(index.add_region(RegionCoord::new(0, 0)));
        assert!(index.add_region(RegionCoord::new(-1, 0)));
        assert!(!index.add_region(RegionCoord::new(0, 0)));
        let regions: Vec<_> = index.regions_on_disk().iter().copied().collect();
        assert_eq!(regions, vec![RegionCoord::new(-1, 0), RegionCoord::new(0, 0)]);

        index.set_regions([RegionCoord::new(3, 3)]);
        assert_eq!(index.regions_on_disk().len(), 1);
    }

    #[test]
    fn test_chunk_coord_for_matches_voxel_mapping() {
        let c = chunk(-1, 2);
        let inside = c.origin() + Vec3::new(3.0, 0.0, 0.0);
        assert_eq!(WorldIndex::chunk_coord_for(inside, 1.0, 4), c.coord());
        assert!(c.index_at(inside).is_ok());

        assert_eq!(
            WorldIndex::chunk_coord_for(Vec3::new(0.0, 0.0, 5.0), 100.0, 16),
            ChunkCoord::new(0, 0)
        );
        assert_eq!(
            WorldIndex::chunk_coord_for(Vec3::new(-100.0, 1600.0, 0.0), 100.0, 16),
            ChunkCoord::new(-1, 1)
        );
    }

    #[test]
    fn test_chunk_coord_for_agrees_with_index_at_on_seams() {
        for x in [-1650.0, -1550.0, -50.0, 50.0, 1549.0, 1550.0, 1551.0] {
            for y in [-50.0, 0.0, 1550.0] {
                let position = Vec3::new(x, y, 0.0);
                let coord = WorldIndex::chunk_coord_for(position, 100.0, 16);
                let owner = Chunk::initialize(16, 16, 100.0, coord, 16).unwrap();
                assert!(
                    owner.index_at(position).is_ok(),
                    "({x}, {y}) mapped to ({}, {}) but is not inside it",
                    coord.x,
                    coord.y
                );
            }
        }
        assert_eq!(
            WorldIndex::chunk_coord_for(Vec3::new(1550.0, -50.0, 0.0), 100.0, 16),
            ChunkCoord::new(1, -1)
        );
    }
}
