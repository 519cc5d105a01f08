//! High-level chunk wrapper with placement, dirty tracking, and versioning.
//!
//! [`Chunk`] wraps [`ChunkData`] with the column's position in the world and
//! its region, and guards edits so only registered voxel ids at in-range
//! positions ever reach storage.

use glam::Vec3;
use rustc_hash::FxHashSet;

use crate::chunk::{ChunkData, ChunkDims};
use crate::coords::{ChunkCoord, ChunkLocation, LocalChunkCoord, RegionCoord, voxel_cell};
use crate::error::{DimensionError, ValidationError};
use crate::registry::{VoxelTypeId, VoxelTypeRegistry};
use crate::terrain::TerrainSource;

/// Dirty-flag bit: chunk mesh needs rebuilding.
pub const MESH_DIRTY: u8 = 0b0000_0001;
/// Dirty-flag bit: chunk needs saving to disk.
pub const SAVE_DIRTY: u8 = 0b0000_0010;

/// A chunk column placed in the world.
#[derive(Clone, Debug)]
pub struct Chunk {
    data: ChunkData,
    coord: ChunkCoord,
    location: ChunkLocation,
    region_width: u32,
    voxel_size: f32,
    /// Cached `voxel_size / 2`.
    half_voxel: f32,
    /// Bitfield of dirty flags.
    dirty: u8,
    /// Indices written since the last save.
    changed: FxHashSet<usize>,
    /// Incremented on each committed mutation.
    version: u64,
}

impl Chunk {
    /// Creates an all-Air chunk at `coord` and resolves its region.
    pub fn initialize(
        width: u32,
        height: u32,
        voxel_size: f32,
        coord: ChunkCoord,
        region_width: u32,
    ) -> Result<Self, DimensionError> {
        let dims = ChunkDims::new(width, height)?;
        if region_width == 0 {
            return Err(DimensionError::ZeroRegionWidth);
        }
        if !(voxel_size > 0.0 && voxel_size.is_finite()) {
            return Err(DimensionError::VoxelSize(voxel_size));
        }
        Ok(Self {
            data: ChunkData::new(dims),
            coord,
            location: coord.location(region_width),
            region_width,
            voxel_size,
            half_voxel: voxel_size / 2.0,
            dirty: 0,
            changed: FxHashSet::default(),
            version: 0,
        })
    }

    // -- placement ----------------------------------------------------------

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn location(&self) -> ChunkLocation {
        self.location
    }

    pub fn region(&self) -> RegionCoord {
        self.location.region
    }

    pub fn local(&self) -> LocalChunkCoord {
        self.location.local
    }

    pub fn region_width(&self) -> u32 {
        self.region_width
    }

    pub fn dims(&self) -> ChunkDims {
        self.data.dims()
    }

    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    pub fn half_voxel_size(&self) -> f32 {
        self.half_voxel
    }

    /// World position of the center of voxel `(0, 0, 0)`.
    pub fn origin(&self) -> Vec3 {
        let extent = self.dims().width() as f32 * self.voxel_size;
        Vec3::new(
            self.coord.x as f32 * extent,
            self.coord.y as f32 * extent,
            0.0,
        )
    }

    /// Flat index of the voxel nearest to `world_position`.
    pub fn index_at(&self, world_position: Vec3) -> Result<usize, ValidationError> {
        let [gx, gy, z] = voxel_cell(world_position, self.voxel_size);
        let width = i64::from(self.dims().width());
        let x = gx - i64::from(self.coord.x) * width;
        let y = gy - i64::from(self.coord.y) * width;
        let dims = self.dims();
        if !dims.contains(x, y, z) {
            return Err(ValidationError::PositionOutOfRange {
                chunk: self.coord,
                x,
                y,
                z,
            });
        }
        dims.index(x as u32, y as u32, z as u32)
            .ok_or(ValidationError::IndexOutOfRange {
                index: (x + y * width + z * dims.area() as i64) as usize,
                volume: dims.volume(),
            })
    }

    // -- access -------------------------------------------------------------

    /// Returns the voxel at local `(x, y, z)`; Air outside the column.
    pub fn get(&self, x: u32, y: u32, z: u32) -> VoxelTypeId {
        self.data.get(x, y, z)
    }

    pub fn data(&self) -> &ChunkData {
        &self.data
    }

    /// Mutable access to the voxel array.
    ///
    /// Callers must manage dirty flags and version manually when using this.
    pub fn data_mut(&mut self) -> &mut ChunkData {
        &mut self.data
    }

    // -- mutation -----------------------------------------------------------

    /// Replaces the voxel at `world_position` and rebuilds the mesh through `remesh`.
    ///
    /// The id and position are validated before anything is written. If
    /// `remesh` fails the previous voxel is restored and the chunk keeps its
    /// dirty state, changed set and version.
    pub fn replace_voxel<R, E>(
        &mut self,
        world_position: Vec3,
        voxel: VoxelTypeId,
        registry: &VoxelTypeRegistry,
        remesh: impl FnOnce(&Chunk) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<ValidationError>,
    {
        if !registry.is_valid(voxel) {
            return Err(ValidationError::InvalidVoxelId { id: voxel }.into());
        }
        let index = self.index_at(world_position)?;
        let previous = self
            .data
            .set_index(index, voxel)
            .ok_or(ValidationError::IndexOutOfRange {
                index,
                volume: self.data.len(),
            })?;

        match remesh(self) {
            Ok(result) => {
                self.dirty |= SAVE_DIRTY;
                self.changed.insert(index);
                self.version += 1;
                Ok(result)
            }
            Err(err) => {
                self.data.set_index(index, previous);
                tracing::warn!(
                    "Remesh of chunk ({}, {}) failed, reverted voxel {}",
                    self.coord.x,
                    self.coord.y,
                    index
                );
                Err(err)
            }
        }
    }

    /// Fills every cell from `terrain`.
    ///
    /// Ids the registry does not know are stored as Air. Returns the number of
    /// cells that were coerced this way.
    pub fn generate(&mut self, terrain: &dyn TerrainSource, registry: &VoxelTypeRegistry) -> usize {
        let dims = self.dims();
        let width = dims.width();
        let noise: Vec<i32> = (0..width * width)
            .map(|i| terrain.height_noise(i % width, i / width))
            .collect();

        let mut coerced = 0;
        for z in 0..dims.height() {
            for y in 0..width {
                for x in 0..width {
                    let mut voxel = terrain.voxel_at(z, noise[(x + y * width) as usize]);
                    if !registry.is_valid(voxel) {
                        coerced += 1;
                        voxel = VoxelTypeId::AIR;
                    }
                    self.data.set(x, y, z, voxel);
                }
            }
        }
        if coerced > 0 {
            tracing::warn!(
                "Chunk ({}, {}) generation produced {} unregistered voxel ids, stored as air",
                self.coord.x,
                self.coord.y,
                coerced
            );
        }

        self.changed.extend(0..dims.volume());
        self.dirty |= SAVE_DIRTY | MESH_DIRTY;
        self.version += 1;
        coerced
    }

    /// Overwrites cells with stored values from disk. The chunk stays clean for saving.
    pub fn load_voxels(&mut self, entries: impl IntoIterator<Item = (usize, VoxelTypeId)>) {
        self.data.bulk_load(entries);
        self.dirty |= MESH_DIRTY;
        self.version += 1;
    }

    // -- dirty tracking -----------------------------------------------------

    /// Returns the current dirty flags.
    pub fn dirty_flags(&self) -> u8 {
        self.dirty
    }

    /// Returns `true` if the specified dirty flag (or combination) is set.
    pub fn is_dirty(&self, flag: u8) -> bool {
        self.dirty & flag == flag
    }

    pub fn mark_dirty(&mut self, flags: u8) {
        self.dirty |= flags;
    }

    /// Clears the given flags. Clearing `SAVE_DIRTY` also forgets the changed indices.
    pub fn clear_dirty(&mut self, flags: u8) {
        self.dirty &= !flags;
        if flags & SAVE_DIRTY != 0 {
            self.changed.clear();
        }
    }

    /// Indices written since the last save.
    pub fn changed_indices(&self) -> &FxHashSet<usize> {
        &self.changed
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
