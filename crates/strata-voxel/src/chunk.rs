//! Dense voxel storage for `width × width × height` chunk columns.
//!
//! Voxels live in a flat array indexed by `x + y·width + z·width²`, so a
//! horizontal layer is contiguous and a chunk splits into cubic slabs of
//! `width³` cells along Z.

use serde::{Deserialize, Serialize};

use crate::error::DimensionError;
use crate::registry::VoxelTypeId;

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Size of a chunk column. `height` is always a positive multiple of `width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    width: u32,
    height: u32,
}

impl ChunkDims {
    /// Validates and creates chunk dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        if width == 0 || height == 0 {
            return Err(DimensionError::Zero { width, height });
        }
        if height % width != 0 {
            return Err(DimensionError::HeightNotMultiple { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    /// Cells in one horizontal layer (`width²`).
    pub fn area(self) -> usize {
        (self.width as usize) * (self.width as usize)
    }

    /// Total cell count (`width² · height`).
    pub fn volume(self) -> usize {
        self.area() * self.height as usize
    }

    /// Number of cubic slabs stacked along Z.
    pub fn slab_count(self) -> u32 {
        self.height / self.width
    }

    /// Cells per cubic slab (`width³`).
    pub fn slab_volume(self) -> usize {
        self.area() * self.width as usize
    }

    /// Returns `true` if `(x, y, z)` is inside the column.
    pub fn contains(self, x: i64, y: i64, z: i64) -> bool {
        let w = self.width as i64;
        (0..w).contains(&x) && (0..w).contains(&y) && (0..self.height as i64).contains(&z)
    }

    /// Flat index of `(x, y, z)`, or `None` if out of range.
    pub fn index(self, x: u32, y: u32, z: u32) -> Option<usize> {
        if x < self.width && y < self.width && z < self.height {
            Some(self.linear_index(x, y, z))
        } else {
            None
        }
    }

    /// Inverse of [`ChunkDims::index`].
    pub fn position(self, index: usize) -> Option<(u32, u32, u32)> {
        if index >= self.volume() {
            return None;
        }
        let w = self.width as usize;
        let area = self.area();
        Some((
            (index % w) as u32,
            ((index % area) / w) as u32,
            (index / area) as u32,
        ))
    }

    #[inline]
    fn linear_index(self, x: u32, y: u32, z: u32) -> usize {
        x as usize + y as usize * self.width as usize + z as usize * self.area()
    }
}

// ---------------------------------------------------------------------------
// ChunkData
// ---------------------------------------------------------------------------

/// Flat voxel array of one chunk column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkData {
    dims: ChunkDims,
    voxels: Vec<VoxelTypeId>,
}

impl ChunkData {
    /// Creates a column filled with Air.
    pub fn new(dims: ChunkDims) -> Self {
        Self::filled(dims, VoxelTypeId::AIR)
    }

    /// Creates a column filled with `voxel`.
    pub fn filled(dims: ChunkDims, voxel: VoxelTypeId) -> Self {
        Self {
            dims,
            voxels: vec![voxel; dims.volume()],
        }
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Returns the voxel at `(x, y, z)`; Air outside the column.
    pub fn get(&self, x: u32, y: u32, z: u32) -> VoxelTypeId {
        self.dims
            .index(x, y, z)
            .map_or(VoxelTypeId::AIR, |i| self.get_index(i))
    }

    /// Returns the voxel at a flat index; Air past the end of the array.
    pub fn get_index(&self, index: usize) -> VoxelTypeId {
        self.voxels.get(index).copied().unwrap_or(VoxelTypeId::AIR)
    }

    /// Writes `(x, y, z)` and returns the previous value, or `None` if out of range.
    pub fn set(&mut self, x: u32, y: u32, z: u32, voxel: VoxelTypeId) -> Option<VoxelTypeId> {
        let index = self.dims.index(x, y, z)?;
        self.set_index(index, voxel)
    }

    /// Writes a flat index and returns the previous value, or `None` if out of range.
    pub fn set_index(&mut self, index: usize, voxel: VoxelTypeId) -> Option<VoxelTypeId> {
        self.voxels
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, voxel))
    }

    /// Local position of a flat index.
    pub fn position_of(&self, index: usize) -> Option<(u32, u32, u32)> {
        self.dims.position(index)
    }

    /// Overwrites every cell with `voxel`.
    pub fn fill(&mut self, voxel: VoxelTypeId) {
        self.voxels.fill(voxel);
    }

    /// Overwrites every index present in `entries`.
    ///
    /// An index past the end grows the array, zero-filling any gap.
    pub fn bulk_load(&mut self, entries: impl IntoIterator<Item = (usize, VoxelTypeId)>) {
        for (index, voxel) in entries {
            if index >= self.voxels.len() {
                tracing::warn!(
                    "bulk_load index {} past chunk volume {}, growing storage",
                    index,
                    self.voxels.len()
                );
                self.voxels.resize(index + 1, VoxelTypeId::AIR);
            }
            self.voxels[index] = voxel;
        }
    }

    /// Raw cell slice in index order.
    pub fn as_slice(&self) -> &[VoxelTypeId] {
        &self.voxels
    }

    /// Number of stored cells. Equals `dims().volume()` unless `bulk_load` grew it.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Number of non-Air cells.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| !v.is_air()).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> ChunkDims {
        ChunkDims::new(width, height).unwrap()
    }

    #[test]
    fn test_dims_reject_bad_sizes() {
        assert!(matches!(
            ChunkDims::new(0, 16),
            Err(DimensionError::Zero { .. })
        ));
        assert!(matches!(
            ChunkDims::new(16, 100),
            Err(DimensionError::HeightNotMultiple { .. })
        ));
        let d = dims(16, 128);
        assert_eq!(d.area(), 256);
        assert_eq!(d.volume(), 32768);
        assert_eq!(d.slab_count(), 8);
        assert_eq!(d.slab_volume(), 4096);
    }

    #[test]
    fn test_index_layout() {
        let d = dims(16, 32);
        assert_eq!(d.index(0, 0, 0), Some(0));
        assert_eq!(d.index(1, 0, 0), Some(1));
        assert_eq!(d.index(0, 1, 0), Some(16));
        assert_eq!(d.index(0, 0, 1), Some(256));
        assert_eq!(d.index(15, 15, 31), Some(d.volume() - 1));
        assert_eq!(d.index(16, 0, 0), None);
        assert_eq!(d.index(0, 0, 32), None);
    }

    #[test]
    fn test_position_inverts_index() {
        let d = dims(4, 8);
        for i in 0..d.volume() {
            let (x, y, z) = d.position(i).unwrap();
            assert_eq!(d.index(x, y, z), Some(i));
        }
        assert_eq!(d.position(d.volume()), None);
    }

    #[test]
    fn test_new_is_all_air() {
        let data = ChunkData::new(dims(8, 16));
        assert_eq!(data.len(), 8 * 8 * 16);
        assert_eq!(data.solid_count(), 0);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut data = ChunkData::new(dims(8, 8));
        assert_eq!(data.set(1, 2, 3, VoxelTypeId(5)), Some(VoxelTypeId::AIR));
        assert_eq!(data.set(1, 2, 3, VoxelTypeId(6)), Some(VoxelTypeId(5)));
        assert_eq!(data.get(1, 2, 3), VoxelTypeId(6));
        assert_eq!(data.set(8, 0, 0, VoxelTypeId(1)), None);
        assert_eq!(data.get(8, 0, 0), VoxelTypeId::AIR);
        assert_eq!(data.solid_count(), 1);
    }

    #[test]
    fn test_fill() {
        let mut data = ChunkData::new(dims(4, 4));
        data.fill(VoxelTypeId(3));
        assert_eq!(data.solid_count(), 64);
        assert!(data.as_slice().iter().all(|&v| v == VoxelTypeId(3)));
    }

    #[test]
    fn test_bulk_load_overwrites_present_indices() {
        let mut data = ChunkData::filled(dims(4, 4), VoxelTypeId(1));
        data.bulk_load([(0, VoxelTypeId(2)), (63, VoxelTypeId(3))]);
        assert_eq!(data.get_index(0), VoxelTypeId(2));
        assert_eq!(data.get_index(1), VoxelTypeId(1));
        assert_eq!(data.get_index(63), VoxelTypeId(3));
        assert_eq!(data.len(), 64);
    }

    #[test]
    fn test_bulk_load_grows_and_zero_fills() {
        let mut data = ChunkData::filled(dims(2, 2), VoxelTypeId(1));
        data.bulk_load([(11, VoxelTypeId(4))]);
        assert_eq!(data.len(), 12);
        assert_eq!(data.get_index(8), VoxelTypeId::AIR);
        assert_eq!(data.get_index(10), VoxelTypeId::AIR);
        assert_eq!(data.get_index(11), VoxelTypeId(4));
    }
}
