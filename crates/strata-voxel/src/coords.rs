//! Chunk and region coordinates, and the transform between them.
//!
//! A world is a 2D grid of chunk columns. Regions tile that grid in squares of
//! `region_width × region_width` chunks. The same transform is used for file
//! naming, spatial placement and disk addressing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Position of a chunk column in the world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate of the chunk offset by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Splits this coordinate into its region and position within the region.
    pub fn location(self, region_width: u32) -> ChunkLocation {
        let (rx, lx) = split_axis(self.x, region_width);
        let (ry, ly) = split_axis(self.y, region_width);
        ChunkLocation {
            region: RegionCoord::new(rx, ry),
            local: LocalChunkCoord { x: lx, y: ly },
        }
    }
}

/// Position of a region in the region grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionCoord {
    pub x: i32,
    pub y: i32,
}

impl RegionCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Position of a chunk column inside its region, each axis in `[0, region_width)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalChunkCoord {
    pub x: u32,
    pub y: u32,
}

/// A chunk coordinate expressed as region plus local offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkLocation {
    pub region: RegionCoord,
    pub local: LocalChunkCoord,
}

impl ChunkLocation {
    pub fn new(region: RegionCoord, local: LocalChunkCoord) -> Self {
        Self { region, local }
    }

    /// Inverse of [`ChunkCoord::location`]: `region * region_width + local`.
    pub fn chunk_coord(self, region_width: u32) -> ChunkCoord {
        let rw = region_width as i32;
        ChunkCoord {
            x: self.region.x * rw + self.local.x as i32,
            y: self.region.y * rw + self.local.y as i32,
        }
    }
}

/// Floor-divides one chunk axis into `(region, local)`.
///
/// Negative chunks land in negative regions, so chunk -1 is the last column of
/// region -1 rather than sharing region 0 with chunk 0.
pub fn split_axis(chunk: i32, region_width: u32) -> (i32, u32) {
    let rw = region_width.max(1) as i32;
    (chunk.div_euclid(rw), chunk.rem_euclid(rw) as u32)
}

/// World-grid voxel cell nearest to `world_position`, one index per axis.
///
/// Voxel centers sit at `i·voxel_size`. A position exactly between two
/// centers rounds away from zero. Chunk lookup and in-chunk indexing both go
/// through this, so they always agree on which voxel a position names.
pub fn voxel_cell(world_position: Vec3, voxel_size: f32) -> [i64; 3] {
    let cell = (world_position / voxel_size).round();
    [cell.x as i64, cell.y as i64, cell.z as i64]
}
