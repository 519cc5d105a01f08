use thiserror::Error;

use crate::coords::ChunkCoord;
use crate::registry::VoxelTypeId;

/// Rejected voxel edits. The chunk is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("voxel id {id} is not registered")]
    InvalidVoxelId { id: VoxelTypeId },

    #[error("position ({x}, {y}, {z}) lies outside chunk ({}, {})", chunk.x, chunk.y)]
    PositionOutOfRange {
        chunk: ChunkCoord,
        x: i64,
        y: i64,
        z: i64,
    },

    #[error("voxel index {index} is outside 0..{volume}")]
    IndexOutOfRange { index: usize, volume: usize },
}

/// Chunk dimensions that cannot be laid out as whole cubic slabs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DimensionError {
    #[error("chunk dimensions must be non-zero (width {width}, height {height})")]
    Zero { width: u32, height: u32 },

    #[error("chunk height {height} is not a multiple of width {width}")]
    HeightNotMultiple { width: u32, height: u32 },

    #[error("region width must be non-zero")]
    ZeroRegionWidth,

    #[error("voxel size {0} must be positive and finite")]
    VoxelSize(f32),
}
