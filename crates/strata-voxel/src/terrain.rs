//! Procedural fill sources for new chunks.

use crate::registry::VoxelTypeId;

/// Produces the voxel for every cell of a freshly generated chunk.
///
/// Generation first samples `height_noise` once per column, then asks
/// `voxel_at` for every height in that column.
pub trait TerrainSource {
    /// Height offset of the column at local `(x, y)`.
    fn height_noise(&self, x: u32, y: u32) -> i32;

    /// Voxel at height `z` in a column with the given noise value.
    fn voxel_at(&self, z: u32, noise: i32) -> VoxelTypeId;
}

/// Grass over dirt over stone, with air above the surface.
#[derive(Clone, Debug)]
pub struct LayeredTerrain {
    /// Height of the grass layer before noise is applied.
    pub surface: i32,
    /// Number of dirt layers below the grass.
    pub dirt_depth: i32,
    pub grass: VoxelTypeId,
    pub dirt: VoxelTypeId,
    pub stone: VoxelTypeId,
}

impl Default for LayeredTerrain {
    fn default() -> Self {
        Self {
            surface: 30,
            dirt_depth: 2,
            grass: VoxelTypeId(2),
            dirt: VoxelTypeId(1),
            stone: VoxelTypeId(3),
        }
    }
}

impl TerrainSource for LayeredTerrain {
    fn height_noise(&self, _x: u32, _y: u32) -> i32 {
        0
    }

    fn voxel_at(&self, z: u32, noise: i32) -> VoxelTypeId {
        let z = z as i32;
        let grass = self.surface + noise;
        if z == grass {
            self.grass
        } else if z < grass && z >= grass - self.dirt_depth {
            self.dirt
        } else if z < grass - self.dirt_depth {
            self.stone
        } else {
            VoxelTypeId::AIR
        }
    }
}

/// Fills every cell with one voxel type.
#[derive(Clone, Copy, Debug)]
pub struct UniformTerrain(pub VoxelTypeId);

impl TerrainSource for UniformTerrain {
    fn height_noise(&self, _x: u32, _y: u32) -> i32 {
        0
    }

    fn voxel_at(&self, _z: u32, _noise: i32) -> VoxelTypeId {
        self.0
    }
}
