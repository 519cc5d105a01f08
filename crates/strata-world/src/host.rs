//! Chunk-level operations exposed to the host: create, fill, load and edit a
//! chunk, each returning the rebuilt mesh.

use glam::Vec3;
use strata_mesh::{ChunkMesh, build_chunk_mesh};
use strata_voxel::{
    Chunk, ChunkCoord, MESH_DIRTY, RegistryError, TerrainSource, VoxelTypeDef, VoxelTypeId,
    VoxelTypeRegistry,
};

use crate::error::WorldError;

/// Registry with the types [`strata_voxel::LayeredTerrain`] produces:
/// dirt (1), grass (2) and stone (3).
pub fn default_registry() -> Result<VoxelTypeRegistry, RegistryError> {
    VoxelTypeRegistry::from_assets([
        (VoxelTypeId(1), VoxelTypeDef::new("dirt")),
        (VoxelTypeId(2), VoxelTypeDef::new("grass")),
        (VoxelTypeId(3), VoxelTypeDef::new("stone")),
    ])
}

/// Creates an empty chunk at `coord`.
pub fn initialize_chunk(
    registry: &VoxelTypeRegistry,
    voxel_size: f32,
    width: u32,
    height: u32,
    coord: ChunkCoord,
    region_width: u32,
) -> Result<Chunk, WorldError> {
    if registry.is_empty() {
        tracing::warn!(
            "Chunk ({}, {}) initialized without any registered voxel types",
            coord.x,
            coord.y
        );
    }
    Ok(Chunk::initialize(width, height, voxel_size, coord, region_width)?)
}

/// Fills `chunk` from `terrain` and builds its mesh.
pub fn generate_chunk(
    chunk: &mut Chunk,
    registry: &VoxelTypeRegistry,
    terrain: &dyn TerrainSource,
) -> Result<ChunkMesh, WorldError> {
    chunk.generate(terrain, registry);
    remesh(chunk, registry)
}

/// Fills `chunk` with voxels read from disk and builds its mesh.
///
/// The chunk is not marked for saving.
pub fn generate_chunk_from(
    chunk: &mut Chunk,
    voxels: impl IntoIterator<Item = (usize, VoxelTypeId)>,
    registry: &VoxelTypeRegistry,
) -> Result<ChunkMesh, WorldError> {
    chunk.load_voxels(voxels);
    remesh(chunk, registry)
}

/// Replaces the voxel at `world_position` and returns the rebuilt mesh.
///
/// On any error the chunk is left exactly as it was.
pub fn replace_voxel(
    chunk: &mut Chunk,
    world_position: Vec3,
    voxel: VoxelTypeId,
    registry: &VoxelTypeRegistry,
) -> Result<ChunkMesh, WorldError> {
    chunk.replace_voxel(world_position, voxel, registry, |c| {
        build_chunk_mesh(c, registry).map_err(WorldError::from)
    })
}

fn remesh(chunk: &mut Chunk, registry: &VoxelTypeRegistry) -> Result<ChunkMesh, WorldError> {
    let mesh = build_chunk_mesh(chunk, registry)?;
    chunk.clear_dirty(MESH_DIRTY);
    Ok(mesh)
}
