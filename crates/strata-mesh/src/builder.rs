//! Face-culled mesh construction for a whole chunk.

use std::collections::BTreeSet;

use glam::Vec3;
use strata_voxel::{Chunk, ChunkData, VoxelTypeId, VoxelTypeRegistry};

use crate::chunk_mesh::ChunkMesh;
use crate::error::MeshBuildError;
use crate::visibility::compute_visible_faces;

/// Builds the mesh of `chunk` in chunk-local coordinates.
pub fn build_chunk_mesh(
    chunk: &Chunk,
    registry: &VoxelTypeRegistry,
) -> Result<ChunkMesh, MeshBuildError> {
    build_mesh(chunk.data(), chunk.voxel_size(), registry)
}

/// Builds one section per voxel type from the visible faces of `data`.
///
/// Voxel `(x, y, z)` is centered at `(x, y, z) · voxel_size`. Cells are
/// scanned in index order and each cell emits its faces in
/// [`FaceDirection::ALL`](crate::FaceDirection::ALL) order, so the vertex
/// layout is deterministic.
///
/// Ids the registry does not know still produce geometry, with a warning.
pub fn build_mesh(
    data: &ChunkData,
    voxel_size: f32,
    registry: &VoxelTypeRegistry,
) -> Result<ChunkMesh, MeshBuildError> {
    if registry.is_empty() {
        return Err(MeshBuildError::NoVoxelTypes);
    }

    let dims = data.dims();
    let half = voxel_size / 2.0;
    let faces = compute_visible_faces(data);
    let mut mesh = ChunkMesh::new();
    let mut unknown: BTreeSet<VoxelTypeId> = BTreeSet::new();

    for (index, visible) in faces.iter().enumerate() {
        if visible.is_empty() {
            continue;
        }
        let Some((x, y, z)) = dims.position(index) else {
            continue;
        };
        let voxel = data.get_index(index);
        if !registry.is_valid(voxel) {
            unknown.insert(voxel);
        }

        let center = Vec3::new(x as f32, y as f32, z as f32) * voxel_size;
        let section = mesh.section_mut(voxel);
        for dir in visible.directions() {
            section.push_face(center, half, dir);
        }
    }

    for id in unknown {
        tracing::warn!("Voxel id {} is not registered, meshing it anyway", id);
    }
    mesh.prune_empty();
    Ok(mesh)
}
