//! Chunk mesh data structures: one vertex stream per voxel type.

use std::collections::BTreeMap;

use glam::Vec3;
use strata_voxel::{VoxelTypeId, VoxelTypeRegistry};

use crate::face_direction::FaceDirection;

/// Texture coordinates of the four corners of every face.
const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];

/// Triangle list of one face, relative to its first vertex.
const FACE_TRIANGLES: [u32; 6] = [2, 1, 0, 0, 3, 2];

/// Geometry for all visible faces of one voxel type.
///
/// Attribute streams are parallel: vertex `i` is `positions[i]`, `normals[i]`,
/// `uvs[i]`, `colors[i]`. The alpha channel of each color holds the
/// [`FaceDirection`] tag of its face. Tangents are left empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshSection {
    /// Positions in chunk-local world units.
    pub positions: Vec<[f32; 3]>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[u8; 4]>,
    pub tangents: Vec<[f32; 4]>,
}

impl MeshSection {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one quad for the face of the voxel centered at `center`.
    pub fn push_face(&mut self, center: Vec3, half_size: f32, direction: FaceDirection) {
        let base = self.positions.len() as u32;
        let normal = direction.normal().to_array();
        let color = [255, 255, 255, direction.tag()];

        for (corner, uv) in direction.corners().into_iter().zip(FACE_UVS) {
            self.positions.push((center + corner * half_size).to_array());
            self.normals.push(normal);
            self.uvs.push(uv);
            self.colors.push(color);
        }
        self.indices.extend(FACE_TRIANGLES.iter().map(|offset| base + offset));
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of quads in this section.
    pub fn face_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// The mesh of one chunk, split into sections keyed by voxel type.
///
/// Sections are ordered by ascending [`VoxelTypeId`], which is also the
/// material slot order. Types without visible faces have no section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    sections: BTreeMap<VoxelTypeId, MeshSection>,
}

impl ChunkMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the section for `voxel`, creating it if needed.
    pub fn section_mut(&mut self, voxel: VoxelTypeId) -> &mut MeshSection {
        self.sections.entry(voxel).or_default()
    }

    pub fn section(&self, voxel: VoxelTypeId) -> Option<&MeshSection> {
        self.sections.get(&voxel)
    }

    /// Sections in ascending voxel id order.
    pub fn sections(&self) -> impl Iterator<Item = (VoxelTypeId, &MeshSection)> {
        self.sections.iter().map(|(id, section)| (*id, section))
    }

    /// Sections paired with their material name.
    ///
    /// Logs a warning for every section whose type is registered without a
    /// material. Such sections are still returned, with `None` as material.
    pub fn sections_with_materials<'a>(
        &'a self,
        registry: &'a VoxelTypeRegistry,
    ) -> Vec<(VoxelTypeId, &'a MeshSection, Option<&'a str>)> {
        self.sections
            .iter()
            .map(|(&id, section)| {
                let material = registry.get(id).and_then(|def| def.material.as_deref());
                if let Some(def) = registry.get(id)
                    && material.is_none()
                {
                    tracing::warn!("Voxel type '{}' ({}) has no material", def.name, id);
                }
                (id, section, material)
            })
            .collect()
    }

    /// Drops sections that ended up without vertices.
    pub fn prune_empty(&mut self) {
        self.sections.retain(|_, section| !section.is_empty());
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total quads across all sections.
    pub fn face_count(&self) -> usize {
        self.sections.values().map(MeshSection::face_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.sections.values().map(MeshSection::triangle_count).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.sections.values().map(MeshSection::vertex_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
