//! Visible face detection: determines which voxel faces are exposed and need
//! geometry.

use strata_voxel::ChunkData;

use crate::face_direction::FaceDirection;
use crate::visible_faces::VisibleFaces;

/// Returns `true` if the face of the voxel at `(x, y, z)` facing `dir` is drawn.
///
/// Neighbor chunks are never consulted. A face on the chunk's X/Y boundary is
/// always drawn, a face whose neighbor is above the top or below the bottom of
/// the column is never drawn, and an interior face is drawn when its neighbor
/// is Air.
pub fn face_visible(chunk: &ChunkData, x: u32, y: u32, z: u32, dir: FaceDirection) -> bool {
    let dims = chunk.dims();
    let (nx, ny, nz) = dir.offset(x as i64, y as i64, z as i64);
    let w = dims.width() as i64;
    if !(0..w).contains(&nx) || !(0..w).contains(&ny) {
        return true;
    }
    if !(0..dims.height() as i64).contains(&nz) {
        return false;
    }
    chunk.get(nx as u32, ny as u32, nz as u32).is_air()
}

/// Computes per-voxel visible-face bitmasks for a chunk.
///
/// Returns a flat `Vec` of length `dims().volume()`, indexed the same way as
/// [`ChunkData`]. Air cells get [`VisibleFaces::NONE`].
pub fn compute_visible_faces(chunk: &ChunkData) -> Vec<VisibleFaces> {
    let dims = chunk.dims();
    let width = dims.width();
    let mut result = vec![VisibleFaces::NONE; dims.volume()];

    for z in 0..dims.height() {
        for y in 0..width {
            for x in 0..width {
                if chunk.get(x, y, z).is_air() {
                    continue;
                }
                let faces: VisibleFaces = FaceDirection::ALL
                    .into_iter()
                    .filter(|&dir| face_visible(chunk, x, y, z, dir))
                    .collect();
                if let Some(idx) = dims.index(x, y, z) {
                    result[idx] = faces;
                }
            }
        }
    }

    result
}

/// Counts the total number of visible faces in a visibility array.
pub fn count_visible_faces(faces: &[VisibleFaces]) -> u32 {
    faces.iter().map(|vf| vf.count()).sum()
}

/// Counts the total possible faces (6 per non-air voxel) in a chunk.
pub fn count_total_faces(chunk: &ChunkData) -> u32 {
    let dims = chunk.dims();
    chunk.as_slice()[..dims.volume().min(chunk.len())]
        .iter()
        .filter(|v| !v.is_air())
        .count() as u32
        * 6
}
