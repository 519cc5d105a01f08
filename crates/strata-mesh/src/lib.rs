//! Face-culled chunk meshing: visibility masks, per-type mesh sections, and the mesh builder.

pub mod builder;
pub mod chunk_mesh;
pub mod error;
pub mod face_direction;
pub mod visibility;
pub mod visible_faces;

pub use builder::{build_chunk_mesh, build_mesh};
pub use chunk_mesh::{ChunkMesh, MeshSection};
pub use error::MeshBuildError;
pub use face_direction::FaceDirection;
pub use visibility::{compute_visible_faces, count_total_faces, count_visible_faces, face_visible};
pub use visible_faces::VisibleFaces;
