//! Host-facing voxel world: chunk creation, editing and meshing, plus a
//! [`VoxelWorld`] session that saves and loads in the background.

pub mod error;
pub mod events;
pub mod host;
pub mod session;

pub use error::WorldError;
pub use events::{JobKind, WorldEvent};
pub use host::{
    default_registry, generate_chunk, generate_chunk_from, initialize_chunk, replace_voxel,
};
pub use session::VoxelWorld;
