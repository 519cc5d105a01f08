//! Voxel storage: type registry, chunk columns, coordinates, and the loaded-world index.

pub mod chunk;
pub mod chunk_api;
pub mod coords;
pub mod error;
pub mod registry;
pub mod terrain;
pub mod world_index;

pub use chunk::{ChunkData, ChunkDims};
pub use chunk_api::{Chunk, MESH_DIRTY, SAVE_DIRTY};
pub use coords::{ChunkCoord, ChunkLocation, LocalChunkCoord, RegionCoord, split_axis, voxel_cell};
pub use error::{DimensionError, ValidationError};
pub use registry::{RegistryError, VoxelTypeDef, VoxelTypeId, VoxelTypeRegistry};
pub use terrain::{LayeredTerrain, TerrainSource, UniformTerrain};
pub use world_index::WorldIndex;
