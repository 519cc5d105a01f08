use thiserror::Error;

/// Failure to rebuild a chunk mesh. The previous mesh stays in use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshBuildError {
    #[error("no voxel types are registered")]
    NoVoxelTypes,
}
