use strata_config::ConfigError;
use strata_mesh::MeshBuildError;
use strata_save::SaveError;
use strata_voxel::{ChunkCoord, DimensionError, RegistryError, ValidationError};
use thiserror::Error;

use crate::events::JobKind;

/// Errors surfaced to the host of a voxel world.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    MeshBuild(#[from] MeshBuildError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("chunk ({}, {}) is not loaded", .0.x, .0.y)]
    ChunkNotLoaded(ChunkCoord),

    /// Saving and loading never overlap; the other job must be polled to completion first.
    #[error("a {0:?} job is still running")]
    JobBusy(JobKind),
}
