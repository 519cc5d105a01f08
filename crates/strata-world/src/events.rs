use strata_save::SaveError;

/// Which background job to poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobKind {
    Save,
    Load,
}

/// Completion notices produced by [`crate::VoxelWorld::update`].
#[derive(Debug)]
pub enum WorldEvent {
    SaveCompleted {
        /// Chunks written by the job.
        chunks: usize,
        regions: usize,
        /// Chunks still waiting to be saved, including any edited while the job ran.
        still_dirty: usize,
    },
    SaveFailed(SaveError),
    LoadCompleted {
        /// Chunks installed with a fresh mesh.
        chunks: usize,
        /// Records that could not be installed.
        skipped: usize,
    },
    LoadFailed(SaveError),
}

impl WorldEvent {
    pub fn kind(&self) -> JobKind {
        match self {
            Self::SaveCompleted { .. } | Self::SaveFailed(_) => JobKind::Save,
            Self::LoadCompleted { .. } | Self::LoadFailed(_) => JobKind::Load,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::SaveFailed(_) | Self::LoadFailed(_))
    }
}
