//! Region file codec, versioned file storage, and background save/load jobs.

pub mod assemble;
pub mod bytes;
pub mod error;
pub mod load;
pub mod paths;
pub mod region;
pub mod save;
pub mod storage;
pub mod sub_chunk;
pub mod worker;
pub mod world;

pub use assemble::{ChunkRecord, assemble_region};
pub use error::{CodecError, SaveError, StorageError};
pub use load::{LoadJob, LoadOutcome};
pub use paths::SavePaths;
pub use region::RegionFile;
pub use save::{ChunkSnapshot, SaveJob, SaveOutcome};
pub use storage::FORMAT_VERSION;
pub use sub_chunk::{SubChunk, pack_chunk, should_elide, slab_mode};
pub use worker::{Job, JobHandle, JobOptions, JobSlot, JobState, PollTimer};
pub use world::WorldInfo;
