//! Error types for the region codec, file storage, and background jobs.

use std::path::PathBuf;

use strata_voxel::ChunkCoord;
use thiserror::Error;

/// Structural errors while packing or parsing region and world buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The buffer ended before a field could be read.
    #[error("data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// A region or world header is marked invalid.
    #[error("{0} header is marked invalid")]
    InvalidHeader(&'static str),

    /// A value does not fit the width of its on-disk field.
    #[error("{field} value {value} exceeds the maximum of {max}")]
    ValueOverflow {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// A record field holds a value that cannot describe a real chunk.
    #[error("invalid {field}: {value}")]
    InvalidRecord { field: &'static str, value: i64 },

    /// A chunk column is missing slabs or repeats one.
    #[error("chunk ({x}, {y}) has {found} distinct slabs, expected {expected}")]
    IncompleteChunk {
        x: u32,
        y: u32,
        expected: u32,
        found: u32,
    },

    /// The world name is not valid UTF-8.
    #[error("world name is not valid UTF-8")]
    BadString,

    /// Chunk dimensions disagree with the world layout.
    #[error("chunk ({}, {}) does not match the world layout", coord.x, coord.y)]
    LayoutMismatch { coord: ChunkCoord },
}

/// Errors reading or writing save files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty", path.display())]
    Empty { path: PathBuf },

    #[error("unsupported format version {version} in {}", path.display())]
    UnsupportedVersion { path: PathBuf, version: u8 },

    #[error("LZ4 decompression of {} failed: {reason}", path.display())]
    Decompress { path: PathBuf, reason: String },

    #[error("malformed {}: {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

/// Failure of a save or load job.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("failed to spawn {name} worker thread: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} worker panicked")]
    WorkerPanicked(String),
}
