//! Versioned, LZ4-compressed save files.
//!
//! Every file is `[format_version: u8][LZ4 block with prepended size]`, where
//! the block holds a region or world buffer.

use std::io::ErrorKind;
use std::path::Path;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use strata_voxel::RegionCoord;

use crate::error::{SaveError, StorageError};
use crate::paths::SavePaths;
use crate::region::RegionFile;
use crate::world::WorldInfo;

/// Current file format version.
pub const FORMAT_VERSION: u8 = 1;

/// Wraps a buffer in the file envelope.
pub fn seal(payload: &[u8]) -> Vec<u8> {
    let compressed = compress_prepend_size(payload);
    let mut out = Vec::with_capacity(1 + compressed.len());
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&compressed);
    out
}

/// Strips the file envelope read from `path`.
pub fn unseal(path: &Path, bytes: &[u8]) -> Result<Vec<u8>, StorageError> {
    let Some((&version, body)) = bytes.split_first() else {
        return Err(StorageError::Empty {
            path: path.to_path_buf(),
        });
    };
    if version != FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            path: path.to_path_buf(),
            version,
        });
    }
    decompress_size_prepended(body).map_err(|e| StorageError::Decompress {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Seals `payload` and writes it to `path`, creating parent directories.
///
/// The data goes to a sibling temp file first and is renamed into place, so
/// a failed write leaves the previous file intact.
pub fn write_sealed(path: &Path, payload: &[u8]) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("sav.tmp");
    std::fs::write(&tmp, seal(payload)).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

/// Reads and unseals the file at `path`.
pub fn read_sealed(path: &Path) -> Result<Vec<u8>, StorageError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => StorageError::NotFound {
            path: path.to_path_buf(),
        },
        _ => StorageError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    unseal(path, &bytes)
}

pub fn write_region(paths: &SavePaths, region: &RegionFile) -> Result<(), SaveError> {
    let payload = region.encode()?;
    write_sealed(&paths.region_file(region.coord), &payload)?;
    tracing::debug!(
        "Wrote region ({}, {}) with {} sub-chunks",
        region.coord.x,
        region.coord.y,
        region.sub_chunks.len()
    );
    Ok(())
}

pub fn read_region(paths: &SavePaths, coord: RegionCoord) -> Result<RegionFile, StorageError> {
    let path = paths.region_file(coord);
    let payload = read_sealed(&path)?;
    RegionFile::decode(&payload).map_err(|source| StorageError::Codec { path, source })
}

pub fn write_world(paths: &SavePaths, world: &WorldInfo) -> Result<(), SaveError> {
    let payload = world.encode()?;
    write_sealed(&paths.world_file(), &payload)?;
    Ok(())
}

pub fn read_world(paths: &SavePaths) -> Result<WorldInfo, StorageError> {
    let path = paths.world_file();
    let payload = read_sealed(&path)?;
    WorldInfo::decode(&payload).map_err(|source| StorageError::Codec { path, source })
}
