//! Region buffers: every sub-chunk of one region tile.
//!
//! ## Binary Layout
//!
//! | Field | Size | Notes |
//! |-------|------|-------|
//! | valid | 1 | `0` marks the whole region invalid |
//! | region x, region y | 4 + 4 | `i32` |
//! | chunk count | 2 | `u16` |
//! | chunk records | ... | see below |
//!
//! A chunk record is `valid(1)`; a zero ends the record. Otherwise it
//! continues with `x(1) y(1) z(1) compressed(1)`, the elided value `(3)` when
//! compressed, `count(2)`, then `count` entries of `index(2)` (compressed
//! only) and `value(3)`. All integers are little-endian.

use std::collections::{BTreeMap, BTreeSet};

use strata_voxel::{RegionCoord, VoxelTypeId};

use crate::bytes::{ByteReader, ByteWriter, narrow};
use crate::error::CodecError;
use crate::sub_chunk::SubChunk;

/// All stored sub-chunks of one region.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionFile {
    pub coord: RegionCoord,
    pub sub_chunks: Vec<SubChunk>,
}

impl RegionFile {
    pub fn new(coord: RegionCoord) -> Self {
        Self {
            coord,
            sub_chunks: Vec::new(),
        }
    }

    /// Distinct chunk columns `(x, y)` with at least one sub-chunk.
    pub fn columns(&self) -> BTreeSet<(u8, u8)> {
        self.sub_chunks.iter().map(|s| (s.x, s.y)).collect()
    }

    /// Replaces the sub-chunks of every column present in `fresh`.
    ///
    /// Columns not in `fresh` keep their stored sub-chunks. The result is
    /// sorted by `(x, y, z)`.
    pub fn merge(&mut self, fresh: Vec<SubChunk>) {
        let replaced: BTreeSet<(u8, u8)> = fresh.iter().map(|s| (s.x, s.y)).collect();
        self.sub_chunks.retain(|s| !replaced.contains(&(s.x, s.y)));
        self.sub_chunks.extend(fresh);
        self.sub_chunks.sort_by_key(|s| (s.x, s.y, s.z));
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let count = narrow::<u16>("sub-chunk count", self.sub_chunks.len())?;
        let mut w = ByteWriter::with_capacity(11 + self.sub_chunks.len() * 64);
        w.put_bool(true);
        w.put_i32(self.coord.x);
        w.put_i32(self.coord.y);
        w.put_u16(count);

        for sub in &self.sub_chunks {
            w.put_bool(true);
            w.put_u8(sub.x);
            w.put_u8(sub.y);
            w.put_u8(sub.z);
            w.put_bool(sub.compressed);
            if sub.compressed {
                w.put_u24("elided voxel id", sub.removed.0)?;
            }
            w.put_u16(narrow::<u16>("voxel count", sub.entries.len())?);
            for (&index, &value) in &sub.entries {
                if sub.compressed {
                    w.put_u16(index);
                }
                w.put_u24("voxel id", value.0)?;
            }
        }
        Ok(w.into_inner())
    }

    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(data);
        if !r.bool()? {
            return Err(CodecError::InvalidHeader("region"));
        }
        let coord = RegionCoord::new(r.i32()?, r.i32()?);
        let count = r.u16()?;

        let mut sub_chunks = Vec::with_capacity(count as usize);
        for _ in 0..count {
            if !r.bool()? {
                continue;
            }
            let (x, y, z) = (r.u8()?, r.u8()?, r.u8()?);
            let compressed = r.bool()?;
            let removed = if compressed {
                VoxelTypeId(r.u24()?)
            } else {
                VoxelTypeId::AIR
            };
            let num_voxels = r.u16()?;

            let mut entries = BTreeMap::new();
            for implicit in 0..num_voxels {
                let index = if compressed { r.u16()? } else { implicit };
                entries.insert(index, VoxelTypeId(r.u24()?));
            }
            sub_chunks.push(SubChunk {
                x,
                y,
                z,
                compressed,
                removed,
                entries,
            });
        }
        if r.remaining() > 0 {
            tracing::warn!(
                "Region ({}, {}) has {} trailing bytes",
                coord.x,
                coord.y,
                r.remaining()
            );
        }
        Ok(Self { coord, sub_chunks })
    }
}
