//! World metadata: name, layout, and the set of regions on disk.
//!
//! Layout: `valid(1)`, region count `i32`, that many `(x: i32, y: i32)` pairs,
//! name as `u32` length plus UTF-8, then region width, chunk width and chunk
//! height as one byte each.

use std::collections::BTreeSet;

use strata_voxel::{ChunkDims, RegionCoord};

use crate::bytes::{ByteReader, ByteWriter, narrow};
use crate::error::CodecError;

/// Persistent description of a saved world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldInfo {
    pub name: String,
    pub region_width: u32,
    pub chunk_width: u32,
    pub chunk_height: u32,
    /// Regions with a file on disk. A region outside this set is never loaded.
    pub regions: BTreeSet<RegionCoord>,
}

impl WorldInfo {
    pub fn new(
        name: impl Into<String>,
        region_width: u32,
        chunk_width: u32,
        chunk_height: u32,
    ) -> Self {
        Self {
            name: name.into(),
            region_width,
            chunk_width,
            chunk_height,
            regions: BTreeSet::new(),
        }
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Chunk dimensions described by this world.
    pub fn dims(&self) -> Result<ChunkDims, CodecError> {
        ChunkDims::new(self.chunk_width, self.chunk_height).map_err(|_| CodecError::InvalidRecord {
            field: "chunk height",
            value: self.chunk_height as i64,
        })
    }

    /// Sub-chunks stacked in one chunk column.
    pub fn slabs_per_chunk(&self) -> Result<u32, CodecError> {
        Ok(self.dims()?.slab_count())
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let count = self.regions.len();
        if count > i32::MAX as usize {
            return Err(CodecError::ValueOverflow {
                field: "region count",
                value: count as u64,
                max: i32::MAX as u64,
            });
        }
        let mut w = ByteWriter::with_capacity(16 + count * 8 + self.name.len());
        w.put_bool(true);
        w.put_i32(count as i32);
        for region in &self.regions {
            w.put_i32(region.x);
            w.put_i32(region.y);
        }
        w.put_str(&self.name)?;
        w.put_u8(narrow::<u8>("region width", self.region_width as usize)?);
        w.put_u8(narrow::<u8>("chunk width", self.chunk_width as usize)?);
        w.put_u8(narrow::<u8>("chunk height", self.chunk_height as usize)?);
        Ok(w.into_inner())
    }

    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(data);
        if !r.bool()? {
            return Err(CodecError::InvalidHeader("world"));
        }
        let count = r.i32()?;
        if count < 0 {
            return Err(CodecError::InvalidRecord {
                field: "region count",
                value: count as i64,
            });
        }
        let mut regions = BTreeSet::new();
        for _ in 0..count {
            regions.insert(RegionCoord::new(r.i32()?, r.i32()?));
        }
        let name = r.string()?;
        let region_width = r.u8()? as u32;
        let chunk_width = r.u8()? as u32;
        let chunk_height = r.u8()? as u32;

        if region_width == 0 {
            return Err(CodecError::InvalidRecord {
                field: "region width",
                value: 0,
            });
        }
        let world = Self {
            name,
            region_width,
            chunk_width,
            chunk_height,
            regions,
        };
        world.dims()?;
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WorldInfo {
        let mut world = WorldInfo::new("Valley", 16, 16, 128);
        world.regions.insert(RegionCoord::new(0, 0));
        world.regions.insert(RegionCoord::new(-1, 0));
        world
    }

    #[test]
    fn test_layout() {
        let bytes = sample().encode().unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..5], &2i32.to_le_bytes());
        // Regions are written in ascending order.
        assert_eq!(&bytes[5..9], &(-1i32).to_le_bytes());
        assert_eq!(&bytes[13..17], &0i32.to_le_bytes());
        assert_eq!(&bytes[21..25], &6u32.to_le_bytes());
        assert_eq!(&bytes[25..31], b"Valley");
        assert_eq!(&bytes[31..], &[16, 16, 128]);
    }

    #[test]
    fn test_decode_restores_world() {
        let world = sample();
        assert_eq!(WorldInfo::decode(&world.encode().unwrap()).unwrap(), world);
        assert_eq!(world.slabs_per_chunk().unwrap(), 8);
    }

    #[test]
    fn test_invalid_world_header() {
        let mut bytes = sample().encode().unwrap();
        bytes[0] = 0;
        assert_eq!(
            WorldInfo::decode(&bytes),
            Err(CodecError::InvalidHeader("world"))
        );
    }

    #[test]
    fn test_truncated_world() {
        let bytes = sample().encode().unwrap();
        assert!(matches!(
            WorldInfo::decode(&bytes[..bytes.len() - 1]),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn test_oversized_dimension_rejected() {
        let world = WorldInfo::new("Tall", 16, 16, 256);
        assert!(matches!(
            world.encode(),
            Err(CodecError::ValueOverflow {
                field: "chunk height",
                ..
            })
        ));
    }

    #[test]
    fn test_inconsistent_layout_rejected() {
        let mut bytes = WorldInfo::new("Odd", 16, 16, 128).encode().unwrap();
        let last = bytes.len() - 1;
        bytes[last] = 100;
        assert!(WorldInfo::decode(&bytes).is_err());
    }
}
