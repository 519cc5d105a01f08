//! Sub-chunks: the cubic on-disk unit of a chunk column, with mode elision.
//!
//! A chunk column of height `H` and width `W` is stored as `H / W` slabs of
//! `W³` cells. A slab dominated by one value stores only the cells that
//! differ from it.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use strata_voxel::{ChunkData, LocalChunkCoord, VoxelTypeId};

use crate::bytes::{U24_MAX, narrow};
use crate::error::CodecError;

/// One cubic slab of a chunk column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubChunk {
    /// Chunk X within the region.
    pub x: u8,
    /// Chunk Y within the region.
    pub y: u8,
    /// Slab index along Z.
    pub z: u8,
    /// When set, every index missing from `entries` holds `removed`.
    pub compressed: bool,
    /// The elided value of a compressed slab.
    pub removed: VoxelTypeId,
    /// Stored cells keyed by index within the slab.
    pub entries: BTreeMap<u16, VoxelTypeId>,
}

impl SubChunk {
    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes this slab's cells into a column-wide index map.
    ///
    /// Indices are shifted by `z · slab_volume`. A compressed slab fills every
    /// cell it does not store with the elided value.
    pub fn expand_into(
        &self,
        slab_volume: usize,
        out: &mut BTreeMap<usize, VoxelTypeId>,
    ) -> Result<(), CodecError> {
        if let Some((&last, _)) = self.entries.last_key_value()
            && last as usize >= slab_volume
        {
            return Err(CodecError::InvalidRecord {
                field: "voxel index",
                value: last as i64,
            });
        }
        let base = self.z as usize * slab_volume;
        if self.compressed {
            for i in 0..slab_volume {
                let value = self
                    .entries
                    .get(&(i as u16))
                    .copied()
                    .unwrap_or(self.removed);
                out.insert(base + i, value);
            }
        } else {
            for (&i, &value) in &self.entries {
                out.insert(base + i as usize, value);
            }
        }
        Ok(())
    }
}

/// Most frequent value and its count. The first value seen wins ties.
pub fn slab_mode(values: &[VoxelTypeId]) -> Option<(VoxelTypeId, usize)> {
    let mut slots: FxHashMap<VoxelTypeId, usize> = FxHashMap::default();
    let mut counts: Vec<(VoxelTypeId, usize)> = Vec::new();
    for &value in values {
        match slots.get(&value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    let mut best: Option<(VoxelTypeId, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best
}

/// A slab is compressed when its mode fills strictly more than 40% of it.
pub fn should_elide(mode_count: usize, slab_volume: usize) -> bool {
    mode_count * 5 > slab_volume * 2
}

/// Splits a chunk column into sub-chunks, eliding each slab's mode when it pays off.
pub fn pack_chunk(local: LocalChunkCoord, data: &ChunkData) -> Result<Vec<SubChunk>, CodecError> {
    let dims = data.dims();
    let slab_volume = dims.slab_volume();
    narrow::<u16>("slab volume", slab_volume)?;
    let x = narrow::<u8>("local chunk x", local.x as usize)?;
    let y = narrow::<u8>("local chunk y", local.y as usize)?;

    let mut slabs = Vec::with_capacity(dims.slab_count() as usize);
    let mut values = Vec::with_capacity(slab_volume);
    for slab in 0..dims.slab_count() as usize {
        let z = narrow::<u8>("slab index", slab)?;
        let base = slab * slab_volume;
        values.clear();
        values.extend((base..base + slab_volume).map(|i| data.get_index(i)));

        if let Some(&bad) = values.iter().find(|v| v.0 > U24_MAX) {
            return Err(CodecError::ValueOverflow {
                field: "voxel id",
                value: bad.0 as u64,
                max: U24_MAX as u64,
            });
        }

        let (mode, mode_count) = slab_mode(&values).unwrap_or((VoxelTypeId::AIR, 0));
        let compressed = should_elide(mode_count, slab_volume);
        let entries = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| !compressed || v != mode)
            .map(|(i, &v)| (i as u16, v))
            .collect();

        slabs.push(SubChunk {
            x,
            y,
            z,
            compressed,
            removed: if compressed { mode } else { VoxelTypeId::AIR },
            entries,
        });
    }
    Ok(slabs)
}

#[cfg(test)]
mod tests {
    use strata_voxel::ChunkDims;

    use super::*;

    fn column(width: u32, height: u32) -> ChunkData {
        ChunkData::new(ChunkDims::new(width, height).unwrap())
    }

    #[test]
    fn test_mode_prefers_first_seen_on_tie() {
        let values = [VoxelTypeId(2), VoxelTypeId(1), VoxelTypeId(1), VoxelTypeId(2)];
        assert_eq!(slab_mode(&values), Some((VoxelTypeId(2), 2)));
        assert_eq!(slab_mode(&[]), None);
    }

    #[test]
    fn test_uniform_slab_stores_nothing() {
        let mut data = column(4, 8);
        data.fill(VoxelTypeId(3));
        let slabs = pack_chunk(LocalChunkCoord { x: 1, y: 2 }, &data).unwrap();
        assert_eq!(slabs.len(), 2);
        for (z, slab) in slabs.iter().enumerate() {
            assert_eq!((slab.x, slab.y, slab.z as usize), (1, 2, z));
            assert!(slab.compressed);
            assert_eq!(slab.removed, VoxelTypeId(3));
            assert!(slab.is_empty());
        }
    }

    #[test]
    fn test_forty_percent_is_not_enough() {
        // Slab volume 1000: 400 of one id is exactly 40% and stays uncompressed.
        let mut data = column(10, 20);
        for i in 0..1000 {
            let id = if i < 400 { 1 } else { 2 + (i % 300) as u32 };
            data.set_index(i, VoxelTypeId(id));
        }
        let slabs = pack_chunk(LocalChunkCoord::default(), &data).unwrap();
        assert!(!slabs[0].compressed);
        assert_eq!(slabs[0].len(), 1000);
    }

    #[test]
    fn test_forty_one_percent_compresses() {
        let mut data = column(10, 20);
        for i in 0..1000 {
            let id = if i < 410 { 1 } else { 2 + (i % 300) as u32 };
            data.set_index(i, VoxelTypeId(id));
        }
        let slabs = pack_chunk(LocalChunkCoord::default(), &data).unwrap();
        assert!(slabs[0].compressed);
        assert_eq!(slabs[0].removed, VoxelTypeId(1));
        assert_eq!(slabs[0].len(), 590);
        assert!(slabs[0].entries.values().all(|&v| v != VoxelTypeId(1)));
    }

    #[test]
    fn test_every_mode_entry_is_stripped() {
        let mut data = column(4, 4);
        data.fill(VoxelTypeId(5));
        data.set_index(0, VoxelTypeId(1));
        data.set_index(63, VoxelTypeId(1));
        let slab = &pack_chunk(LocalChunkCoord::default(), &data).unwrap()[0];
        assert_eq!(slab.len(), 2);
        assert_eq!(slab.entries.get(&0), Some(&VoxelTypeId(1)));
        assert_eq!(slab.entries.get(&63), Some(&VoxelTypeId(1)));
    }

    #[test]
    fn test_expand_shifts_by_slab() {
        let mut data = column(2, 4);
        data.fill(VoxelTypeId(7));
        data.set_index(9, VoxelTypeId(1));
        let slabs = pack_chunk(LocalChunkCoord::default(), &data).unwrap();

        let mut out = BTreeMap::new();
        for slab in &slabs {
            slab.expand_into(8, &mut out).unwrap();
        }
        assert_eq!(out.len(), 16);
        let rebuilt: Vec<_> = out.values().copied().collect();
        assert_eq!(rebuilt, data.as_slice());
    }

    #[test]
    fn test_expand_rejects_index_past_slab() {
        let slab = SubChunk {
            x: 0,
            y: 0,
            z: 0,
            compressed: true,
            removed: VoxelTypeId(1),
            entries: BTreeMap::from([(8, VoxelTypeId(2))]),
        };
        let mut out = BTreeMap::new();
        assert!(slab.expand_into(8, &mut out).is_err());
    }

    #[test]
    fn test_unstorable_id_rejected() {
        let mut data = column(2, 2);
        data.set_index(0, VoxelTypeId(1 << 24));
        let err = pack_chunk(LocalChunkCoord::default(), &data).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ValueOverflow {
                field: "voxel id",
                ..
            }
        ));
    }

    #[test]
    fn test_oversized_slab_rejected() {
        // 41³ cells do not fit a u16 entry count.
        let data = column(41, 41);
        assert!(pack_chunk(LocalChunkCoord::default(), &data).is_err());
    }
}
