//! Re-stitching of stored sub-chunks into whole chunk columns.

use std::collections::BTreeMap;

use strata_voxel::{ChunkCoord, ChunkLocation, LocalChunkCoord, VoxelTypeId};

use crate::error::CodecError;
use crate::region::RegionFile;
use crate::world::WorldInfo;

/// Voxels of one chunk column read back from disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkRecord {
    /// Global chunk coordinate.
    pub coord: ChunkCoord,
    /// Column-wide index → voxel id.
    pub voxels: BTreeMap<usize, VoxelTypeId>,
}

/// Groups a region's sub-chunks by column and expands them into chunk records.
///
/// Every column must hold exactly one sub-chunk per slab of the world's
/// layout. Records come out ordered by local `(x, y)`.
pub fn assemble_region(
    region: &RegionFile,
    world: &WorldInfo,
) -> Result<Vec<ChunkRecord>, CodecError> {
    let dims = world.dims()?;
    let slabs = dims.slab_count();
    let slab_volume = dims.slab_volume();

    let mut columns: BTreeMap<(u8, u8), BTreeMap<u8, _>> = BTreeMap::new();
    for sub in &region.sub_chunks {
        if sub.x as u32 >= world.region_width || sub.y as u32 >= world.region_width {
            return Err(CodecError::InvalidRecord {
                field: "local chunk coordinate",
                value: sub.x.max(sub.y) as i64,
            });
        }
        if sub.z as u32 >= slabs {
            return Err(CodecError::InvalidRecord {
                field: "slab index",
                value: sub.z as i64,
            });
        }
        columns.entry((sub.x, sub.y)).or_default().insert(sub.z, sub);
    }

    let mut records = Vec::with_capacity(columns.len());
    for ((x, y), column) in columns {
        let stored = region
            .sub_chunks
            .iter()
            .filter(|s| (s.x, s.y) == (x, y))
            .count();
        if column.len() as u32 != slabs || stored != column.len() {
            return Err(CodecError::IncompleteChunk {
                x: x as u32,
                y: y as u32,
                expected: slabs,
                found: column.len() as u32,
            });
        }

        let mut voxels = BTreeMap::new();
        for sub in column.values() {
            sub.expand_into(slab_volume, &mut voxels)?;
        }
        let location = ChunkLocation::new(
            region.coord,
            LocalChunkCoord {
                x: x as u32,
                y: y as u32,
            },
        );
        records.push(ChunkRecord {
            coord: location.chunk_coord(world.region_width),
            voxels,
        });
    }
    Ok(records)
}
