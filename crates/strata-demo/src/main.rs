//! Strata demo: generates a patch of terrain, digs into it, saves the world
//! in the background and reads it back into a fresh session to check that
//! every chunk and mesh survived the trip.
//!
//! Run with: `cargo run -p strata-demo -- --world Valley --spawn-radius 2`

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;
use strata_config::{CliArgs, Config};
use strata_voxel::VoxelTypeId;
use strata_world::{JobKind, VoxelWorld, WorldError, WorldEvent, default_registry};
use tracing::{error, info, warn};

const FRAME: Duration = Duration::from_millis(16);
const JOB_TIMEOUT: Duration = Duration::from_secs(60);

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(|| dirs::config_dir().map(|dir| dir.join("strata")))
        .unwrap_or_else(|| PathBuf::from("config"));
    let (mut config, config_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    config.apply_cli_overrides(&args);

    let log_dir = config.storage.saved_dir.join("Logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    if let Some(err) = config_error {
        warn!("Using default config: {err}");
    }

    info!("Strata demo");
    info!(
        "World '{}': chunks {}x{}x{}, voxel size {}, region width {}",
        config.world.name,
        config.world.chunk_width,
        config.world.chunk_width,
        config.world.chunk_height,
        config.world.voxel_size,
        config.world.region_width
    );
    info!("Saves under {}", config.storage.saved_dir.display());

    if let Err(err) = run(&config) {
        error!("Demo failed: {err}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), WorldError> {
    let registry = Arc::new(default_registry()?);

    let mut world = VoxelWorld::new(config, Arc::clone(&registry))?;
    let spawned = world.spawn_area(config.world.spawn_radius)?;
    info!("Generated {spawned} chunks");

    // Dig a shaft down the middle of the origin chunk and cap it with grass.
    let size = config.world.voxel_size;
    let top = config.world.chunk_height.saturating_sub(1);
    for z in 0..=top {
        let position = Vec3::new(size * 2.0, size * 2.0, z as f32 * size);
        let voxel = if z == top {
            VoxelTypeId(2)
        } else {
            VoxelTypeId::AIR
        };
        world.set_voxel(position, voxel)?;
    }
    info!("Edited {} voxels", top + 1);

    world.save_world()?;
    match wait_for(&mut world, JobKind::Save) {
        Some(WorldEvent::SaveCompleted {
            chunks,
            regions,
            still_dirty,
        }) => info!("Saved {chunks} chunks into {regions} regions, {still_dirty} left dirty"),
        Some(WorldEvent::SaveFailed(err)) => return Err(err.into()),
        _ => {
            warn!("Save did not finish in time");
            return Ok(());
        }
    }

    let mut restored = VoxelWorld::new(config, registry)?;
    restored.load_world(&config.world.name)?;
    match wait_for(&mut restored, JobKind::Load) {
        Some(WorldEvent::LoadCompleted { chunks, skipped }) => {
            info!("Loaded {chunks} chunks ({skipped} skipped)")
        }
        Some(WorldEvent::LoadFailed(err)) => return Err(err.into()),
        _ => {
            warn!("Load did not finish in time");
            return Ok(());
        }
    }

    let mut mismatched = 0;
    for (coord, chunk) in world.index().iter() {
        let same_voxels = restored
            .chunk(*coord)
            .is_some_and(|loaded| loaded.data() == chunk.data());
        if !same_voxels || restored.mesh(*coord) != world.mesh(*coord) {
            warn!("Chunk ({}, {}) differs after reload", coord.x, coord.y);
            mismatched += 1;
        }
    }
    if mismatched == 0 {
        info!(
            "All {} chunks and meshes match after reload",
            world.index().loaded_count()
        );
    } else {
        warn!("{mismatched} chunks differ after reload");
    }

    world.shutdown();
    restored.shutdown();
    Ok(())
}

/// Drives `update` at a fixed frame rate until the job reports back.
fn wait_for(world: &mut VoxelWorld, kind: JobKind) -> Option<WorldEvent> {
    let start = Instant::now();
    while start.elapsed() < JOB_TIMEOUT {
        if let Some(event) = world.update(FRAME).into_iter().find(|e| e.kind() == kind) {
            return Some(event);
        }
        std::thread::sleep(FRAME);
    }
    None
}
