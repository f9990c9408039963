//! Headless cube-grid simulation
//!
//! Drops a 4x4x4 grid of cubes onto a static slab and prints how the pile settles.
//! An optional first argument names a JSON `WorldConfig` file. Set `RUST_LOG=portalphys=debug`
//! to see per-step logging.

use std::{env, error::Error, fs};

use portalphys::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Our crate logs at info, everything else at warn
const DEFAULT_FILTER: &str = "warn,portalphys=info,basic_simulation=info";

const GRID: usize = 4;
const SPACING: f32 = 2.05;
const DOWNWARD_ACCELERATION: f32 = 10.0;

fn init_logging() {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

fn load_config() -> Result<WorldConfig, Box<dyn Error>> {
    match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)?;
            let config = WorldConfig::from_json_str(&json)?;
            info!(%path, "loaded world config");
            Ok(config)
        }
        None => Ok(WorldConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let mut world = World::new(load_config()?);

    // Top face at y = 0
    world.insert(
        make_box_collider()
            .with_scale(Vec3::new(400.0, 1.0, 400.0))
            .with_position(Vec3::new(0.0, -0.5, 0.0))
            .immovable(),
    );

    let offset = (GRID - 1) as f32 * SPACING * 0.5;
    let mut cubes = Vec::new();
    for i in 0..GRID {
        for j in 0..GRID {
            for k in 0..GRID {
                let position = Vec3::new(
                    i as f32 * SPACING - offset,
                    1.0 + j as f32 * SPACING,
                    k as f32 * SPACING - offset,
                );
                cubes.push(world.insert(make_box_collider().with_position(position)));
            }
        }
    }
    info!(cubes = cubes.len(), "created grid");

    let dt = 1.0 / 60.0;
    for frame in 0..300 {
        for &cube in &cubes {
            let mass = world.collider(cube).map_or(0.0, |c| c.mass);
            world.add_force(cube, Vec3::new(0.0, -DOWNWARD_ACCELERATION * mass, 0.0));
        }
        let report = world.step(dt)?;

        if frame % 60 == 0 {
            let lowest = cubes
                .iter()
                .filter_map(|&h| world.collider(h))
                .map(|c| c.position.y)
                .fold(f32::INFINITY, f32::min);
            info!(
                t = world.time(),
                contacts = report.contacts.len(),
                lowest,
                "progress"
            );
        }
    }

    for &cube in cubes.iter().take(GRID) {
        if let Some(c) = world.collider(cube) {
            println!(
                "cube {:>2}: position=({:.3}, {:.3}, {:.3}) speed={:.3}",
                cube.index(),
                c.position.x,
                c.position.y,
                c.position.z,
                c.velocity.length()
            );
        }
    }
    Ok(())
}
