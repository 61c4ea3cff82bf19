// =============================================================================
// World generation: procedural terrain, a river, and the street grid.
// =============================================================================

use bevy::prelude::*;

use crate::config::DEFAULT_MAP_SEED;
use crate::grid::{CellType, WorldGrid};
use crate::streets::{generate_streets, StreetMap};
use crate::terrain::generate_terrain;

/// Marker resource that, when present, causes `init_world` to skip map
/// generation. Used by the test harness to start with a blank grid.
#[derive(Resource)]
pub struct SkipWorldInit;

/// Seed for terrain and street generation.
#[derive(Resource, Debug, Clone, Copy)]
pub struct MapSeed(pub u64);

impl Default for MapSeed {
    fn default() -> Self {
        Self(DEFAULT_MAP_SEED)
    }
}

pub fn init_world(
    mut grid: ResMut<WorldGrid>,
    mut streets: ResMut<StreetMap>,
    seed: Res<MapSeed>,
    skip: Option<Res<SkipWorldInit>>,
) {
    if skip.is_some() {
        return;
    }

    generate_terrain(&mut grid, seed.0 as i32);
    generate_streets(&mut grid, &mut streets, seed.0);

    let water = grid
        .cells
        .iter()
        .filter(|c| c.cell_type == CellType::Water)
        .count();
    info!(
        "Generated {}x{} map from seed {}: {} street segments, {} water cells",
        grid.width,
        grid.height,
        seed.0,
        streets.segments.len(),
        water
    );
}
