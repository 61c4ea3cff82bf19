//! Procedural street grid generation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::STREET_SPACING;
use crate::grid::{CellType, WorldGrid};
use crate::names::street_name;

use super::state::StreetMap;

/// Minimum run length (in cells) worth keeping as a segment.
const MIN_RUN_CELLS: usize = 4;

/// Lays a jittered grid of named streets over the land cells. Streets break
/// at water, so a single avenue can produce several segments sharing its name.
pub fn generate_streets(grid: &mut WorldGrid, map: &mut StreetMap, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut name_index = 0;

    let mut x = STREET_SPACING;
    while x + 2 < grid.width {
        let col = x + rng.gen_range(0..3);
        let name = street_name(name_index);
        name_index += 1;
        carve_column(grid, map, col, &name);
        x += STREET_SPACING;
    }

    let mut y = STREET_SPACING;
    while y + 2 < grid.height {
        let row = y + rng.gen_range(0..3);
        let name = street_name(name_index);
        name_index += 1;
        carve_row(grid, map, row, &name);
        y += STREET_SPACING;
    }
}

fn carve_column(grid: &mut WorldGrid, map: &mut StreetMap, x: usize, name: &str) {
    let mut run: Vec<(usize, usize)> = Vec::new();
    for y in 0..grid.height {
        if grid.get(x, y).cell_type == CellType::Water {
            flush_run(grid, map, &mut run, name);
        } else {
            run.push((x, y));
        }
    }
    flush_run(grid, map, &mut run, name);
}

fn carve_row(grid: &mut WorldGrid, map: &mut StreetMap, y: usize, name: &str) {
    let mut run: Vec<(usize, usize)> = Vec::new();
    for x in 0..grid.width {
        if grid.get(x, y).cell_type == CellType::Water {
            flush_run(grid, map, &mut run, name);
        } else {
            run.push((x, y));
        }
    }
    flush_run(grid, map, &mut run, name);
}

fn flush_run(grid: &mut WorldGrid, map: &mut StreetMap, run: &mut Vec<(usize, usize)>, name: &str) {
    // Runs contain only land cells, so the insert cannot be refused.
    if run.len() >= MIN_RUN_CELLS {
        map.add_segment(grid, name, run.clone());
    }
    run.clear();
}
