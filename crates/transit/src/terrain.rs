use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::{TERRAIN_BASE_FREQUENCY, WATER_THRESHOLD};
use crate::grid::{CellType, WorldGrid};

fn simplex(seed: i32, frequency: f32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(frequency));
    noise
}

pub fn generate_terrain(grid: &mut WorldGrid, seed: i32) {
    let noise = simplex(seed, TERRAIN_BASE_FREQUENCY);

    for y in 0..grid.height {
        for x in 0..grid.width {
            // OpenSimplex2 samples sit in -1..1; elevation is stored as 0..1.
            let elevation = (noise.get_noise_2d(x as f32, y as f32) + 1.0) * 0.5;
            let cell = grid.get_mut(x, y);
            cell.elevation = elevation;
            if elevation < WATER_THRESHOLD {
                cell.cell_type = CellType::Water;
            }
        }
    }

    carve_river(grid, seed);
}

/// Cuts a meandering river across the full map width so every map has at
/// least one contiguous waterway for ferries.
fn carve_river(grid: &mut WorldGrid, seed: i32) {
    let noise = simplex(seed.wrapping_add(7919), 0.02);

    let center = grid.height as f32 * 0.5;
    let amplitude = grid.height as f32 * 0.2;
    let half_width = 2i32;

    for x in 0..grid.width {
        let offset = noise.get_noise_2d(x as f32, 0.0) * amplitude;
        let river_y = (center + offset).round() as i32;
        for dy in -half_width..=half_width {
            let y = river_y + dy;
            if y >= 0 && (y as usize) < grid.height {
                let cell = grid.get_mut(x, y as usize);
                cell.cell_type = CellType::Water;
                cell.elevation = cell.elevation.min(WATER_THRESHOLD * 0.5);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_is_normalized() {
        let mut grid = WorldGrid::default();
        generate_terrain(&mut grid, 42);
        assert!(grid
            .cells
            .iter()
            .all(|c| (0.0..=1.0).contains(&c.elevation)));
    }

    #[test]
    fn test_map_has_land_and_water() {
        let mut grid = WorldGrid::default();
        generate_terrain(&mut grid, 42);
        let water = grid
            .cells
            .iter()
            .filter(|c| c.cell_type == CellType::Water)
            .count();
        assert!(water > 0, "no water generated");
        assert!(water < grid.cells.len(), "map is all water");
    }

    #[test]
    fn test_river_spans_map() {
        let mut grid = WorldGrid::default();
        generate_terrain(&mut grid, 42);
        for x in 0..grid.width {
            let has_water = (0..grid.height).any(|y| grid.get(x, y).cell_type == CellType::Water);
            assert!(has_water, "column {} has no water", x);
        }
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let mut a = WorldGrid::default();
        let mut b = WorldGrid::default();
        generate_terrain(&mut a, 42);
        generate_terrain(&mut b, 42);
        let identical = a
            .cells
            .iter()
            .zip(b.cells.iter())
            .all(|(x, y)| x.elevation == y.elevation && x.cell_type == y.cell_type);
        assert!(identical);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = WorldGrid::default();
        let mut b = WorldGrid::default();
        generate_terrain(&mut a, 1);
        generate_terrain(&mut b, 2);
        let identical = a
            .cells
            .iter()
            .zip(b.cells.iter())
            .all(|(x, y)| x.elevation == y.elevation);
        assert!(!identical, "different seeds produced identical terrain");
    }
}
