//! The map's cell grid: terrain type and elevation per cell, plus the
//! transforms between grid coordinates and world space.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{CELL_SIZE, GRID_HEIGHT, GRID_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CellType {
    #[default]
    Grass,
    Water,
    Street,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cell {
    pub elevation: f32,
    pub cell_type: CellType,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            elevation: 0.0,
            cell_type: CellType::Grass,
        }
    }
}

#[derive(Resource, Serialize, Deserialize)]
pub struct WorldGrid {
    pub cells: Vec<Cell>,
    pub width: usize,
    pub height: usize,
}

impl Default for WorldGrid {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl WorldGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![Cell::default(); width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &Cell {
        &self.cells[y * self.width + x]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let idx = y * self.width + x;
        &mut self.cells[idx]
    }

    #[inline]
    pub fn is_street(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.get(x, y).cell_type == CellType::Street
    }

    /// World-space center of a cell.
    pub fn cell_center(x: usize, y: usize) -> Vec2 {
        Vec2::new((x as f32 + 0.5) * CELL_SIZE, (y as f32 + 0.5) * CELL_SIZE)
    }

    /// Cell containing a world position. Off-map positions come back with
    /// negative or oversized coordinates, so callers bounds-check.
    pub fn world_to_grid(pos: Vec2) -> (i32, i32) {
        (
            (pos.x / CELL_SIZE).floor() as i32,
            (pos.y / CELL_SIZE).floor() as i32,
        )
    }

    /// The 4-neighborhood of a cell, clipped to the map edge.
    pub fn neighbors4(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        const OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 {
                return None;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            self.in_bounds(nx, ny).then_some((nx, ny))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center_and_back() {
        assert_eq!(WorldGrid::cell_center(0, 0), Vec2::new(8.0, 8.0));
        assert_eq!(WorldGrid::cell_center(5, 10), Vec2::new(88.0, 168.0));
        for cell in [(0, 0), (31, 64), (127, 127)] {
            let center = WorldGrid::cell_center(cell.0, cell.1);
            let (gx, gy) = WorldGrid::world_to_grid(center);
            assert_eq!((gx as usize, gy as usize), cell);
        }
        // Off-map positions map to out-of-range coordinates, not garbage.
        assert_eq!(WorldGrid::world_to_grid(Vec2::new(-4.0, 8.0)).0, -1);
    }

    #[test]
    fn test_bounds() {
        let grid = WorldGrid::default();
        assert!(grid.in_bounds(GRID_WIDTH - 1, GRID_HEIGHT - 1));
        assert!(!grid.in_bounds(GRID_WIDTH, 0));
        assert!(!grid.in_bounds(0, GRID_HEIGHT));
    }

    #[test]
    fn test_neighbors_clip_at_the_edge() {
        let grid = WorldGrid::default();
        let corner: Vec<_> = grid.neighbors4(0, 0).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        assert_eq!(grid.neighbors4(64, 64).count(), 4);
        assert_eq!(grid.neighbors4(GRID_WIDTH - 1, GRID_HEIGHT - 1).count(), 2);
    }

    #[test]
    fn test_is_street() {
        let mut grid = WorldGrid::default();
        assert!(!grid.is_street(5, 5));
        grid.get_mut(5, 5).cell_type = CellType::Street;
        assert!(grid.is_street(5, 5));
        assert!(!grid.is_street(GRID_WIDTH, 0));
    }
}
