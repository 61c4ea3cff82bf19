//! Methods on `StreetMap` and the `Saveable` implementation.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use bitcode::{Decode, Encode};

use crate::grid::{CellType, WorldGrid};
use crate::Saveable;

use super::types::*;

// =============================================================================
// Resource
// =============================================================================

/// All streets in the city: named segments, a cell-level routing graph, and
/// tram track state.
#[derive(Resource, Default)]
pub struct StreetMap {
    pub segments: Vec<StreetSegment>,
    /// Adjacency between street cells, keyed by grid coordinate.
    pub edges: HashMap<StreetNode, HashSet<StreetNode>>,
    /// Owning segment for each street cell. Crossings keep the first owner.
    cell_index: HashMap<(usize, usize), SegmentId>,
    /// Cells covered by at least one segment with tram tracks.
    tracked_cells: HashSet<(usize, usize)>,
    next_segment_id: u32,
}

impl StreetMap {
    /// Lay a segment over the given cells, marking them as streets on the grid
    /// and wiring them into the routing graph. Returns None if any cell is out
    /// of bounds or water.
    pub fn add_segment(
        &mut self,
        grid: &mut WorldGrid,
        name: &str,
        cells: Vec<(usize, usize)>,
    ) -> Option<SegmentId> {
        if cells.is_empty() {
            return None;
        }
        for &(x, y) in &cells {
            if !grid.in_bounds(x, y) || grid.get(x, y).cell_type == CellType::Water {
                return None;
            }
        }

        let id = SegmentId(self.next_segment_id);
        self.next_segment_id += 1;

        let points = cells
            .iter()
            .map(|&(x, y)| WorldGrid::cell_center(x, y))
            .collect();

        for &(x, y) in &cells {
            grid.get_mut(x, y).cell_type = CellType::Street;
            self.cell_index.entry((x, y)).or_insert(id);
        }
        for &(x, y) in &cells {
            self.connect_cell(grid, x, y);
        }

        self.segments.push(StreetSegment {
            id,
            name: name.to_string(),
            cells,
            points,
            has_tram_tracks: false,
        });
        Some(id)
    }

    /// Connect a street cell to its 4-adjacent street cells.
    fn connect_cell(&mut self, grid: &WorldGrid, x: usize, y: usize) {
        let node = StreetNode(x, y);
        self.edges.entry(node).or_default();

        for (nx, ny) in grid.neighbors4(x, y) {
            if grid.get(nx, ny).cell_type == CellType::Street {
                let neighbor = StreetNode(nx, ny);
                self.edges.entry(node).or_default().insert(neighbor);
                self.edges.entry(neighbor).or_default().insert(node);
            }
        }
    }

    pub fn segment(&self, id: SegmentId) -> Option<&StreetSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// The segment owning the given cell, if it is a street cell.
    pub fn segment_at(&self, x: usize, y: usize) -> Option<SegmentId> {
        self.cell_index.get(&(x, y)).copied()
    }

    pub fn is_street(&self, x: usize, y: usize) -> bool {
        self.edges.contains_key(&StreetNode(x, y))
    }

    pub fn neighbors(&self, node: &StreetNode) -> Vec<StreetNode> {
        self.edges
            .get(node)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Lay tram tracks along a segment. Returns false for unknown segments.
    pub fn add_tram_tracks(&mut self, id: SegmentId) -> bool {
        let Some(segment) = self.segments.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        segment.has_tram_tracks = true;
        for &cell in &segment.cells {
            self.tracked_cells.insert(cell);
        }
        true
    }

    pub fn has_tram_tracks(&self, id: SegmentId) -> bool {
        self.segment(id).is_some_and(|s| s.has_tram_tracks)
    }

    /// True when the cell is covered by at least one segment with tram tracks.
    /// A crossing counts as tracked if any street through it is tracked.
    pub fn cell_has_tracks(&self, x: usize, y: usize) -> bool {
        self.tracked_cells.contains(&(x, y))
    }

    /// Rebuild the routing graph, cell index, tracked cells, and ID counter
    /// from segment data (used after load).
    pub fn rebuild_index(&mut self) {
        self.edges.clear();
        self.cell_index.clear();
        self.tracked_cells.clear();
        self.next_segment_id = self.segments.iter().map(|s| s.id.0 + 1).max().unwrap_or(0);

        let mut street_cells: HashSet<(usize, usize)> = HashSet::new();
        for segment in &self.segments {
            street_cells.extend(segment.cells.iter().copied());
        }

        for segment in &self.segments {
            for &(x, y) in &segment.cells {
                self.cell_index.entry((x, y)).or_insert(segment.id);
                if segment.has_tram_tracks {
                    self.tracked_cells.insert((x, y));
                }

                let node = StreetNode(x, y);
                self.edges.entry(node).or_default();
                let mut adjacent = [(0usize, 0usize); 4];
                let mut count = 0;
                if x > 0 {
                    adjacent[count] = (x - 1, y);
                    count += 1;
                }
                adjacent[count] = (x + 1, y);
                count += 1;
                if y > 0 {
                    adjacent[count] = (x, y - 1);
                    count += 1;
                }
                adjacent[count] = (x, y + 1);
                count += 1;
                for &(nx, ny) in &adjacent[..count] {
                    if street_cells.contains(&(nx, ny)) {
                        let neighbor = StreetNode(nx, ny);
                        self.edges.entry(node).or_default().insert(neighbor);
                        self.edges.entry(neighbor).or_default().insert(node);
                    }
                }
            }
        }
    }

    /// Re-mark all segment cells as streets on the grid (used after load).
    pub fn apply_to_grid(&self, grid: &mut WorldGrid) {
        for segment in &self.segments {
            for &(x, y) in &segment.cells {
                if grid.in_bounds(x, y) {
                    grid.get_mut(x, y).cell_type = CellType::Street;
                }
            }
        }
    }
}

// =============================================================================
// Saveable
// =============================================================================

/// Serializable form for save/load. World-space polylines are rebuilt from
/// cell coordinates on load, so only the cells are persisted.
#[derive(Encode, Decode, Default)]
struct StreetMapSave {
    segments: Vec<StreetSegmentSave>,
}

#[derive(Encode, Decode)]
struct StreetSegmentSave {
    id: u32,
    name: String,
    cells: Vec<(u16, u16)>,
    has_tram_tracks: bool,
}

impl Saveable for StreetMap {
    const SAVE_KEY: &'static str = "street_map";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if self.segments.is_empty() {
            return None;
        }
        let save = StreetMapSave {
            segments: self
                .segments
                .iter()
                .map(|s| StreetSegmentSave {
                    id: s.id.0,
                    name: s.name.clone(),
                    cells: s.cells.iter().map(|&(x, y)| (x as u16, y as u16)).collect(),
                    has_tram_tracks: s.has_tram_tracks,
                })
                .collect(),
        };
        Some(bitcode::encode(&save))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let save: StreetMapSave = crate::decode_or_warn(Self::SAVE_KEY, bytes);
        let mut map = StreetMap::default();
        for seg in save.segments {
            let cells: Vec<(usize, usize)> = seg
                .cells
                .iter()
                .map(|&(x, y)| (x as usize, y as usize))
                .collect();
            let points = cells
                .iter()
                .map(|&(x, y)| WorldGrid::cell_center(x, y))
                .collect();
            map.segments.push(StreetSegment {
                id: SegmentId(seg.id),
                name: seg.name,
                cells,
                points,
                has_tram_tracks: seg.has_tram_tracks,
            });
        }
        map.rebuild_index();
        map
    }
}
