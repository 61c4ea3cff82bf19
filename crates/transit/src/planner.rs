//! Street-network path planning for transit lines.

use bevy::prelude::*;
use pathfinding::prelude::astar;

use crate::config::SNAP_SEARCH_RADIUS;
use crate::grid::WorldGrid;
use crate::modes::TrackKind;
use crate::streets::{SegmentId, StreetMap, StreetNode};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlannerOptions {
    /// Add walking legs between the raw endpoints and the street network.
    pub allow_walk: bool,
    /// Restrict the search to streets carrying this infrastructure.
    pub required_tracks: Option<TrackKind>,
}

/// A drivable path between two world positions.
#[derive(Debug, Clone)]
pub struct PlannedPath {
    /// World-space polyline through street cell centers.
    pub points: Vec<Vec2>,
    /// Street segments traversed, consecutive duplicates removed.
    pub segments: Vec<SegmentId>,
    /// Polyline length in world units.
    pub length: f32,
    /// True when every traversed cell carries tram tracks.
    pub tram_legal: bool,
}

/// Plan a drive along the street network between two world positions.
/// Both endpoints snap to the nearest street cell within a small radius;
/// returns None when either endpoint has no street nearby or the network
/// does not connect them.
pub fn find_drive(
    streets: &StreetMap,
    from: Vec2,
    to: Vec2,
    options: PlannerOptions,
) -> Option<PlannedPath> {
    let start = nearest_street_node(streets, from)?;
    let goal = nearest_street_node(streets, to)?;

    if options.required_tracks.is_some()
        && (!streets.cell_has_tracks(start.0, start.1) || !streets.cell_has_tracks(goal.0, goal.1))
    {
        return None;
    }

    let path = if start == goal {
        vec![start]
    } else {
        let (path, _cost) = astar(
            &start,
            |node| {
                streets
                    .neighbors(node)
                    .into_iter()
                    .filter(|n| match options.required_tracks {
                        Some(TrackKind::TramTracks) => streets.cell_has_tracks(n.0, n.1),
                        None => true,
                    })
                    .map(|n| (n, 1u32))
                    .collect::<Vec<_>>()
            },
            |node| heuristic(node, &goal),
            |node| *node == goal,
        )?;
        path
    };

    let tram_legal = path.iter().all(|n| streets.cell_has_tracks(n.0, n.1));

    let mut segments: Vec<SegmentId> = Vec::new();
    for node in &path {
        if let Some(id) = streets.segment_at(node.0, node.1) {
            if segments.last() != Some(&id) {
                segments.push(id);
            }
        }
    }

    let mut points: Vec<Vec2> = Vec::with_capacity(path.len() + 2);
    if options.allow_walk {
        points.push(from);
    }
    for node in &path {
        points.push(WorldGrid::cell_center(node.0, node.1));
    }
    if options.allow_walk {
        points.push(to);
    }

    let length = points.windows(2).map(|w| (w[1] - w[0]).length()).sum();

    Some(PlannedPath {
        points,
        segments,
        length,
        tram_legal,
    })
}

fn heuristic(a: &StreetNode, b: &StreetNode) -> u32 {
    let dx = (a.0 as i32 - b.0 as i32).unsigned_abs();
    let dy = (a.1 as i32 - b.1 as i32).unsigned_abs();
    dx + dy
}

/// Find the street cell nearest to a world position.
/// Uses direct grid lookup + spiral search in expanding Manhattan-distance
/// rings, so off-street cursor positions still land on the adjacent street.
pub fn nearest_street_node(streets: &StreetMap, pos: Vec2) -> Option<StreetNode> {
    let (gx, gy) = WorldGrid::world_to_grid(pos);
    if gx >= 0 && gy >= 0 && streets.is_street(gx as usize, gy as usize) {
        return Some(StreetNode(gx as usize, gy as usize));
    }

    for radius in 1..=SNAP_SEARCH_RADIUS {
        let mut best: Option<(StreetNode, u32)> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let dist = dx.unsigned_abs() + dy.unsigned_abs();
                if dist != radius as u32 {
                    continue; // interior cells were covered at smaller radii
                }
                let nx = gx + dx;
                let ny = gy + dy;
                if nx < 0 || ny < 0 {
                    continue;
                }
                let node = StreetNode(nx as usize, ny as usize);
                if streets.is_street(node.0, node.1) {
                    match best {
                        None => best = Some((node, dist)),
                        Some((_, bd)) if dist < bd => best = Some((node, dist)),
                        _ => {}
                    }
                }
            }
        }
        if best.is_some() {
            return best.map(|(n, _)| n);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WorldGrid;

    fn street_world(map: &mut StreetMap, grid: &mut WorldGrid) -> (SegmentId, SegmentId) {
        let horizontal: Vec<(usize, usize)> = (5..=15).map(|x| (x, 10)).collect();
        let vertical: Vec<(usize, usize)> = (5..=15).map(|y| (10, y)).collect();
        let h = map.add_segment(grid, "Oak Street", horizontal).unwrap();
        let v = map.add_segment(grid, "Maple Avenue", vertical).unwrap();
        (h, v)
    }

    fn cell_center(x: usize, y: usize) -> Vec2 {
        WorldGrid::cell_center(x, y)
    }

    #[test]
    fn test_straight_drive() {
        let mut grid = WorldGrid::new(32, 32);
        let mut map = StreetMap::default();
        street_world(&mut map, &mut grid);

        let path = find_drive(
            &map,
            cell_center(5, 10),
            cell_center(15, 10),
            PlannerOptions::default(),
        )
        .unwrap();
        assert_eq!(path.points.len(), 11);
        assert_eq!(path.points[0], cell_center(5, 10));
        assert_eq!(path.points[10], cell_center(15, 10));
        assert!(path.length > 0.0);
    }

    #[test]
    fn test_drive_around_corner() {
        let mut grid = WorldGrid::new(32, 32);
        let mut map = StreetMap::default();
        let (h, v) = street_world(&mut map, &mut grid);

        let path = find_drive(
            &map,
            cell_center(5, 10),
            cell_center(10, 15),
            PlannerOptions::default(),
        )
        .unwrap();
        assert_eq!(path.points.len(), 11);
        assert_eq!(path.segments, vec![h, v]);
    }

    #[test]
    fn test_disconnected_streets() {
        let mut grid = WorldGrid::new(64, 64);
        let mut map = StreetMap::default();
        let a: Vec<(usize, usize)> = (5..=9).map(|x| (x, 10)).collect();
        let b: Vec<(usize, usize)> = (30..=34).map(|x| (x, 40)).collect();
        map.add_segment(&mut grid, "Oak Street", a).unwrap();
        map.add_segment(&mut grid, "Cedar Lane", b).unwrap();

        let path = find_drive(
            &map,
            cell_center(5, 10),
            cell_center(32, 40),
            PlannerOptions::default(),
        );
        assert!(path.is_none());
    }

    #[test]
    fn test_endpoint_far_from_streets() {
        let mut grid = WorldGrid::new(64, 64);
        let mut map = StreetMap::default();
        street_world(&mut map, &mut grid);

        let path = find_drive(
            &map,
            cell_center(5, 10),
            cell_center(50, 50),
            PlannerOptions::default(),
        );
        assert!(path.is_none());
    }

    #[test]
    fn test_walk_legs_from_raw_endpoints() {
        let mut grid = WorldGrid::new(32, 32);
        let mut map = StreetMap::default();
        street_world(&mut map, &mut grid);

        let from = cell_center(5, 10) + Vec2::new(3.0, 3.0);
        let to = cell_center(15, 10) - Vec2::new(3.0, 3.0);
        let walk = find_drive(
            &map,
            from,
            to,
            PlannerOptions {
                allow_walk: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(walk.points.len(), 13);
        assert_eq!(walk.points[0], from);
        assert_eq!(*walk.points.last().unwrap(), to);

        let drive = find_drive(&map, from, to, PlannerOptions::default()).unwrap();
        assert_eq!(drive.points.len(), 11);
        assert_eq!(drive.points[0], cell_center(5, 10));
    }

    #[test]
    fn test_same_cell_is_single_point() {
        let mut grid = WorldGrid::new(32, 32);
        let mut map = StreetMap::default();
        street_world(&mut map, &mut grid);

        let path = find_drive(
            &map,
            cell_center(7, 10),
            cell_center(7, 10),
            PlannerOptions::default(),
        )
        .unwrap();
        assert_eq!(path.points.len(), 1);
        assert_eq!(path.length, 0.0);
    }

    #[test]
    fn test_tram_legality_flag() {
        let mut grid = WorldGrid::new(32, 32);
        let mut map = StreetMap::default();
        let (h, _) = street_world(&mut map, &mut grid);

        let from = cell_center(5, 10);
        let to = cell_center(9, 10);
        let untracked = find_drive(&map, from, to, PlannerOptions::default()).unwrap();
        assert!(!untracked.tram_legal);

        map.add_tram_tracks(h);
        let tracked = find_drive(&map, from, to, PlannerOptions::default()).unwrap();
        assert!(tracked.tram_legal);
    }

    #[test]
    fn test_required_tracks_restricts_search() {
        let mut grid = WorldGrid::new(32, 32);
        let mut map = StreetMap::default();
        let (h, _) = street_world(&mut map, &mut grid);

        let options = PlannerOptions {
            required_tracks: Some(TrackKind::TramTracks),
            ..Default::default()
        };
        let from = cell_center(5, 10);
        let to = cell_center(9, 10);
        assert!(find_drive(&map, from, to, options).is_none());

        map.add_tram_tracks(h);
        let path = find_drive(&map, from, to, options).unwrap();
        assert!(path.tram_legal);
    }

    #[test]
    fn test_nearest_snap_off_street() {
        let mut grid = WorldGrid::new(32, 32);
        let mut map = StreetMap::default();
        street_world(&mut map, &mut grid);

        // Two cells below the street still snaps onto it.
        let pos = cell_center(7, 12);
        assert_eq!(nearest_street_node(&map, pos), Some(StreetNode(7, 10)));
        // Far away does not.
        assert_eq!(nearest_street_node(&map, cell_center(25, 25)), None);
    }
}
