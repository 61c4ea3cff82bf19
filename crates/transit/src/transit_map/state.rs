//! Methods on `TransitMap` and the `Saveable` implementation.

use bevy::prelude::*;
use bitcode::{Decode, Encode};

use crate::modes::TransitMode;
use crate::Saveable;

use super::types::*;

// =============================================================================
// Resource
// =============================================================================

/// The committed transit network: stops, lines, and the routes between them.
#[derive(Resource, Default)]
pub struct TransitMap {
    pub stops: Vec<Stop>,
    pub lines: Vec<TransitLine>,
    pub routes: Vec<Route>,
    next_stop_id: u32,
    next_line_id: u32,
    next_route_id: u32,
}

impl TransitMap {
    pub fn create_stop(&mut self, name: &str, position: Vec2) -> StopId {
        let id = StopId(self.next_stop_id);
        self.next_stop_id += 1;
        self.stops.push(Stop {
            id,
            name: name.to_string(),
            position,
        });
        id
    }

    pub fn create_line(&mut self, mode: TransitMode, name: &str, color: [f32; 3]) -> LineId {
        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        self.lines.push(TransitLine {
            id,
            name: name.to_string(),
            mode,
            color,
            stop_ids: Vec::new(),
            sealed: false,
        });
        id
    }

    /// Append a stop to a line. The first stop of a line records no route;
    /// every later stop records a route from the previous stop, using `path`
    /// when given and a straight two-point leg otherwise. Returns the new
    /// route's ID, or None for the first stop and for contract violations
    /// (unknown IDs, sealed line).
    pub fn add_stop_to_line(
        &mut self,
        line_id: LineId,
        stop_id: StopId,
        forward: bool,
        apply_cost: bool,
        path: Option<&[Vec2]>,
    ) -> Option<RouteId> {
        if self.stop(stop_id).is_none() {
            warn!("add_stop_to_line: unknown stop {:?}", stop_id);
            debug_assert!(false, "add_stop_to_line: unknown stop {:?}", stop_id);
            return None;
        }
        let Some(line) = self.lines.iter_mut().find(|l| l.id == line_id) else {
            warn!("add_stop_to_line: unknown line {:?}", line_id);
            debug_assert!(false, "add_stop_to_line: unknown line {:?}", line_id);
            return None;
        };
        if line.sealed {
            warn!("add_stop_to_line: line {:?} is sealed", line_id);
            debug_assert!(false, "add_stop_to_line: line {:?} is sealed", line_id);
            return None;
        }

        let previous = line.stop_ids.last().copied();
        line.stop_ids.push(stop_id);

        let begin = previous?;
        let begin_pos = self.stop(begin).map(|s| s.position);
        let end_pos = self.stop(stop_id).map(|s| s.position);
        let points: Vec<Vec2> = match path {
            Some(points) => points.to_vec(),
            None => match (begin_pos, end_pos) {
                (Some(a), Some(b)) => vec![a, b],
                _ => Vec::new(),
            },
        };
        let length = points.windows(2).map(|w| (w[1] - w[0]).length()).sum();

        let id = RouteId(self.next_route_id);
        self.next_route_id += 1;
        self.routes.push(Route {
            id,
            line_id,
            begin,
            end: stop_id,
            points,
            length,
            forward,
            apply_cost,
        });
        Some(id)
    }

    /// Seal a line against further structural edits. Sealing twice is a
    /// no-op; sealing an unknown line is a contract violation.
    pub fn seal_line(&mut self, line_id: LineId) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.id == line_id) else {
            warn!("seal_line: unknown line {:?}", line_id);
            debug_assert!(false, "seal_line: unknown line {:?}", line_id);
            return false;
        };
        line.sealed = true;
        true
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == id)
    }

    pub fn line(&self, id: LineId) -> Option<&TransitLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    pub fn line_by_name(&self, name: &str) -> Option<&TransitLine> {
        self.lines.iter().find(|l| l.name == name)
    }

    /// Routes of a line in stop order.
    pub fn line_routes(&self, line_id: LineId) -> Vec<&Route> {
        self.routes.iter().filter(|r| r.line_id == line_id).collect()
    }

    /// Total length of a line's routes in world units.
    pub fn line_length(&self, line_id: LineId) -> f32 {
        self.line_routes(line_id).iter().map(|r| r.length).sum()
    }

    /// Rebuild internal ID counters from loaded data.
    pub fn rebuild_counters(&mut self) {
        self.next_stop_id = self.stops.iter().map(|s| s.id.0 + 1).max().unwrap_or(0);
        self.next_line_id = self.lines.iter().map(|l| l.id.0 + 1).max().unwrap_or(0);
        self.next_route_id = self.routes.iter().map(|r| r.id.0 + 1).max().unwrap_or(0);
    }
}

// =============================================================================
// Saveable
// =============================================================================

/// Serializable form for save/load. Positions and polylines flatten to f32
/// pairs since the resource types carry world-space vectors.
#[derive(Encode, Decode, Default)]
struct TransitMapSave {
    stops: Vec<StopSave>,
    lines: Vec<LineSave>,
    routes: Vec<RouteSave>,
}

#[derive(Encode, Decode)]
struct StopSave {
    id: u32,
    name: String,
    x: f32,
    y: f32,
}

#[derive(Encode, Decode)]
struct LineSave {
    id: u32,
    name: String,
    mode: TransitMode,
    color: [f32; 3],
    stop_ids: Vec<u32>,
    sealed: bool,
}

#[derive(Encode, Decode)]
struct RouteSave {
    id: u32,
    line_id: u32,
    begin: u32,
    end: u32,
    points: Vec<(f32, f32)>,
    forward: bool,
    apply_cost: bool,
}

impl Saveable for TransitMap {
    const SAVE_KEY: &'static str = "transit_map";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if self.stops.is_empty() && self.lines.is_empty() {
            return None;
        }
        let save = TransitMapSave {
            stops: self
                .stops
                .iter()
                .map(|s| StopSave {
                    id: s.id.0,
                    name: s.name.clone(),
                    x: s.position.x,
                    y: s.position.y,
                })
                .collect(),
            lines: self
                .lines
                .iter()
                .map(|l| LineSave {
                    id: l.id.0,
                    name: l.name.clone(),
                    mode: l.mode,
                    color: l.color,
                    stop_ids: l.stop_ids.iter().map(|s| s.0).collect(),
                    sealed: l.sealed,
                })
                .collect(),
            routes: self
                .routes
                .iter()
                .map(|r| RouteSave {
                    id: r.id.0,
                    line_id: r.line_id.0,
                    begin: r.begin.0,
                    end: r.end.0,
                    points: r.points.iter().map(|p| (p.x, p.y)).collect(),
                    forward: r.forward,
                    apply_cost: r.apply_cost,
                })
                .collect(),
        };
        Some(bitcode::encode(&save))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let save: TransitMapSave = crate::decode_or_warn(Self::SAVE_KEY, bytes);
        let mut map = TransitMap::default();
        for stop in save.stops {
            map.stops.push(Stop {
                id: StopId(stop.id),
                name: stop.name,
                position: Vec2::new(stop.x, stop.y),
            });
        }
        for line in save.lines {
            map.lines.push(TransitLine {
                id: LineId(line.id),
                name: line.name,
                mode: line.mode,
                color: line.color,
                stop_ids: line.stop_ids.into_iter().map(StopId).collect(),
                sealed: line.sealed,
            });
        }
        for route in save.routes {
            let points: Vec<Vec2> = route.points.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            let length = points.windows(2).map(|w| (w[1] - w[0]).length()).sum();
            map.routes.push(Route {
                id: RouteId(route.id),
                line_id: LineId(route.line_id),
                begin: StopId(route.begin),
                end: StopId(route.end),
                points,
                length,
                forward: route.forward,
                apply_cost: route.apply_cost,
            });
        }
        map.rebuild_counters();
        map
    }
}
