//! Scripted editing session for the demo binary.
//!
//! Drives the line editor purely through its public event interface, the same
//! path an interactive frontend takes: send one pointer event, run one frame,
//! read the advertised affordance before acting on it. Each demo line is a
//! two-stop loop along one street segment; persisted stops already sitting on
//! the chosen spots are reused instead of duplicated, so re-running against a
//! loaded save extends the network rather than stacking copies.

use bevy::prelude::*;

use transit::config::CELL_SIZE;
use transit::grid::WorldGrid;
use transit::input::{MapTarget, PointerEvent, PointerEventKind};
use transit::line_editor::{
    Affordance, DeselectTransitMode, EditorSession, LineCommitted, SelectTransitMode,
};
use transit::modes::TransitMode;
use transit::streets::{SegmentId, StreetMap};
use transit::transit_map::{LineId, TransitMap};

/// Longest streets make the clearest demo routes. Returns up to `count`
/// distinct segments, longest first, skipping any too short to hold two
/// separated stops.
pub fn pick_demo_segments(streets: &StreetMap, count: usize) -> Vec<SegmentId> {
    let mut segments: Vec<_> = streets
        .segments
        .iter()
        .filter(|s| s.cells.len() >= 4)
        .collect();
    segments.sort_by_key(|s| std::cmp::Reverse(s.cells.len()));
    segments.into_iter().take(count).map(|s| s.id).collect()
}

/// Builds one transit line as a loop over `segment_id`: two stops near the
/// segment ends, closed back onto the first stop. Tram modes lay tracks on
/// the street first. Returns the committed line, or `None` if the editor
/// refused a step.
pub fn build_demo_line(app: &mut App, mode: TransitMode, segment_id: SegmentId) -> Option<LineId> {
    let (street_name, anchors, midpoint) = {
        let streets = app.world().resource::<StreetMap>();
        let segment = streets.segment(segment_id)?;
        if segment.cells.len() < 4 {
            return None;
        }
        let near = segment.cells[1];
        let far = segment.cells[segment.cells.len() - 2];
        (
            segment.name.clone(),
            [
                WorldGrid::cell_center(near.0, near.1),
                WorldGrid::cell_center(far.0, far.1),
            ],
            segment.midpoint(),
        )
    };

    app.world_mut().send_event(SelectTransitMode(mode));
    app.update();

    // Tram modes cannot place stops on bare streets; lay tracks first.
    if mode.required_tracks().is_some() {
        pointer(app, PointerEventKind::Hover, MapTarget::Street(segment_id), midpoint);
        if affordance(app) == Some(Affordance::BuildTramTracks) {
            pointer(app, PointerEventKind::Click, MapTarget::Street(segment_id), midpoint);
            eprintln!("[demo] laid tram tracks along '{street_name}'");
        }
    }

    for anchor in anchors {
        let (target, cursor) = stop_target(app, segment_id, anchor);
        pointer(app, PointerEventKind::Hover, target, cursor);
        match affordance(app) {
            Some(Affordance::CreateStop) | Some(Affordance::AddStop) => {}
            other => {
                eprintln!(
                    "[demo] cannot place a {} stop on '{street_name}' (offered {:?})",
                    mode.display_name(),
                    other.map(|a| a.label())
                );
                deselect(app);
                return None;
            }
        }
        pointer(app, PointerEventKind::Click, target, cursor);
        match target {
            MapTarget::Stop(_) => eprintln!("[demo] reused an existing stop on '{street_name}'"),
            _ => eprintln!("[demo] placed a stop on '{street_name}'"),
        }
    }

    // Close the loop on the first stop. When the draft started from a
    // persisted stop the closing hover goes to that stop, otherwise to the
    // draft marker.
    let first_existing = {
        let session = app.world().resource::<EditorSession>();
        match session.draft.as_ref().and_then(|d| d.stops.first()) {
            Some(first) => first.existing,
            None => {
                eprintln!("[demo] draft disappeared before the loop closed on '{street_name}'");
                deselect(app);
                return None;
            }
        }
    };
    let (target, cursor) = match first_existing {
        Some(id) => {
            let position = app
                .world()
                .resource::<TransitMap>()
                .stop(id)
                .map(|s| s.position)
                .unwrap_or(Vec2::ZERO);
            (MapTarget::Stop(id), position)
        }
        None => (MapTarget::DraftStop(0), Vec2::ZERO),
    };

    pointer(app, PointerEventKind::Hover, target, cursor);
    if affordance(app) != Some(Affordance::FinishLine) {
        eprintln!("[demo] loop on '{street_name}' cannot be closed");
        deselect(app);
        return None;
    }
    pointer(app, PointerEventKind::Click, target, cursor);

    let line = take_committed(app).pop();
    match line.and_then(|id| {
        let transit = app.world().resource::<TransitMap>();
        transit.line(id).map(|l| (id, l.name.clone(), l.stop_ids.len()))
    }) {
        Some((id, line_name, stop_count)) => {
            eprintln!("[demo] committed '{line_name}' ({stop_count} stops on the loop)");
            deselect(app);
            Some(id)
        }
        None => {
            eprintln!("[demo] finish click on '{street_name}' committed nothing");
            deselect(app);
            None
        }
    }
}

/// Reuses a persisted stop near `anchor` when one exists; otherwise the
/// click lands on the street itself.
fn stop_target(app: &App, segment_id: SegmentId, anchor: Vec2) -> (MapTarget, Vec2) {
    let transit = app.world().resource::<TransitMap>();
    let near = transit
        .stops
        .iter()
        .find(|s| (s.position - anchor).length() < CELL_SIZE * 0.75);
    match near {
        Some(stop) => (MapTarget::Stop(stop.id), stop.position),
        None => (MapTarget::Street(segment_id), anchor),
    }
}

fn pointer(app: &mut App, kind: PointerEventKind, target: MapTarget, cursor: Vec2) {
    app.world_mut().send_event(PointerEvent {
        kind,
        target,
        cursor,
    });
    app.update();
}

fn affordance(app: &App) -> Option<Affordance> {
    app.world().resource::<EditorSession>().affordance
}

fn deselect(app: &mut App) {
    app.world_mut().send_event(DeselectTransitMode);
    app.update();
}

fn take_committed(app: &mut App) -> Vec<LineId> {
    app.world_mut()
        .resource_mut::<Events<LineCommitted>>()
        .drain()
        .map(|e| e.line)
        .collect()
}
