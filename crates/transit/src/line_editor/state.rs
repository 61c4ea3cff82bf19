//! Methods on `EditorSession`: mode selection, hover planning, and clicks.

use bevy::prelude::*;

use crate::input::{InputListeners, MapTarget, PointerEventKind};
use crate::modes::TransitMode;
use crate::planner::{find_drive, PlannedPath, PlannerOptions};
use crate::snap::{SnapController, SnapKind};
use crate::streets::{SegmentId, StreetMap};
use crate::transit_map::{LineId, StopId, TransitMap};

use super::types::*;

/// The line construction workflow. One session exists for the whole app;
/// selecting a transit mode arms it and pointer events drive it.
#[derive(Resource, Debug, Default)]
pub struct EditorSession {
    pub mode: EditingMode,
    /// Transit mode currently being edited.
    pub selected: Option<TransitMode>,
    /// Line under construction.
    pub draft: Option<DraftLine>,
    /// Action offered by the latest hover target, shown as a tooltip.
    pub affordance: Option<Affordance>,
    /// Leg planned by the latest hover, consumed by the click that takes it.
    pub planned: Option<PlannedPath>,
    /// Preview overlays, created on first use.
    pub preview: Option<PathPreview>,
    /// Snap profiles, registered on first mode selection.
    pub snaps: Option<EditorSnaps>,
    /// Pointer listeners, registered on first mode selection.
    pub listeners: Option<EditorListeners>,
}

// =============================================================================
// Mode selection
// =============================================================================

impl EditorSession {
    /// Select a transit mode and arm the editor. The first selection registers
    /// the snap profiles and pointer listeners; later selections reuse them.
    /// Violation while a line is being drawn.
    pub fn select_mode(
        &mut self,
        mode: TransitMode,
        snaps: &mut SnapController,
        listeners: &mut InputListeners,
    ) {
        if self.mode == EditingMode::ExtendingLine {
            warn!("Cannot switch transit mode while a line is being drawn");
            debug_assert!(false, "mode switch while extending a line");
            return;
        }

        let previous = self.selected;
        self.ensure_wiring(snaps, listeners);

        if let Some(wiring) = &self.snaps {
            if let Some(old_mode) = previous {
                if old_mode != mode {
                    if let Some(id) = wiring.street_snap(old_mode) {
                        snaps.disable(id);
                    }
                }
            }
            if let Some(id) = wiring.street_snap(mode) {
                snaps.enable(id);
            }
        }
        if let Some(ids) = self.listeners {
            listeners.enable(ids.hover);
            listeners.enable(ids.hover_exit);
            listeners.enable(ids.click);
        }

        self.selected = Some(mode);
        self.affordance = None;
        self.planned = None;
        self.mode = EditingMode::AwaitingFirstStop;
    }

    /// Leave editing mode, discarding any draft. Violation when no mode is
    /// selected.
    pub fn deselect_mode(&mut self, snaps: &mut SnapController, listeners: &mut InputListeners) {
        let Some(mode) = self.selected else {
            warn!("Deselect with no transit mode selected");
            debug_assert!(false, "deselect with no mode selected");
            return;
        };

        if let Some(wiring) = &self.snaps {
            if let Some(id) = wiring.street_snap(mode) {
                snaps.disable(id);
            }
            snaps.disable(wiring.stops);
            snaps.disable(wiring.draft_stops);
        }
        if let Some(ids) = self.listeners {
            listeners.disable(ids.hover);
            listeners.disable(ids.hover_exit);
            listeners.disable(ids.click);
        }

        self.selected = None;
        self.draft = None;
        self.affordance = None;
        self.planned = None;
        self.hide_committed();
        self.hide_proposed();
        self.mode = EditingMode::Idle;
    }

    /// Register snap profiles and pointer listeners once. Snap profiles start
    /// enabled on registration, so each one is disabled right after.
    fn ensure_wiring(&mut self, snaps: &mut SnapController, listeners: &mut InputListeners) {
        if self.snaps.is_none() {
            let street = TransitMode::ALL
                .iter()
                .map(|&mode| {
                    let id = snaps.add_snap(SnapKind::Street {
                        color: mode.default_color(),
                        cursor_scale: STREET_SNAP_CURSOR_SCALE,
                        snap_to_end: false,
                        snap_to_lane: mode.snap_to_lane(),
                        snap_to_rivers: mode.snap_to_rivers(),
                    });
                    snaps.disable(id);
                    (mode, id)
                })
                .collect();
            let stops = snaps.add_snap(SnapKind::Stop);
            snaps.disable(stops);
            let draft_stops = snaps.add_snap(SnapKind::DraftStop);
            snaps.disable(draft_stops);
            self.snaps = Some(EditorSnaps {
                street,
                stops,
                draft_stops,
            });
        }
        if self.listeners.is_none() {
            self.listeners = Some(EditorListeners {
                hover: listeners.register(PointerEventKind::Hover),
                hover_exit: listeners.register(PointerEventKind::HoverExit),
                click: listeners.register(PointerEventKind::Click),
            });
        }
    }
}

// =============================================================================
// Hover
// =============================================================================

impl EditorSession {
    /// React to the pointer moving over a map target: choose the affordance
    /// and, while a line is being drawn, plan the leg the next click would
    /// add.
    pub fn hover(
        &mut self,
        target: MapTarget,
        cursor: Vec2,
        streets: &StreetMap,
        transit: &TransitMap,
        snaps: &mut SnapController,
    ) {
        match target {
            MapTarget::Street(segment) => self.street_hovered(segment, cursor, streets, snaps),
            MapTarget::Stop(stop) => self.stop_hovered(stop, streets, transit, snaps),
            MapTarget::DraftStop(index) => self.draft_stop_hovered(index, streets, snaps),
        }
    }

    /// React to the pointer leaving a map target: drop the proposed leg and
    /// any loop-closing snap.
    pub fn hover_exit(&mut self, target: MapTarget, snaps: &mut SnapController) {
        if self.selected.is_none() {
            warn!("Pointer event with no transit mode selected");
            debug_assert!(false, "pointer event with no mode selected");
            return;
        }

        match target {
            MapTarget::Street(_) => {
                self.affordance = None;
            }
            MapTarget::Stop(_) => {
                if let Some(wiring) = &self.snaps {
                    snaps.disable(wiring.stops);
                }
                self.reset_stop_exit_affordance();
            }
            MapTarget::DraftStop(_) => {
                if let Some(wiring) = &self.snaps {
                    snaps.disable(wiring.draft_stops);
                }
                self.reset_stop_exit_affordance();
            }
        }
        self.planned = None;
        self.hide_proposed();
    }

    fn reset_stop_exit_affordance(&mut self) {
        self.affordance = if self.draft.is_some() {
            Some(Affordance::AddStop)
        } else {
            None
        };
    }

    fn street_hovered(
        &mut self,
        segment_id: SegmentId,
        cursor: Vec2,
        streets: &StreetMap,
        snaps: &mut SnapController,
    ) {
        let Some(mode) = self.selected else {
            warn!("Pointer event with no transit mode selected");
            debug_assert!(false, "pointer event with no mode selected");
            return;
        };
        if !mode.is_interactive() {
            self.affordance = None;
            return;
        }

        // Tram lines need their tracks in place before stops can go down.
        if mode.required_tracks().is_some() && !streets.has_tram_tracks(segment_id) {
            self.affordance = Some(Affordance::BuildTramTracks);
            self.planned = None;
            self.hide_proposed();
            return;
        }

        let origin = self
            .draft
            .as_ref()
            .and_then(|d| d.stops.last())
            .map(|s| s.position);
        let Some(origin) = origin else {
            self.affordance = Some(Affordance::CreateStop);
            return;
        };

        let goal = self.street_cursor(mode, segment_id, cursor, streets, snaps);
        self.propose_leg(mode, origin, goal, Affordance::AddStop, streets);
    }

    fn stop_hovered(
        &mut self,
        stop_id: StopId,
        streets: &StreetMap,
        transit: &TransitMap,
        snaps: &mut SnapController,
    ) {
        let Some(mode) = self.selected else {
            warn!("Pointer event with no transit mode selected");
            debug_assert!(false, "pointer event with no mode selected");
            return;
        };
        let Some(stop) = transit.stop(stop_id) else {
            warn!("Hover over unknown stop {:?}", stop_id);
            debug_assert!(false, "hover over unknown stop");
            return;
        };
        let goal = stop.position;

        let Some(draft) = &self.draft else {
            // Starting from an existing stop reuses it as the first stop.
            self.affordance = Some(Affordance::CreateStop);
            return;
        };
        let Some(origin) = draft.stops.last().map(|s| s.position) else {
            self.affordance = Some(Affordance::CreateStop);
            return;
        };

        let closes_loop = draft.stops.len() >= MIN_DRAFT_STOPS
            && draft.stops.first().and_then(|s| s.existing) == Some(stop_id);
        if closes_loop {
            self.propose_leg(mode, origin, goal, Affordance::FinishLine, streets);
            if self.affordance == Some(Affordance::FinishLine) {
                if let Some(wiring) = &self.snaps {
                    snaps.enable(wiring.stops);
                }
            }
        } else {
            self.propose_leg(mode, origin, goal, Affordance::AddStop, streets);
        }
    }

    fn draft_stop_hovered(&mut self, index: usize, streets: &StreetMap, snaps: &mut SnapController) {
        let Some(mode) = self.selected else {
            warn!("Pointer event with no transit mode selected");
            debug_assert!(false, "pointer event with no mode selected");
            return;
        };
        let Some(draft) = &self.draft else {
            warn!("Hover over a draft stop with no line being drawn");
            debug_assert!(false, "draft stop hover with no draft");
            return;
        };
        let Some(target) = draft.stops.get(index) else {
            warn!("Hover over unknown draft stop {index}");
            debug_assert!(false, "hover over unknown draft stop");
            return;
        };
        let goal = target.position;
        let origin = draft.stops[draft.stops.len() - 1].position;

        let closes_loop = index == 0 && draft.stops.len() >= MIN_DRAFT_STOPS;
        if closes_loop {
            self.propose_leg(mode, origin, goal, Affordance::FinishLine, streets);
            if self.affordance == Some(Affordance::FinishLine) {
                if let Some(wiring) = &self.snaps {
                    snaps.enable(wiring.draft_stops);
                }
            }
        } else {
            self.propose_leg(mode, origin, goal, Affordance::AddStop, streets);
        }
    }

    /// Plan a leg from the last placed stop to `goal`. On success the leg is
    /// held for the next click and `success` becomes the affordance; on
    /// failure the target cannot take a stop.
    fn propose_leg(
        &mut self,
        mode: TransitMode,
        origin: Vec2,
        goal: Vec2,
        success: Affordance,
        streets: &StreetMap,
    ) {
        let options = PlannerOptions {
            allow_walk: false,
            required_tracks: mode.required_tracks(),
        };
        match find_drive(streets, origin, goal, options) {
            Some(path) => {
                self.show_proposed(path.points.clone());
                self.planned = Some(path);
                self.affordance = Some(success);
            }
            None => {
                self.planned = None;
                self.hide_proposed();
                self.affordance = Some(Affordance::CannotAddStop);
            }
        }
    }

    /// Cursor position after the selected mode's street snap is applied.
    fn street_cursor(
        &self,
        mode: TransitMode,
        segment_id: SegmentId,
        cursor: Vec2,
        streets: &StreetMap,
        snaps: &SnapController,
    ) -> Vec2 {
        let Some(wiring) = &self.snaps else {
            return cursor;
        };
        let Some(snap) = wiring.street_snap(mode) else {
            return cursor;
        };
        let Some(segment) = streets.segment(segment_id) else {
            return cursor;
        };
        snaps.snapped_cursor(snap, &segment.points, cursor)
    }
}

// =============================================================================
// Clicks and line commit
// =============================================================================

impl EditorSession {
    /// React to a click on a map target. The affordance chosen by the latest
    /// hover decides the action; a click with no affordance is ignored.
    /// Returns the new line ID when the click finished a line.
    pub fn click(
        &mut self,
        target: MapTarget,
        cursor: Vec2,
        streets: &mut StreetMap,
        transit: &mut TransitMap,
        snaps: &mut SnapController,
    ) -> Option<LineId> {
        let Some(mode) = self.selected else {
            warn!("Pointer event with no transit mode selected");
            debug_assert!(false, "pointer event with no mode selected");
            return None;
        };
        let Some(affordance) = self.affordance else {
            return None;
        };

        match (affordance, target) {
            (Affordance::BuildTramTracks, MapTarget::Street(segment)) => {
                streets.add_tram_tracks(segment);
                None
            }
            (Affordance::CreateStop, MapTarget::Street(segment)) => {
                let position = self.street_cursor(mode, segment, cursor, streets, snaps);
                let Some(segment) = streets.segment(segment) else {
                    warn!("Click on unknown street segment {:?}", segment);
                    debug_assert!(false, "click on unknown street segment");
                    return None;
                };
                let first = DraftStop {
                    name: segment.name.clone(),
                    position,
                    existing: None,
                };
                self.begin_line(mode, transit, first);
                None
            }
            (Affordance::CreateStop, MapTarget::Stop(stop_id)) => {
                let Some(stop) = transit.stop(stop_id) else {
                    warn!("Click on unknown stop {:?}", stop_id);
                    debug_assert!(false, "click on unknown stop");
                    return None;
                };
                let first = DraftStop {
                    name: stop.name.clone(),
                    position: stop.position,
                    existing: Some(stop_id),
                };
                self.begin_line(mode, transit, first);
                None
            }
            (Affordance::AddStop, MapTarget::Street(segment)) => {
                // The plan is gone when the click lands between hovers.
                let Some(path) = self.planned.take() else {
                    return None;
                };
                let position = self.street_cursor(mode, segment, cursor, streets, snaps);
                let Some(segment) = streets.segment(segment) else {
                    warn!("Click on unknown street segment {:?}", segment);
                    debug_assert!(false, "click on unknown street segment");
                    return None;
                };
                let next = DraftStop {
                    name: segment.name.clone(),
                    position,
                    existing: None,
                };
                self.extend_line(next, &path);
                None
            }
            (Affordance::AddStop, MapTarget::Stop(stop_id)) => {
                let Some(path) = self.planned.take() else {
                    warn!("Add stop click without a planned leg");
                    debug_assert!(false, "add stop click without a planned leg");
                    return None;
                };
                let Some(stop) = transit.stop(stop_id) else {
                    warn!("Click on unknown stop {:?}", stop_id);
                    debug_assert!(false, "click on unknown stop");
                    return None;
                };
                let next = DraftStop {
                    name: stop.name.clone(),
                    position: stop.position,
                    existing: Some(stop_id),
                };
                self.extend_line(next, &path);
                None
            }
            (Affordance::AddStop, MapTarget::DraftStop(index)) => {
                let Some(path) = self.planned.take() else {
                    warn!("Add stop click without a planned leg");
                    debug_assert!(false, "add stop click without a planned leg");
                    return None;
                };
                let Some(draft) = &self.draft else {
                    warn!("Draft stop click with no line being drawn");
                    debug_assert!(false, "draft stop click with no draft");
                    return None;
                };
                let Some(stop) = draft.stops.get(index).cloned() else {
                    warn!("Click on unknown draft stop {index}");
                    debug_assert!(false, "click on unknown draft stop");
                    return None;
                };
                self.extend_line(stop, &path);
                None
            }
            (Affordance::FinishLine, MapTarget::DraftStop(0)) => self.commit(transit, snaps),
            (Affordance::FinishLine, MapTarget::Stop(stop_id)) => {
                let first = self
                    .draft
                    .as_ref()
                    .and_then(|d| d.stops.first())
                    .and_then(|s| s.existing);
                if first == Some(stop_id) {
                    self.commit(transit, snaps)
                } else {
                    warn!("Finish click on a stop the line did not start from");
                    debug_assert!(false, "finish click on a non-first stop");
                    None
                }
            }
            (Affordance::CannotAddStop, _) => None,
            (affordance, target) => {
                warn!("Click on {target:?} does not match the offered {affordance:?}");
                debug_assert!(false, "click target does not match the affordance");
                None
            }
        }
    }

    fn begin_line(&mut self, mode: TransitMode, transit: &TransitMap, first: DraftStop) {
        let count = transit.lines.iter().filter(|l| l.mode == mode).count();
        let mut draft = DraftLine::new(mode, mode.default_line_name(count));
        draft.push_stop(first, &[]);
        self.draft = Some(draft);
        self.mode = EditingMode::ExtendingLine;
    }

    fn extend_line(&mut self, stop: DraftStop, path: &PlannedPath) {
        let Some(draft) = &mut self.draft else {
            warn!("Add stop click with no line being drawn");
            debug_assert!(false, "add stop with no draft");
            return;
        };
        draft.push_stop(stop, &path.points);
        let committed = draft.complete_path.clone();
        self.show_committed(committed);
    }

    /// Turn the draft into a persistent line: the first stop is appended
    /// again with the planned closing leg, every draft stop becomes (or
    /// reuses) a persistent stop, legs are recorded in order, and the line is
    /// sealed.
    fn commit(&mut self, transit: &mut TransitMap, snaps: &mut SnapController) -> Option<LineId> {
        let Some(mut draft) = self.draft.take() else {
            warn!("Finish click with no line being drawn");
            debug_assert!(false, "finish with no draft");
            return None;
        };
        let Some(closing) = self.planned.take() else {
            warn!("Finish click without a planned closing leg");
            debug_assert!(false, "finish without a planned closing leg");
            return None;
        };
        let Some(first) = draft.stops.first().cloned() else {
            warn!("Finish click on an empty draft");
            debug_assert!(false, "finish on an empty draft");
            return None;
        };
        draft.push_stop(first, &closing.points);

        let line_id = transit.create_line(draft.mode, &draft.name, draft.mode.default_color());

        let first_id = resolve_stop(transit, &draft.stops[0]);
        transit.add_stop_to_line(line_id, first_id, true, false, None);
        for i in 1..draft.stops.len() {
            let stop_id = if i == draft.stops.len() - 1 {
                first_id
            } else {
                resolve_stop(transit, &draft.stops[i])
            };
            transit.add_stop_to_line(line_id, stop_id, true, false, Some(draft.leg(i - 1)));
        }
        transit.seal_line(line_id);

        self.affordance = None;
        self.hide_committed();
        self.hide_proposed();
        if let Some(wiring) = &self.snaps {
            snaps.disable(wiring.stops);
            snaps.disable(wiring.draft_stops);
        }
        self.mode = EditingMode::AwaitingFirstStop;

        info!(
            "Created line '{}' with {} stops",
            draft.name,
            draft.stops.len() - 1
        );
        Some(line_id)
    }
}

/// Reuse the persistent stop a draft stop is linked to, or create a new one.
fn resolve_stop(transit: &mut TransitMap, stop: &DraftStop) -> StopId {
    match stop.existing {
        Some(id) => id,
        None => transit.create_stop(&stop.name, stop.position),
    }
}

// =============================================================================
// Preview overlays
// =============================================================================

impl EditorSession {
    fn show_proposed(&mut self, points: Vec<Vec2>) {
        let preview = self.preview.get_or_insert_with(PathPreview::default);
        preview.proposed = points;
        preview.proposed_visible = true;
    }

    fn hide_proposed(&mut self) {
        if let Some(preview) = &mut self.preview {
            preview.proposed_visible = false;
        }
    }

    fn show_committed(&mut self, points: Vec<Vec2>) {
        let preview = self.preview.get_or_insert_with(PathPreview::default);
        preview.committed = points;
        preview.committed_visible = true;
    }

    fn hide_committed(&mut self) {
        if let Some(preview) = &mut self.preview {
            preview.committed_visible = false;
        }
    }
}
