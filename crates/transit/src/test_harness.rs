//! # TestTown: headless integration test harness
//!
//! Provides a builder that wraps `bevy::app::App` + `TransitPlugin` for
//! driving the line editor through events without a window or renderer.

use std::collections::BTreeMap;

use bevy::app::App;
use bevy::prelude::*;

use crate::grid::WorldGrid;
use crate::input::{MapTarget, PointerEvent, PointerEventKind};
use crate::line_editor::{
    Affordance, DeselectTransitMode, EditorSession, LineCommitted, SelectTransitMode,
};
use crate::modes::TransitMode;
use crate::snap::SnapController;
use crate::streets::{SegmentId, StreetMap};
use crate::transit_map::{LineId, StopId, TransitMap};
use crate::world_init::{MapSeed, SkipWorldInit};
use crate::{SaveableRegistry, TransitPlugin};

/// World-space center of a grid cell.
pub fn cell_center(x: usize, y: usize) -> Vec2 {
    WorldGrid::cell_center(x, y)
}

/// A headless Bevy App wrapping `TransitPlugin` for integration testing.
///
/// Use builder methods to lay out streets, then drive the editor by sending
/// the same events a UI would and assert on the resulting resources.
pub struct TestTown {
    app: App,
}

impl TestTown {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create an empty town: a blank grass grid with no streets.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Insert the marker BEFORE TransitPlugin so init_world skips.
        app.insert_resource(SkipWorldInit);
        app.add_plugins(TransitPlugin);

        // One update runs Startup; with the marker set, init_world backs off.
        app.update();

        Self { app }
    }

    /// Create a town with the full procedurally generated map.
    pub fn generated(seed: u64) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(MapSeed(seed));
        app.add_plugins(TransitPlugin);
        // One update runs Startup, generating terrain and streets.
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // World setup (builder pattern, consumes and returns Self)
    // -----------------------------------------------------------------------

    /// Place a horizontal street at row `y` spanning `x0..=x1`.
    pub fn with_street_h(mut self, name: &str, y: usize, x0: usize, x1: usize) -> Self {
        let cells: Vec<(usize, usize)> = (x0..=x1).map(|x| (x, y)).collect();
        self.add_street(name, cells);
        self
    }

    /// Place a vertical street at column `x` spanning `y0..=y1`.
    pub fn with_street_v(mut self, name: &str, x: usize, y0: usize, y1: usize) -> Self {
        let cells: Vec<(usize, usize)> = (y0..=y1).map(|y| (x, y)).collect();
        self.add_street(name, cells);
        self
    }

    /// Lay tram tracks along the named street.
    pub fn with_tram_tracks(mut self, name: &str) -> Self {
        let id = self.street(name);
        if let Some(mut streets) = self.app.world_mut().get_resource_mut::<StreetMap>() {
            streets.add_tram_tracks(id);
        }
        self
    }

    fn add_street(&mut self, name: &str, cells: Vec<(usize, usize)>) {
        let world = self.app.world_mut();
        world.resource_scope(|world, mut streets: Mut<StreetMap>| {
            let mut grid = world.resource_mut::<WorldGrid>();
            if streets.add_segment(&mut grid, name, cells).is_none() {
                panic!("street '{name}' could not be placed");
            }
        });
    }

    // -----------------------------------------------------------------------
    // Editor drivers (each sends one event and runs one update)
    // -----------------------------------------------------------------------

    pub fn select_mode(&mut self, mode: TransitMode) {
        self.app.world_mut().send_event(SelectTransitMode(mode));
        self.app.update();
    }

    pub fn deselect_mode(&mut self) {
        self.app.world_mut().send_event(DeselectTransitMode);
        self.app.update();
    }

    pub fn hover_street(&mut self, segment: SegmentId, x: usize, y: usize) {
        self.pointer(
            PointerEventKind::Hover,
            MapTarget::Street(segment),
            cell_center(x, y),
        );
    }

    pub fn hover_exit_street(&mut self, segment: SegmentId) {
        self.pointer(
            PointerEventKind::HoverExit,
            MapTarget::Street(segment),
            Vec2::ZERO,
        );
    }

    pub fn click_street(&mut self, segment: SegmentId, x: usize, y: usize) {
        self.pointer(
            PointerEventKind::Click,
            MapTarget::Street(segment),
            cell_center(x, y),
        );
    }

    /// Hover a street with a raw cursor position, off the cell centers.
    pub fn hover_street_at(&mut self, segment: SegmentId, cursor: Vec2) {
        self.pointer(PointerEventKind::Hover, MapTarget::Street(segment), cursor);
    }

    /// Click a street with a raw cursor position.
    pub fn click_street_at(&mut self, segment: SegmentId, cursor: Vec2) {
        self.pointer(PointerEventKind::Click, MapTarget::Street(segment), cursor);
    }

    /// Hover then click a street cell, like a real pointer would.
    pub fn place_stop(&mut self, segment: SegmentId, x: usize, y: usize) {
        self.hover_street(segment, x, y);
        self.click_street(segment, x, y);
    }

    pub fn hover_stop(&mut self, stop: StopId) {
        let cursor = self.stop_position(stop);
        self.pointer(PointerEventKind::Hover, MapTarget::Stop(stop), cursor);
    }

    pub fn click_stop(&mut self, stop: StopId) {
        let cursor = self.stop_position(stop);
        self.pointer(PointerEventKind::Click, MapTarget::Stop(stop), cursor);
    }

    pub fn hover_draft_stop(&mut self, index: usize) {
        self.pointer(PointerEventKind::Hover, MapTarget::DraftStop(index), Vec2::ZERO);
    }

    pub fn click_draft_stop(&mut self, index: usize) {
        self.pointer(PointerEventKind::Click, MapTarget::DraftStop(index), Vec2::ZERO);
    }

    /// Close the loop on the first draft stop and return the committed line.
    pub fn finish_line(&mut self) -> LineId {
        self.hover_draft_stop(0);
        self.click_draft_stop(0);
        match self.take_committed().pop() {
            Some(line) => line,
            None => panic!("no line was committed"),
        }
    }

    /// Drain all `LineCommitted` events fired since the last call.
    pub fn take_committed(&mut self) -> Vec<LineId> {
        let mut events = self
            .app
            .world_mut()
            .resource_mut::<Events<LineCommitted>>();
        events.drain().map(|e| e.line).collect()
    }

    fn pointer(&mut self, kind: PointerEventKind, target: MapTarget, cursor: Vec2) {
        self.app.world_mut().send_event(PointerEvent {
            kind,
            target,
            cursor,
        });
        self.app.update();
    }

    // -----------------------------------------------------------------------
    // Save/load
    // -----------------------------------------------------------------------

    /// Extension map holding every resource that opted into the save.
    pub fn save_extensions(&mut self) -> BTreeMap<String, Vec<u8>> {
        let world = self.app.world_mut();
        world.resource_scope(|world, registry: Mut<SaveableRegistry>| registry.save_all(world))
    }

    /// Load an extension map back into the world.
    pub fn load_extensions(&mut self, extensions: &BTreeMap<String, Vec<u8>>) {
        let world = self.app.world_mut();
        world.resource_scope(|world, registry: Mut<SaveableRegistry>| {
            registry.load_all(world, extensions);
        });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Mutable world access for direct resource manipulation.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn grid(&self) -> &WorldGrid {
        self.app.world().resource::<WorldGrid>()
    }

    pub fn streets(&self) -> &StreetMap {
        self.app.world().resource::<StreetMap>()
    }

    pub fn transit_map(&self) -> &TransitMap {
        self.app.world().resource::<TransitMap>()
    }

    pub fn session(&self) -> &EditorSession {
        self.app.world().resource::<EditorSession>()
    }

    pub fn snaps(&self) -> &SnapController {
        self.app.world().resource::<SnapController>()
    }

    /// ID of the first street segment with the given name.
    pub fn street(&self, name: &str) -> SegmentId {
        match self.streets().segments.iter().find(|s| s.name == name) {
            Some(segment) => segment.id,
            None => panic!("no street named '{name}'"),
        }
    }

    pub fn stop_position(&self, stop: StopId) -> Vec2 {
        match self.transit_map().stop(stop) {
            Some(stop) => stop.position,
            None => panic!("no stop {stop:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert the transit map holds exactly this many lines and stops.
    pub fn assert_network_size(&self, lines: usize, stops: usize) {
        let map = self.transit_map();
        assert_eq!(
            map.lines.len(),
            lines,
            "expected {lines} lines, got {}",
            map.lines.len()
        );
        assert_eq!(
            map.stops.len(),
            stops,
            "expected {stops} stops, got {}",
            map.stops.len()
        );
    }

    /// Assert the editor currently offers the given affordance.
    pub fn assert_affordance(&self, expected: Affordance) {
        let got = self.session().affordance;
        assert_eq!(
            got,
            Some(expected),
            "expected affordance {expected:?}, got {got:?}"
        );
    }
}
