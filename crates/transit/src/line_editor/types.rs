//! Data types and constants for the line editor.

use bevy::prelude::*;

use crate::input::ListenerId;
use crate::modes::TransitMode;
use crate::snap::SnapId;
use crate::transit_map::StopId;

// =============================================================================
// Constants
// =============================================================================

/// Minimum draft stops before a line can close its loop.
pub const MIN_DRAFT_STOPS: usize = 2;

/// Cursor scale shared by all street snap profiles.
pub const STREET_SNAP_CURSOR_SCALE: f32 = 0.3;

// =============================================================================
// Data structures
// =============================================================================

/// Editor workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditingMode {
    /// No mode selected; pointer events are ignored.
    #[default]
    Idle,
    /// A mode is selected; the next street click starts a line.
    AwaitingFirstStop,
    /// A draft line exists; clicks extend it until the loop closes.
    ExtendingLine,
}

/// The action the current hover target supports, surfaced as a tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    CreateStop,
    AddStop,
    CannotAddStop,
    BuildTramTracks,
    FinishLine,
}

impl Affordance {
    pub fn label(self) -> &'static str {
        match self {
            Affordance::CreateStop => "Create Line",
            Affordance::AddStop => "Add Stop",
            Affordance::CannotAddStop => "Cannot add stop here",
            Affordance::BuildTramTracks => "Build Tram Tracks",
            Affordance::FinishLine => "Finish Line",
        }
    }
}

/// A provisional stop of the line being drawn.
#[derive(Debug, Clone)]
pub struct DraftStop {
    pub name: String,
    pub position: Vec2,
    /// Set when the draft references an already-persisted stop.
    pub existing: Option<StopId>,
}

/// The line being drawn: stops, the flattened path, and its cut indices.
#[derive(Debug, Clone)]
pub struct DraftLine {
    pub name: String,
    pub mode: TransitMode,
    pub stops: Vec<DraftStop>,
    /// All leg polylines concatenated in draw order.
    pub complete_path: Vec<Vec2>,
    /// End offset of each leg within `complete_path`.
    /// Invariant: `cuts.len() == stops.len() - 1` once a stop exists.
    pub cuts: Vec<usize>,
}

impl DraftLine {
    pub fn new(mode: TransitMode, name: String) -> Self {
        Self {
            name,
            mode,
            stops: Vec::new(),
            complete_path: Vec::new(),
            cuts: Vec::new(),
        }
    }

    /// Append a stop. Every stop after the first extends the complete path
    /// with its leg and records a cut at the new end.
    pub fn push_stop(&mut self, stop: DraftStop, leg: &[Vec2]) {
        let first = self.stops.is_empty();
        self.stops.push(stop);
        if !first {
            self.complete_path.extend_from_slice(leg);
            self.cuts.push(self.complete_path.len());
        }
    }

    /// The leg ending at stop `index + 1`: the slice of the complete path
    /// between consecutive cuts, applied as a sliding window.
    pub fn leg(&self, index: usize) -> &[Vec2] {
        let start = if index == 0 { 0 } else { self.cuts[index - 1] };
        &self.complete_path[start..self.cuts[index]]
    }

    pub fn leg_count(&self) -> usize {
        self.cuts.len()
    }
}

/// Preview overlays, created lazily once per session and toggled.
#[derive(Debug, Clone, Default)]
pub struct PathPreview {
    /// Concatenated legs of the draft so far.
    pub committed: Vec<Vec2>,
    pub committed_visible: bool,
    /// Path proposed by the current hover.
    pub proposed: Vec<Vec2>,
    pub proposed_visible: bool,
}

/// Snap profiles registered once per session.
#[derive(Debug, Clone)]
pub struct EditorSnaps {
    /// One street profile per transit mode, in `TransitMode::ALL` order.
    pub street: Vec<(TransitMode, SnapId)>,
    pub stops: SnapId,
    pub draft_stops: SnapId,
}

impl EditorSnaps {
    pub fn street_snap(&self, mode: TransitMode) -> Option<SnapId> {
        self.street
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, id)| *id)
    }
}

/// Pointer listeners registered once per session.
#[derive(Debug, Clone, Copy)]
pub struct EditorListeners {
    pub hover: ListenerId,
    pub hover_exit: ListenerId,
    pub click: ListenerId,
}
