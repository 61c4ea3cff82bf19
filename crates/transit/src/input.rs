//! Pointer event plumbing and per-listener enable state.
//!
//! Pointer events carry a world-space cursor position and the map object
//! under the cursor. Consumers register listeners per event kind; listeners
//! start disabled and are switched on only while their owner is active, so
//! an inactive editor never sees events.

use bevy::prelude::*;

use crate::streets::SegmentId;
use crate::transit_map::StopId;

/// The map object under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapTarget {
    Street(SegmentId),
    /// Index into the current draft line's stop list.
    DraftStop(usize),
    Stop(StopId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Enter,
    Hover,
    HoverExit,
    Click,
}

/// A pointer interaction with a map object.
#[derive(Event, Debug, Clone, Copy)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: MapTarget,
    /// World-space cursor position at the time of the event.
    pub cursor: Vec2,
}

/// Opaque handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

struct ListenerEntry {
    id: ListenerId,
    kind: PointerEventKind,
    enabled: bool,
}

/// Registered pointer listeners and their enable state.
#[derive(Resource, Default)]
pub struct InputListeners {
    entries: Vec<ListenerEntry>,
    next_id: u32,
}

impl InputListeners {
    /// Register a listener for one event kind. Listeners start disabled.
    pub fn register(&mut self, kind: PointerEventKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(ListenerEntry {
            id,
            kind,
            enabled: false,
        });
        id
    }

    pub fn enable(&mut self, id: ListenerId) {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            warn!("InputListeners: unknown listener {:?}", id);
            debug_assert!(false, "InputListeners: unknown listener {:?}", id);
            return;
        };
        entry.enabled = true;
    }

    pub fn disable(&mut self, id: ListenerId) {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            warn!("InputListeners: unknown listener {:?}", id);
            debug_assert!(false, "InputListeners: unknown listener {:?}", id);
            return;
        };
        entry.enabled = false;
    }

    pub fn is_enabled(&self, id: ListenerId) -> bool {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .is_some_and(|e| e.enabled)
    }

    /// True when any enabled listener wants this event kind.
    pub fn enabled_for(&self, kind: PointerEventKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind && e.enabled)
    }
}
