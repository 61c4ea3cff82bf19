//! Bevy events and systems wiring pointer input into the editor session.

use bevy::prelude::*;

use crate::input::{InputListeners, PointerEvent, PointerEventKind};
use crate::modes::TransitMode;
use crate::snap::SnapController;
use crate::streets::StreetMap;
use crate::transit_map::{LineId, TransitMap};

use super::state::EditorSession;

/// Request to start editing lines of a transit mode.
#[derive(Event, Debug, Clone, Copy)]
pub struct SelectTransitMode(pub TransitMode);

/// Request to leave line editing.
#[derive(Event, Debug, Clone, Copy)]
pub struct DeselectTransitMode;

/// Fired after a click committed a finished line to the transit map.
#[derive(Event, Debug, Clone, Copy)]
pub struct LineCommitted {
    pub line: LineId,
}

pub fn handle_mode_selection(
    mut selects: EventReader<SelectTransitMode>,
    mut deselects: EventReader<DeselectTransitMode>,
    mut session: ResMut<EditorSession>,
    mut snaps: ResMut<SnapController>,
    mut listeners: ResMut<InputListeners>,
) {
    for select in selects.read() {
        session.select_mode(select.0, &mut snaps, &mut listeners);
    }
    for _ in deselects.read() {
        session.deselect_mode(&mut snaps, &mut listeners);
    }
}

/// Dispatch pointer events to the session. Events of a kind no enabled
/// listener subscribes to are dropped, so the editor only sees input while a
/// mode is selected.
pub fn handle_pointer_events(
    mut events: EventReader<PointerEvent>,
    mut session: ResMut<EditorSession>,
    mut streets: ResMut<StreetMap>,
    mut transit: ResMut<TransitMap>,
    mut snaps: ResMut<SnapController>,
    listeners: Res<InputListeners>,
    mut committed: EventWriter<LineCommitted>,
) {
    for event in events.read() {
        if !listeners.enabled_for(event.kind) {
            continue;
        }
        match event.kind {
            PointerEventKind::Enter => {}
            PointerEventKind::Hover => {
                session.hover(event.target, event.cursor, &streets, &transit, &mut snaps);
            }
            PointerEventKind::HoverExit => {
                session.hover_exit(event.target, &mut snaps);
            }
            PointerEventKind::Click => {
                let line = session.click(
                    event.target,
                    event.cursor,
                    &mut streets,
                    &mut transit,
                    &mut snaps,
                );
                if let Some(line) = line {
                    committed.send(LineCommitted { line });
                }
            }
        }
    }
}
