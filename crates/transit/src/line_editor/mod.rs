//! Interactive construction of transit lines.
//!
//! Selecting a transit mode arms the editor; hovering streets and stops
//! chooses an affordance and plans the leg a click would add; clicks place
//! draft stops until the line returns to its first stop, which commits the
//! whole loop to the transit map at once.
//!
//! ## Data model
//! - `DraftStop`: a provisional stop, optionally linked to a persistent one
//! - `DraftLine`: the stops placed so far plus the concatenated leg path
//! - `EditorSession`: top-level resource holding the workflow state
//!
//! Legs are planned over the street network; tram modes additionally require
//! tram tracks along the whole leg, and untracked streets offer a
//! build-tracks action instead of a stop.

pub mod state;
pub mod systems;
pub mod types;

pub use state::*;
pub use systems::*;
pub use types::*;

use bevy::prelude::*;

// =============================================================================
// Plugin
// =============================================================================

pub struct LineEditorPlugin;

impl Plugin for LineEditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorSession>()
            .add_event::<SelectTransitMode>()
            .add_event::<DeselectTransitMode>()
            .add_event::<LineCommitted>()
            .add_systems(
                Update,
                (handle_mode_selection, handle_pointer_events).chain(),
            );
    }
}
