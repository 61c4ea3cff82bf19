//! The committed transit network.
//!
//! ## Data model
//! - `Stop`: a named boarding point, shared between lines
//! - `TransitLine`: an ordered loop of stops with a mode and color
//! - `Route`: one leg of a line, holding the polyline between two stops
//! - `TransitMap`: top-level resource storing all of the above
//!
//! The line editor only ever creates whole lines: stops and routes are
//! appended during commit, then the line is sealed against further edits.

pub mod state;
pub mod types;

pub use state::*;
pub use types::*;

use bevy::prelude::*;

use crate::SaveableAppExt;

// =============================================================================
// Plugin
// =============================================================================

pub struct TransitMapPlugin;

impl Plugin for TransitMapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TransitMap>()
            .register_saveable::<TransitMap>();
    }
}
