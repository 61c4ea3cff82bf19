//! Street network: named segments over grid cells, a cell-level routing
//! graph, tram track infrastructure, and procedural generation.
//!
//! ## Data model
//! - `StreetSegment`: a named run of street cells with a world-space centerline
//! - `StreetMap`: top-level resource storing segments, adjacency, and track state
//!
//! Segments are generated as a jittered grid broken at water; crossings share
//! a cell and connect the two streets in the routing graph.

pub mod gen;
pub mod state;
pub mod types;

pub use gen::*;
pub use state::*;
pub use types::*;

use bevy::prelude::*;

use crate::SaveableAppExt;

// =============================================================================
// Plugin
// =============================================================================

pub struct StreetsPlugin;

impl Plugin for StreetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StreetMap>()
            .register_saveable::<StreetMap>();
    }
}
