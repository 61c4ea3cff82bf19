//! Data types for the committed transit network.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::modes::TransitMode;

/// Unique identifier for a transit stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct StopId(pub u32);

/// Unique identifier for a transit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct LineId(pub u32);

/// Unique identifier for one leg of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct RouteId(pub u32);

/// A named boarding point. Stops are shared: several lines may serve one stop.
#[derive(Debug, Clone)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub position: Vec2,
}

/// A committed transit line. Sealed lines form a closed loop (first stop id
/// equals last stop id) and accept no further structural edits.
#[derive(Debug, Clone)]
pub struct TransitLine {
    pub id: LineId,
    pub name: String,
    pub mode: TransitMode,
    pub color: [f32; 3],
    pub stop_ids: Vec<StopId>,
    pub sealed: bool,
}

/// One leg of a line connecting two consecutive stops.
#[derive(Debug, Clone)]
pub struct Route {
    pub id: RouteId,
    pub line_id: LineId,
    pub begin: StopId,
    pub end: StopId,
    /// World-space polyline recorded when the leg was drawn.
    pub points: Vec<Vec2>,
    pub length: f32,
    /// Travel direction relative to the line's stop order.
    pub forward: bool,
    /// Whether traffic simulation costs apply along this leg.
    pub apply_cost: bool,
}
