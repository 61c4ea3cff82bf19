//! Data types for the street network.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Unique identifier for a street segment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct SegmentId(pub u32);

/// A node in the street routing graph, addressed by grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreetNode(pub usize, pub usize);

/// A named run of street cells with a world-space centerline.
#[derive(Debug, Clone)]
pub struct StreetSegment {
    pub id: SegmentId,
    /// Street name shared by all segments of the same generated street.
    pub name: String,
    /// Ordered grid cells covered by this segment.
    pub cells: Vec<(usize, usize)>,
    /// World-space centerline through the cell centers.
    pub points: Vec<Vec2>,
    pub has_tram_tracks: bool,
}

impl StreetSegment {
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| (w[1] - w[0]).length()).sum()
    }

    /// Center of the segment's polyline, used as a hover/click anchor.
    pub fn midpoint(&self) -> Vec2 {
        self.points[self.points.len() / 2]
    }
}
