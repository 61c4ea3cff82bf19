//! Cursor snap profiles for the line editor.
//!
//! A snap profile describes how the cursor behaves over one kind of map
//! object: street profiles can project the cursor onto the street centerline
//! (lane snapping), stop profiles pull it onto the stop itself. Profiles are
//! registered once and toggled; a freshly added profile starts enabled, so
//! owners that want them off must disable them right after registration.

use bevy::prelude::*;

/// Opaque handle for a registered snap profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapId(u32);

/// What a snap profile applies to and how it renders the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapKind {
    Street {
        color: [f32; 3],
        cursor_scale: f32,
        snap_to_end: bool,
        snap_to_lane: bool,
        snap_to_rivers: bool,
    },
    Stop,
    DraftStop,
}

struct SnapProfile {
    id: SnapId,
    kind: SnapKind,
    enabled: bool,
}

#[derive(Resource, Default)]
pub struct SnapController {
    profiles: Vec<SnapProfile>,
    next_id: u32,
}

impl SnapController {
    /// Register a snap profile. Profiles start enabled.
    pub fn add_snap(&mut self, kind: SnapKind) -> SnapId {
        let id = SnapId(self.next_id);
        self.next_id += 1;
        self.profiles.push(SnapProfile {
            id,
            kind,
            enabled: true,
        });
        id
    }

    pub fn enable(&mut self, id: SnapId) {
        let Some(profile) = self.profiles.iter_mut().find(|p| p.id == id) else {
            warn!("SnapController: unknown snap {:?}", id);
            debug_assert!(false, "SnapController: unknown snap {:?}", id);
            return;
        };
        profile.enabled = true;
    }

    pub fn disable(&mut self, id: SnapId) {
        let Some(profile) = self.profiles.iter_mut().find(|p| p.id == id) else {
            warn!("SnapController: unknown snap {:?}", id);
            debug_assert!(false, "SnapController: unknown snap {:?}", id);
            return;
        };
        profile.enabled = false;
    }

    pub fn is_enabled(&self, id: SnapId) -> bool {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .is_some_and(|p| p.enabled)
    }

    pub fn profile(&self, id: SnapId) -> Option<&SnapKind> {
        self.profiles.iter().find(|p| p.id == id).map(|p| &p.kind)
    }

    /// Where the cursor lands on a street under this profile. Lane snapping
    /// projects onto the centerline; disabled profiles leave the cursor alone.
    pub fn snapped_cursor(&self, id: SnapId, points: &[Vec2], cursor: Vec2) -> Vec2 {
        if !self.is_enabled(id) {
            return cursor;
        }
        match self.profile(id) {
            Some(SnapKind::Street {
                snap_to_lane: true, ..
            }) => closest_point_on_polyline(points, cursor).unwrap_or(cursor),
            _ => cursor,
        }
    }
}

/// Closest point on a polyline to `pos`, clamped to the polyline's extent.
pub fn closest_point_on_polyline(points: &[Vec2], pos: Vec2) -> Option<Vec2> {
    match points {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }

    let mut best = points[0];
    let mut best_dist = f32::MAX;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let ab = b - a;
        let t = if ab.length_squared() < 1e-6 {
            0.0
        } else {
            ((pos - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0)
        };
        let candidate = a + ab * t;
        let dist = (pos - candidate).length_squared();
        if dist < best_dist {
            best_dist = dist;
            best = candidate;
        }
    }
    Some(best)
}
