//! Transit mode metadata: colors, speeds, snapping behavior, infrastructure.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Infrastructure a mode requires on a street before it can run there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum TrackKind {
    TramTracks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum TransitMode {
    Bus,
    Tram,
    Subway,
    LightRail,
    IntercityRail,
    Ferry,
}

impl TransitMode {
    pub const ALL: [TransitMode; 6] = [
        TransitMode::Bus,
        TransitMode::Tram,
        TransitMode::Subway,
        TransitMode::LightRail,
        TransitMode::IntercityRail,
        TransitMode::Ferry,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            TransitMode::Bus => "Bus",
            TransitMode::Tram => "Tram",
            TransitMode::Subway => "Subway",
            TransitMode::LightRail => "Light Rail",
            TransitMode::IntercityRail => "Intercity Rail",
            TransitMode::Ferry => "Ferry",
        }
    }

    pub fn default_color(self) -> [f32; 3] {
        match self {
            TransitMode::Bus => [0.58, 0.0, 0.83],
            TransitMode::Tram => [1.0, 0.0, 0.0],
            TransitMode::Subway => [0.09, 0.02, 0.69],
            TransitMode::LightRail => [37.0 / 255.0, 102.0 / 255.0, 10.0 / 255.0],
            TransitMode::IntercityRail => [1.0, 0.0, 0.0],
            TransitMode::Ferry => [0.14, 0.66, 0.79],
        }
    }

    /// Modes the line editor currently supports end to end.
    pub fn is_interactive(self) -> bool {
        matches!(self, TransitMode::Bus | TransitMode::Tram)
    }

    pub fn required_tracks(self) -> Option<TrackKind> {
        match self {
            TransitMode::Tram => Some(TrackKind::TramTracks),
            _ => None,
        }
    }

    pub fn snap_to_lane(self) -> bool {
        matches!(
            self,
            TransitMode::Bus | TransitMode::Tram | TransitMode::Ferry
        )
    }

    pub fn snap_to_rivers(self) -> bool {
        matches!(self, TransitMode::Ferry)
    }

    /// Average cruising speed in km/h, used for trip time estimates.
    pub fn average_speed(self) -> f32 {
        match self {
            TransitMode::Bus => 45.0,
            TransitMode::Tram => 45.0,
            TransitMode::Subway => 50.0,
            TransitMode::LightRail => 60.0,
            TransitMode::IntercityRail => 80.0,
            TransitMode::Ferry => 10.0,
        }
    }

    /// Rendered line width in world units.
    pub fn line_width(self) -> f32 {
        match self {
            TransitMode::Bus | TransitMode::Tram | TransitMode::Ferry => 1.25,
            TransitMode::Subway | TransitMode::LightRail | TransitMode::IntercityRail => 3.0,
        }
    }

    pub fn default_line_name(self, line_count: usize) -> String {
        format!("{} Line {}", self.display_name(), line_count + 1)
    }
}
