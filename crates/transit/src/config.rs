pub const GRID_WIDTH: usize = 128;
pub const GRID_HEIGHT: usize = 128;
pub const CELL_SIZE: f32 = 16.0;
pub const WATER_THRESHOLD: f32 = 0.35;
pub const TERRAIN_BASE_FREQUENCY: f32 = 0.008;
pub const WORLD_WIDTH: f32 = GRID_WIDTH as f32 * CELL_SIZE;
pub const WORLD_HEIGHT: f32 = GRID_HEIGHT as f32 * CELL_SIZE;

/// Seed used when the app does not supply one.
pub const DEFAULT_MAP_SEED: u64 = 1337;

/// Grid cells between parallel generated streets.
pub const STREET_SPACING: usize = 8;

/// Ring radius searched when snapping a world position to the street grid.
pub const SNAP_SEARCH_RADIUS: i32 = 3;
