#![warn(clippy::all, clippy::pedantic)]

// Game board dimensions
pub const FIELD_WIDTH: usize = 10;
pub const FIELD_HEIGHT: usize = 20;

// Spawn offset of a new piece's origin (row, col). Row is above the visible field.
pub const SPAWN_ROW: i32 = -2;
pub const SPAWN_COL: i32 = (FIELD_WIDTH / 2) as i32;

// Number of palette entries, including the empty color at index 0
pub const PALETTE_SIZE: u8 = 6;

// Points for clearing 0, 1, 2, 3 or 4 lines at once (multiplied by level + 1)
pub const SCORE_PER_ELIMINATED_LINES: [u32; 5] = [0, 40, 100, 300, 1200];

// Level progression
pub const LINES_PER_LEVEL: u32 = 10;

// Gravity timing defaults in milliseconds
pub const BASE_DROP_INTERVAL_MS: u64 = 500;
pub const DROP_INTERVAL_STEP_MS: u64 = 50;
pub const MIN_DROP_INTERVAL_MS: u64 = 50;

// Soft drop timing defaults in milliseconds
pub const SOFT_DROP_DELAY_MS: u64 = 50;
pub const SOFT_DROP_INTERVAL_MS: u64 = 50;

// Music volume change per key press
pub const VOLUME_STEP: f32 = 0.1;

// Without key-release reporting, a held key is considered released after this long
pub const KEY_RELEASE_TIMEOUT_MS: u64 = 150;
