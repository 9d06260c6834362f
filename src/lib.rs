//! Tile Quest - an overworld map with side-scrolling platformer levels
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile collision, physics, game modes)
//! - `render`: Per-frame draw list handed to whatever rasterizer hosts us
//! - `audio`: Named sound cues and the sink they are played through
//! - `settings`: Runtime configuration loaded from JSON
//! - `error`: Error type for the few fallible edges (level files, config)

pub mod audio;
pub mod error;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Viewport dimensions (pixels)
    pub const VIEW_W: f32 = 640.0;
    pub const VIEW_H: f32 = 400.0;

    /// Source tile size and render scale
    pub const TILE: f32 = 16.0;
    pub const SCALE: f32 = 2.0;
    /// Size of one level tile in pixels
    pub const TILE_PX: f32 = TILE * SCALE;
    /// Top of the default ground strip
    pub const GROUND_Y: f32 = VIEW_H - TILE_PX;

    /// Spatial grid cell size (two tiles)
    pub const GRID_CELL: f32 = TILE_PX * 2.0;

    /// Downward acceleration (pixels/tick²)
    pub const GRAVITY: f32 = 0.55;
    /// Terminal fall speed (pixels/tick)
    pub const TERMINAL_VELOCITY: f32 = 15.0;
    /// Jump impulse (pixels/tick, negative is up)
    pub const JUMP_VEL: f32 = -10.0;
    /// Bounce after a stomp, as a fraction of the jump impulse
    pub const STOMP_BOUNCE: f32 = 0.6;
    /// Player walk speed (pixels/second)
    pub const WALK_SPEED: f32 = 300.0;
    /// Enemy patrol speed scale (pixels/second per unit of kind speed)
    pub const ENEMY_SPEED_SCALE: f32 = 100.0;

    /// Invincibility after shrinking or respawning (ticks)
    pub const INVINCIBLE_TICKS: u32 = 2 * TICK_RATE;

    /// Score awards
    pub const STOMP_POINTS: u64 = 100;
    pub const COIN_POINTS: u64 = 50;
    /// Victory bonus per whole second left on the clock
    pub const TIME_BONUS_MULTIPLIER: u64 = 10;

    /// Session defaults
    pub const STARTING_LIVES: u8 = 3;
    pub const LEVEL_TIME_SECS: f32 = 300.0;
    /// Overworld input debounce (seconds)
    pub const NAV_COOLDOWN_SECS: f32 = 0.18;

    // Level definition bounds, measured from the origin in both directions
    pub const MAX_LEVEL_WIDTH: f32 = VIEW_W * 256.0;
    pub const MAX_LEVEL_HEIGHT: f32 = VIEW_H * 16.0;
}

/// Clamp a horizontal camera offset so the view never leaves the level
#[inline]
pub fn clamp_camera(target_x: f32, level_width: f32) -> f32 {
    let max_x = (level_width - consts::VIEW_W).max(0.0);
    target_x.clamp(0.0, max_x)
}

/// Convert a tile coordinate to its pixel origin
#[inline]
pub fn tile_to_px(tile: i32) -> f32 {
    tile as f32 * consts::TILE_PX
}
