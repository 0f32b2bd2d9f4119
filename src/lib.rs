//! Jupiter Lander - a frame-paced lander arcade game
//!
//! Core modules:
//! - `sim`: Deterministic flight model (thrust, gravity, collisions, view rules, scoring)
//! - `game`: The session state machine driving views through the platform collaborators
//! - `platform`: Renderer/keyboard abstraction (terminal and headless backends)
//! - `audio`: Sound channels with graceful silent fallback
//! - `assets`: Procedural sprites, terrain silhouettes and collision masks
//! - `hud`: Score, fuel bar and velocity scale readouts

pub mod assets;
pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod hud;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::LanderError;
pub use game::{GameSession, SessionEnd};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
///
/// Velocities are in far-view units per tick, one tick per display retrace.
pub mod consts {
    /// Default retrace rate the frontend paces frames to
    pub const DEFAULT_TICK_HZ: u32 = 50;

    /// Full tank
    pub const FUEL_MAX: f32 = 219.0;
    /// Main thruster burn per tick
    pub const FUEL_COST_UP: f32 = 0.5;
    /// Side thruster burn per tick
    pub const FUEL_COST_SIDE: f32 = 0.25;
    /// Fuel lost on every crash
    pub const CRASH_FUEL_PENALTY: f32 = 30.0;
    /// Fuel refunded per 10-point step of a landing bonus
    pub const BONUS_FUEL_STEP: f32 = 0.25;

    /// Gravity added to y_vel every tick while below the ceiling
    pub const GRAVITY: f32 = 0.025;
    /// Gravity stops accelerating once y_vel reaches this
    pub const GRAVITY_CEILING: f32 = 1.975;
    /// Main thruster delta (upwards is negative y)
    pub const THRUST_UP: f32 = 0.075;
    /// Main thruster stops once y_vel falls to this
    pub const THRUST_FLOOR: f32 = -1.925;
    /// Side thruster delta
    pub const THRUST_SIDE: f32 = 0.025;

    /// Probe spawn state
    pub const START_X: f32 = 20.0;
    pub const START_Y: f32 = 8.0;
    pub const START_X_VEL: f32 = 0.25;
    pub const START_Y_VEL: f32 = 0.0;

    /// Far view leaves for pad A/C at or below this height
    pub const FAR_LOW_ZONE_Y: f32 = 90.0;
    /// Pad A capture: x strictly below
    pub const PAD_A_ZONE_MAX_X: f32 = 101.0;
    /// Pad C capture: x strictly above
    pub const PAD_C_ZONE_MIN_X: f32 = 180.0;
    /// Pad B capture box (inclusive)
    pub const PAD_B_ZONE_MIN_Y: f32 = 10.0;
    pub const PAD_B_ZONE_MIN_X: f32 = 100.0;
    pub const PAD_B_ZONE_MAX_X: f32 = 180.0;
    /// Probe has left the sky once y drops to this
    pub const OUT_OF_SKY_Y: f32 = -21.0;

    /// Landing slower than this scores; at or above is "no bonus"
    pub const LANDING_MAX_VEL: f32 = 0.35;
    /// Points per unit of velocity margin
    pub const LANDING_POINTS_SCALE: f32 = 1575.0;
    /// Pad bonus multipliers
    pub const PAD_A_BONUS: u32 = 5;
    pub const PAD_B_BONUS: u32 = 2;
    pub const PAD_C_BONUS: u32 = 10;
    /// Score counters roll over past this
    pub const SCORE_LIMIT: u32 = 100_000;
    /// Score added per count-up step
    pub const SCORE_STEP: u32 = 10;

    /// Pad B accepts a landing only if the probe's left pixel is in this range
    pub const PAD_B_LEG_MIN_PX: i32 = 97;
    pub const PAD_B_LEG_MAX_PX: i32 = 132;

    /// Visible play area in view pixels
    pub const VIEW_WIDTH: i32 = 320;
    pub const VIEW_HEIGHT: i32 = 180;
    /// Horizontal inset of the terrain strip
    pub const VIEW_X_INSET: i32 = 3;
    /// Pad views magnify the far view by this factor
    pub const PAD_ZOOM: f32 = 2.0;

    /// Probe sprite sizes
    pub const SMALL_PROBE_W: i32 = 18;
    pub const SMALL_PROBE_H: i32 = 21;
    pub const LARGE_PROBE_W: i32 = 36;
    pub const LARGE_PROBE_H: i32 = 42;
    /// Pad marker height in pad views
    pub const PAD_HEIGHT: i32 = 8;

    /// Crash sequence
    pub const CRASH_FRAMES: usize = 7;
    pub const CRASH_FRAME_TICKS: u32 = 4;

    /// Dramatic pauses, in ticks
    pub const CRASH_PAUSE_TICKS: u32 = 100;
    pub const NO_BONUS_PAUSE_TICKS: u32 = 100;
    pub const BONUS_PAUSE_TICKS: u32 = 100;
    pub const OUT_OF_SKY_PAUSE_TICKS: u32 = 150;
    pub const GAME_OVER_PAUSE_TICKS: u32 = 250;
    /// Stand-in for the start tune when there is no sound
    pub const SILENT_TUNE_TICKS: u32 = 150;
}
