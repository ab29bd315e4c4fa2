//! Arcade Lab - fixed-timestep 2D arcade physics for two small games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, physics ticks, screens)
//! - `game`: Frame loop gluing input, fixed-timestep physics and rendering
//! - `platform`: Keyboard state and time sources
//! - `persistence`: Versioned JSON save files with backup rotation
//! - `settings`: Data-driven configuration
//! - `highscores`: Leaderboard acting as the score sink

pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::StorageError;
pub use highscores::{HighScores, ScoreSink};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default physics rate (60 Hz, one tick per classic CRT frame)
    pub const PHYSICS_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f64 = 1.0 / PHYSICS_HZ as f64;
    /// Maximum catch-up steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Pong playfield
    pub const PONG_WIDTH: f32 = 960.0;
    pub const PONG_HEIGHT: f32 = 720.0;

    /// Pong bumper (9 x 63 box)
    pub const PADDLE_HALF_WIDTH: f32 = 4.5;
    pub const PADDLE_HALF_HEIGHT: f32 = 31.5;
    /// Horizontal centre of the left and right bumpers
    pub const LEFT_PADDLE_X: f32 = 31.5;
    pub const RIGHT_PADDLE_X: f32 = 937.5;
    /// Bumper travel per tick while a key is held
    pub const PADDLE_STEP: f32 = 3.0;

    /// Ball serve speed per axis (units per tick), inclusive range
    pub const BALL_SERVE_MIN: u32 = 5;
    pub const BALL_SERVE_MAX: u32 = 7;

    /// Smallest configurable playfield side
    pub const MIN_FIELD_EXTENT: f32 = 100.0;

    /// Shiba playfield
    pub const SHIBA_WIDTH: f32 = 1366.0;
    pub const SHIBA_HEIGHT: f32 = 768.0;
    /// Ship nudge per tick while an arrow key is held
    pub const SHIP_STEP: f32 = 5.0;

    /// Bullet pool capacity
    pub const MAX_BULLETS: usize = 11;
    /// Bullet lifetime in seconds
    pub const BULLET_TTL_SECS: f64 = 2.5;
    /// Minimum time between shots in seconds
    pub const BULLET_COOLDOWN_SECS: f64 = 0.1;
    /// Bullet spawn distance in front of the ship
    pub const BULLET_MUZZLE_OFFSET: f32 = 20.0;
    /// Bullet speed added along the facing direction (units per tick)
    pub const BULLET_SPEED: f32 = 6.0;
    /// Upper bound of the random per-axis jitter added to bullet velocity
    pub const BULLET_JITTER: f32 = 0.1;

    /// Lives at the start of a Shiba session
    pub const STARTING_LIVES: u8 = 3;
}

/// Convert a duration in seconds to a whole number of ticks at `hz`
#[inline]
pub fn secs_to_ticks(secs: f64, hz: u32) -> u64 {
    (secs * hz as f64).round().max(0.0) as u64
}

/// Wrap a coordinate onto `[0, extent]` (toroidal).
///
/// Values on the boundary are kept; anything strictly outside re-enters from
/// the opposite edge by Euclidean modulo, so `extent + 1` becomes `1` and
/// `-1` becomes `extent - 1`.
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    if value < 0.0 || value > extent {
        value.rem_euclid(extent)
    } else {
        value
    }
}
