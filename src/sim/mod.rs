//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, windowing or clock dependencies

pub mod collision;
pub mod pong;
pub mod screen;
pub mod segment;
pub mod shiba;
pub mod state;
pub mod tick;

pub use collision::{Aabb, point_in_box};
pub use pong::{Ball, Paddle, PongBindings, PongEvent, PongInput, PongState};
pub use screen::{MenuItem, Screen, ScreenAction, ScreenState};
pub use segment::{Segment, SegmentPattern, encode};
pub use shiba::{
    Bullet, BulletPool, EnemyController, Facing, NoEnemies, ShibaEvent, ShibaInput, ShibaState,
    ShibaTimings, Ship,
};
pub use state::{MovingEntity, Playfield, Score, Side};
pub use tick::FixedTimestep;
