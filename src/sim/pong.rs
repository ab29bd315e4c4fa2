//! Pong: two bumpers, one ball, seven-segment scoreboards
//!
//! One call to [`tick`] is one physics step. Units are pixels and velocities
//! are pixels per tick, so the step size is implied by the scheduler rate.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, point_in_box};
use super::segment::{SegmentPattern, encode};
use super::state::{MovingEntity, Playfield, Score, Side};
use crate::consts::*;
use crate::platform::{Key, KeyboardState};

/// A player's bumper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Centre of the bumper box. Velocity is zero unless something adds drift.
    pub body: MovingEntity,
    pub half_extents: Vec2,
}

impl Paddle {
    pub fn new(center: Vec2) -> Self {
        Self {
            body: MovingEntity::at_rest(center),
            half_extents: Vec2::new(PADDLE_HALF_WIDTH, PADDLE_HALF_HEIGHT),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.body.pos, self.half_extents)
    }

    /// Player-driven vertical move, kept on the field
    pub fn nudge(&mut self, dy: f32, field: &Playfield) {
        let lo = self.half_extents.y;
        let hi = (field.height - self.half_extents.y).max(lo);
        self.body.pos.y = (self.body.pos.y + dy).clamp(lo, hi);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub body: MovingEntity,
}

impl Ball {
    /// Place at `center` with a fresh serve velocity.
    ///
    /// Each axis gets a whole-number speed in `BALL_SERVE_MIN..=BALL_SERVE_MAX`
    /// and an independent random sign.
    pub fn reset(&mut self, center: Vec2, rng: &mut Pcg32) {
        self.body.pos = center;
        self.body.vel = serve_velocity(rng);
    }
}

fn serve_velocity(rng: &mut Pcg32) -> Vec2 {
    let mut axis = || {
        let speed = rng.random_range(BALL_SERVE_MIN..=BALL_SERVE_MAX) as f32;
        if rng.random_bool(0.5) { speed } else { -speed }
    };
    let x = axis();
    let y = axis();
    Vec2::new(x, y)
}

/// Key bindings for the two bumpers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PongBindings {
    pub left_up: Key,
    pub left_down: Key,
    pub right_up: Key,
    pub right_down: Key,
}

impl Default for PongBindings {
    fn default() -> Self {
        Self {
            left_up: Key::Char('w'),
            left_down: Key::Char('s'),
            right_up: Key::Char('o'),
            right_down: Key::Char('l'),
        }
    }
}

/// Held-key snapshot for one tick: -1 down, 0 idle, +1 up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PongInput {
    pub left: i8,
    pub right: i8,
}

impl PongInput {
    pub fn from_keys(keys: &KeyboardState, bindings: &PongBindings) -> Self {
        let axis = |up: Key, down: Key| keys.is_held(up) as i8 - keys.is_held(down) as i8;
        Self {
            left: axis(bindings.left_up, bindings.left_down),
            right: axis(bindings.right_up, bindings.right_down),
        }
    }
}

/// Things that happened during the last tick, for sound and effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PongEvent {
    WallBounce,
    PaddleHit(Side),
    Scored(Side),
}

/// Complete Pong state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PongState {
    pub field: Playfield,
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
    pub score: Score,
    /// Scoreboard digits, indexed by `Side::index`
    pub display: [SegmentPattern; 2],
    pub time_ticks: u64,
    pub rng: Pcg32,
    #[serde(skip)]
    pub events: Vec<PongEvent>,
}

impl PongState {
    pub fn new(seed: u64) -> Self {
        Self::with_field(seed, Playfield::new(PONG_WIDTH, PONG_HEIGHT))
    }

    /// Bumpers are placed at the standard distances from each side wall,
    /// vertically centred.
    pub fn with_field(seed: u64, field: Playfield) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ball = Ball {
            body: MovingEntity::default(),
        };
        ball.reset(field.center(), &mut rng);
        let cy = field.height / 2.0;

        Self {
            field,
            ball,
            left: Paddle::new(Vec2::new(LEFT_PADDLE_X, cy)),
            right: Paddle::new(Vec2::new(field.width - (PONG_WIDTH - RIGHT_PADDLE_X), cy)),
            score: Score::new(),
            display: [encode(0); 2],
            time_ticks: 0,
            rng,
            events: Vec::new(),
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Start over: scores cleared, ball re-served, bumpers centred
    pub fn new_game(&mut self) {
        self.score.reset();
        self.display = [encode(0); 2];
        let cy = self.field.height / 2.0;
        self.left.body.pos.y = cy;
        self.right.body.pos.y = cy;
        let center = self.field.center();
        self.ball.reset(center, &mut self.rng);
        self.events.clear();
    }

    /// Credit a point to `side`, refresh its digit and re-serve
    fn award_point(&mut self, side: Side) {
        let total = self.score.increment(side);
        self.display[side.index()] = encode(i64::from(total));
        let center = self.field.center();
        self.ball.reset(center, &mut self.rng);
        self.events.push(PongEvent::Scored(side));
        log::debug!("{:?} scores: {}-{}", side, self.score.left, self.score.right);
    }
}

/// Advance the Pong state by one fixed timestep
pub fn tick(state: &mut PongState, input: &PongInput) {
    state.events.clear();
    state.time_ticks += 1;

    // Motion
    state.ball.body.integrate();
    state.left.body.integrate();
    state.right.body.integrate();

    // Bumpers follow held keys
    let field = state.field;
    state.left.nudge(f32::from(input.left) * PADDLE_STEP, &field);
    state.right.nudge(f32::from(input.right) * PADDLE_STEP, &field);

    // Top and bottom walls reflect; the ball may overshoot by one tick
    if field.outside_vertical(state.ball.body.pos.y) {
        state.ball.body.vel.y = -state.ball.body.vel.y;
        state.events.push(PongEvent::WallBounce);
    }

    // Leaving a side wall scores for the other player
    let x = state.ball.body.pos.x;
    if x < 0.0 {
        state.award_point(Side::Right);
    } else if x > field.width {
        state.award_point(Side::Left);
    }

    // Bumper contact sends the ball back toward the opponent. Using the
    // outward direction instead of a plain sign flip keeps a ball that is
    // still inside the box next tick from turning around again.
    for side in [Side::Left, Side::Right] {
        if point_in_box(state.ball.body.pos, &state.paddle(side).bounds()) {
            let speed = state.ball.body.vel.x.abs();
            state.ball.body.vel.x = match side {
                Side::Left => speed,
                Side::Right => -speed,
            };
            state.events.push(PongEvent::PaddleHit(side));
        }
    }
}
