//! Shiba: a dog ship on a wrapping field, shooting at enemies it does not own
//!
//! The enemy side (spawning, hit testing, lives and score) lives behind the
//! [`EnemyController`] trait. This module only moves the ship and its
//! bullets and asks the controller whether each bullet connected.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{MovingEntity, Playfield};
use crate::consts::*;
use crate::platform::{Key, KeyboardState};
use crate::secs_to_ticks;

/// The four directions the sprite sheet can show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Sprite heading in degrees (0/360 is up, counter-clockwise)
    pub fn degrees(self) -> f32 {
        match self {
            Facing::Left => 90.0,
            Facing::Down => 180.0,
            Facing::Right => 270.0,
            Facing::Up => 360.0,
        }
    }

    /// Unit vector the ship shoots along
    pub fn direction(self) -> Vec2 {
        let rad = (self.degrees() + 90.0).to_radians();
        Vec2::new(rad.cos(), rad.sin())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub body: MovingEntity,
    pub facing: Facing,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: MovingEntity::at_rest(pos),
            facing: Facing::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub body: MovingEntity,
    /// Tick on which the bullet was fired
    pub spawn_tick: u64,
}

impl Bullet {
    #[inline]
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.spawn_tick)
    }
}

/// Fixed-capacity bullet store with a fire-rate limiter.
///
/// Removal is swap-with-last, so iteration order changes as bullets die.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletPool {
    bullets: Vec<Bullet>,
    capacity: usize,
    cooldown_ticks: u64,
    last_shot: Option<u64>,
}

impl BulletPool {
    pub fn new(capacity: usize, cooldown_ticks: u64) -> Self {
        Self {
            bullets: Vec::with_capacity(capacity),
            capacity,
            cooldown_ticks,
            last_shot: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter()
    }

    /// True if the fire-rate limiter would accept a shot at `now`
    pub fn cooled_down(&self, now: u64) -> bool {
        self.last_shot
            .is_none_or(|last| now.saturating_sub(last) >= self.cooldown_ticks)
    }

    /// Fire a bullet if the cooldown has passed and there is room.
    ///
    /// Passing the cooldown restarts it even when the pool is full, so a
    /// held trigger keeps its rhythm once a slot frees up.
    pub fn try_spawn(&mut self, now: u64, pos: Vec2, vel: Vec2) -> bool {
        if !self.cooled_down(now) {
            return false;
        }
        self.last_shot = Some(now);
        if self.bullets.len() >= self.capacity {
            log::debug!("bullet pool full ({}), shot declined", self.capacity);
            return false;
        }
        self.bullets.push(Bullet {
            body: MovingEntity::new(pos, vel),
            spawn_tick: now,
        });
        true
    }

    /// Expire, move, wrap and hit-test every live bullet.
    ///
    /// A bullet older than `ttl_ticks` is removed before it moves. A bullet
    /// for which `hit` returns true is removed after moving. Returns
    /// `(expired, hits)`.
    pub fn update<F>(
        &mut self,
        now: u64,
        ttl_ticks: u64,
        field: &Playfield,
        mut hit: F,
    ) -> (u32, u32)
    where
        F: FnMut(Vec2) -> bool,
    {
        let mut expired = 0;
        let mut hits = 0;
        let mut i = 0;
        while i < self.bullets.len() {
            if self.bullets[i].age(now) > ttl_ticks {
                self.bullets.swap_remove(i);
                expired += 1;
                continue;
            }

            let b = &mut self.bullets[i];
            b.body.integrate();
            b.body.pos = field.wrap(b.body.pos);

            if hit(b.body.pos) {
                self.bullets.swap_remove(i);
                hits += 1;
                continue;
            }
            i += 1;
        }
        (expired, hits)
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
        self.last_shot = None;
    }
}

/// The collaborator that owns enemies, lives and score
pub trait EnemyController {
    /// Did a bullet at `pos` hit anything? The controller handles the enemy
    /// side of the hit; the caller removes the bullet.
    fn bullet_hit(&mut self, pos: Vec2) -> bool;

    /// Called once per physics tick after the ship and bullets moved
    fn advance(&mut self, _ship: Vec2, _tick: u64) {}

    /// Drop every enemy (back to menu, game over). Lives and score stay, so
    /// a paused run can be resumed.
    fn cleanup(&mut self);

    /// Start a fresh run: drop every enemy and reset lives and score
    fn new_game(&mut self) {
        self.cleanup();
    }

    fn score(&self) -> u64 {
        0
    }

    fn player_defeated(&self) -> bool {
        false
    }
}

/// An empty world: nothing to hit
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnemies;

impl EnemyController for NoEnemies {
    fn bullet_hit(&mut self, _pos: Vec2) -> bool {
        false
    }

    fn cleanup(&mut self) {}
}

/// Held-key snapshot for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShibaInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

impl ShibaInput {
    pub fn from_keys(keys: &KeyboardState) -> Self {
        Self {
            left: keys.is_held(Key::Left),
            right: keys.is_held(Key::Right),
            up: keys.is_held(Key::Up),
            down: keys.is_held(Key::Down),
            fire: keys.is_held(Key::Space),
        }
    }
}

/// Tick timings derived from the physics rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShibaTimings {
    pub bullet_ttl_ticks: u64,
    pub bullet_cooldown_ticks: u64,
}

impl ShibaTimings {
    pub fn for_rate(hz: u32) -> Self {
        Self {
            bullet_ttl_ticks: secs_to_ticks(BULLET_TTL_SECS, hz),
            bullet_cooldown_ticks: secs_to_ticks(BULLET_COOLDOWN_SECS, hz),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShibaEvent {
    Fired,
    BulletExpired,
    BulletHit,
}

/// Complete Shiba state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShibaState {
    pub field: Playfield,
    pub ship: Ship,
    pub bullets: BulletPool,
    pub timings: ShibaTimings,
    pub time_ticks: u64,
    pub rng: Pcg32,
    #[serde(skip)]
    pub events: Vec<ShibaEvent>,
}

impl ShibaState {
    pub fn new(seed: u64) -> Self {
        Self::with_field(seed, Playfield::new(SHIBA_WIDTH, SHIBA_HEIGHT), PHYSICS_HZ)
    }

    pub fn with_field(seed: u64, field: Playfield, hz: u32) -> Self {
        let timings = ShibaTimings::for_rate(hz);
        Self {
            field,
            ship: Ship::new(field.center()),
            bullets: BulletPool::new(MAX_BULLETS, timings.bullet_cooldown_ticks),
            timings,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Ship back to centre, no bullets in flight
    pub fn new_game(&mut self) {
        self.ship = Ship::new(self.field.center());
        self.bullets.clear();
        self.events.clear();
    }

    /// Shoot along the current facing, subject to cooldown and capacity
    pub fn fire(&mut self) -> bool {
        let dir = self.ship.facing.direction();
        let jitter = Vec2::new(self.rng.random::<f32>(), self.rng.random::<f32>()) * BULLET_JITTER;
        let pos = self.ship.body.pos + dir * BULLET_MUZZLE_OFFSET;
        let vel = self.ship.body.vel + dir * BULLET_SPEED + jitter;
        let fired = self.bullets.try_spawn(self.time_ticks, pos, vel);
        if fired {
            self.events.push(ShibaEvent::Fired);
        }
        fired
    }

    fn steer(&mut self, input: &ShibaInput) {
        // Later keys win the facing, matching the sprite update order
        let moves = [
            (input.left, Facing::Left),
            (input.right, Facing::Right),
            (input.up, Facing::Up),
            (input.down, Facing::Down),
        ];
        for (held, facing) in moves {
            if held {
                self.ship.facing = facing;
                self.ship.body.pos += facing.direction().round() * SHIP_STEP;
            }
        }
        self.ship.body.pos = self.field.wrap(self.ship.body.pos);
    }
}

/// Advance the Shiba state by one fixed timestep
pub fn tick<E: EnemyController>(state: &mut ShibaState, input: &ShibaInput, enemies: &mut E) {
    state.events.clear();
    state.time_ticks += 1;
    let now = state.time_ticks;
    let field = state.field;

    state.ship.body.integrate();
    state.ship.body.pos = field.wrap(state.ship.body.pos);

    let ttl = state.timings.bullet_ttl_ticks;
    let (expired, hits) = state
        .bullets
        .update(now, ttl, &field, |pos| enemies.bullet_hit(pos));
    state
        .events
        .extend(std::iter::repeat_n(ShibaEvent::BulletExpired, expired as usize));
    state
        .events
        .extend(std::iter::repeat_n(ShibaEvent::BulletHit, hits as usize));

    state.steer(input);
    if input.fire {
        state.fire();
    }

    enemies.advance(state.ship.body.pos, now);
}
