//! Shared entity state
//!
//! Plain data mutated once per physics tick. Game-specific containers
//! (`PongState`, `ShibaState`) own these by value.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::wrap_coordinate;

/// Anything that moves by a constant velocity each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovingEntity {
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
}

impl MovingEntity {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    pub fn at_rest(pos: Vec2) -> Self {
        Self { pos, vel: Vec2::ZERO }
    }

    /// Advance one tick
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }
}

/// Rectangular playfield anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Toroidal wrap of a position (both axes independently)
    #[inline]
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            wrap_coordinate(pos.x, self.width),
            wrap_coordinate(pos.y, self.height),
        )
    }

    /// True when `y` has left the playfield vertically
    #[inline]
    pub fn outside_vertical(&self, y: f32) -> bool {
        y > self.height || y < 0.0
    }
}

/// Which half of a two-player game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Player 1
    Left,
    /// Player 2
    Right,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Per-side point counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Award a point and return the side's new total
    pub fn increment(&mut self, side: Side) -> u32 {
        let slot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_velocity_is_identity() {
        let mut e = MovingEntity::at_rest(Vec2::new(12.0, 34.0));
        for _ in 0..1000 {
            e.integrate();
        }
        assert_eq!(e.pos, Vec2::new(12.0, 34.0));
    }

    #[test]
    fn test_integrate_adds_velocity() {
        let mut e = MovingEntity::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, -3.0));
        e.integrate();
        e.integrate();
        assert_eq!(e.pos, Vec2::new(5.0, -5.0));
    }

    #[test]
    fn test_playfield_wrap() {
        let field = Playfield::new(1366.0, 768.0);
        assert_eq!(field.wrap(Vec2::new(1367.0, 769.0)), Vec2::new(1.0, 1.0));
        assert_eq!(field.wrap(Vec2::new(-1.0, -1.0)), Vec2::new(1365.0, 767.0));
        assert_eq!(field.wrap(Vec2::new(400.0, 300.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_score_increment_one_side() {
        let mut score = Score::new();
        assert_eq!(score.increment(Side::Left), 1);
        assert_eq!(score, Score { left: 1, right: 0 });
        score.reset();
        assert_eq!(score, Score::default());
    }
}
