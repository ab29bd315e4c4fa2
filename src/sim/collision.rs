//! Axis-aligned collision predicates
//!
//! Everything in both games is a point (ball, bullet) tested against a box
//! (bumper, playfield). Bounds are closed: touching an edge counts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` extending `half` in each direction
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Closed containment: a point on an edge is inside
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Closed overlap between two boxes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Point-vs-box test used for ball/bumper contact
#[inline]
pub fn point_in_box(point: Vec2, bounds: &Aabb) -> bool {
    bounds.contains_point(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_contains_point_inclusive_edges() {
        let b = Aabb::new(Vec2::new(27.0, 360.0), Vec2::new(36.0, 423.0));
        assert!(b.contains_point(Vec2::new(27.0, 360.0)));
        assert!(b.contains_point(Vec2::new(36.0, 423.0)));
        assert!(b.contains_point(Vec2::new(30.0, 400.0)));
        assert!(!b.contains_point(Vec2::new(26.99, 400.0)));
        assert!(!b.contains_point(Vec2::new(30.0, 423.01)));
    }

    #[test]
    fn test_from_center() {
        let b = Aabb::from_center(Vec2::new(10.0, 10.0), Vec2::new(4.5, 31.5));
        assert_eq!(b.width(), 9.0);
        assert_eq!(b.height(), 63.0);
        assert_eq!(b.min, Vec2::new(5.5, -21.5));
    }

    #[test]
    fn test_overlaps_touching() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let c = Aabb::new(Vec2::new(1.5, 0.0), Vec2::new(2.0, 1.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    proptest! {
        #[test]
        fn prop_center_always_inside(
            cx in -1000.0f32..1000.0,
            cy in -1000.0f32..1000.0,
            hw in 0.0f32..100.0,
            hh in 0.0f32..100.0,
        ) {
            let b = Aabb::from_center(Vec2::new(cx, cy), Vec2::new(hw, hh));
            prop_assert!(point_in_box(Vec2::new(cx, cy), &b));
        }

        #[test]
        fn prop_overlap_symmetric(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0,
            bx in -50.0f32..50.0, by in -50.0f32..50.0,
        ) {
            let a = Aabb::from_center(Vec2::new(ax, ay), Vec2::splat(5.0));
            let b = Aabb::from_center(Vec2::new(bx, by), Vec2::splat(5.0));
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
