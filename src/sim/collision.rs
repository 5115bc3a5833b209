//! Static collision geometry
//!
//! The world is a flat list of axis-aligned boxes on the ground plane
//! (buildings, fences, parked cars). The list is append-only and is cleared
//! only when the whole world is rebuilt. Queries walk it in registration
//! order, so "first hit" is well defined.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Below this distance the circle center is treated as inside the box
const DEGENERATE_DIST: f32 = 0.001;

/// Axis-aligned box on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of size `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Closest point inside the box to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Circle overlap using the clamped closest point
    #[inline]
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        center.distance_squared(self.closest_point(center)) <= radius * radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderKind {
    Solid,
    Destructible,
}

/// A registered piece of static geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCollider {
    pub bounds: Aabb,
    pub kind: ColliderKind,
    /// Remaining hit points (destructibles only)
    pub hp: Option<f32>,
    /// Destroyed destructibles stay registered but stop colliding
    #[serde(default)]
    pub broken: bool,
}

impl StaticCollider {
    pub fn solid(bounds: Aabb) -> Self {
        Self {
            bounds,
            kind: ColliderKind::Solid,
            hp: None,
            broken: false,
        }
    }

    pub fn destructible(bounds: Aabb, hp: f32) -> Self {
        Self {
            bounds,
            kind: ColliderKind::Destructible,
            hp: Some(hp),
            broken: false,
        }
    }

    #[inline]
    pub fn blocks(&self) -> bool {
        !self.broken
    }
}

/// Index of a collider in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderId(pub usize);

/// Static geometry registry
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    statics: Vec<StaticCollider>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_static(&mut self, collider: StaticCollider) -> ColliderId {
        self.statics.push(collider);
        ColliderId(self.statics.len() - 1)
    }

    /// Drop all geometry (full world rebuild only)
    pub fn clear_statics(&mut self) {
        self.statics.clear();
    }

    pub fn statics(&self) -> &[StaticCollider] {
        &self.statics
    }

    pub fn get(&self, id: ColliderId) -> Option<&StaticCollider> {
        self.statics.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.statics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statics.is_empty()
    }

    /// Push a circle out of every overlapping box, in registration order.
    ///
    /// Each box is resolved against the position left by the previous one.
    /// Not globally optimal, but stable frame to frame.
    pub fn resolve_player_static(&self, pos: Vec2, radius: f32) -> Vec2 {
        let mut p = pos;
        for collider in self.statics.iter().filter(|c| c.blocks()) {
            p = push_out_of_box(p, radius, &collider.bounds);
        }
        p
    }

    /// First live collider containing `point`, in registration order
    pub fn projectile_vs_statics(&self, point: Vec2) -> Option<ColliderId> {
        self.statics
            .iter()
            .position(|c| c.blocks() && c.bounds.contains_point(point))
            .map(ColliderId)
    }

    /// Any live collider overlapping the circle
    pub fn circle_blocked(&self, center: Vec2, radius: f32) -> bool {
        self.statics
            .iter()
            .any(|c| c.blocks() && c.bounds.overlaps_circle(center, radius))
    }

    /// Apply damage to a destructible. Returns true if this hit broke it.
    pub fn damage(&mut self, id: ColliderId, amount: f32) -> bool {
        let Some(collider) = self.statics.get_mut(id.0) else {
            return false;
        };
        if collider.broken || collider.kind != ColliderKind::Destructible {
            return false;
        }
        let hp = collider.hp.get_or_insert(0.0);
        *hp -= amount;
        if *hp <= 0.0 {
            collider.broken = true;
            return true;
        }
        false
    }
}

/// Resolve a single circle/box overlap
pub fn push_out_of_box(pos: Vec2, radius: f32, bounds: &Aabb) -> Vec2 {
    if !bounds.overlaps_circle(pos, radius) {
        return pos;
    }

    let closest = bounds.closest_point(pos);
    let delta = pos - closest;
    let dist = delta.length();

    if dist < DEGENERATE_DIST {
        // Center is inside the box: leave through the nearest edge
        let d_left = pos.x - bounds.min.x;
        let d_right = bounds.max.x - pos.x;
        let d_near = pos.y - bounds.min.y;
        let d_far = bounds.max.y - pos.y;
        let min_d = d_left.min(d_right).min(d_near).min(d_far);

        if min_d == d_left {
            Vec2::new(bounds.min.x - radius, pos.y)
        } else if min_d == d_right {
            Vec2::new(bounds.max.x + radius, pos.y)
        } else if min_d == d_near {
            Vec2::new(pos.x, bounds.min.y - radius)
        } else {
            Vec2::new(pos.x, bounds.max.y + radius)
        }
    } else {
        pos + delta / dist * (radius - dist)
    }
}

/// Circle vs circle overlap (touching counts)
#[inline]
pub fn circle_vs_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0))
    }

    #[test]
    fn test_point_in_box() {
        let b = unit_box();
        assert!(b.contains_point(Vec2::ZERO));
        assert!(b.contains_point(Vec2::new(1.0, 1.0)));
        assert!(!b.contains_point(Vec2::new(1.01, 0.0)));
    }

    #[test]
    fn test_circle_box_overlap_uses_closest_point() {
        let b = unit_box();
        assert!(b.overlaps_circle(Vec2::new(1.5, 0.0), 0.5));
        assert!(!b.overlaps_circle(Vec2::new(1.6, 0.0), 0.5));
        // Corner: distance to (1,1) is sqrt(0.5) ~ 0.707
        assert!(!b.overlaps_circle(Vec2::new(1.5, 1.5), 0.7));
        assert!(b.overlaps_circle(Vec2::new(1.5, 1.5), 0.71));
    }

    #[test]
    fn test_push_out_side() {
        let mut world = CollisionWorld::new();
        world.add_static(StaticCollider::solid(unit_box()));
        let p = world.resolve_player_static(Vec2::new(1.2, 0.0), 0.4);
        assert!((p.x - 1.4).abs() < 1e-5);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_push_out_degenerate_center_inside() {
        let mut world = CollisionWorld::new();
        world.add_static(StaticCollider::solid(Aabb::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 4.0),
        )));
        // Nearest edge is min.y (distance 1)
        let p = world.resolve_player_static(Vec2::new(5.0, 1.0), 0.4);
        assert_eq!(p, Vec2::new(5.0, -0.4));
        assert!(p.is_finite());
    }

    #[test]
    fn test_no_overlap_untouched() {
        let mut world = CollisionWorld::new();
        world.add_static(StaticCollider::solid(unit_box()));
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(world.resolve_player_static(p, 0.4), p);
    }

    #[test]
    fn test_projectile_first_hit_in_registration_order() {
        let mut world = CollisionWorld::new();
        let first = world.add_static(StaticCollider::solid(unit_box()));
        world.add_static(StaticCollider::solid(Aabb::new(Vec2::ZERO, Vec2::splat(3.0))));
        assert_eq!(world.projectile_vs_statics(Vec2::new(0.5, 0.5)), Some(first));
        assert_eq!(
            world.projectile_vs_statics(Vec2::new(2.5, 2.5)),
            Some(ColliderId(1))
        );
        assert_eq!(world.projectile_vs_statics(Vec2::new(9.0, 9.0)), None);
    }

    #[test]
    fn test_destructible_breaks_and_stops_blocking() {
        let mut world = CollisionWorld::new();
        let id = world.add_static(StaticCollider::destructible(unit_box(), 30.0));
        assert!(!world.damage(id, 20.0));
        assert!(world.damage(id, 15.0));
        // Already broken
        assert!(!world.damage(id, 15.0));
        assert_eq!(world.projectile_vs_statics(Vec2::ZERO), None);
        assert_eq!(world.len(), 1);
        let p = Vec2::new(0.9, 0.0);
        assert_eq!(world.resolve_player_static(p, 0.4), p);
    }

    #[test]
    fn test_solid_ignores_damage() {
        let mut world = CollisionWorld::new();
        let id = world.add_static(StaticCollider::solid(unit_box()));
        assert!(!world.damage(id, 1000.0));
        assert!(world.projectile_vs_statics(Vec2::ZERO).is_some());
    }

    #[test]
    fn test_circle_vs_circle() {
        assert!(circle_vs_circle(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0));
        assert!(!circle_vs_circle(Vec2::ZERO, 1.0, Vec2::new(2.1, 0.0), 1.0));
    }

    proptest! {
        /// A circle overlapping one box (center outside, not degenerate)
        /// always leaves the box after resolution.
        #[test]
        fn prop_push_out_clears_single_box(
            x in -3.0f32..3.0,
            y in -3.0f32..3.0,
            radius in 0.2f32..1.0,
        ) {
            let b = Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
            let p = Vec2::new(x, y);
            prop_assume!(b.overlaps_circle(p, radius));
            prop_assume!(p.distance(b.closest_point(p)) > 0.01 || b.contains_point(p));

            let resolved = push_out_of_box(p, radius, &b);
            let gap = resolved.distance(b.closest_point(resolved));
            prop_assert!(gap >= radius - 1e-3, "gap {} < radius {}", gap, radius);
        }

        /// Two boxes far apart never re-trap a resolved circle
        #[test]
        fn prop_resolution_clears_separated_boxes(
            x in -8.0f32..8.0,
            y in -3.0f32..3.0,
        ) {
            let mut world = CollisionWorld::new();
            world.add_static(StaticCollider::solid(Aabb::new(
                Vec2::new(-6.0, -1.0),
                Vec2::new(-2.0, 1.0),
            )));
            world.add_static(StaticCollider::solid(Aabb::new(
                Vec2::new(2.0, -1.0),
                Vec2::new(6.0, 1.0),
            )));
            let radius = 0.4;
            let resolved = world.resolve_player_static(Vec2::new(x, y), radius);
            for c in world.statics() {
                let gap = resolved.distance(c.bounds.closest_point(resolved));
                prop_assert!(gap >= radius - 1e-3);
            }
        }
    }
}
