//! Lobbed grenades with bounce and radial falloff damage
//!
//! Grenades live in a small plain `Vec` rather than a pool: there are only
//! ever a handful in flight.

use glam::Vec2;

use super::director::EnemyManager;
use super::events::{EventQueue, SimEvent};
use super::juice::Juice;
use crate::consts::SIM_DT;
use crate::tuning::GrenadeTuning;

const BLAST_SHAKE: f32 = 0.6;
const BLAST_HITSTOP: f32 = 0.06;
const BLAST_INTENSITY: f32 = 2.0;

/// Linear falloff: full damage at the center, zero at and beyond `radius`
pub fn falloff_damage(base: f32, dist: f32, radius: f32) -> f32 {
    if radius <= 0.0 || dist >= radius {
        return 0.0;
    }
    base * (1.0 - dist.max(0.0) / radius)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grenade {
    /// Ground-plane position
    pub pos: Vec2,
    /// Height above the ground
    pub height: f32,
    pub vel: Vec2,
    pub vertical_vel: f32,
    pub fuse: f32,
    pub bounced: bool,
}

#[derive(Debug, Clone)]
pub struct GrenadeSystem {
    tuning: GrenadeTuning,
    grenades: Vec<Grenade>,
    count: u32,
    blasts: Vec<Vec2>,
}

impl GrenadeSystem {
    pub fn new(tuning: GrenadeTuning) -> Self {
        let count = tuning.starting_count.min(tuning.max_count);
        Self {
            tuning,
            grenades: Vec::new(),
            count,
            blasts: Vec::new(),
        }
    }

    /// Grenades carried
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn in_flight(&self) -> &[Grenade] {
        &self.grenades
    }

    /// Restock, capped at the carry limit
    pub fn add_grenades(&mut self, n: u32) {
        self.count = self.count.saturating_add(n).min(self.tuning.max_count);
    }

    /// Lob one grenade from `origin` along `aim`. False when none are carried.
    pub fn throw(&mut self, origin: Vec2, aim: Vec2, events: &mut EventQueue) -> bool {
        if self.count == 0 {
            return false;
        }
        let Some(dir) = aim.try_normalize() else {
            return false;
        };
        self.count -= 1;
        self.grenades.push(Grenade {
            pos: origin,
            height: self.tuning.release_height,
            vel: dir * self.tuning.throw_speed,
            vertical_vel: self.tuning.lift,
            fuse: self.tuning.fuse_secs,
            bounced: false,
        });
        events.push(SimEvent::GrenadeThrow { origin });
        true
    }

    pub fn update(
        &mut self,
        dt: f32,
        enemies: &mut EnemyManager,
        juice: &mut Juice,
        events: &mut EventQueue,
    ) {
        let t = &self.tuning;
        self.blasts.clear();
        self.grenades.retain_mut(|g| {
            g.vel *= t.drag.powf(dt / SIM_DT);
            g.vertical_vel -= t.gravity * dt;
            g.pos += g.vel * dt;
            g.height += g.vertical_vel * dt;

            if g.height < t.rest_height {
                g.height = t.rest_height;
                if g.vertical_vel < 0.0 {
                    g.vertical_vel = -g.vertical_vel * t.bounce_restitution;
                    g.vel *= t.bounce_friction;
                    g.bounced = true;
                }
            }

            g.fuse -= dt;
            if g.fuse <= 0.0 {
                self.blasts.push(g.pos);
                return false;
            }
            true
        });

        for i in 0..self.blasts.len() {
            let center = self.blasts[i];
            self.explode(center, enemies, juice, events);
        }
    }

    fn explode(
        &self,
        center: Vec2,
        enemies: &mut EnemyManager,
        juice: &mut Juice,
        events: &mut EventQueue,
    ) {
        events.push(SimEvent::Explosion {
            pos: center,
            intensity: BLAST_INTENSITY,
        });
        juice.shake(BLAST_SHAKE);
        juice.hitstop(BLAST_HITSTOP);

        let radius = self.tuning.blast_radius;
        for enemy in enemies.alive_enemies_mut() {
            let damage = falloff_damage(
                self.tuning.blast_damage,
                enemy.pos().distance(center),
                radius,
            );
            if damage > 0.0 {
                enemy.take_damage(damage);
                events.push(SimEvent::EnemyHit {
                    pos: enemy.pos(),
                    archetype: enemy.archetype(),
                });
            }
        }
    }

    /// New run: empty the air, restock
    pub fn reset(&mut self) {
        self.grenades.clear();
        self.count = self.tuning.starting_count.min(self.tuning.max_count);
    }
}
