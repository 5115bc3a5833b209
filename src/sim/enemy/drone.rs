//! Drone: fast swarm melee enemy (boids steering toward the player)

use glam::Vec2;
use rand::Rng;

use super::{AttackEvent, Body};
use crate::tuning::EnemyStats;
use crate::{heading, yaw_of};

/// Radius within which other drones count as flock neighbors
pub const NEIGHBOR_RADIUS: f32 = 3.0;
const SEPARATION_RADIUS: f32 = 1.5;

const SEPARATION_WEIGHT: f32 = 2.0;
const COHESION_WEIGHT: f32 = 0.3;
const ALIGNMENT_WEIGHT: f32 = 0.5;
const TARGET_WEIGHT: f32 = 3.0;
/// Steering acceleration gain
const STEER_GAIN: f32 = 3.0;

const BOB_RATE: f32 = 5.0;
const BOB_AMPLITUDE: f32 = 0.1;

/// Another drone as seen by the flocking rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroneState {
    pub bob_phase: f32,
}

impl DroneState {
    pub(super) fn new(rng: &mut impl Rng) -> Self {
        Self {
            bob_phase: rng.random::<f32>() * std::f32::consts::TAU,
        }
    }

    pub(super) fn reset(&mut self) {}

    pub fn bob_offset(&self) -> f32 {
        self.bob_phase.sin() * BOB_AMPLITUDE
    }
}

/// Separation + cohesion + alignment over `neighbors`, plus a pull toward the player
fn steering(pos: Vec2, to_player: Vec2, neighbors: &[Neighbor]) -> Vec2 {
    let mut separation = Vec2::ZERO;
    let mut center = Vec2::ZERO;
    let mut heading_sum = Vec2::ZERO;
    let mut count = 0u32;

    for n in neighbors {
        let offset = pos - n.pos;
        let dist = offset.length();
        if dist >= NEIGHBOR_RADIUS {
            continue;
        }
        count += 1;
        if dist < SEPARATION_RADIUS && dist > 0.01 {
            separation += offset / dist;
        }
        center += n.pos;
        heading_sum += n.vel;
    }

    let (cohesion, alignment) = if count > 0 {
        let inv = 1.0 / count as f32;
        (center * inv - pos, heading_sum * inv)
    } else {
        (Vec2::ZERO, Vec2::ZERO)
    };

    separation * SEPARATION_WEIGHT
        + cohesion * COHESION_WEIGHT
        + alignment * ALIGNMENT_WEIGHT
        + to_player * TARGET_WEIGHT
}

pub(super) fn update(
    body: &mut Body,
    stats: &EnemyStats,
    state: &mut DroneState,
    dt: f32,
    player: Vec2,
    neighbors: &[Neighbor],
) -> Option<AttackEvent> {
    let (to_player, dist) = heading(body.pos, player, 0.1);

    let steer = steering(body.pos, to_player, neighbors);
    body.vel = (body.vel + steer * dt * STEER_GAIN).clamp_length_max(stats.speed);
    body.pos += body.vel * dt;

    state.bob_phase = (state.bob_phase + dt * BOB_RATE) % std::f32::consts::TAU;
    if body.vel.length_squared() > 0.01 {
        body.facing = yaw_of(body.vel);
    }

    body.attack_timer -= dt;
    if dist < stats.attack_range && body.attack_timer <= 0.0 {
        body.attack_timer = stats.attack_cooldown;
        return Some(AttackEvent::Melee {
            damage: stats.damage,
        });
    }
    None
}
