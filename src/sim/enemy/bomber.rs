//! Bomber: runs straight at the player and self-destructs on contact

use glam::Vec2;
use rand::Rng;

use super::{AttackEvent, Body};
use crate::tuning::EnemyStats;
use crate::{heading, yaw_of};

const PULSE_BASE_RATE: f32 = 3.0;
const PULSE_PROXIMITY_RATE: f32 = 15.0;
/// Pulse rate saturates inside this distance
const PULSE_RANGE: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BomberState {
    pub pulse_phase: f32,
    /// Blinks faster as the player gets closer
    pub pulse_rate: f32,
    pub exploded: bool,
}

impl BomberState {
    pub(super) fn new(rng: &mut impl Rng) -> Self {
        Self {
            pulse_phase: rng.random::<f32>() * std::f32::consts::TAU,
            pulse_rate: PULSE_BASE_RATE,
            exploded: false,
        }
    }

    pub(super) fn reset(&mut self) {
        self.pulse_rate = PULSE_BASE_RATE;
        self.exploded = false;
    }

    /// 0..1 glow for the warning light
    pub fn glow(&self) -> f32 {
        0.5 + 0.5 * self.pulse_phase.sin()
    }
}

fn pulse_rate(dist: f32) -> f32 {
    PULSE_BASE_RATE + (1.0 - (dist / PULSE_RANGE).min(1.0)) * PULSE_PROXIMITY_RATE
}

pub(super) fn update(
    body: &mut Body,
    stats: &EnemyStats,
    state: &mut BomberState,
    dt: f32,
    player: Vec2,
) -> Option<AttackEvent> {
    let (to_player, dist) = heading(body.pos, player, 0.1);

    body.vel = to_player * stats.speed;
    body.pos += body.vel * dt;
    if to_player != Vec2::ZERO {
        body.facing = yaw_of(to_player);
    }

    state.pulse_rate = pulse_rate(dist);
    state.pulse_phase = (state.pulse_phase + dt * state.pulse_rate) % std::f32::consts::TAU;

    if dist < stats.attack_range {
        state.exploded = true;
        body.vel = Vec2::ZERO;
        return Some(AttackEvent::Explosion {
            damage: stats.damage,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::EnemyTable;

    fn setup(pos: Vec2) -> (Body, EnemyStats, BomberState) {
        let stats = EnemyTable::default().bomber;
        let state = BomberState {
            pulse_phase: 0.0,
            pulse_rate: PULSE_BASE_RATE,
            exploded: false,
        };
        (Body::at(pos, stats.hp), stats, state)
    }

    #[test]
    fn test_pulse_rate_rises_with_proximity() {
        assert_eq!(pulse_rate(20.0), PULSE_BASE_RATE);
        assert_eq!(pulse_rate(10.0), PULSE_BASE_RATE);
        assert_eq!(pulse_rate(0.0), PULSE_BASE_RATE + PULSE_PROXIMITY_RATE);
        assert!(pulse_rate(2.0) > pulse_rate(8.0));
    }

    #[test]
    fn test_runs_straight_at_player() {
        let (mut body, stats, mut state) = setup(Vec2::new(0.0, 20.0));
        update(&mut body, &stats, &mut state, 0.1, Vec2::ZERO);
        assert_eq!(body.pos.x, 0.0);
        assert!((body.pos.y - (20.0 - stats.speed * 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_explodes_on_contact() {
        let (mut body, stats, mut state) = setup(Vec2::new(1.0, 0.0));
        let event = update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO);
        assert_eq!(
            event,
            Some(AttackEvent::Explosion {
                damage: stats.damage
            })
        );
        assert!(state.exploded);
    }
}
