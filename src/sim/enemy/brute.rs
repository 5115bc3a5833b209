//! Brute: slow tank that periodically charges in a straight line

use glam::Vec2;

use super::{AttackEvent, Body};
use crate::tuning::EnemyStats;
use crate::{heading, yaw_of};

pub const CHARGE_SPEED: f32 = 12.0;
pub const CHARGE_DURATION: f32 = 1.0;
/// A charge only starts when the player is inside this band
const CHARGE_MIN_DIST: f32 = 4.0;
const CHARGE_MAX_DIST: f32 = 15.0;
/// Cooldown after any charge ends
const CHARGE_REARM: f32 = 4.0;
/// Cooldown before the first charge after spawning
const SPAWN_CHARGE_COOLDOWN: f32 = 3.0;
/// Extra reach while charging
const CHARGE_HIT_PADDING: f32 = 0.5;
const CHARGE_LEAN: f32 = 0.3;

/// Brutes flash a little longer than light enemies
pub const HIT_FLASH: f32 = 0.08;

#[derive(Debug, Clone, PartialEq)]
pub struct BruteState {
    pub charging: bool,
    pub charge_timer: f32,
    pub charge_cooldown: f32,
    /// Locked at charge start
    pub charge_dir: Vec2,
}

impl Default for BruteState {
    fn default() -> Self {
        Self {
            charging: false,
            charge_timer: 0.0,
            charge_cooldown: SPAWN_CHARGE_COOLDOWN,
            charge_dir: Vec2::ZERO,
        }
    }
}

impl BruteState {
    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn lean(&self) -> f32 {
        if self.charging { CHARGE_LEAN } else { 0.0 }
    }

    fn end_charge(&mut self) {
        self.charging = false;
        self.charge_cooldown = CHARGE_REARM;
    }
}

pub(super) fn update(
    body: &mut Body,
    stats: &EnemyStats,
    state: &mut BruteState,
    dt: f32,
    player: Vec2,
) -> Option<AttackEvent> {
    let (to_player, dist) = heading(body.pos, player, 0.0);
    body.attack_timer -= dt;

    if state.charging {
        state.charge_timer -= dt;
        body.vel = state.charge_dir * CHARGE_SPEED;
        body.pos += body.vel * dt;

        if dist < stats.attack_range + CHARGE_HIT_PADDING {
            state.end_charge();
            body.attack_timer = stats.attack_cooldown;
            return Some(AttackEvent::Melee {
                damage: stats.damage,
            });
        }
        if state.charge_timer <= 0.0 {
            state.end_charge();
        }
        return None;
    }

    state.charge_cooldown -= dt;
    if state.charge_cooldown <= 0.0 && dist > CHARGE_MIN_DIST && dist < CHARGE_MAX_DIST {
        state.charging = true;
        state.charge_timer = CHARGE_DURATION;
        state.charge_dir = to_player;
        body.facing = yaw_of(to_player);
        return None;
    }

    body.vel = to_player * stats.speed;
    body.pos += body.vel * dt;
    if dist > 0.0 {
        body.facing = yaw_of(to_player);
    }

    if dist < stats.attack_range && body.attack_timer <= 0.0 {
        body.attack_timer = stats.attack_cooldown;
        return Some(AttackEvent::Melee {
            damage: stats.damage,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::EnemyTable;

    fn setup(pos: Vec2) -> (Body, EnemyStats, BruteState) {
        let stats = EnemyTable::default().brute;
        (Body::at(pos, stats.hp), stats, BruteState::default())
    }

    #[test]
    fn test_no_charge_right_after_spawn() {
        let (mut body, stats, mut state) = setup(Vec2::new(10.0, 0.0));
        for _ in 0..60 {
            update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO);
            assert!(!state.charging);
        }
    }

    #[test]
    fn test_charge_locks_direction_and_hits() {
        let (mut body, stats, mut state) = setup(Vec2::new(10.0, 0.0));
        state.charge_cooldown = 0.0;
        update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO);
        assert!(state.charging);
        assert_eq!(state.charge_dir, Vec2::new(-1.0, 0.0));

        let mut hit = None;
        for _ in 0..60 {
            hit = update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO);
            if hit.is_some() {
                break;
            }
        }
        assert_eq!(
            hit,
            Some(AttackEvent::Melee {
                damage: stats.damage
            })
        );
        assert!(!state.charging);
        assert_eq!(state.charge_cooldown, CHARGE_REARM);
    }

    #[test]
    fn test_missed_charge_rearms() {
        let (mut body, stats, mut state) = setup(Vec2::new(10.0, 0.0));
        state.charge_cooldown = 0.0;
        update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO);
        assert!(state.charging);

        // Player steps out of the line: the charge runs its course
        let dodge = Vec2::new(0.0, 20.0);
        for _ in 0..61 {
            assert_eq!(update(&mut body, &stats, &mut state, 1.0 / 60.0, dodge), None);
        }
        assert!(!state.charging);
        assert!(state.charge_cooldown > 3.0);
    }

    #[test]
    fn test_no_charge_outside_band() {
        let (mut body, stats, mut state) = setup(Vec2::new(3.0, 0.0));
        state.charge_cooldown = 0.0;
        body.attack_timer = 100.0;
        update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO);
        assert!(!state.charging);
    }

    #[test]
    fn test_melee_in_contact_range() {
        let (mut body, stats, mut state) = setup(Vec2::new(1.5, 0.0));
        let hit = update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO);
        assert_eq!(
            hit,
            Some(AttackEvent::Melee {
                damage: stats.damage
            })
        );
        let again = update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO);
        assert_eq!(again, None);
    }
}
