//! Spitter: keeps its distance, strafes, and lobs slow globs at the player

use glam::Vec2;
use rand::Rng;

use super::{AttackEvent, Body};
use crate::tuning::EnemyStats;
use crate::{heading, yaw_of};

/// Distance the spitter tries to hold from the player
pub const PREFERRED_DISTANCE: f32 = 10.0;
/// Dead band around the preferred distance
const DISTANCE_BUFFER: f32 = 2.0;
/// Weight of the sideways component while holding distance
const STRAFE_WEIGHT: f32 = 0.7;
const STRAFE_MIN_SECS: f32 = 1.5;
const STRAFE_JITTER_SECS: f32 = 2.0;

pub const SHOT_SPEED: f32 = 12.0;
pub const SHOT_LIFETIME: f32 = 3.0;
/// Glob vs player hit distance
pub const SHOT_HIT_RADIUS: f32 = 0.6;
/// Upper bound of the random delay before the first shot after spawning
pub const FIRST_SHOT_STAGGER: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpitterShot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpitterState {
    /// +1 or -1
    pub strafe_dir: f32,
    pub strafe_timer: f32,
    /// Globs in flight, owned by this spitter
    pub shots: Vec<SpitterShot>,
}

fn random_sign(rng: &mut impl Rng) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

impl SpitterState {
    pub(super) fn new(rng: &mut impl Rng) -> Self {
        Self {
            strafe_dir: random_sign(rng),
            strafe_timer: 0.0,
            shots: Vec::new(),
        }
    }

    pub(super) fn reset(&mut self, rng: &mut impl Rng) {
        self.strafe_dir = random_sign(rng);
        self.strafe_timer = 0.0;
        self.shots.clear();
    }

    /// Remove the first glob within hit range of `target`
    pub(super) fn take_hit(&mut self, target: Vec2) -> bool {
        let hit = self
            .shots
            .iter()
            .position(|s| s.pos.distance(target) < SHOT_HIT_RADIUS);
        match hit {
            Some(i) => {
                self.shots.swap_remove(i);
                true
            }
            None => false,
        }
    }
}

pub(super) fn update(
    body: &mut Body,
    stats: &EnemyStats,
    state: &mut SpitterState,
    dt: f32,
    player: Vec2,
    rng: &mut impl Rng,
) -> Option<AttackEvent> {
    let (to_player, dist) = heading(body.pos, player, 0.0);

    state.strafe_timer -= dt;
    if state.strafe_timer <= 0.0 {
        state.strafe_dir = -state.strafe_dir;
        state.strafe_timer = STRAFE_MIN_SECS + rng.random::<f32>() * STRAFE_JITTER_SECS;
    }

    let mut desired = if dist < PREFERRED_DISTANCE - DISTANCE_BUFFER {
        -to_player
    } else if dist > PREFERRED_DISTANCE + DISTANCE_BUFFER {
        to_player
    } else {
        Vec2::ZERO
    };
    // Perpendicular to the player direction on the ground plane
    let strafe = Vec2::new(to_player.y, -to_player.x) * state.strafe_dir;
    desired += strafe * STRAFE_WEIGHT;

    body.vel = desired.normalize_or_zero() * stats.speed;
    body.pos += body.vel * dt;
    if dist > 0.0 {
        body.facing = yaw_of(to_player);
    }

    let mut attack = None;
    body.attack_timer -= dt;
    if dist < stats.attack_range && body.attack_timer <= 0.0 {
        body.attack_timer = stats.attack_cooldown;
        state.shots.push(SpitterShot {
            pos: body.pos,
            vel: to_player * SHOT_SPEED,
            life: SHOT_LIFETIME,
        });
        attack = Some(AttackEvent::Ranged);
    }

    state.shots.retain_mut(|shot| {
        shot.life -= dt;
        shot.pos += shot.vel * dt;
        shot.life > 0.0
    });

    attack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::EnemyTable;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(pos: Vec2) -> (Body, EnemyStats, SpitterState, Pcg32) {
        let stats = EnemyTable::default().spitter;
        let mut rng = Pcg32::seed_from_u64(3);
        let state = SpitterState::new(&mut rng);
        (Body::at(pos, stats.hp), stats, state, rng)
    }

    #[test]
    fn test_retreats_when_too_close() {
        let (mut body, stats, mut state, mut rng) = setup(Vec2::new(3.0, 0.0));
        body.attack_timer = 100.0;
        let before = body.pos.length();
        for _ in 0..10 {
            update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO, &mut rng);
        }
        assert!(body.pos.length() > before);
    }

    #[test]
    fn test_approaches_when_too_far() {
        let (mut body, stats, mut state, mut rng) = setup(Vec2::new(30.0, 0.0));
        let before = body.pos.length();
        for _ in 0..10 {
            update(&mut body, &stats, &mut state, 1.0 / 60.0, Vec2::ZERO, &mut rng);
        }
        assert!(body.pos.length() < before);
    }

    #[test]
    fn test_fires_in_range_and_respects_cooldown() {
        let (mut body, stats, mut state, mut rng) = setup(Vec2::new(10.0, 0.0));
        let first = update(&mut body, &stats, &mut state, 0.01, Vec2::ZERO, &mut rng);
        assert_eq!(first, Some(AttackEvent::Ranged));
        assert_eq!(state.shots.len(), 1);
        let second = update(&mut body, &stats, &mut state, 0.01, Vec2::ZERO, &mut rng);
        assert_eq!(second, None);
        assert_eq!(state.shots.len(), 1);
    }

    #[test]
    fn test_shots_expire() {
        let (mut body, stats, mut state, mut rng) = setup(Vec2::new(10.0, 0.0));
        update(&mut body, &stats, &mut state, 0.01, Vec2::new(0.0, 100.0), &mut rng);
        // Out of range: nothing fired
        assert!(state.shots.is_empty());

        state.shots.push(SpitterShot {
            pos: Vec2::ZERO,
            vel: Vec2::X,
            life: 0.05,
        });
        body.attack_timer = 100.0;
        update(&mut body, &stats, &mut state, 0.1, Vec2::new(0.0, 100.0), &mut rng);
        assert!(state.shots.is_empty());
    }

    #[test]
    fn test_take_hit_consumes_one_glob() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = SpitterState::new(&mut rng);
        let glob = SpitterShot {
            pos: Vec2::new(0.3, 0.0),
            vel: Vec2::ZERO,
            life: 1.0,
        };
        state.shots.push(glob);
        state.shots.push(glob);
        assert!(state.take_hit(Vec2::ZERO));
        assert_eq!(state.shots.len(), 1);
        assert!(!state.take_hit(Vec2::new(5.0, 0.0)));
    }
}
