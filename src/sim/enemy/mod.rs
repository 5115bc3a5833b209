//! Enemy actors
//!
//! Every enemy is one `Enemy` struct with a closed `Behavior` variant per
//! archetype. Instances are pre-allocated by the director and recycled:
//!
//! ```text
//! Dormant --spawn--> Active --take_damage (hp <= 0)--> Dead(Killed)
//!                      |  \--self-detonation--------> Dead(Detonated)
//!                      \----deactivate--------------> Dead(Dismissed)
//! Dead --spawn--> Active
//! ```
//!
//! Calls that do not apply to the current state (`update`/`take_damage` on a
//! non-active enemy, `spawn` on an active one) are no-ops.

pub mod bomber;
pub mod brute;
pub mod drone;
pub mod spitter;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::Poolable;
use crate::tuning::EnemyStats;

pub use bomber::BomberState;
pub use brute::BruteState;
pub use drone::{DroneState, Neighbor};
pub use spitter::{SpitterShot, SpitterState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Drone,
    Spitter,
    Brute,
    Bomber,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Drone,
        Archetype::Spitter,
        Archetype::Brute,
        Archetype::Bomber,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Archetype::Drone => 0,
            Archetype::Spitter => 1,
            Archetype::Brute => 2,
            Archetype::Bomber => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::Drone => "drone",
            Archetype::Spitter => "spitter",
            Archetype::Brute => "brute",
            Archetype::Bomber => "bomber",
        }
    }
}

/// Why an enemy stopped being active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Damage brought hp to zero
    Killed,
    /// Bomber blew itself up on contact
    Detonated,
    /// Force-removed (wave clear / game over); no death effects
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    /// Pre-allocated, never spawned
    Dormant,
    Active,
    Dead(DeathCause),
}

/// Attack produced by an enemy's update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackEvent {
    /// Contact hit on the player
    Melee { damage: f32 },
    /// Bomber self-detonation; the bomber is dead afterwards
    Explosion { damage: f32 },
    /// Spitter launched a glob. Hits are resolved by
    /// [`Enemy::check_projectile_hits`], not here.
    Ranged,
}

/// Per-archetype behavior state
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    Drone(DroneState),
    Spitter(SpitterState),
    Brute(BruteState),
    Bomber(BomberState),
}

impl Behavior {
    fn new(archetype: Archetype, rng: &mut impl Rng) -> Self {
        match archetype {
            Archetype::Drone => Behavior::Drone(DroneState::new(rng)),
            Archetype::Spitter => Behavior::Spitter(SpitterState::new(rng)),
            Archetype::Brute => Behavior::Brute(BruteState::default()),
            Archetype::Bomber => Behavior::Bomber(BomberState::new(rng)),
        }
    }

    pub fn archetype(&self) -> Archetype {
        match self {
            Behavior::Drone(_) => Archetype::Drone,
            Behavior::Spitter(_) => Archetype::Spitter,
            Behavior::Brute(_) => Archetype::Brute,
            Behavior::Bomber(_) => Archetype::Bomber,
        }
    }
}

/// Physical and combat state shared by all archetypes
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Yaw (radians) for transform sync
    pub facing: f32,
    pub hp: f32,
    /// Counts down to the next allowed attack
    pub attack_timer: f32,
    /// Seconds of white hit-flash remaining
    pub hit_flash: f32,
}

impl Body {
    fn at(pos: Vec2, hp: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing: 0.0,
            hp,
            attack_timer: 0.0,
            hit_flash: 0.0,
        }
    }
}

/// Stable reference to one life of one enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyHandle {
    pub archetype: Archetype,
    pub slot: usize,
    pub generation: u32,
}

/// What a renderer needs to place one enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub archetype: Archetype,
    pub pos: Vec2,
    pub yaw: f32,
    /// Vertical offset on top of the model's rest height (bobbing)
    pub lift: f32,
    /// Forward lean (radians), brutes while charging
    pub lean: f32,
    /// 0..1 glow intensity, bombers only
    pub glow: f32,
    pub visible: bool,
    pub hit_flash: f32,
    pub health: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub slot: usize,
    /// Incremented on every spawn
    pub generation: u32,
    pub life: LifeState,
    /// Set once the director has run death effects and scoring
    pub death_processed: bool,
    pub stats: EnemyStats,
    pub body: Body,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn new(archetype: Archetype, slot: usize, stats: EnemyStats, rng: &mut impl Rng) -> Self {
        Self {
            slot,
            generation: 0,
            life: LifeState::Dormant,
            death_processed: false,
            body: Body::at(Vec2::ZERO, stats.hp),
            stats,
            behavior: Behavior::new(archetype, rng),
        }
    }

    #[inline]
    pub fn archetype(&self) -> Archetype {
        self.behavior.archetype()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Active
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.stats.radius
    }

    pub fn handle(&self) -> EnemyHandle {
        EnemyHandle {
            archetype: self.archetype(),
            slot: self.slot,
            generation: self.generation,
        }
    }

    /// True if `handle` still refers to this enemy's current, living incarnation
    pub fn matches(&self, handle: EnemyHandle) -> bool {
        self.is_alive() && handle.generation == self.generation && handle.slot == self.slot
    }

    /// Reactivate at `pos` with fresh transient state.
    ///
    /// Returns false (and does nothing) if the enemy is already active.
    pub fn spawn(&mut self, pos: Vec2, rng: &mut impl Rng) -> bool {
        if self.is_alive() {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        self.life = LifeState::Active;
        self.death_processed = false;
        self.body = Body::at(pos, self.stats.hp);

        match &mut self.behavior {
            Behavior::Drone(s) => s.reset(),
            Behavior::Spitter(s) => {
                s.reset(rng);
                self.body.attack_timer = rng.random::<f32>() * spitter::FIRST_SHOT_STAGGER;
            }
            Behavior::Brute(s) => s.reset(),
            Behavior::Bomber(s) => s.reset(),
        }
        true
    }

    /// Apply damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.body.hp -= amount;
        self.body.hit_flash = match self.behavior {
            Behavior::Brute(_) => brute::HIT_FLASH,
            _ => HIT_FLASH,
        };
        if self.body.hp <= 0.0 {
            self.die(DeathCause::Killed);
            return true;
        }
        false
    }

    /// Force-remove without death effects or score
    pub fn deactivate(&mut self) {
        if self.is_alive() {
            self.die(DeathCause::Dismissed);
            self.death_processed = true;
        }
    }

    fn die(&mut self, cause: DeathCause) {
        self.life = LifeState::Dead(cause);
        if let Behavior::Spitter(s) = &mut self.behavior {
            s.shots.clear();
        }
    }

    /// Advance one tick. `neighbors` is only read by drones.
    ///
    /// A non-active enemy is left untouched and returns `None`.
    pub fn update(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        neighbors: &[Neighbor],
        rng: &mut impl Rng,
    ) -> Option<AttackEvent> {
        if !self.is_alive() {
            return None;
        }
        self.body.hit_flash = (self.body.hit_flash - dt).max(0.0);

        let attack = match &mut self.behavior {
            Behavior::Drone(s) => {
                drone::update(&mut self.body, &self.stats, s, dt, player_pos, neighbors)
            }
            Behavior::Spitter(s) => {
                spitter::update(&mut self.body, &self.stats, s, dt, player_pos, rng)
            }
            Behavior::Brute(s) => brute::update(&mut self.body, &self.stats, s, dt, player_pos),
            Behavior::Bomber(s) => bomber::update(&mut self.body, &self.stats, s, dt, player_pos),
        };

        if let Some(AttackEvent::Explosion { .. }) = attack {
            self.die(DeathCause::Detonated);
        }
        attack
    }

    /// Spitter glob vs player check; returns damage dealt (0 if none).
    ///
    /// This is the only place spitter globs hurt the player. The director
    /// polls it once per tick after `update`.
    pub fn check_projectile_hits(&mut self, player_pos: Vec2) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        match &mut self.behavior {
            Behavior::Spitter(s) => {
                if s.take_hit(player_pos) {
                    self.stats.damage
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    /// True for a bomber that blew itself up (as opposed to being shot)
    pub fn self_detonated(&self) -> bool {
        self.life == LifeState::Dead(DeathCause::Detonated)
    }

    pub fn view(&self) -> EnemyView {
        let (lift, lean, glow) = match &self.behavior {
            Behavior::Drone(s) => (s.bob_offset(), 0.0, 0.0),
            Behavior::Brute(s) => (0.0, s.lean(), 0.0),
            Behavior::Bomber(s) => (0.0, 0.0, s.glow()),
            Behavior::Spitter(_) => (0.0, 0.0, 0.0),
        };
        EnemyView {
            archetype: self.archetype(),
            pos: self.body.pos,
            yaw: self.body.facing,
            lift,
            lean,
            glow,
            visible: self.is_alive(),
            hit_flash: self.body.hit_flash,
            health: (self.body.hp / self.stats.hp).clamp(0.0, 1.0),
        }
    }
}

impl Poolable for Enemy {
    fn reset(&mut self) {
        self.body.vel = Vec2::ZERO;
        self.body.hit_flash = 0.0;
    }
}

/// Hit-flash duration for light enemies
pub const HIT_FLASH: f32 = 0.05;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::EnemyTable;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn make(archetype: Archetype) -> (Enemy, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(7);
        let stats = EnemyTable::default().get(archetype).clone();
        (Enemy::new(archetype, 0, stats, &mut rng), rng)
    }

    #[test]
    fn test_update_on_dormant_is_noop() {
        for archetype in Archetype::ALL {
            let (mut enemy, mut rng) = make(archetype);
            let before = enemy.clone();
            assert_eq!(enemy.update(0.1, Vec2::ZERO, &[], &mut rng), None);
            assert_eq!(enemy, before, "{:?} mutated while dormant", archetype);
        }
    }

    #[test]
    fn test_update_on_dead_is_noop() {
        for archetype in Archetype::ALL {
            let (mut enemy, mut rng) = make(archetype);
            enemy.spawn(Vec2::new(5.0, 0.0), &mut rng);
            enemy.take_damage(10_000.0);
            let before = enemy.clone();
            assert_eq!(enemy.update(0.1, Vec2::ZERO, &[], &mut rng), None);
            assert_eq!(enemy, before);
        }
    }

    #[test]
    fn test_take_damage_on_inactive_is_noop() {
        let (mut enemy, _) = make(Archetype::Brute);
        let before = enemy.clone();
        assert!(!enemy.take_damage(50.0));
        assert_eq!(enemy, before);
    }

    #[test]
    fn test_spawn_only_from_dormant_or_dead() {
        let (mut enemy, mut rng) = make(Archetype::Drone);
        assert!(enemy.spawn(Vec2::ONE, &mut rng));
        assert_eq!(enemy.generation, 1);
        assert!(!enemy.spawn(Vec2::ZERO, &mut rng));
        assert_eq!(enemy.pos(), Vec2::ONE);

        enemy.take_damage(1_000.0);
        assert_eq!(enemy.life, LifeState::Dead(DeathCause::Killed));
        assert!(enemy.spawn(Vec2::ZERO, &mut rng));
        assert_eq!(enemy.generation, 2);
        assert_eq!(enemy.body.hp, enemy.stats.hp);
        assert!(!enemy.death_processed);
    }

    #[test]
    fn test_handle_revalidation_across_recycle() {
        let (mut enemy, mut rng) = make(Archetype::Bomber);
        enemy.spawn(Vec2::ZERO, &mut rng);
        let handle = enemy.handle();
        assert!(enemy.matches(handle));

        enemy.deactivate();
        assert!(!enemy.matches(handle));
        enemy.spawn(Vec2::ZERO, &mut rng);
        assert!(!enemy.matches(handle));
        assert!(enemy.matches(enemy.handle()));
    }

    #[test]
    fn test_deactivate_skips_death_processing() {
        let (mut enemy, mut rng) = make(Archetype::Spitter);
        enemy.spawn(Vec2::ZERO, &mut rng);
        enemy.deactivate();
        assert_eq!(enemy.life, LifeState::Dead(DeathCause::Dismissed));
        assert!(enemy.death_processed);
    }

    #[test]
    fn test_hit_flash_counts_down() {
        let (mut enemy, mut rng) = make(Archetype::Brute);
        enemy.spawn(Vec2::new(50.0, 0.0), &mut rng);
        enemy.take_damage(1.0);
        assert_eq!(enemy.body.hit_flash, brute::HIT_FLASH);
        enemy.update(0.05, Vec2::ZERO, &[], &mut rng);
        assert!(enemy.body.hit_flash < brute::HIT_FLASH);
        enemy.update(0.05, Vec2::ZERO, &[], &mut rng);
        assert_eq!(enemy.body.hit_flash, 0.0);
    }

    #[test]
    fn test_view_hides_dead_enemies() {
        let (mut enemy, mut rng) = make(Archetype::Drone);
        assert!(!enemy.view().visible);
        enemy.spawn(Vec2::new(3.0, 4.0), &mut rng);
        let view = enemy.view();
        assert!(view.visible);
        assert_eq!(view.pos, Vec2::new(3.0, 4.0));
        assert_eq!(view.health, 1.0);
    }
}
