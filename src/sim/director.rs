//! Wave director / enemy manager
//!
//! Owns one fixed-size pool per archetype, paces the shuffled spawn queue,
//! runs every active enemy once per tick, turns their attacks into player
//! damage and feedback, and scores each death exactly once.
//!
//! Per-tick order:
//! 1. release at most one queued enemy when the stagger timer elapses
//! 2. bucket live drones into the spatial grid (flocking neighbors)
//! 3. update every live enemy, feeding drones their neighbors
//! 4. resolve melee/explosion attacks against the player
//! 5. poll each spitter's globs against the player once
//! 6. death scan: effects + score for unprocessed deaths, release slots
//! 7. latch wave completion

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{
    Archetype, AttackEvent, DeathCause, Enemy, EnemyHandle, EnemyView, LifeState, Neighbor,
    drone::NEIGHBOR_RADIUS,
};
use super::events::{EventQueue, SimEvent};
use super::grid::SpatialGrid;
use super::juice::Juice;
use super::pool::ObjectPool;
use super::score::ScoreManager;
use crate::clamp_to_level;
use crate::tuning::{EnemyTable, WaveTuning};

/// Flocking grid bucket size
const GRID_CELL: f32 = 5.0;

const MELEE_SHAKE: f32 = 0.15;
const EXPLOSION_SHAKE: f32 = 0.4;
const SPIT_HIT_SHAKE: f32 = 0.1;
const DETONATION_SHAKE: f32 = 0.3;
/// Blast burst emitted where a bomber reached the player
const ATTACK_BLAST_INTENSITY: f32 = 1.5;
/// Burst emitted by the death pass for a self-detonated bomber
const DEATH_BLAST_INTENSITY: f32 = 1.0;

/// What the director needs from the player
pub trait PlayerTarget {
    fn position(&self) -> Vec2;

    /// Apply damage. Returns false if the hit was ignored (invulnerable, dead).
    fn take_damage(&mut self, amount: f32) -> bool;
}

/// Enemy counts for one wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WaveComposition {
    pub drones: usize,
    pub spitters: usize,
    pub brutes: usize,
    pub bombers: usize,
}

impl WaveComposition {
    /// Counts for wave `n` (1-based). Later archetypes unlock at higher waves.
    pub fn for_wave(n: u32) -> Self {
        let n = n as usize;
        Self {
            drones: 3 + 2 * n,
            spitters: if n >= 2 { n * 7 / 10 } else { 0 },
            brutes: if n >= 4 { ((n - 3) / 2).max(1) } else { 0 },
            bombers: if n >= 3 { ((n - 2) / 2).max(1) } else { 0 },
        }
    }

    pub fn get(&self, archetype: Archetype) -> usize {
        match archetype {
            Archetype::Drone => self.drones,
            Archetype::Spitter => self.spitters,
            Archetype::Brute => self.brutes,
            Archetype::Bomber => self.bombers,
        }
    }

    pub fn total(&self) -> usize {
        self.drones + self.spitters + self.brutes + self.bombers
    }

    /// Flat list of archetype tags, unshuffled
    pub fn to_queue(&self) -> Vec<Archetype> {
        Archetype::ALL
            .iter()
            .flat_map(|&a| std::iter::repeat_n(a, self.get(a)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct EnemyManager {
    pools: [ObjectPool<Enemy>; 4],
    waves: WaveTuning,
    rng: Pcg32,

    wave: u32,
    /// Shuffled archetypes still to release; pops from the back
    queue: Vec<Archetype>,
    spawn_timer: f32,
    wave_complete: bool,

    grid: SpatialGrid,
    /// Drone pos/vel by slot, snapshotted before any drone moves this tick
    flock: Vec<Neighbor>,
    neighbor_ids: Vec<usize>,
    neighbors: Vec<Neighbor>,
    dead_slots: Vec<usize>,
}

impl EnemyManager {
    pub fn new(table: &EnemyTable, waves: WaveTuning, mut rng: Pcg32) -> Self {
        let pools = Archetype::ALL.map(|archetype| {
            let stats = table.get(archetype).clone();
            ObjectPool::new(stats.pool_size, |slot| {
                Enemy::new(archetype, slot, stats.clone(), &mut rng)
            })
        });
        let drone_capacity = pools[Archetype::Drone.index()].capacity();
        Self {
            pools,
            waves,
            rng,
            wave: 0,
            queue: Vec::new(),
            spawn_timer: 0.0,
            wave_complete: false,
            grid: SpatialGrid::new(GRID_CELL),
            flock: vec![
                Neighbor {
                    pos: Vec2::ZERO,
                    vel: Vec2::ZERO,
                };
                drone_capacity
            ],
            neighbor_ids: Vec::new(),
            neighbors: Vec::new(),
            dead_slots: Vec::new(),
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Enemies still waiting in the spawn queue
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Latched: true from the tick the wave empties until the next `start_wave`
    pub fn is_wave_complete(&self) -> bool {
        self.wave_complete
    }

    pub fn alive_count(&self) -> usize {
        self.pools
            .iter()
            .flat_map(|p| p.iter_active())
            .filter(|(_, e)| e.is_alive())
            .count()
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.pools
            .iter()
            .flat_map(|p| p.iter_active())
            .map(|(_, e)| e)
            .filter(|e| e.is_alive())
    }

    pub fn alive_enemies_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.pools
            .iter_mut()
            .flat_map(|p| p.iter_active_mut())
            .map(|(_, e)| e)
            .filter(|e| e.is_alive())
    }

    /// Transform data for every visible enemy
    pub fn views(&self) -> impl Iterator<Item = EnemyView> + '_ {
        self.alive_enemies().map(Enemy::view)
    }

    /// Resolve a handle; `None` once that enemy died or its slot was reused
    pub fn get(&self, handle: EnemyHandle) -> Option<&Enemy> {
        self.pools[handle.archetype.index()]
            .get(handle.slot)
            .filter(|e| e.matches(handle))
    }

    pub fn get_mut(&mut self, handle: EnemyHandle) -> Option<&mut Enemy> {
        self.pools[handle.archetype.index()]
            .get_mut(handle.slot)
            .filter(|e| e.matches(handle))
    }

    /// Compose, shuffle and arm the spawn queue for wave `n`.
    /// Returns the number of enemies queued.
    pub fn start_wave(&mut self, n: u32) -> usize {
        let composition = WaveComposition::for_wave(n);
        self.wave = n;
        self.queue = composition.to_queue();
        self.queue.shuffle(&mut self.rng);
        self.spawn_timer = 0.0;
        self.wave_complete = false;
        log::info!(
            "Wave {n}: {} drones, {} spitters, {} brutes, {} bombers",
            composition.drones,
            composition.spitters,
            composition.brutes,
            composition.bombers
        );
        composition.total()
    }

    /// Activate one enemy at `pos`. `None` if that archetype's pool is full.
    pub fn spawn_at(&mut self, archetype: Archetype, pos: Vec2) -> Option<EnemyHandle> {
        let Some((_, enemy)) = self.pools[archetype.index()].acquire() else {
            log::debug!("{} pool exhausted, dropping spawn", archetype.as_str());
            return None;
        };
        enemy.spawn(pos, &mut self.rng);
        Some(enemy.handle())
    }

    /// Random point on the spawn ring around `center`, clamped to the level
    fn spawn_point(&mut self, center: Vec2) -> Vec2 {
        let angle = self.rng.random::<f32>() * TAU;
        let jitter = self.waves.spawn_jitter.abs();
        let radius = self.waves.spawn_radius + self.rng.random_range(-jitter..=jitter);
        clamp_to_level(center + Vec2::from_angle(angle) * radius)
    }

    fn release_queued(&mut self, dt: f32, player_pos: Vec2) {
        if self.queue.is_empty() {
            return;
        }
        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 {
            return;
        }
        if let Some(archetype) = self.queue.pop() {
            let pos = self.spawn_point(player_pos);
            self.spawn_at(archetype, pos);
            self.spawn_timer = self.waves.stagger(archetype);
        }
    }

    fn rebuild_flock(&mut self) {
        self.grid.clear();
        for (slot, enemy) in self.pools[Archetype::Drone.index()].iter_active() {
            if enemy.is_alive() {
                self.flock[slot] = Neighbor {
                    pos: enemy.body.pos,
                    vel: enemy.body.vel,
                };
                self.grid.insert(slot, enemy.body.pos);
            }
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        player: &mut impl PlayerTarget,
        score: &mut ScoreManager,
        juice: &mut Juice,
        events: &mut EventQueue,
    ) {
        let player_pos = player.position();

        self.release_queued(dt, player_pos);
        self.rebuild_flock();

        for archetype in Archetype::ALL {
            for (slot, enemy) in self.pools[archetype.index()].iter_active_mut() {
                if !enemy.is_alive() {
                    continue;
                }

                self.neighbors.clear();
                if archetype == Archetype::Drone {
                    self.grid
                        .query_into(enemy.body.pos, NEIGHBOR_RADIUS, &mut self.neighbor_ids);
                    self.neighbors.extend(
                        self.neighbor_ids
                            .iter()
                            .filter(|&&id| id != slot)
                            .map(|&id| self.flock[id]),
                    );
                }

                match enemy.update(dt, player_pos, &self.neighbors, &mut self.rng) {
                    Some(AttackEvent::Melee { damage }) => {
                        if player.take_damage(damage) {
                            events.push(SimEvent::PlayerHit { damage });
                        }
                        juice.shake(MELEE_SHAKE);
                    }
                    Some(AttackEvent::Explosion { damage }) => {
                        if player.take_damage(damage) {
                            events.push(SimEvent::PlayerHit { damage });
                        }
                        juice.shake(EXPLOSION_SHAKE);
                        events.push(SimEvent::Explosion {
                            pos: enemy.body.pos,
                            intensity: ATTACK_BLAST_INTENSITY,
                        });
                    }
                    Some(AttackEvent::Ranged) => {
                        events.push(SimEvent::Spit {
                            pos: enemy.body.pos,
                        });
                    }
                    None => {}
                }

                if archetype == Archetype::Spitter {
                    let damage = enemy.check_projectile_hits(player_pos);
                    if damage > 0.0 {
                        if player.take_damage(damage) {
                            events.push(SimEvent::PlayerHit { damage });
                        }
                        juice.shake(SPIT_HIT_SHAKE);
                    }
                }
            }
        }

        self.process_deaths(score, juice, events);

        if !self.wave_complete && self.wave > 0 && self.queue.is_empty() && self.alive_count() == 0
        {
            self.wave_complete = true;
            log::info!("Wave {} cleared", self.wave);
        }
    }

    /// Effects and score for every death not yet processed, then recycle
    fn process_deaths(
        &mut self,
        score: &mut ScoreManager,
        juice: &mut Juice,
        events: &mut EventQueue,
    ) {
        for pool in &mut self.pools {
            self.dead_slots.clear();
            for (slot, enemy) in pool.iter_active_mut() {
                let LifeState::Dead(cause) = enemy.life else {
                    continue;
                };
                self.dead_slots.push(slot);
                if enemy.death_processed {
                    continue;
                }
                enemy.death_processed = true;

                let pos = enemy.body.pos;
                match cause {
                    DeathCause::Detonated => {
                        events.push(SimEvent::Explosion {
                            pos,
                            intensity: DEATH_BLAST_INTENSITY,
                        });
                        juice.shake(DETONATION_SHAKE);
                    }
                    DeathCause::Killed => events.push(SimEvent::EnemyDeath {
                        pos,
                        archetype: enemy.archetype(),
                    }),
                    DeathCause::Dismissed => continue,
                }

                let points = score.add_kill(enemy.stats.score, pos);
                events.push(SimEvent::ScorePopup { pos, points });
            }
            for &slot in &self.dead_slots {
                pool.release(slot);
            }
        }
    }

    /// Force-remove every enemy and drop the queue (game over / restart).
    /// No death effects, no score.
    pub fn clear_all(&mut self) {
        for pool in &mut self.pools {
            for (_, enemy) in pool.iter_active_mut() {
                enemy.deactivate();
            }
            pool.release_all();
        }
        self.queue.clear();
        self.spawn_timer = 0.0;
    }

    /// Full reset for a new run
    pub fn reset(&mut self) {
        self.clear_all();
        self.wave = 0;
        self.wave_complete = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::enemy::{Behavior, SpitterShot};
    use proptest::prelude::*;
    use rand::SeedableRng;

    struct Dummy {
        pos: Vec2,
        taken: f32,
    }

    impl PlayerTarget for Dummy {
        fn position(&self) -> Vec2 {
            self.pos
        }

        fn take_damage(&mut self, amount: f32) -> bool {
            self.taken += amount;
            true
        }
    }

    struct Rig {
        manager: EnemyManager,
        player: Dummy,
        score: ScoreManager,
        juice: Juice,
        events: EventQueue,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                manager: EnemyManager::new(
                    &EnemyTable::default(),
                    WaveTuning::default(),
                    Pcg32::seed_from_u64(11),
                ),
                player: Dummy {
                    pos: Vec2::ZERO,
                    taken: 0.0,
                },
                score: ScoreManager::new(),
                juice: Juice::new(&Settings::default(), Pcg32::seed_from_u64(12)),
                events: EventQueue::new(),
            }
        }

        fn step(&mut self, dt: f32) {
            self.manager.update(
                dt,
                &mut self.player,
                &mut self.score,
                &mut self.juice,
                &mut self.events,
            );
        }
    }

    #[test]
    fn test_negative_spawn_jitter_still_spawns() {
        let json = r#"{ "waves": { "spawn_jitter": -2.0 } }"#;
        let tuning = crate::tuning::Tuning::from_json(json).unwrap();
        let mut rig = Rig::new();
        rig.manager = EnemyManager::new(&tuning.enemies, tuning.waves, Pcg32::seed_from_u64(11));
        rig.manager.start_wave(1);
        for _ in 0..120 {
            rig.step(1.0 / 60.0);
        }
        assert!(rig.manager.alive_count() > 0);
    }

    #[test]
    fn test_wave_one_has_no_heavy_enemies() {
        let c = WaveComposition::for_wave(1);
        assert_eq!(c.drones, 5);
        assert_eq!(c.spitters, 0);
        assert_eq!(c.brutes, 0);
        assert_eq!(c.bombers, 0);
    }

    #[test]
    fn test_gating_thresholds() {
        assert_eq!(WaveComposition::for_wave(2).spitters, 1);
        assert_eq!(WaveComposition::for_wave(2).bombers, 0);
        assert_eq!(WaveComposition::for_wave(3).bombers, 1);
        assert_eq!(WaveComposition::for_wave(3).brutes, 0);
        assert_eq!(WaveComposition::for_wave(4).brutes, 1);
        assert_eq!(WaveComposition::for_wave(10).brutes, 3);
    }

    #[test]
    fn test_start_wave_queues_full_composition() {
        let mut rig = Rig::new();
        let total = rig.manager.start_wave(5);
        assert_eq!(total, WaveComposition::for_wave(5).total());
        assert_eq!(rig.manager.queued(), total);
        assert!(!rig.manager.is_wave_complete());
    }

    #[test]
    fn test_stagger_releases_one_at_a_time() {
        let mut rig = Rig::new();
        rig.manager.start_wave(1);
        rig.step(0.01);
        assert_eq!(rig.manager.alive_count(), 1);
        rig.step(0.01);
        assert_eq!(rig.manager.alive_count(), 1);
        rig.step(0.3);
        assert_eq!(rig.manager.alive_count(), 2);
    }

    #[test]
    fn test_spawns_on_ring_inside_level() {
        let mut rig = Rig::new();
        rig.manager.start_wave(8);
        for _ in 0..200 {
            rig.step(0.1);
        }
        for enemy in rig.manager.alive_enemies() {
            let p = enemy.pos();
            assert!(p.x.abs() <= 55.0 + 1.0 && p.y.abs() <= 45.0 + 1.0);
        }
    }

    #[test]
    fn test_scenario_drone_seeks_player() {
        let mut rig = Rig::new();
        let start = Vec2::new(10.0, 0.0);
        let handle = rig.manager.spawn_at(Archetype::Drone, start).unwrap();
        rig.step(1.0 / 60.0);
        let drone = rig.manager.get(handle).unwrap();
        let to_player = (rig.player.pos - start).normalize();
        assert!(drone.body.vel.dot(to_player) > 0.0);
    }

    #[test]
    fn test_scenario_wave_completion_latches() {
        let mut rig = Rig::new();
        rig.manager.start_wave(1);

        let mut ticks = 0;
        while !rig.manager.is_wave_complete() {
            rig.step(0.1);
            for enemy in rig.manager.alive_enemies_mut() {
                enemy.take_damage(10_000.0);
            }
            ticks += 1;
            assert!(ticks < 1_000, "wave never completed");
        }
        assert_eq!(rig.score.kills(), 5);

        for _ in 0..50 {
            rig.step(0.1);
            assert!(rig.manager.is_wave_complete());
        }

        rig.manager.start_wave(2);
        assert!(!rig.manager.is_wave_complete());
    }

    #[test]
    fn test_death_scored_once() {
        let mut rig = Rig::new();
        let handle = rig.manager.spawn_at(Archetype::Drone, Vec2::new(20.0, 0.0)).unwrap();
        rig.manager.get_mut(handle).unwrap().take_damage(1_000.0);
        // Dead but not yet scanned: nothing scored
        assert_eq!(rig.score.kills(), 0);

        for _ in 0..5 {
            rig.step(0.016);
        }
        assert_eq!(rig.score.kills(), 1);
        assert_eq!(rig.score.score(), 100);
        let deaths = rig
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::EnemyDeath { .. }))
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_bomber_detonation() {
        let mut rig = Rig::new();
        rig.manager.spawn_at(Archetype::Bomber, Vec2::new(1.0, 0.0)).unwrap();
        rig.step(1.0 / 60.0);
        assert_eq!(rig.player.taken, 35.0);
        assert_eq!(rig.manager.alive_count(), 0);
        let blasts = rig
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Explosion { .. }))
            .count();
        assert_eq!(blasts, 2);
        assert!(!rig.events.iter().any(|e| matches!(e, SimEvent::EnemyDeath { .. })));
        assert_eq!(rig.score.kills(), 1);
    }

    #[test]
    fn test_spitter_glob_polled_once() {
        let mut rig = Rig::new();
        let handle = rig.manager.spawn_at(Archetype::Spitter, Vec2::new(30.0, 0.0)).unwrap();
        if let Behavior::Spitter(s) = &mut rig.manager.get_mut(handle).unwrap().behavior {
            s.shots.push(SpitterShot {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                life: 1.0,
            });
        }
        rig.step(1.0 / 60.0);
        assert_eq!(rig.player.taken, 10.0);
        rig.step(1.0 / 60.0);
        assert_eq!(rig.player.taken, 10.0);
    }

    #[test]
    fn test_exhausted_pool_drops_spawn() {
        let mut rig = Rig::new();
        let capacity = EnemyTable::default().brute.pool_size;
        let handles: Vec<_> = (0..capacity)
            .map(|i| {
                rig.manager
                    .spawn_at(Archetype::Brute, Vec2::new(i as f32 * 3.0, 30.0))
                    .unwrap()
            })
            .collect();
        assert!(rig.manager.spawn_at(Archetype::Brute, Vec2::ZERO).is_none());
        for handle in handles {
            assert!(rig.manager.get(handle).is_some());
        }
    }

    #[test]
    fn test_clear_all_is_unscored() {
        let mut rig = Rig::new();
        rig.manager.start_wave(3);
        for _ in 0..20 {
            rig.step(0.5);
        }
        assert!(rig.manager.alive_count() > 0);
        let kills = rig.score.kills();
        rig.manager.clear_all();
        rig.step(0.016);
        assert_eq!(rig.manager.alive_count(), 0);
        assert_eq!(rig.manager.queued(), 0);
        assert_eq!(rig.score.kills(), kills);
    }

    #[test]
    fn test_stale_handle_after_recycle() {
        let mut rig = Rig::new();
        let first = rig.manager.spawn_at(Archetype::Drone, Vec2::new(20.0, 0.0)).unwrap();
        rig.manager.get_mut(first).unwrap().take_damage(1_000.0);
        rig.step(0.016);
        let second = rig.manager.spawn_at(Archetype::Drone, Vec2::new(20.0, 0.0)).unwrap();
        assert_eq!(first.slot, second.slot);
        assert!(rig.manager.get(first).is_none());
        assert!(rig.manager.get(second).is_some());
    }

    proptest! {
        #[test]
        fn prop_composition_non_decreasing(n in 1u32..200) {
            let a = WaveComposition::for_wave(n);
            let b = WaveComposition::for_wave(n + 1);
            for archetype in Archetype::ALL {
                prop_assert!(a.get(archetype) <= b.get(archetype));
            }
        }
    }
}
