//! Player weapons and pooled projectiles
//!
//! Each weapon runs a tiny state machine:
//!
//! ```text
//! Ready --fire (ammo > 0)--> Ready (ammo - 1, fire cooldown)
//! Ready --fire (ammo == 0)-> Reloading
//! Reloading --reload_secs--> Ready (full magazine)
//! ```
//!
//! Switching weapons cancels a reload without refilling. Every weapon keeps
//! its own magazine across switches.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::CollisionWorld;
use super::director::EnemyManager;
use super::events::{EventQueue, SimEvent};
use super::juice::Juice;
use super::pool::{ObjectPool, Poolable};
use crate::tuning::{ProjectileTuning, ShotCue, WeaponSpec};

const SHOT_SHAKE: f32 = 0.05;
const SHOTGUN_SHAKE: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds until expiry
    pub life: f32,
    pub damage: f32,
}

impl Poolable for Projectile {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponState {
    Ready,
    Reloading,
}

#[derive(Debug, Clone)]
struct Loadout {
    spec: WeaponSpec,
    /// Rounds left; `None` for unlimited weapons
    ammo: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct WeaponSystem {
    loadout: Vec<Loadout>,
    current: usize,
    fire_timer: f32,
    reload_timer: f32,
    reloading: bool,

    projectiles: ObjectPool<Projectile>,
    lifetime: f32,
    hit_padding: f32,
    spent: Vec<usize>,
    rng: Pcg32,
}

impl WeaponSystem {
    pub fn new(specs: &[WeaponSpec], tuning: &ProjectileTuning, rng: Pcg32) -> Self {
        let loadout = specs
            .iter()
            .map(|spec| Loadout {
                ammo: spec.magazine,
                spec: spec.clone(),
            })
            .collect();
        Self {
            loadout,
            current: 0,
            fire_timer: 0.0,
            reload_timer: 0.0,
            reloading: false,
            projectiles: ObjectPool::new(tuning.pool_size, |_| Projectile::default()),
            lifetime: tuning.lifetime,
            hit_padding: tuning.hit_padding,
            spent: Vec::new(),
            rng,
        }
    }

    fn active(&self) -> Option<&Loadout> {
        self.loadout.get(self.current)
    }

    pub fn current_spec(&self) -> Option<&WeaponSpec> {
        self.active().map(|l| &l.spec)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn weapon_count(&self) -> usize {
        self.loadout.len()
    }

    /// Rounds left in the current magazine; `None` when unlimited
    pub fn ammo(&self) -> Option<u32> {
        self.active().and_then(|l| l.ammo)
    }

    pub fn state(&self) -> WeaponState {
        if self.reloading {
            WeaponState::Reloading
        } else {
            WeaponState::Ready
        }
    }

    /// Live projectiles
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter_active().map(|(_, p)| p)
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.active_count()
    }

    pub fn projectile_capacity(&self) -> usize {
        self.projectiles.capacity()
    }

    /// HUD ammo line
    pub fn ammo_text(&self) -> String {
        let Some(active) = self.active() else {
            return String::new();
        };
        let name = &active.spec.name;
        match (active.spec.magazine, active.ammo) {
            (None, _) | (_, None) => format!("{name} | ∞"),
            _ if self.reloading => format!("{name} | RELOADING..."),
            (Some(mag), Some(ammo)) => format!("{name} | {ammo}/{mag}"),
        }
    }

    /// Pull the trigger. Returns true if a shot was fired.
    ///
    /// An empty magazine starts a reload instead of firing.
    pub fn fire(
        &mut self,
        origin: Vec2,
        aim: Vec2,
        juice: &mut Juice,
        events: &mut EventQueue,
    ) -> bool {
        if self.fire_timer > 0.0 || self.reloading {
            return false;
        }
        let Some(aim) = aim.try_normalize() else {
            return false;
        };
        let Some(active) = self.loadout.get_mut(self.current) else {
            return false;
        };
        if active.ammo == Some(0) {
            self.reload(events);
            return false;
        }
        if let Some(ammo) = active.ammo.as_mut() {
            *ammo -= 1;
        }

        let spec = &active.spec;
        self.fire_timer = spec.fire_interval;

        for _ in 0..spec.projectiles_per_shot.max(1) {
            let spread = spec.spread.abs();
            let angle = self.rng.random_range(-spread..=spread);
            let dir = Vec2::from_angle(angle).rotate(aim);
            let Some((_, projectile)) = self.projectiles.acquire() else {
                log::debug!("Projectile pool exhausted, dropping shot");
                break;
            };
            *projectile = Projectile {
                pos: origin,
                vel: dir * spec.projectile_speed,
                life: self.lifetime,
                damage: spec.damage,
            };
        }

        events.push(SimEvent::Shot {
            origin,
            dir: aim,
            cue: spec.cue,
            pitch: spec.pitch,
        });
        juice.shake(match spec.cue {
            ShotCue::Shotgun => SHOTGUN_SHAKE,
            ShotCue::Blaster => SHOT_SHAKE,
        });
        true
    }

    /// Start reloading the current weapon.
    ///
    /// Ignored for unlimited weapons, while already reloading, or when full.
    pub fn reload(&mut self, events: &mut EventQueue) -> bool {
        if self.reloading {
            return false;
        }
        let Some(active) = self.active() else {
            return false;
        };
        let (Some(mag), Some(ammo)) = (active.spec.magazine, active.ammo) else {
            return false;
        };
        if ammo >= mag {
            return false;
        }
        let reload_secs = active.spec.reload_secs;
        self.reload_timer = reload_secs;
        self.reloading = true;
        events.push(SimEvent::Reload);
        true
    }

    /// Cycle weapons by `delta` slots (wraps)
    pub fn switch(&mut self, delta: i32) {
        let len = self.loadout.len() as i32;
        if len == 0 || delta == 0 {
            return;
        }
        let next = (self.current as i32 + delta).rem_euclid(len) as usize;
        self.select(next);
    }

    /// Equip slot `index`. Returns false for an invalid or already-equipped slot.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.loadout.len() || index == self.current {
            return false;
        }
        self.current = index;
        self.reloading = false;
        self.reload_timer = 0.0;
        true
    }

    /// Advance timers and projectiles. Projectiles stop at the first static
    /// collider or enemy they touch.
    pub fn update(
        &mut self,
        dt: f32,
        world: &mut CollisionWorld,
        enemies: &mut EnemyManager,
        events: &mut EventQueue,
    ) {
        self.fire_timer = (self.fire_timer - dt).max(0.0);

        if self.reloading {
            self.reload_timer -= dt;
            if self.reload_timer <= 0.0 {
                self.reloading = false;
                if let Some(active) = self.loadout.get_mut(self.current) {
                    active.ammo = active.spec.magazine;
                }
            }
        }

        let padding = self.hit_padding;
        self.spent.clear();
        for (index, projectile) in self.projectiles.iter_active_mut() {
            projectile.life -= dt;
            if projectile.life <= 0.0 {
                self.spent.push(index);
                continue;
            }
            projectile.pos += projectile.vel * dt;

            if let Some(id) = world.projectile_vs_statics(projectile.pos) {
                events.push(SimEvent::Spark {
                    pos: projectile.pos,
                });
                if world.damage(id, projectile.damage) {
                    events.push(SimEvent::PropDestroyed {
                        collider: id,
                        pos: projectile.pos,
                    });
                }
                self.spent.push(index);
                continue;
            }

            let target = enemies
                .alive_enemies_mut()
                .find(|e| projectile.pos.distance(e.pos()) < e.radius() + padding);
            if let Some(enemy) = target {
                enemy.take_damage(projectile.damage);
                events.push(SimEvent::EnemyHit {
                    pos: projectile.pos,
                    archetype: enemy.archetype(),
                });
                self.spent.push(index);
            }
        }
        for &index in &self.spent {
            self.projectiles.release(index);
        }
    }

    /// Drop projectiles, refill magazines, equip the first weapon
    pub fn reset(&mut self) {
        self.projectiles.release_all();
        for l in &mut self.loadout {
            l.ammo = l.spec.magazine;
        }
        self.current = 0;
        self.fire_timer = 0.0;
        self.reload_timer = 0.0;
        self.reloading = false;
    }
}
