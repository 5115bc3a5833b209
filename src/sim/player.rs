//! Player body: movement, dash, health

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionWorld;
use super::director::PlayerTarget;
use crate::clamp_to_level;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Unit aim direction on the ground plane
    pub aim: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub sprinting: bool,

    dash_timer: f32,
    dash_cooldown: f32,
    dash_dir: Vec2,
    /// Dash i-frames
    dash_invincible: f32,
    /// Grace period after a hit
    hit_invincible: f32,
    pub hit_flash: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            aim: Vec2::Y,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            sprinting: false,
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            dash_dir: Vec2::ZERO,
            dash_invincible: 0.0,
            hit_invincible: 0.0,
            hit_flash: 0.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        self.dash_timer > 0.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.dash_invincible > 0.0 || self.hit_invincible > 0.0
    }

    /// Sprinting blocks the trigger
    pub fn can_fire(&self) -> bool {
        self.is_alive() && !self.sprinting
    }

    pub fn health_fraction(&self) -> f32 {
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    /// Where shots leave the gun
    pub fn muzzle(&self) -> Vec2 {
        self.pos + self.aim * MUZZLE_OFFSET
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Start a dash along `move_dir`. Needs a move input and a ready cooldown.
    pub fn try_dash(&mut self, move_dir: Vec2) -> bool {
        let dir = move_dir.normalize_or_zero();
        if dir == Vec2::ZERO || self.dash_cooldown > 0.0 || !self.is_alive() {
            return false;
        }
        self.dash_dir = dir;
        self.dash_timer = DASH_DURATION;
        self.dash_cooldown = DASH_COOLDOWN;
        self.dash_invincible = DASH_INVINCIBILITY;
        true
    }

    /// Integrate movement and timers, then resolve against static geometry
    pub fn update(
        &mut self,
        dt: f32,
        move_dir: Vec2,
        aim: Vec2,
        sprint: bool,
        world: &CollisionWorld,
    ) {
        self.dash_timer = (self.dash_timer - dt).max(0.0);
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        self.dash_invincible = (self.dash_invincible - dt).max(0.0);
        self.hit_invincible = (self.hit_invincible - dt).max(0.0);
        self.hit_flash = (self.hit_flash - dt).max(0.0);

        if !self.is_alive() {
            self.vel = Vec2::ZERO;
            return;
        }

        if let Some(dir) = aim.try_normalize() {
            self.aim = dir;
        }

        let dir = move_dir.normalize_or_zero();
        self.sprinting = sprint && dir != Vec2::ZERO;
        self.vel = if self.is_dashing() {
            self.dash_dir * DASH_SPEED
        } else if self.sprinting {
            dir * PLAYER_SPEED * SPRINT_MULTIPLIER
        } else {
            dir * PLAYER_SPEED
        };

        let moved = self.pos + self.vel * dt;
        self.pos = clamp_to_level(world.resolve_player_static(moved, PLAYER_RADIUS));
    }

    pub fn reset(&mut self, pos: Vec2) {
        *self = Self::new(pos);
    }
}

impl PlayerTarget for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() || self.is_invulnerable() {
            return false;
        }
        self.hp = (self.hp - amount).max(0.0);
        self.hit_invincible = HIT_INVINCIBILITY;
        self.hit_flash = HIT_FLASH;
        true
    }
}
