//! One-shot cues for audio, particle and camera collaborators
//!
//! The simulation never calls into presentation. Instead every system pushes
//! plain events into a per-tick buffer which the host drains after `tick`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::ColliderId;
use super::enemy::Archetype;
use crate::tuning::ShotCue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Weapon discharged (muzzle flash + shot sound)
    Shot {
        origin: Vec2,
        dir: Vec2,
        cue: ShotCue,
        pitch: f32,
    },
    /// Projectile struck static geometry (small spark burst)
    Spark { pos: Vec2 },
    /// Projectile struck an enemy
    EnemyHit { pos: Vec2, archetype: Archetype },
    /// Destructible prop broke
    PropDestroyed { collider: ColliderId, pos: Vec2 },
    /// Magazine reload started
    Reload,
    /// Player took damage
    PlayerHit { damage: f32 },
    /// Player dashed
    Dash,
    /// Grenade left the player's hand
    GrenadeThrow { origin: Vec2 },
    /// Large blast (grenade or bomber)
    Explosion { pos: Vec2, intensity: f32 },
    /// Enemy killed by the player (generic death burst)
    EnemyDeath { pos: Vec2, archetype: Archetype },
    /// Spitter launched a glob
    Spit { pos: Vec2 },
    /// Score awarded for a kill
    ScorePopup { pos: Vec2, points: u64 },
    WaveStarted { wave: u32, enemies: usize },
    WaveCleared { wave: u32 },
    MissionStarted { label: String, pos: Vec2 },
    MissionComplete { label: String, points: u64 },
    GameOver { score: u64 },
}

/// Per-tick event buffer
pub type EventQueue = Vec<SimEvent>;
