//! Data-driven game balance
//!
//! Every number a designer is expected to tweak lives here. The defaults are
//! the shipped balance; a JSON document can override any subset of them.

use serde::{Deserialize, Serialize};

use crate::sim::enemy::Archetype;

/// Combat stats shared by every enemy archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub hp: f32,
    /// Max speed (units/sec)
    pub speed: f32,
    /// Damage dealt per attack (contact, projectile or explosion)
    pub damage: f32,
    pub attack_range: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Body radius for projectile hits
    pub radius: f32,
    /// Base points awarded on kill (before combo)
    pub score: u32,
    /// Pre-allocated instances
    pub pool_size: usize,
}

/// Per-archetype stat table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub drone: EnemyStats,
    pub spitter: EnemyStats,
    pub brute: EnemyStats,
    pub bomber: EnemyStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            drone: EnemyStats {
                hp: 20.0,
                speed: 6.0,
                damage: 8.0,
                attack_range: 1.2,
                attack_cooldown: 0.8,
                radius: 0.4,
                score: 100,
                pool_size: 30,
            },
            spitter: EnemyStats {
                hp: 35.0,
                speed: 4.0,
                damage: 10.0,
                attack_range: 14.0,
                attack_cooldown: 2.0,
                radius: 0.45,
                score: 150,
                pool_size: 8,
            },
            brute: EnemyStats {
                hp: 200.0,
                speed: 3.0,
                damage: 25.0,
                attack_range: 2.0,
                attack_cooldown: 1.5,
                radius: 1.0,
                score: 400,
                pool_size: 4,
            },
            bomber: EnemyStats {
                hp: 15.0,
                speed: 7.0,
                damage: 35.0,
                attack_range: 1.5,
                attack_cooldown: 0.0,
                radius: 0.4,
                score: 120,
                pool_size: 8,
            },
        }
    }
}

impl EnemyTable {
    pub fn get(&self, archetype: Archetype) -> &EnemyStats {
        match archetype {
            Archetype::Drone => &self.drone,
            Archetype::Spitter => &self.spitter,
            Archetype::Brute => &self.brute,
            Archetype::Bomber => &self.bomber,
        }
    }
}

/// Audio cue family a weapon fires with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotCue {
    #[default]
    Blaster,
    Shotgun,
}

/// Static description of one weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Display name
    pub name: String,
    /// Rounds per magazine (`None` = unlimited, never reloads)
    pub magazine: Option<u32>,
    /// Minimum seconds between shots
    pub fire_interval: f32,
    pub reload_secs: f32,
    pub projectile_speed: f32,
    pub damage: f32,
    pub projectiles_per_shot: u32,
    /// Max random deviation from the aim direction (radians)
    pub spread: f32,
    #[serde(default)]
    pub cue: ShotCue,
    /// Pitch multiplier for the shot cue
    #[serde(default = "default_pitch")]
    pub pitch: f32,
}

fn default_pitch() -> f32 {
    1.0
}

/// Shipped weapon loadout, in cycle order
pub fn default_weapons() -> Vec<WeaponSpec> {
    vec![
        WeaponSpec {
            name: "Pulse Pistol".to_string(),
            magazine: None,
            fire_interval: 0.25,
            reload_secs: 0.0,
            projectile_speed: 40.0,
            damage: 15.0,
            projectiles_per_shot: 1,
            spread: 0.02,
            cue: ShotCue::Blaster,
            pitch: 1.0,
        },
        WeaponSpec {
            name: "Assault Rifle".to_string(),
            magazine: Some(30),
            fire_interval: 0.1,
            reload_secs: 1.5,
            projectile_speed: 50.0,
            damage: 12.0,
            projectiles_per_shot: 1,
            spread: 0.05,
            cue: ShotCue::Blaster,
            pitch: 1.3,
        },
        WeaponSpec {
            name: "Plasma Shotgun".to_string(),
            magazine: Some(6),
            fire_interval: 0.7,
            reload_secs: 2.0,
            projectile_speed: 35.0,
            damage: 10.0,
            projectiles_per_shot: 6,
            spread: 0.15,
            cue: ShotCue::Shotgun,
            pitch: 1.0,
        },
    ]
}

/// Player projectile pool and flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub pool_size: usize,
    /// Seconds a projectile flies before expiring
    pub lifetime: f32,
    /// Added to an enemy's radius for hit tests
    pub hit_padding: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            pool_size: 100,
            lifetime: 1.5,
            hit_padding: 0.2,
        }
    }
}

/// Grenade ballistics and blast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrenadeTuning {
    pub starting_count: u32,
    pub max_count: u32,
    pub blast_radius: f32,
    pub blast_damage: f32,
    pub throw_speed: f32,
    /// Initial upward velocity
    pub lift: f32,
    pub fuse_secs: f32,
    /// Horizontal velocity multiplier per fixed 60 Hz step
    pub drag: f32,
    pub gravity: f32,
    /// Height of the grenade's center when resting on the ground
    pub rest_height: f32,
    pub release_height: f32,
    /// Vertical velocity kept (and inverted) on bounce
    pub bounce_restitution: f32,
    /// Horizontal velocity kept on bounce
    pub bounce_friction: f32,
}

impl Default for GrenadeTuning {
    fn default() -> Self {
        Self {
            starting_count: 3,
            max_count: 5,
            blast_radius: 6.0,
            blast_damage: 80.0,
            throw_speed: 15.0,
            lift: 6.0,
            fuse_secs: 1.2,
            drag: 0.98,
            gravity: 20.0,
            rest_height: 0.2,
            release_height: 0.8,
            bounce_restitution: 0.4,
            bounce_friction: 0.6,
        }
    }
}

/// Wave pacing and spawn placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Distance from the player at which enemies appear
    pub spawn_radius: f32,
    /// Max +/- deviation from `spawn_radius`
    pub spawn_jitter: f32,
    /// Delay after releasing each archetype before the next release
    pub stagger_drone: f32,
    pub stagger_spitter: f32,
    pub stagger_brute: f32,
    pub stagger_bomber: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            spawn_radius: 45.0,
            spawn_jitter: 5.0,
            stagger_drone: 0.3,
            stagger_spitter: 0.6,
            stagger_brute: 1.5,
            stagger_bomber: 0.6,
        }
    }
}

impl WaveTuning {
    pub fn stagger(&self, archetype: Archetype) -> f32 {
        match archetype {
            Archetype::Drone => self.stagger_drone,
            Archetype::Spitter => self.stagger_spitter,
            Archetype::Brute => self.stagger_brute,
            Archetype::Bomber => self.stagger_bomber,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub enemies: EnemyTable,
    pub weapons: Vec<WeaponSpec>,
    pub projectiles: ProjectileTuning,
    pub grenades: GrenadeTuning,
    pub waves: WaveTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemies: EnemyTable::default(),
            weapons: default_weapons(),
            projectiles: ProjectileTuning::default(),
            grenades: GrenadeTuning::default(),
            waves: WaveTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a balance sheet; omitted sections keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        if tuning.weapons.is_empty() {
            log::warn!("Tuning has no weapons, using default loadout");
            tuning.weapons = default_weapons();
        }
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "grenades": { "blast_radius": 9.0 } }"#).unwrap();
        assert_eq!(tuning.grenades.blast_radius, 9.0);
        assert_eq!(tuning.grenades.blast_damage, 80.0);
        assert_eq!(tuning.weapons.len(), 3);
        assert_eq!(tuning.enemies, EnemyTable::default());
    }

    #[test]
    fn test_unlimited_magazine_is_null() {
        let json = Tuning::default().to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.weapons[0].magazine, None);
        assert_eq!(back.weapons[2].magazine, Some(6));
    }

    #[test]
    fn test_empty_weapon_list_falls_back() {
        let tuning = Tuning::from_json(r#"{ "weapons": [] }"#).unwrap();
        assert_eq!(tuning.weapons, default_weapons());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_gated_archetypes_are_costlier_to_release() {
        let waves = WaveTuning::default();
        assert!(waves.stagger(Archetype::Drone) < waves.stagger(Archetype::Spitter));
        assert!(waves.stagger(Archetype::Spitter) < waves.stagger(Archetype::Brute));
    }
}
