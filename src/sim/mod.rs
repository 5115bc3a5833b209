//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, scaled only by the juice time scale
//! - Seeded RNG only, one stream per subsystem
//! - Stable iteration order (pool slot order)
//! - No rendering, audio or platform dependencies; presentation reads
//!   state and drains `SimEvent`s

pub mod collision;
pub mod director;
pub mod enemy;
pub mod events;
pub mod grenade;
pub mod grid;
pub mod juice;
pub mod mission;
pub mod player;
pub mod pool;
pub mod score;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{Aabb, ColliderId, ColliderKind, CollisionWorld, StaticCollider};
pub use director::{EnemyManager, PlayerTarget, WaveComposition};
pub use enemy::{Archetype, AttackEvent, Enemy, EnemyHandle, EnemyView};
pub use events::{EventQueue, SimEvent};
pub use grenade::{GrenadeSystem, falloff_damage};
pub use juice::Juice;
pub use mission::MissionBoard;
pub use player::Player;
pub use score::{Rank, ScoreManager};
pub use state::{GamePhase, GameState, RngState};
pub use tick::{TickInput, tick};
pub use weapon::{WeaponState, WeaponSystem};
