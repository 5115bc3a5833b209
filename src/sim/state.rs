//! Game state and run lifecycle
//!
//! `GameState` owns every subsystem. Each subsystem that needs randomness
//! gets its own `Pcg32` stream derived from the run seed, so a run replays
//! exactly from `(seed, inputs)`.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionWorld;
use super::director::EnemyManager;
use super::events::{EventQueue, SimEvent};
use super::grenade::GrenadeSystem;
use super::juice::Juice;
use super::mission::MissionBoard;
use super::player::Player;
use super::score::ScoreManager;
use super::weapon::WeaponSystem;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start input
    Idle,
    /// Wave in progress
    Playing,
    /// Rest between waves
    WavePause,
    /// Player died
    GameOver,
}

/// Per-subsystem RNG streams
const STREAM_DIRECTOR: u64 = 1;
const STREAM_WEAPONS: u64 = 2;
const STREAM_MISSIONS: u64 = 3;
const STREAM_JUICE: u64 = 4;

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Same seed, different stream
    pub fn fork(&self, stream: u64) -> Pcg32 {
        Self {
            seed: self.seed,
            stream,
        }
        .to_rng()
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub phase: GamePhase,
    /// Current wave (1-based; 0 before the first wave)
    pub wave: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Real seconds left in the between-wave rest
    pub pause_timer: f32,

    pub tuning: Tuning,
    pub settings: Settings,

    pub player: Player,
    pub world: CollisionWorld,
    pub enemies: EnemyManager,
    pub weapons: WeaponSystem,
    pub grenades: GrenadeSystem,
    pub juice: Juice,
    pub score: ScoreManager,
    pub missions: MissionBoard,

    /// Events produced since the host last drained them
    pub events: EventQueue,
}

impl GameState {
    /// New state with default tuning and settings
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Settings::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            seed,
            rng_state,
            phase: GamePhase::Idle,
            wave: 0,
            time_ticks: 0,
            pause_timer: 0.0,
            player: Player::new(Vec2::ZERO),
            world: CollisionWorld::new(),
            enemies: EnemyManager::new(
                &tuning.enemies,
                tuning.waves.clone(),
                rng_state.fork(STREAM_DIRECTOR),
            ),
            weapons: WeaponSystem::new(
                &tuning.weapons,
                &tuning.projectiles,
                rng_state.fork(STREAM_WEAPONS),
            ),
            grenades: GrenadeSystem::new(tuning.grenades.clone()),
            juice: Juice::new(&settings, rng_state.fork(STREAM_JUICE)),
            score: ScoreManager::new(),
            missions: MissionBoard::new(rng_state.fork(STREAM_MISSIONS)),
            events: EventQueue::new(),
            tuning,
            settings,
        }
    }

    /// Swap in new preferences (takes effect for new feedback requests)
    pub fn apply_settings(&mut self, settings: Settings) {
        self.juice.apply_settings(&settings);
        self.settings = settings;
    }

    /// Reset every subsystem and begin wave 1. Static geometry is kept.
    pub fn start_run(&mut self) {
        self.enemies.reset();
        self.weapons.reset();
        self.grenades.reset();
        self.juice.reset();
        self.score.reset();
        self.missions.clear();
        self.player.reset(Vec2::ZERO);
        self.pause_timer = 0.0;
        self.wave = 0;
        log::info!("Run started (seed {})", self.seed);
        self.begin_wave(1);
    }

    /// Arm wave `n` and give the player a new objective
    pub fn begin_wave(&mut self, n: u32) {
        self.wave = n;
        let enemies = self.enemies.start_wave(n);
        self.missions.start(&mut self.events);
        self.events.push(SimEvent::WaveStarted { wave: n, enemies });
        self.phase = GamePhase::Playing;
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> EventQueue {
        std::mem::take(&mut self.events)
    }
}
