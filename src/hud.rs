//! HUD-facing snapshot
//!
//! Rebuilt from scratch every tick; the HUD never diffs simulation state.

use serde::{Deserialize, Serialize};

use crate::sim::score::ScorePopup;
use crate::sim::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub wave: u32,
    pub score: u64,
    pub combo: u32,
    pub multiplier: f32,
    pub rank: String,
    /// 0-100
    pub health_pct: f32,
    pub grenades: u32,
    pub ammo_text: String,
    pub enemies_alive: usize,
    pub popups: Vec<ScorePopup>,
    pub mission_label: Option<String>,
    /// 0..1 hold progress
    pub mission_progress: f32,
    /// Seconds until the next wave while resting
    pub next_wave_in: Option<f32>,
    pub time_scale: f32,
    pub shake: f32,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let mission = state.missions.active();
        Self {
            phase: state.phase,
            wave: state.wave,
            score: state.score.score(),
            combo: state.score.combo(),
            multiplier: state.score.multiplier(),
            rank: state.score.rank().as_str().to_string(),
            health_pct: (state.player.health_fraction() * 100.0).round(),
            grenades: state.grenades.count(),
            ammo_text: state.weapons.ammo_text(),
            enemies_alive: state.enemies.alive_count(),
            popups: state.score.popups().to_vec(),
            mission_label: mission.map(|m| m.template().label.to_string()),
            mission_progress: mission.map_or(0.0, |m| m.progress()),
            next_wave_in: (state.phase == GamePhase::WavePause).then_some(state.pause_timer),
            time_scale: state.juice.time_scale(),
            shake: state.juice.shake_amplitude(),
        }
    }
}
