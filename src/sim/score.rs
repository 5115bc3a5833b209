//! Score, combo and rank

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Seconds without a kill before the combo resets
pub const COMBO_WINDOW: f32 = 2.0;
/// Multiplier gained per combo step past the first
const COMBO_STEP: f32 = 0.1;
pub const MAX_MULTIPLIER: f32 = 5.0;
/// Floating "+points" text lifetime
pub const POPUP_SECS: f32 = 0.8;

/// Final rank, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    D,
    C,
    B,
    A,
    S,
}

impl Rank {
    pub fn for_score(score: u64) -> Self {
        match score {
            s if s >= 50_000 => Rank::S,
            s if s >= 30_000 => Rank::A,
            s if s >= 15_000 => Rank::B,
            s if s >= 5_000 => Rank::C,
            _ => Rank::D,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
        }
    }
}

/// Combo multiplier for the given combo count (1-based)
pub fn combo_multiplier(combo: u32) -> f32 {
    if combo == 0 {
        return 1.0;
    }
    (1.0 + (combo - 1) as f32 * COMBO_STEP).min(MAX_MULTIPLIER)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePopup {
    pub text: String,
    pub pos: Vec2,
    /// Seconds left on screen
    pub ttl: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreManager {
    score: u64,
    combo: u32,
    combo_timer: f32,
    max_combo: u32,
    kills: u32,
    popups: Vec<ScorePopup>,
}

impl ScoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn multiplier(&self) -> f32 {
        combo_multiplier(self.combo)
    }

    pub fn rank(&self) -> Rank {
        Rank::for_score(self.score)
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }

    /// Award a kill worth `base` points at `pos`. Returns the points granted.
    pub fn add_kill(&mut self, base: u32, pos: Vec2) -> u64 {
        self.combo += 1;
        self.combo_timer = COMBO_WINDOW;
        self.max_combo = self.max_combo.max(self.combo);
        self.kills += 1;

        let points = (base as f32 * self.multiplier()).floor() as u64;
        self.score += points;
        self.popups.push(ScorePopup {
            text: format!("+{points}"),
            pos,
            ttl: POPUP_SECS,
        });
        points
    }

    /// Flat bonus (missions); does not touch the combo
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    pub fn update(&mut self, dt: f32) {
        if self.combo_timer > 0.0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.combo_timer = 0.0;
                self.combo = 0;
            }
        }
        self.popups.retain_mut(|p| {
            p.ttl -= dt;
            p.ttl > 0.0
        });
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
