//! Game settings and preferences
//!
//! Player-facing toggles for feedback effects. The simulation reads these
//! once at construction; they never change gameplay outcomes except through
//! time scale (hitstop / slow-motion).

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake on explosions/impacts
    pub screen_shake: bool,
    /// Brief freeze on heavy impacts
    pub hitstop: bool,
    /// Slow-motion on wave clear
    pub slow_motion: bool,
    /// Multiplier on every shake request (0.0 - 2.0)
    pub shake_scale: f32,

    // === Accessibility ===
    /// Reduced motion (no shake, no time-scale effects)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            hitstop: true,
            slow_motion: true,
            shake_scale: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Settings with every motion effect disabled
    pub fn reduced() -> Self {
        Self {
            reduced_motion: true,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective hitstop (respects reduced_motion)
    pub fn effective_hitstop(&self) -> bool {
        self.hitstop && !self.reduced_motion
    }

    /// Effective slow-motion (respects reduced_motion)
    pub fn effective_slow_motion(&self) -> bool {
        self.slow_motion && !self.reduced_motion
    }

    /// Shake multiplier, clamped to a sane range
    pub fn effective_shake_scale(&self) -> f32 {
        if self.effective_screen_shake() {
            self.shake_scale.clamp(0.0, 2.0)
        } else {
            0.0
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings = serde_json::from_str(json)?;
        log::info!("Loaded settings");
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
