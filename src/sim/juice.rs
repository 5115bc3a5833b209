//! Time control and screen shake
//!
//! A single `time_scale` multiplies every simulation delta. Two timed
//! effects drive it:
//! - hitstop: hard zero for a short duration, then snaps back to whatever
//!   the slow-motion ramp currently wants
//! - slow-motion: drops to a target scale, then ramps linearly back to 1.0
//!
//! Hitstop takes precedence; the slow-motion ramp is frozen while it runs.
//! Screen shake is independent of the time scale and always runs on real
//! time.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::settings::Settings;

pub const DEFAULT_HITSTOP: f32 = 0.04;
pub const DEFAULT_SLOWMO_SCALE: f32 = 0.5;
pub const DEFAULT_SLOWMO_SECS: f32 = 0.3;

/// Shake lasts `SHAKE_BASE_SECS + intensity * SHAKE_SECS_PER_INTENSITY`
const SHAKE_BASE_SECS: f32 = 0.15;
const SHAKE_SECS_PER_INTENSITY: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Juice {
    time_scale: f32,
    /// Scale to return to when hitstop ends
    target_scale: f32,
    hitstop_timer: f32,

    slowmo_scale: f32,
    slowmo_timer: f32,
    slowmo_duration: f32,

    shake_intensity: f32,
    shake_timer: f32,
    shake_duration: f32,
    shake_offset: Vec2,

    hitstop_enabled: bool,
    slowmo_enabled: bool,
    shake_enabled: bool,
    shake_scale: f32,

    rng: Pcg32,
}

impl Juice {
    pub fn new(settings: &Settings, rng: Pcg32) -> Self {
        let mut juice = Self {
            time_scale: 1.0,
            target_scale: 1.0,
            hitstop_timer: 0.0,
            slowmo_scale: 1.0,
            slowmo_timer: 0.0,
            slowmo_duration: 0.0,
            shake_intensity: 0.0,
            shake_timer: 0.0,
            shake_duration: 0.0,
            shake_offset: Vec2::ZERO,
            hitstop_enabled: true,
            slowmo_enabled: true,
            shake_enabled: true,
            shake_scale: 1.0,
            rng,
        };
        juice.apply_settings(settings);
        juice
    }

    /// Re-read the effect toggles. Effects already running keep running.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.hitstop_enabled = settings.effective_hitstop();
        self.slowmo_enabled = settings.effective_slow_motion();
        self.shake_enabled = settings.effective_screen_shake();
        self.shake_scale = settings.effective_shake_scale();
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.hitstop_timer > 0.0
    }

    /// Camera offset for this frame
    #[inline]
    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    /// Current shake amplitude (decays linearly to zero)
    pub fn shake_amplitude(&self) -> f32 {
        if self.shake_timer <= 0.0 || self.shake_duration <= 0.0 {
            return 0.0;
        }
        self.shake_intensity * (self.shake_timer / self.shake_duration)
    }

    pub fn hitstop(&mut self, duration: f32) {
        if !self.hitstop_enabled || duration <= 0.0 {
            return;
        }
        self.hitstop_timer = self.hitstop_timer.max(duration);
        self.time_scale = 0.0;
    }

    pub fn slowmo(&mut self, scale: f32, duration: f32) {
        if !self.slowmo_enabled || duration <= 0.0 {
            return;
        }
        let scale = scale.clamp(0.0, 1.0);
        self.slowmo_scale = scale;
        self.slowmo_timer = duration;
        self.slowmo_duration = duration;
        self.target_scale = scale;
        if !self.is_frozen() {
            self.time_scale = scale;
        }
    }

    pub fn shake(&mut self, intensity: f32) {
        if !self.shake_enabled {
            return;
        }
        let intensity = intensity * self.shake_scale;
        if intensity <= 0.0 {
            return;
        }
        // A weaker request never cuts a stronger shake short
        if intensity < self.shake_amplitude() {
            return;
        }
        self.shake_intensity = intensity;
        self.shake_duration = SHAKE_BASE_SECS + intensity * SHAKE_SECS_PER_INTENSITY;
        self.shake_timer = self.shake_duration;
    }

    /// Advance on real (unscaled) time. Returns the new time scale.
    pub fn update(&mut self, real_dt: f32) -> f32 {
        self.update_shake(real_dt);

        if self.hitstop_timer > 0.0 {
            self.hitstop_timer -= real_dt;
            if self.hitstop_timer <= 0.0 {
                self.hitstop_timer = 0.0;
                self.time_scale = self.target_scale;
            }
            return self.time_scale;
        }

        if self.slowmo_timer > 0.0 {
            self.slowmo_timer -= real_dt;
            if self.slowmo_timer <= 0.0 {
                self.slowmo_timer = 0.0;
                self.target_scale = 1.0;
            } else {
                let t = 1.0 - self.slowmo_timer / self.slowmo_duration;
                self.target_scale = self.slowmo_scale + (1.0 - self.slowmo_scale) * t;
            }
            self.time_scale = self.target_scale;
        }
        self.time_scale
    }

    fn update_shake(&mut self, real_dt: f32) {
        if self.shake_timer <= 0.0 {
            self.shake_offset = Vec2::ZERO;
            return;
        }
        self.shake_timer = (self.shake_timer - real_dt).max(0.0);
        let amp = self.shake_amplitude();
        self.shake_offset = Vec2::new(
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
        ) * amp;
    }

    /// Drop every running effect (new game)
    pub fn reset(&mut self) {
        self.time_scale = 1.0;
        self.target_scale = 1.0;
        self.hitstop_timer = 0.0;
        self.slowmo_timer = 0.0;
        self.shake_timer = 0.0;
        self.shake_intensity = 0.0;
        self.shake_offset = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn juice() -> Juice {
        Juice::new(&Settings::default(), Pcg32::seed_from_u64(1))
    }

    #[test]
    fn test_idle_scale_is_one() {
        let mut j = juice();
        assert_eq!(j.update(0.016), 1.0);
    }

    #[test]
    fn test_hitstop_freezes_then_releases() {
        let mut j = juice();
        j.hitstop(DEFAULT_HITSTOP);
        assert_eq!(j.time_scale(), 0.0);
        assert_eq!(j.update(0.02), 0.0);
        assert_eq!(j.update(0.03), 1.0);
        assert!(!j.is_frozen());
    }

    #[test]
    fn test_slowmo_ramps_back_linearly() {
        let mut j = juice();
        j.slowmo(0.2, 1.0);
        assert_eq!(j.time_scale(), 0.2);
        let mid = j.update(0.5);
        assert!((mid - 0.6).abs() < 1e-4);
        assert_eq!(j.update(0.6), 1.0);
    }

    #[test]
    fn test_hitstop_suppresses_slowmo_ramp() {
        let mut j = juice();
        j.slowmo(0.5, 0.4);
        j.hitstop(0.1);
        // Ramp does not advance while frozen
        j.update(0.05);
        assert_eq!(j.time_scale(), 0.0);
        // Snap back to the slow-motion target, not 1.0
        assert_eq!(j.update(0.06), 0.5);
        let ramped = j.update(0.2);
        assert!(ramped > 0.5 && ramped < 1.0);
    }

    #[test]
    fn test_disabled_effects_are_ignored() {
        let settings = Settings {
            hitstop: false,
            slow_motion: false,
            screen_shake: false,
            ..Settings::default()
        };
        let mut j = Juice::new(&settings, Pcg32::seed_from_u64(1));
        j.hitstop(0.1);
        j.slowmo(0.2, 1.0);
        j.shake(1.0);
        assert_eq!(j.time_scale(), 1.0);
        assert_eq!(j.shake_amplitude(), 0.0);
    }

    #[test]
    fn test_shake_decays_linearly() {
        let mut j = juice();
        j.shake(1.0);
        let full = j.shake_amplitude();
        assert!((full - 1.0).abs() < 1e-5);
        // Duration is 0.25s
        j.update(0.125);
        assert!((j.shake_amplitude() - 0.5).abs() < 1e-4);
        assert!(j.shake_offset().length() <= 0.5 * 2f32.sqrt() + 1e-4);
        j.update(0.2);
        assert_eq!(j.shake_amplitude(), 0.0);
        j.update(0.01);
        assert_eq!(j.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_weak_shake_does_not_override_strong() {
        let mut j = juice();
        j.shake(0.6);
        j.shake(0.05);
        assert!((j.shake_amplitude() - 0.6).abs() < 1e-5);
    }
}
