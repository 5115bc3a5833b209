//! Yard Siege - top-down wave survival in a suburban block
//!
//! Core modules:
//! - `sim`: Deterministic simulation (enemy AI, weapons, collisions, waves, scoring)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences for feedback effects
//! - `hud`: Per-tick snapshot for presentation collaborators

pub mod hud;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use hud::HudSnapshot;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest raw frame delta the driver will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Playable area, centered on the origin (ground plane x/z)
    pub const LEVEL_HALF_WIDTH: f32 = 55.0;
    pub const LEVEL_HALF_DEPTH: f32 = 45.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 0.4;
    pub const PLAYER_MAX_HP: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 8.0;
    pub const SPRINT_MULTIPLIER: f32 = 1.5;
    pub const DASH_SPEED: f32 = 25.0;
    pub const DASH_DURATION: f32 = 0.15;
    pub const DASH_COOLDOWN: f32 = 0.8;
    pub const DASH_INVINCIBILITY: f32 = 0.2;
    /// Grace period after taking a hit
    pub const HIT_INVINCIBILITY: f32 = 0.15;
    pub const HIT_FLASH: f32 = 0.1;
    /// Distance in front of the player where shots originate
    pub const MUZZLE_OFFSET: f32 = 0.5;

    /// Rest between waves (real seconds, unaffected by time scale)
    pub const WAVE_PAUSE_SECS: f32 = 4.0;
    /// HP restored when a wave is cleared
    pub const WAVE_CLEAR_HEAL: f32 = 20.0;
    /// Grenades restocked when a wave is cleared
    pub const WAVE_CLEAR_GRENADES: u32 = 1;
}

/// Direction from `from` toward `to` and the distance between them.
///
/// Returns a zero direction when the points are closer than `min_dist`,
/// so callers never normalize a degenerate vector.
#[inline]
pub fn heading(from: Vec2, to: Vec2, min_dist: f32) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length();
    if dist > min_dist {
        (delta / dist, dist)
    } else {
        (Vec2::ZERO, dist)
    }
}

/// Clamp a point to the playable level rectangle
#[inline]
pub fn clamp_to_level(pos: Vec2) -> Vec2 {
    use consts::{LEVEL_HALF_DEPTH, LEVEL_HALF_WIDTH};
    Vec2::new(
        pos.x.clamp(-LEVEL_HALF_WIDTH, LEVEL_HALF_WIDTH),
        pos.y.clamp(-LEVEL_HALF_DEPTH, LEVEL_HALF_DEPTH),
    )
}

/// Yaw angle (radians) facing along `dir` on the ground plane.
///
/// Matches the renderer convention where +z is yaw 0.
#[inline]
pub fn yaw_of(dir: Vec2) -> f32 {
    dir.x.atan2(dir.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_normalizes() {
        let (dir, dist) = heading(Vec2::ZERO, Vec2::new(3.0, 4.0), 0.1);
        assert!((dist - 5.0).abs() < 1e-5);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_heading_degenerate() {
        let (dir, dist) = heading(Vec2::ONE, Vec2::ONE, 0.1);
        assert_eq!(dir, Vec2::ZERO);
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_clamp_to_level() {
        let p = clamp_to_level(Vec2::new(100.0, -100.0));
        assert_eq!(p, Vec2::new(consts::LEVEL_HALF_WIDTH, -consts::LEVEL_HALF_DEPTH));
    }
}
