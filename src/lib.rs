//! Spud Survivors - a single-screen wave survival arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, combat, waves, shop)
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second, for converting per-second rates to per-tick amounts
    pub const TICKS_PER_SECOND: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Projectiles are culled this far outside the play area
    pub const CULL_MARGIN: f32 = 10.0;
}

/// Movement intent from up/down/left/right key state, normalized so
/// diagonals are no faster than cardinal directions. Zero if no keys held.
#[inline]
pub fn intent_vector(up: bool, down: bool, left: bool, right: bool) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if up {
        dir.y -= 1.0;
    }
    if down {
        dir.y += 1.0;
    }
    if left {
        dir.x -= 1.0;
    }
    if right {
        dir.x += 1.0;
    }
    dir.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_diagonal_is_unit_length() {
        let v = intent_vector(true, false, false, true);
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_intent_opposing_keys_cancel() {
        assert_eq!(intent_vector(true, true, false, false), Vec2::ZERO);
        assert_eq!(intent_vector(false, false, true, true), Vec2::ZERO);
    }

    #[test]
    fn test_intent_cardinal_directions() {
        assert_eq!(intent_vector(true, false, false, false), Vec2::new(0.0, -1.0));
        assert_eq!(intent_vector(false, true, false, false), Vec2::new(0.0, 1.0));
        assert_eq!(intent_vector(false, false, true, false), Vec2::new(-1.0, 0.0));
        assert_eq!(intent_vector(false, false, false, true), Vec2::new(1.0, 0.0));
    }
}
