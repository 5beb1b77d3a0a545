//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod combat;
pub mod player;
pub mod shop;
pub mod spawn;
pub mod state;
pub mod tick;

pub use shop::{purchase, reroll};
pub use state::{
    DamageNumber, DashState, Enemy, GameEvent, GameState, MAX_PARTICLES, Particle, Phase, Player,
    Projectile, ShopState, Snapshot, Stats, WeaponInstance,
};
pub use tick::{TickInput, close_shop, tick, toggle_pause};
