//! Data-driven game balance
//!
//! Every number the simulation treats as tunable lives in [`Tuning`]: enemy
//! archetypes, the weapon catalog, dash constants, the upgrade catalog, and
//! spawn pacing. The bundle is immutable once a run starts; swapping it out
//! (e.g. loading a JSON balance patch) must never require touching sim code.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::state::Stats;

/// A player owns at most this many distinct weapon types
pub const MAX_WEAPON_TYPES: usize = 6;
/// Weapon levels run 1..=MAX_WEAPON_LEVEL
pub const MAX_WEAPON_LEVEL: u8 = 6;
/// The shop deals this many distinct items per roll
pub const SHOP_OFFERS: usize = 4;

/// A tuning bundle that cannot drive a run. Raised at setup, before the
/// frame loop starts; these always indicate a config or collaborator bug.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("weapon catalog is empty")]
    NoWeapons,
    #[error("unknown weapon `{0}`")]
    UnknownWeapon(String),
    #[error("upgrade catalog holds {0} items, fewer than the {SHOP_OFFERS} a shop roll needs")]
    TooFewUpgrades(usize),
    #[error("upgrade `{0}` references weapon index {1}, out of range")]
    BadWeaponRef(String, usize),
    #[error("spawn tier rule references archetype index {0}, out of range")]
    BadArchetypeRef(usize),
    #[error("enemy archetype table is empty")]
    NoArchetypes,
    #[error("wave duration must be at least one tick")]
    ZeroWaveDuration,
    #[error("dash duration {duration} exceeds dash cooldown {cooldown}")]
    DashOutlastsCooldown { duration: u32, cooldown: u32 },
    #[error("starting max HP must be positive, got {0}")]
    NonPositiveMaxHp(f32),
    #[error("tuning JSON malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One enemy archetype in the spawn table. Base values; per-wave scaling
/// is applied by the spawner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    pub hp: f32,
    pub speed: f32,
    /// Collision radius
    pub size: f32,
    pub contact_damage: f32,
    pub gold: u32,
    pub color: [f32; 4],
}

/// Tier override rule for archetype selection. All rules are judged against
/// one random draw, in table order, and the last match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRule {
    pub min_wave: u32,
    pub chance: f32,
    /// Index into the archetype table
    pub archetype: usize,
}

/// Spawn pacing and per-wave difficulty scaling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTuning {
    /// Per-tick spawn chance = base_rate + wave * rate_per_wave
    pub base_rate: f32,
    pub rate_per_wave: f32,
    /// Hard cap on live enemies
    pub max_enemies: usize,
    /// Enemies appear this far outside the play-area edge
    pub edge_margin: f32,
    pub tiers: Vec<TierRule>,
    /// Flat HP added per wave number
    pub hp_per_wave: f32,
    pub speed_per_wave: f32,
    /// Flat gold bounty added per wave number
    pub gold_per_wave: u32,
}

/// One weapon type in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    /// Added to the damage stat per shot (level adds on top)
    pub damage_mod: f32,
    /// Base cooldown in ticks; the attack-speed stat offsets this
    pub cooldown: f32,
    /// Shots per trigger
    pub projectiles: u32,
    /// Total angular spread across a volley, radians
    pub spread: f32,
    pub projectile_speed: f32,
}

/// Dash ability constants, all in ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashTuning {
    pub cooldown_ticks: u32,
    pub duration_ticks: u32,
    /// Multiplier on move speed while dashing
    pub speed_mult: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    Damage,
    AttackSpeed,
    MoveSpeed,
    MaxHp,
    Armor,
    HpRegen,
    LifeSteal,
}

/// What a purchased upgrade does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpgradeEffect {
    /// Adds delta to one stat. MaxHp also lifts current HP by the delta.
    Stat { stat: StatKind, delta: f32 },
    /// Restores HP, clamped to the current max
    Heal { amount: f32 },
    /// Unlocks the weapon at this catalog index, or levels it if owned
    Weapon { weapon: usize },
    /// Unlocks the dash ability
    Dash,
}

/// One entry in the upgrade catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeSpec {
    pub name: String,
    pub desc: String,
    pub cost: u32,
    pub effect: UpgradeEffect,
}

/// Player-side constants that are not run-mutable stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTuning {
    /// Collision radius
    pub radius: f32,
    pub base_stats: Stats,
    pub projectile_radius: f32,
    pub xp_per_kill: u32,
}

/// The full balance bundle, supplied at construction and immutable after
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Play-area size in world units
    pub arena: Vec2,
    /// Combat wave length in ticks
    pub wave_ticks: u32,
    pub spawn: SpawnTuning,
    pub enemies: Vec<EnemyArchetype>,
    pub weapons: Vec<WeaponSpec>,
    pub dash: DashTuning,
    pub upgrades: Vec<UpgradeSpec>,
    pub player: PlayerTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena: Vec2::new(800.0, 600.0),
            wave_ticks: 900,
            spawn: SpawnTuning {
                base_rate: 0.02,
                rate_per_wave: 0.008,
                max_enemies: 80,
                edge_margin: 30.0,
                tiers: vec![
                    TierRule { min_wave: 3, chance: 0.3, archetype: 1 },
                    TierRule { min_wave: 5, chance: 0.2, archetype: 2 },
                    TierRule { min_wave: 7, chance: 0.15, archetype: 3 },
                ],
                hp_per_wave: 1.0,
                speed_per_wave: 0.05,
                gold_per_wave: 1,
            },
            enemies: vec![
                EnemyArchetype {
                    name: "Basic".into(),
                    hp: 2.0,
                    speed: 0.8,
                    size: 15.0,
                    contact_damage: 5.0,
                    gold: 2,
                    color: [0.55, 0.12, 0.25, 1.0],
                },
                EnemyArchetype {
                    name: "Fast".into(),
                    hp: 1.0,
                    speed: 1.5,
                    size: 12.0,
                    contact_damage: 3.0,
                    gold: 3,
                    color: [0.90, 0.22, 0.27, 1.0],
                },
                EnemyArchetype {
                    name: "Tank".into(),
                    hp: 8.0,
                    speed: 0.5,
                    size: 22.0,
                    contact_damage: 10.0,
                    gold: 5,
                    color: [0.16, 0.62, 0.56, 1.0],
                },
                EnemyArchetype {
                    name: "Elite".into(),
                    hp: 4.0,
                    speed: 1.0,
                    size: 16.0,
                    contact_damage: 7.0,
                    gold: 4,
                    color: [0.96, 0.64, 0.38, 1.0],
                },
            ],
            weapons: vec![
                WeaponSpec {
                    name: "Pistol".into(),
                    damage_mod: 0.0,
                    cooldown: 15.0,
                    projectiles: 1,
                    spread: 0.0,
                    projectile_speed: 7.0,
                },
                WeaponSpec {
                    name: "SMG".into(),
                    damage_mod: -2.0,
                    cooldown: 6.0,
                    projectiles: 1,
                    spread: 0.25,
                    projectile_speed: 7.0,
                },
                WeaponSpec {
                    name: "Shotgun".into(),
                    damage_mod: 2.0,
                    cooldown: 40.0,
                    projectiles: 5,
                    spread: 0.7,
                    projectile_speed: 6.0,
                },
                WeaponSpec {
                    name: "Rifle".into(),
                    damage_mod: 8.0,
                    cooldown: 50.0,
                    projectiles: 1,
                    spread: 0.0,
                    projectile_speed: 11.0,
                },
                WeaponSpec {
                    name: "Minigun".into(),
                    damage_mod: -4.0,
                    cooldown: 4.0,
                    projectiles: 1,
                    spread: 0.45,
                    projectile_speed: 7.0,
                },
                WeaponSpec {
                    name: "Splitter".into(),
                    damage_mod: 1.0,
                    cooldown: 28.0,
                    projectiles: 3,
                    spread: 0.35,
                    projectile_speed: 6.5,
                },
            ],
            dash: DashTuning {
                cooldown_ticks: 180,
                duration_ticks: 10,
                speed_mult: 3.0,
            },
            upgrades: vec![
                UpgradeSpec {
                    name: "Damage Up".into(),
                    desc: "+5 damage".into(),
                    cost: 15,
                    effect: UpgradeEffect::Stat { stat: StatKind::Damage, delta: 5.0 },
                },
                UpgradeSpec {
                    name: "Attack Speed".into(),
                    desc: "Shoot faster".into(),
                    cost: 20,
                    effect: UpgradeEffect::Stat { stat: StatKind::AttackSpeed, delta: -3.0 },
                },
                UpgradeSpec {
                    name: "Move Speed".into(),
                    desc: "+0.5 speed".into(),
                    cost: 15,
                    effect: UpgradeEffect::Stat { stat: StatKind::MoveSpeed, delta: 0.5 },
                },
                UpgradeSpec {
                    name: "Max HP".into(),
                    desc: "+20 max HP".into(),
                    cost: 25,
                    effect: UpgradeEffect::Stat { stat: StatKind::MaxHp, delta: 20.0 },
                },
                UpgradeSpec {
                    name: "Armor".into(),
                    desc: "+2 armor".into(),
                    cost: 30,
                    effect: UpgradeEffect::Stat { stat: StatKind::Armor, delta: 2.0 },
                },
                UpgradeSpec {
                    name: "Heal".into(),
                    desc: "Restore 30 HP".into(),
                    cost: 10,
                    effect: UpgradeEffect::Heal { amount: 30.0 },
                },
                UpgradeSpec {
                    name: "Regen".into(),
                    desc: "+0.5 HP/s".into(),
                    cost: 25,
                    effect: UpgradeEffect::Stat { stat: StatKind::HpRegen, delta: 0.5 },
                },
                UpgradeSpec {
                    name: "Life Steal".into(),
                    desc: "Heal 3% of damage dealt".into(),
                    cost: 35,
                    effect: UpgradeEffect::Stat { stat: StatKind::LifeSteal, delta: 0.03 },
                },
                UpgradeSpec {
                    name: "Pistol".into(),
                    desc: "New weapon / level up".into(),
                    cost: 20,
                    effect: UpgradeEffect::Weapon { weapon: 0 },
                },
                UpgradeSpec {
                    name: "SMG".into(),
                    desc: "New weapon / level up".into(),
                    cost: 30,
                    effect: UpgradeEffect::Weapon { weapon: 1 },
                },
                UpgradeSpec {
                    name: "Shotgun".into(),
                    desc: "New weapon / level up".into(),
                    cost: 35,
                    effect: UpgradeEffect::Weapon { weapon: 2 },
                },
                UpgradeSpec {
                    name: "Rifle".into(),
                    desc: "New weapon / level up".into(),
                    cost: 40,
                    effect: UpgradeEffect::Weapon { weapon: 3 },
                },
                UpgradeSpec {
                    name: "Minigun".into(),
                    desc: "New weapon / level up".into(),
                    cost: 45,
                    effect: UpgradeEffect::Weapon { weapon: 4 },
                },
                UpgradeSpec {
                    name: "Splitter".into(),
                    desc: "New weapon / level up".into(),
                    cost: 35,
                    effect: UpgradeEffect::Weapon { weapon: 5 },
                },
                UpgradeSpec {
                    name: "Dash".into(),
                    desc: "Unlock dash (Space)".into(),
                    cost: 40,
                    effect: UpgradeEffect::Dash,
                },
            ],
            player: PlayerTuning {
                radius: 20.0,
                base_stats: Stats {
                    damage: 10.0,
                    attack_speed: 15.0,
                    move_speed: 3.0,
                    max_hp: 100.0,
                    armor: 0.0,
                    hp_regen: 0.0,
                    life_steal: 0.0,
                },
                projectile_radius: 5.0,
                xp_per_kill: 5,
            },
        }
    }
}

impl Tuning {
    /// Parse and validate a bundle from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the bundle can drive a run. Call once at setup; the sim
    /// assumes a validated bundle and does not re-check.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.weapons.is_empty() {
            return Err(TuningError::NoWeapons);
        }
        if self.enemies.is_empty() {
            return Err(TuningError::NoArchetypes);
        }
        if self.upgrades.len() < SHOP_OFFERS {
            return Err(TuningError::TooFewUpgrades(self.upgrades.len()));
        }
        if self.wave_ticks == 0 {
            return Err(TuningError::ZeroWaveDuration);
        }
        if self.dash.duration_ticks > self.dash.cooldown_ticks {
            return Err(TuningError::DashOutlastsCooldown {
                duration: self.dash.duration_ticks,
                cooldown: self.dash.cooldown_ticks,
            });
        }
        if self.player.base_stats.max_hp <= 0.0 {
            return Err(TuningError::NonPositiveMaxHp(self.player.base_stats.max_hp));
        }
        for rule in &self.spawn.tiers {
            if rule.archetype >= self.enemies.len() {
                return Err(TuningError::BadArchetypeRef(rule.archetype));
            }
        }
        for upgrade in &self.upgrades {
            if let UpgradeEffect::Weapon { weapon } = upgrade.effect {
                if weapon >= self.weapons.len() {
                    return Err(TuningError::BadWeaponRef(upgrade.name.clone(), weapon));
                }
            }
        }
        Ok(())
    }

    /// Catalog index of a weapon by display name
    pub fn weapon_index(&self, name: &str) -> Option<usize> {
        self.weapons.iter().position(|w| w.name == name)
    }
}
