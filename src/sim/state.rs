//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]. The struct is
//! serializable end to end (RNG included) so a run can be snapshotted and
//! replayed deterministically.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::{Tuning, TuningError};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting on a starting-weapon pick
    NotStarted,
    /// Active combat wave
    Combat,
    /// Between-wave shop
    Shop,
    /// Combat frozen by an explicit pause; only ever entered from Combat
    Paused,
    /// Run ended
    GameOver,
}

/// Run-persistent player stats. Starting values come from tuning; only
/// shop purchases mutate these afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub damage: f32,
    /// Additive cooldown offset in ticks; lower means faster firing
    pub attack_speed: f32,
    /// World units moved per tick
    pub move_speed: f32,
    pub max_hp: f32,
    /// Flat reduction on incoming contact damage
    pub armor: f32,
    /// HP restored per second
    pub hp_regen: f32,
    /// Fraction of dealt damage returned as healing
    pub life_steal: f32,
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Collision radius
    pub radius: f32,
    pub hp: f32,
    pub gold: u32,
    pub xp: u32,
    /// Facing angle toward the last acquired target, radians
    pub aim: f32,
    /// Last non-zero movement intent; a dash launches along this
    pub move_dir: Vec2,
}

/// One owned weapon. Weapons never time out or break; level only goes up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponInstance {
    /// Index into the weapon catalog
    pub kind: usize,
    pub level: u8,
    /// Ticks until this instance may fire again
    pub cooldown: f32,
}

/// Dash ability state machine: idle, dashing (active > 0), cooling
/// (cooldown > 0). Tuning guarantees cooldown >= duration, so a dash is
/// always still cooling when it ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashState {
    pub unlocked: bool,
    /// Ticks until the next dash may trigger
    pub cooldown: u32,
    /// Ticks of dash movement remaining
    pub active: u32,
    /// Direction locked in at trigger time
    pub dir: Vec2,
}

impl DashState {
    pub fn is_dashing(&self) -> bool {
        self.active > 0
    }

    /// Trigger gate: unlocked and fully off cooldown
    pub fn ready(&self) -> bool {
        self.unlocked && self.cooldown == 0
    }
}

/// A hostile entity. Stats are pre-scaled for the wave it spawned on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Collision radius
    pub size: f32,
    /// World units moved per tick
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub contact_damage: f32,
    /// Bounty on kill
    pub gold: u32,
    pub color: [f32; 4],
}

/// A player shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: u32,
    pub color: [f32; 4],
}

/// Particle lifetime in ticks
pub const PARTICLE_LIFE: u32 = 30;
/// Particles spawned per burst
pub const BURST_PARTICLES: usize = 8;
/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Floating damage readout; rises and fades, no gameplay effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub amount: f32,
    /// Ticks remaining
    pub life: u32,
}

/// Damage number lifetime in ticks
pub const DAMAGE_NUMBER_LIFE: u32 = 45;

/// Shop phase state, reset on every shop entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopState {
    /// Indices into the upgrade catalog, distinct per roll
    pub offers: Vec<usize>,
    /// Gold cost of the next reroll; climbs by one per reroll
    pub reroll_price: u32,
}

/// Things that happened this tick, for the presentation layer (HUD
/// flashes, sounds). Cleared at the start of every tick; never read back
/// by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted(u32),
    WaveCleared(u32),
    ShopOpened(u32),
    EnemyKilled { gold: u32 },
    PlayerHurt { damage: f32 },
    Dashed,
    Purchased { upgrade: usize },
    Rerolled { price: u32 },
    GameOver { wave: u32 },
}

/// Read-only per-frame summary for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub wave: u32,
    pub hp: f32,
    pub max_hp: f32,
    pub gold: u32,
    pub xp: u32,
    pub enemy_count: usize,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// The only RNG the simulation may draw from
    pub rng: Pcg32,
    /// Balance bundle, immutable for the lifetime of the run
    pub tuning: Tuning,
    /// Current phase
    pub phase: Phase,
    /// 1-based wave number
    pub wave: u32,
    /// Ticks elapsed in the current combat wave
    pub wave_ticks: u32,
    /// Simulation tick counter across the whole run
    pub time_ticks: u64,
    pub player: Player,
    pub stats: Stats,
    /// Owned weapons (sorted by catalog index via acquisition order)
    pub weapons: Vec<WeaponInstance>,
    pub dash: DashState,
    /// Live enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Live projectiles (sorted by id for determinism)
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Floating damage readouts (not gameplay-affecting)
    pub damage_numbers: Vec<DamageNumber>,
    pub shop: ShopState,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a run with a validated tuning bundle. Fails fast on a bad
    /// bundle; the sim itself never re-validates.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::fresh(seed, tuning))
    }

    fn fresh(seed: u64, tuning: Tuning) -> Self {
        let stats = tuning.player.base_stats;
        let player = Player {
            pos: tuning.arena / 2.0,
            radius: tuning.player.radius,
            hp: stats.max_hp,
            gold: 0,
            xp: 0,
            aim: 0.0,
            move_dir: Vec2::new(1.0, 0.0),
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: Phase::NotStarted,
            wave: 1,
            wave_ticks: 0,
            time_ticks: 0,
            player,
            stats,
            weapons: Vec::new(),
            dash: DashState::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            damage_numbers: Vec::new(),
            shop: ShopState::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Pick the starting weapon and enter combat. No-op outside the
    /// start menu; an unknown name is a config bug and errors.
    pub fn select_starting_weapon(&mut self, name: &str) -> Result<(), TuningError> {
        let kind = self
            .tuning
            .weapon_index(name)
            .ok_or_else(|| TuningError::UnknownWeapon(name.to_string()))?;
        if self.phase != Phase::NotStarted {
            return Ok(());
        }
        self.weapons.push(WeaponInstance {
            kind,
            level: 1,
            cooldown: 0.0,
        });
        self.phase = Phase::Combat;
        self.events.push(GameEvent::WaveStarted(self.wave));
        log::info!("run started with {name}");
        Ok(())
    }

    /// Throw the run away and start over with a new seed. The validated
    /// tuning bundle carries over.
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.tuning.clone();
        *self = Self::fresh(seed, tuning);
        log::info!("run restarted, seed {seed}");
    }

    /// HUD summary for the current frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            wave: self.wave,
            hp: self.player.hp,
            max_hp: self.stats.max_hp,
            gold: self.player.gold,
            xp: self.player.xp,
            enemy_count: self.enemies.len(),
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}
