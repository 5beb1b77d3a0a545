//! Player control: movement, dash, auto-aim, weapon fire, regen

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState, Projectile};
use super::tick::TickInput;
use crate::consts::TICKS_PER_SECOND;
use crate::intent_vector;

/// Apply movement intent (or an active dash) and clamp to the play area.
/// Also runs the dash state machine: trigger, then decrement both timers.
pub fn update_movement(state: &mut GameState, input: &TickInput) {
    let intent = intent_vector(input.up, input.down, input.left, input.right);
    if intent != Vec2::ZERO {
        state.player.move_dir = intent;
    }

    if input.dash && state.dash.ready() {
        state.dash.active = state.tuning.dash.duration_ticks;
        state.dash.cooldown = state.tuning.dash.cooldown_ticks;
        state.dash.dir = state.player.move_dir;
        state.events.push(GameEvent::Dashed);
    }

    let velocity = if state.dash.is_dashing() {
        state.dash.dir * state.stats.move_speed * state.tuning.dash.speed_mult
    } else {
        intent * state.stats.move_speed
    };
    state.player.pos += velocity;

    let r = state.player.radius;
    state.player.pos = state
        .player
        .pos
        .clamp(Vec2::splat(r), state.tuning.arena - Vec2::splat(r));

    // both timers run every tick, independent of each other
    state.dash.active = state.dash.active.saturating_sub(1);
    state.dash.cooldown = state.dash.cooldown.saturating_sub(1);
}

/// Aim at the nearest enemy and fire every weapon whose cooldown elapsed.
/// With no target, cooldowns still tick down but nothing fires and the
/// facing angle keeps its last value.
pub fn update_weapons(state: &mut GameState) {
    let mut target = None;
    let mut best = f32::INFINITY;
    for enemy in &state.enemies {
        let d = enemy.pos.distance_squared(state.player.pos);
        if d < best {
            best = d;
            target = Some(enemy.pos);
        }
    }
    if let Some(t) = target {
        let delta = t - state.player.pos;
        state.player.aim = delta.y.atan2(delta.x);
    }

    for i in 0..state.weapons.len() {
        if state.weapons[i].cooldown > 0.0 {
            state.weapons[i].cooldown -= 1.0;
        }
        if state.weapons[i].cooldown > 0.0 || target.is_none() {
            continue;
        }

        let kind = state.weapons[i].kind;
        let level = state.weapons[i].level;
        let spec = &state.tuning.weapons[kind];
        let (count, spread, speed, base_cooldown) = (
            spec.projectiles,
            spec.spread,
            spec.projectile_speed,
            spec.cooldown,
        );
        let damage = state.stats.damage + spec.damage_mod + (level - 1) as f32;

        for _ in 0..count {
            let jitter = (state.rng.random::<f32>() - 0.5) * spread;
            let angle = state.player.aim + jitter;
            let id = state.next_entity_id();
            state.projectiles.push(Projectile {
                id,
                pos: state.player.pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                radius: state.tuning.player.projectile_radius,
                damage,
            });
        }

        // floor of one tick so a deeply negative attack-speed stat can
        // never wedge a weapon into firing forever
        state.weapons[i].cooldown = (base_cooldown + state.stats.attack_speed).max(1.0);
    }
}

/// Passive regeneration, a per-second rate applied per tick
pub fn apply_regen(state: &mut GameState) {
    if state.stats.hp_regen > 0.0 && state.player.hp < state.stats.max_hp {
        state.player.hp =
            (state.player.hp + state.stats.hp_regen / TICKS_PER_SECOND).min(state.stats.max_hp);
    }
}
