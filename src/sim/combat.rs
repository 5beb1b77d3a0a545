//! Combat resolution
//!
//! Projectile hits run in two passes: pass one collects (projectile id,
//! enemy id) pairs against a stable registry, pass two applies damage and
//! removals. A projectile is consumed by its first overlap and can never
//! strike twice, and nothing is removed mid-scan.

use glam::Vec2;
use rand::Rng;

use super::state::{
    BURST_PARTICLES, DAMAGE_NUMBER_LIFE, DamageNumber, GameEvent, GameState, MAX_PARTICLES,
    PARTICLE_LIFE, Particle, Phase,
};
use crate::consts::CULL_MARGIN;

/// True when two circles overlap (strict, touching is not a hit)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Advance projectiles along their fixed velocity and cull any that left
/// the play area (plus margin).
pub fn update_projectiles(state: &mut GameState) {
    let arena = state.tuning.arena;
    for p in &mut state.projectiles {
        p.pos += p.vel;
    }
    state.projectiles.retain(|p| {
        p.pos.x > -CULL_MARGIN
            && p.pos.x < arena.x + CULL_MARGIN
            && p.pos.y > -CULL_MARGIN
            && p.pos.y < arena.y + CULL_MARGIN
    });
}

/// Enemy pass: each enemy steps straight toward the player, or lands its
/// one contact hit and disappears with no reward. Armor reduces the hit
/// to a floor of 1. Reaching zero HP ends the run immediately.
pub fn resolve_contacts(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_r = state.player.radius;
    let armor = state.stats.armor;

    let mut hits: Vec<f32> = Vec::new();
    state.enemies.retain_mut(|enemy| {
        let delta = player_pos - enemy.pos;
        let dist = delta.length();
        if dist > enemy.size + player_r {
            enemy.pos += delta / dist * enemy.speed;
            true
        } else {
            hits.push((enemy.contact_damage - armor).max(1.0));
            false
        }
    });

    for damage in hits {
        state.player.hp -= damage;
        state.events.push(GameEvent::PlayerHurt { damage });
        spawn_burst(state, player_pos, [1.0, 0.0, 0.0, 1.0]);
    }

    if state.player.hp <= 0.0 {
        state.player.hp = 0.0;
        state.phase = Phase::GameOver;
        state.events.push(GameEvent::GameOver { wave: state.wave });
        log::info!("run over on wave {}", state.wave);
    }
}

/// Projectile pass. Kills bank gold and XP and burst in the enemy's
/// color; a pair whose enemy already died this tick still consumes the
/// projectile but deals nothing. Life steal heals from damage dealt.
pub fn resolve_projectile_hits(state: &mut GameState) {
    let mut pairs: Vec<(u32, u32)> = Vec::new();
    for proj in &state.projectiles {
        for enemy in &state.enemies {
            if circles_overlap(proj.pos, proj.radius, enemy.pos, enemy.size) {
                pairs.push((proj.id, enemy.id));
                break;
            }
        }
    }
    if pairs.is_empty() {
        return;
    }

    let mut consumed: Vec<u32> = Vec::with_capacity(pairs.len());
    let mut healed = 0.0;
    for (proj_id, enemy_id) in pairs {
        let Some(pi) = state.projectiles.iter().position(|p| p.id == proj_id) else {
            continue;
        };
        let damage = state.projectiles[pi].damage;
        consumed.push(proj_id);

        let Some(ei) = state.enemies.iter().position(|e| e.id == enemy_id) else {
            continue;
        };
        if state.enemies[ei].hp <= 0.0 {
            continue;
        }
        state.enemies[ei].hp -= damage;
        healed += damage * state.stats.life_steal;

        let pos = state.enemies[ei].pos;
        state.damage_numbers.push(DamageNumber {
            pos,
            amount: damage,
            life: DAMAGE_NUMBER_LIFE,
        });

        if state.enemies[ei].hp <= 0.0 {
            let gold = state.enemies[ei].gold;
            let color = state.enemies[ei].color;
            state.player.gold += gold;
            state.player.xp += state.tuning.player.xp_per_kill;
            state.events.push(GameEvent::EnemyKilled { gold });
            spawn_burst(state, pos, color);
        }
    }

    state.projectiles.retain(|p| !consumed.contains(&p.id));
    state.enemies.retain(|e| e.hp > 0.0);

    if healed > 0.0 {
        state.player.hp = (state.player.hp + healed).min(state.stats.max_hp);
    }
}

/// Eight-particle burst at a combat event site
pub fn spawn_burst(state: &mut GameState, pos: Vec2, color: [f32; 4]) {
    for _ in 0..BURST_PARTICLES {
        if state.particles.len() >= MAX_PARTICLES {
            state.particles.remove(0);
        }
        let vel = Vec2::new(
            state.rng.random::<f32>() - 0.5,
            state.rng.random::<f32>() - 0.5,
        ) * 4.0;
        state.particles.push(Particle {
            pos,
            vel,
            life: PARTICLE_LIFE,
            color,
        });
    }
}

/// Age cosmetic state: particles drift and expire, damage numbers rise
pub fn update_cosmetics(state: &mut GameState) {
    for p in &mut state.particles {
        p.pos += p.vel;
        p.life = p.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);

    for d in &mut state.damage_numbers {
        d.pos.y -= 0.8;
        d.life = d.life.saturating_sub(1);
    }
    state.damage_numbers.retain(|d| d.life > 0);
}
