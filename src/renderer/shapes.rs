//! Shape generation for 2D primitives
//!
//! Everything is flat colored triangles in world coordinates; the
//! pipeline maps them to NDC at upload time.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::GameState;
use crate::sim::state::{DAMAGE_NUMBER_LIFE, PARTICLE_LIFE};

/// Field grid line spacing in world units
const GRID_SPACING: f32 = 100.0;
const GRID_THICKNESS: f32 = 2.0;

/// Wave timer bar geometry
const TIMER_MARGIN: f32 = 16.0;
const TIMER_Y: f32 = 10.0;
const TIMER_HEIGHT: f32 = 8.0;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for an axis-aligned filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// A backed fill bar, left-anchored
pub fn bar(min: Vec2, size: Vec2, fraction: f32, back: [f32; 4], fill: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = rect(min, size, back);
    let f = fraction.clamp(0.0, 1.0);
    if f > 0.0 {
        vertices.extend(rect(min, Vec2::new(size.x * f, size.y), fill));
    }
    vertices
}

fn faded(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Tessellate one frame of the field: background, entities, cosmetics.
/// Textual HUD lives in the DOM, not here.
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let arena = state.tuning.arena;
    let mut scene = Vec::with_capacity(4096);

    scene.extend(rect(Vec2::ZERO, arena, colors::BACKGROUND));

    // furrow grid, interior lines only
    let mut x = GRID_SPACING;
    while x < arena.x {
        scene.extend(rect(
            Vec2::new(x - GRID_THICKNESS / 2.0, 0.0),
            Vec2::new(GRID_THICKNESS, arena.y),
            colors::GRID,
        ));
        x += GRID_SPACING;
    }
    let mut y = GRID_SPACING;
    while y < arena.y {
        scene.extend(rect(
            Vec2::new(0.0, y - GRID_THICKNESS / 2.0),
            Vec2::new(arena.x, GRID_THICKNESS),
            colors::GRID,
        ));
        y += GRID_SPACING;
    }

    // wave timer drains left to right
    let remaining = 1.0 - state.wave_ticks as f32 / state.tuning.wave_ticks as f32;
    scene.extend(bar(
        Vec2::new(TIMER_MARGIN, TIMER_Y),
        Vec2::new(arena.x - 2.0 * TIMER_MARGIN, TIMER_HEIGHT),
        remaining,
        colors::TIMER_BACK,
        colors::TIMER_FILL,
    ));

    for particle in &state.particles {
        let alpha = particle.life as f32 / PARTICLE_LIFE as f32;
        scene.extend(rect(
            particle.pos - Vec2::splat(2.5),
            Vec2::splat(5.0),
            faded(particle.color, alpha),
        ));
    }

    for projectile in &state.projectiles {
        scene.extend(circle(
            projectile.pos,
            projectile.radius,
            colors::PROJECTILE,
            10,
        ));
    }

    for enemy in &state.enemies {
        scene.extend(circle(enemy.pos, enemy.size, enemy.color, 16));
        if enemy.hp < enemy.max_hp {
            scene.extend(bar(
                enemy.pos - Vec2::new(enemy.size, enemy.size + 8.0),
                Vec2::new(enemy.size * 2.0, 4.0),
                enemy.hp / enemy.max_hp,
                colors::HP_BACK,
                colors::HP_ENEMY,
            ));
        }
    }

    let player = &state.player;
    let radius = player.radius;
    scene.extend(ellipse(
        player.pos,
        Vec2::new(radius, radius * 0.82),
        colors::PLAYER,
        24,
    ));
    // eyes face the current aim
    let aim_dir = Vec2::new(player.aim.cos(), player.aim.sin());
    let perp = Vec2::new(-aim_dir.y, aim_dir.x);
    for side in [-1.0, 1.0] {
        let eye = player.pos + aim_dir * radius * 0.45 + perp * side * radius * 0.3;
        scene.extend(circle(eye, radius * 0.12, colors::PLAYER_EYE, 8));
    }
    if state.dash.ready() {
        scene.extend(circle(
            player.pos + Vec2::new(0.0, radius + 8.0),
            3.0,
            colors::DASH_READY,
            8,
        ));
    }
    if player.hp < state.stats.max_hp {
        scene.extend(bar(
            player.pos - Vec2::new(radius, radius + 12.0),
            Vec2::new(radius * 2.0, 5.0),
            player.hp / state.stats.max_hp,
            colors::HP_BACK,
            colors::HP_PLAYER,
        ));
    }

    // damage readouts rendered as fading marks sized by the hit
    for number in &state.damage_numbers {
        let alpha = number.life as f32 / DAMAGE_NUMBER_LIFE as f32;
        let half = (1.5 + number.amount * 0.06).min(5.0);
        scene.extend(rect(
            number.pos - Vec2::splat(half),
            Vec2::splat(half * 2.0),
            faded(colors::DAMAGE_MARK, alpha),
        ));
    }

    scene
}
