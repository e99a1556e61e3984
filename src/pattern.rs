/// Radial bullet patterns.
///
/// Generation knows nothing about collisions or lifetime; projectiles are
/// handed to combat resolution as-is.

use std::f32::consts::TAU;

use rand::Rng;

use crate::constants::{
    AMBIENT_BULLETS, AMBIENT_BULLET_SPEED, AMBIENT_INTERVAL_MS, BOSS_SHOT_RADIUS, RAINBOW_COLORS,
};
use crate::difficulty::VisualTier;
use crate::entities::{Boss, GameSession, GameStatus, Projectile, ProjectileOwner, Tint};
use crate::geometry::Vec2;

/// `count` projectiles leaving `center` at `speed`, evenly spaced around the
/// full circle starting at angle 0.
pub fn radial_pattern(
    center: Vec2,
    count: usize,
    speed: f32,
    radius: f32,
    owner: ProjectileOwner,
    tier: VisualTier,
) -> Vec<Projectile> {
    if count == 0 {
        return Vec::new();
    }
    let step = TAU / count as f32;
    (0..count)
        .map(|i| Projectile {
            pos: center,
            vel: Vec2::from_angle(step * i as f32, speed),
            radius,
            owner,
            tint: match tier {
                VisualTier::Standard => Tint::Plain,
                VisualTier::Rainbow => Tint::Rainbow((i % RAINBOW_COLORS as usize) as u8),
            },
        })
        .collect()
}

pub fn boss_ready_to_fire(boss: &Boss, now_ms: u64) -> bool {
    !boss.is_defeated() && now_ms.saturating_sub(boss.last_shot_ms) >= boss.config.shot_interval_ms
}

/// Fire the boss's barrage if its cadence has elapsed.  Returns the boss
/// (with the shot clock reset when it fired) and the new projectiles.
pub fn boss_barrage(boss: &Boss, now_ms: u64) -> (Boss, Vec<Projectile>) {
    if !boss_ready_to_fire(boss, now_ms) {
        return (boss.clone(), Vec::new());
    }
    let shots = radial_pattern(
        boss.bounds().center(),
        boss.config.bullet_count,
        boss.config.bullet_speed,
        BOSS_SHOT_RADIUS,
        ProjectileOwner::Boss,
        boss.config.visual_tier,
    );
    let boss = Boss {
        last_shot_ms: now_ms,
        ..boss.clone()
    };
    (boss, shots)
}

/// Drop a volley from a random point on the top edge once the ambient
/// cadence has elapsed.  The shots are hostile to the player but not tied
/// to the boss.  Only a running session emits.
pub fn ambient_barrage(state: &GameSession, now_ms: u64, rng: &mut impl Rng) -> GameSession {
    if state.status != GameStatus::Running
        || now_ms.saturating_sub(state.last_ambient_ms) < AMBIENT_INTERVAL_MS
    {
        return state.clone();
    }
    let origin = Vec2::new(rng.gen_range(0.0..=state.field.width), 0.0);
    let mut projectiles = state.projectiles.clone();
    projectiles.extend(radial_pattern(
        origin,
        AMBIENT_BULLETS,
        AMBIENT_BULLET_SPEED,
        BOSS_SHOT_RADIUS,
        ProjectileOwner::Boss,
        VisualTier::Standard,
    ));
    GameSession {
        projectiles,
        last_ambient_ms: now_ms,
        ..state.clone()
    }
}
