/// Position integration and field bounds for the player and the boss.
///
/// Positions advance by `pos + vel` once per tick; the frame interval is
/// not factored in.

use std::f32::consts::TAU;

use rand::Rng;

use crate::constants::{BOSS_TURN_INTERVAL_MS, PLAYER_SPEED};
use crate::entities::{Boss, Field, Intent, Player};
use crate::geometry::Vec2;

/// Clamp each axis of a top-left anchored body into `[0, extent - size]`.
pub fn clamp_to_field(pos: Vec2, size: Vec2, field: &Field) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (field.width - size.x).max(0.0)),
        pos.y.clamp(0.0, (field.height - size.y).max(0.0)),
    )
}

/// Displacement produced by held keys plus the pointer drag.
pub fn intent_displacement(intent: &Intent) -> Vec2 {
    let mut d = intent.pointer;
    if intent.left {
        d.x -= PLAYER_SPEED;
    }
    if intent.right {
        d.x += PLAYER_SPEED;
    }
    if intent.up {
        d.y -= PLAYER_SPEED;
    }
    if intent.down {
        d.y += PLAYER_SPEED;
    }
    d
}

pub fn move_player(player: &Player, intent: &Intent, field: &Field) -> Player {
    let pos = clamp_to_field(player.pos + intent_displacement(intent), Player::size(), field);
    Player { pos }
}

/// Re-randomise the boss heading once its turn cadence has elapsed.
pub fn steer_boss(boss: &Boss, now_ms: u64, rng: &mut impl Rng) -> Boss {
    if now_ms.saturating_sub(boss.last_turn_ms) < BOSS_TURN_INTERVAL_MS {
        return boss.clone();
    }
    let angle = rng.gen_range(0.0..TAU);
    Boss {
        vel: Vec2::from_angle(angle, boss.config.move_speed),
        last_turn_ms: now_ms,
        ..boss.clone()
    }
}

/// Advance the boss by its velocity.  On leaving the field the position is
/// clamped and the offending velocity component is reversed, so the boss
/// bounces off edges instead of pinning against them.
pub fn move_boss(boss: &Boss, field: &Field) -> Boss {
    let size = Boss::size();
    let moved = boss.pos + boss.vel;
    let pos = clamp_to_field(moved, size, field);

    let mut vel = boss.vel;
    if pos.x != moved.x {
        vel.x = -vel.x;
    }
    if pos.y != moved.y {
        vel.y = -vel.y;
    }

    Boss {
        pos,
        vel,
        ..boss.clone()
    }
}
