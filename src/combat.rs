/// Combat resolution for one running frame.
///
/// Order within a frame:
///   1. advance projectiles
///   2. boss projectiles ↔ player (a hit ends the frame as `Lost`)
///   3. player projectiles ↔ boss
///   4. boss defeat → `Won`, next boss configuration computed
///   5. drop projectiles outside the field

use tracing::{debug, info};

use crate::difficulty::derive_boss_config;
use crate::entities::{Field, GameSession, GameStatus, Outcome, Projectile, ProjectileOwner};
use crate::geometry::{circle_rect_overlap, point_in_rect};

/// A projectile stays live while its centre lies inside the field grown by
/// its own radius.
pub fn is_live(p: &Projectile, field: &Field) -> bool {
    point_in_rect(p.pos, &field.rect().expanded(p.radius))
}

pub fn advance_projectiles(projectiles: &[Projectile]) -> Vec<Projectile> {
    projectiles
        .iter()
        .map(|p| Projectile {
            pos: p.pos + p.vel,
            ..p.clone()
        })
        .collect()
}

pub fn player_is_hit(state: &GameSession) -> bool {
    let body = state.player.bounds();
    state
        .projectiles
        .iter()
        .filter(|p| p.owner == ProjectileOwner::Boss)
        .any(|p| circle_rect_overlap(p.pos, p.radius, &body))
}

pub fn cull_projectiles(projectiles: Vec<Projectile>, field: &Field) -> Vec<Projectile> {
    projectiles.into_iter().filter(|p| is_live(p, field)).collect()
}

/// Run steps 1–5 against a running session.  Sessions in any other state
/// are returned unchanged.
pub fn resolve(state: &GameSession) -> GameSession {
    if state.status != GameStatus::Running {
        return state.clone();
    }
    let mut next = state.clone();

    // ── 1. Move projectiles ──────────────────────────────────────────────────
    next.projectiles = advance_projectiles(&state.projectiles);

    // ── 2. Boss projectiles ↔ player ─────────────────────────────────────────
    if player_is_hit(&next) {
        next.status = GameStatus::Lost;
        next.outcome = Some(Outcome::Lost);
        next.ended_ms = Some(next.now_ms);
        next.projectiles = cull_projectiles(next.projectiles, &next.field);
        info!(
            defeats = next.defeat_count,
            elapsed_ms = next.now_ms.saturating_sub(next.start_ms),
            "player hit"
        );
        return next;
    }

    // ── 3. Player projectiles ↔ boss ─────────────────────────────────────────
    let body = next.boss.bounds();
    let mut hp = next.boss.hp;
    next.projectiles.retain(|p| {
        if p.owner != ProjectileOwner::Player || hp == 0 {
            return true;
        }
        if circle_rect_overlap(p.pos, p.radius, &body) {
            hp -= 1;
            return false;
        }
        true
    });
    if hp != next.boss.hp {
        debug!(hp, max_hp = next.boss.max_hp, "boss damaged");
    }
    next.boss.hp = hp;

    // ── 4. Boss defeat ───────────────────────────────────────────────────────
    if next.boss.is_defeated() && !state.boss.is_defeated() {
        next.defeat_count += 1;
        next.status = GameStatus::Won;
        next.outcome = Some(Outcome::Won);
        next.ended_ms = Some(next.now_ms);
        next.next_boss = Some(derive_boss_config(next.defeat_count));
        info!(defeats = next.defeat_count, "boss defeated");
    }

    // ── 5. Cull off-field projectiles ────────────────────────────────────────
    next.projectiles = cull_projectiles(next.projectiles, &next.field);

    next
}
