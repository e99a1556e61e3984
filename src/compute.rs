/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameSession` (and, where needed, the clock and an RNG handle) and
/// returns a brand-new `GameSession`.  Side effects are limited to the
/// injected RNG and, in `run_frame`, the injected score sink.

use rand::Rng;
use tracing::debug;

use crate::combat;
use crate::constants::{
    AUTOFIRE_INTERVAL_MS, BOSS_SPAWN_Y, PLAYER_SHOT_RADIUS, PLAYER_SHOT_SPEED, PLAYER_SIZE,
    PLAYER_SPAWN_OFFSET_Y,
};
use crate::difficulty::{derive_boss_config, BossConfig};
use crate::entities::{
    Boss, Field, GameSession, GameStatus, Intent, Player, Projectile, ProjectileOwner, Tint,
};
use crate::geometry::Vec2;
use crate::movement::{clamp_to_field, move_boss, move_player, steer_boss};
use crate::pattern::{ambient_barrage, boss_barrage};
use crate::sinks::{OutcomeReport, ScoreSink};

// ── Constructors ─────────────────────────────────────────────────────────────

fn spawn_player(field: &Field) -> Player {
    let pos = Vec2::new(field.width / 2.0, field.height - PLAYER_SPAWN_OFFSET_Y);
    Player {
        pos: clamp_to_field(pos, Player::size(), field),
    }
}

/// A fresh boss at the top centre with a random heading.  Its shot and
/// turn clocks start at `now_ms`.
pub fn spawn_boss(config: BossConfig, field: &Field, now_ms: u64, rng: &mut impl Rng) -> Boss {
    let size = Boss::size();
    let pos = Vec2::new((field.width - size.x) / 2.0, BOSS_SPAWN_Y);
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Boss {
        pos: clamp_to_field(pos, size, field),
        vel: Vec2::from_angle(angle, config.move_speed),
        hp: config.hp,
        max_hp: config.hp,
        last_shot_ms: now_ms,
        last_turn_ms: now_ms,
        config,
    }
}

/// Build an idle session for the given field.  Nothing moves until
/// `start_new_game` is called.
pub fn init_state(field: Field) -> GameSession {
    let config = derive_boss_config(0);
    let size = Boss::size();
    GameSession {
        field,
        player: spawn_player(&field),
        boss: Boss {
            pos: clamp_to_field(
                Vec2::new((field.width - size.x) / 2.0, BOSS_SPAWN_Y),
                size,
                &field,
            ),
            vel: Vec2::ZERO,
            hp: config.hp,
            max_hp: config.hp,
            last_shot_ms: 0,
            last_turn_ms: 0,
            config,
        },
        projectiles: Vec::new(),
        status: GameStatus::Idle,
        start_ms: 0,
        now_ms: 0,
        ended_ms: None,
        last_autofire_ms: 0,
        last_ambient_ms: 0,
        defeat_count: 0,
        outcome: None,
        next_boss: None,
        frame: 0,
    }
}

// ── Lifecycle triggers ───────────────────────────────────────────────────────

/// Full reset: defeat count back to zero, first boss, clock restarted.
/// Valid from any state.
pub fn start_new_game(state: &GameSession, now_ms: u64, rng: &mut impl Rng) -> GameSession {
    let field = state.field;
    debug!(from = ?state.status, "starting new game");
    GameSession {
        player: spawn_player(&field),
        boss: spawn_boss(derive_boss_config(0), &field, now_ms, rng),
        projectiles: Vec::new(),
        status: GameStatus::Running,
        start_ms: now_ms,
        now_ms,
        ended_ms: None,
        last_autofire_ms: now_ms,
        last_ambient_ms: now_ms,
        defeat_count: 0,
        outcome: None,
        next_boss: None,
        frame: 0,
        field,
    }
}

/// Spawn the next boss after a victory, keeping the defeat count.  The
/// time spent on the victory screen is not counted as survival time.
/// Outside the `Won` state this is a no-op.
pub fn advance_to_next_boss(state: &GameSession, now_ms: u64, rng: &mut impl Rng) -> GameSession {
    if state.status != GameStatus::Won {
        debug!(status = ?state.status, "next boss ignored");
        return state.clone();
    }
    let config = state
        .next_boss
        .unwrap_or_else(|| derive_boss_config(state.defeat_count));
    let paused = now_ms.saturating_sub(state.ended_ms.unwrap_or(now_ms));
    debug!(
        defeats = state.defeat_count,
        hp = config.hp,
        hard = config.is_hard_tier,
        "advancing to next boss"
    );
    GameSession {
        player: spawn_player(&state.field),
        boss: spawn_boss(config, &state.field, now_ms, rng),
        projectiles: Vec::new(),
        status: GameStatus::Running,
        start_ms: state.start_ms + paused,
        now_ms,
        ended_ms: None,
        last_autofire_ms: now_ms,
        last_ambient_ms: now_ms,
        outcome: None,
        next_boss: None,
        ..state.clone()
    }
}

/// Rescale every position onto a new field.  Progression, timers and the
/// session status are untouched.
pub fn resize_field(state: &GameSession, field: Field) -> GameSession {
    let old = state.field;
    let sx = if old.width > 0.0 { field.width / old.width } else { 1.0 };
    let sy = if old.height > 0.0 { field.height / old.height } else { 1.0 };
    let scale = |v: Vec2| Vec2::new(v.x * sx, v.y * sy);

    let player = Player {
        pos: clamp_to_field(scale(state.player.pos), Player::size(), &field),
    };
    let boss = Boss {
        pos: clamp_to_field(scale(state.boss.pos), Boss::size(), &field),
        ..state.boss.clone()
    };
    let projectiles = state
        .projectiles
        .iter()
        .map(|p| Projectile {
            pos: scale(p.pos),
            ..p.clone()
        })
        .collect();

    GameSession {
        field,
        player,
        boss,
        projectiles,
        ..state.clone()
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

/// Survival time in seconds.  Frozen once the session has ended.
pub fn elapsed_secs(state: &GameSession) -> f64 {
    let end = state.ended_ms.unwrap_or(state.now_ms);
    end.saturating_sub(state.start_ms) as f64 / 1000.0
}

// ── Autofire ─────────────────────────────────────────────────────────────────

/// Fire one upward shot from the player's nose if the autofire cadence
/// has elapsed.
pub fn player_autofire(state: &GameSession, now_ms: u64) -> GameSession {
    if now_ms.saturating_sub(state.last_autofire_ms) < AUTOFIRE_INTERVAL_MS {
        return state.clone();
    }
    let shot = Projectile {
        pos: Vec2::new(
            state.player.pos.x + PLAYER_SIZE / 2.0,
            state.player.pos.y - PLAYER_SHOT_RADIUS,
        ),
        vel: Vec2::new(0.0, -PLAYER_SHOT_SPEED),
        radius: PLAYER_SHOT_RADIUS,
        owner: ProjectileOwner::Player,
        tint: Tint::Plain,
    };
    let mut projectiles = state.projectiles.clone();
    projectiles.push(shot);
    GameSession {
        projectiles,
        last_autofire_ms: now_ms,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance a running session by one frame at clock value `now_ms`.
/// Sessions that are not running come back unchanged, so nothing fires,
/// turns or collides while an outcome is on screen.
pub fn tick(
    state: &GameSession,
    intent: &Intent,
    now_ms: u64,
    rng: &mut impl Rng,
) -> GameSession {
    if state.status != GameStatus::Running {
        return state.clone();
    }

    // ── 1. Player movement ───────────────────────────────────────────────────
    let player = move_player(&state.player, intent, &state.field);

    // ── 2. Boss movement ─────────────────────────────────────────────────────
    let boss = if state.boss.is_defeated() {
        state.boss.clone()
    } else {
        move_boss(&steer_boss(&state.boss, now_ms, rng), &state.field)
    };

    // ── 3. Barrages ──────────────────────────────────────────────────────────
    let (boss, barrage) = boss_barrage(&boss, now_ms);
    let mut projectiles = state.projectiles.clone();
    projectiles.extend(barrage);

    let next = GameSession {
        player,
        boss,
        projectiles,
        now_ms,
        frame: state.frame + 1,
        ..state.clone()
    };
    let next = ambient_barrage(&next, now_ms, rng);

    // ── 4. Autofire ──────────────────────────────────────────────────────────
    let next = player_autofire(&next, now_ms);

    // ── 5. Combat ────────────────────────────────────────────────────────────
    combat::resolve(&next)
}

/// `tick` plus the collaborator side of a frame: the running score goes to
/// the sink every running frame, and the outcome is reported exactly once
/// on the frame that ends the encounter.
pub fn run_frame(
    state: &GameSession,
    intent: &Intent,
    now_ms: u64,
    rng: &mut impl Rng,
    sink: &mut impl ScoreSink,
) -> GameSession {
    if state.status != GameStatus::Running {
        return state.clone();
    }
    let next = tick(state, intent, now_ms, rng);
    let secs = elapsed_secs(&next);
    sink.show_score(secs);

    if let Some(outcome) = next.outcome {
        sink.report_outcome(&OutcomeReport {
            outcome,
            elapsed_secs: secs,
            defeat_count: next.defeat_count,
        });
    }
    next
}
