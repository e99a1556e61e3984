use boss_barrage::compute::*;
use boss_barrage::entities::*;
use boss_barrage::geometry::Vec2;
use boss_barrage::sinks::{OutcomeReport, ScoreSink};

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A running session started at t=0 on a 600×400 field, with a motionless
/// boss so positions are predictable.
fn make_state() -> GameSession {
    let mut s = start_new_game(&init_state(Field::new(600.0, 400.0)), 0, &mut seeded_rng());
    s.boss.vel = Vec2::ZERO;
    s
}

/// Boss box is (280, 40) 40×20; after one step this lands at (300, 50).
fn player_shot_into_boss() -> Projectile {
    Projectile {
        pos: Vec2::new(300.0, 57.0),
        vel: Vec2::new(0.0, -7.0),
        radius: 3.0,
        owner: ProjectileOwner::Player,
        tint: Tint::Plain,
    }
}

fn boss_shot_on_player(s: &GameSession) -> Projectile {
    Projectile {
        pos: s.player.bounds().center(),
        vel: Vec2::ZERO,
        radius: 5.0,
        owner: ProjectileOwner::Boss,
        tint: Tint::Plain,
    }
}

fn count(s: &GameSession, owner: ProjectileOwner) -> usize {
    s.projectiles.iter().filter(|p| p.owner == owner).count()
}

#[derive(Default)]
struct RecordingSink {
    scores: Vec<f64>,
    outcomes: Vec<OutcomeReport>,
}

impl ScoreSink for RecordingSink {
    fn show_score(&mut self, elapsed_secs: f64) {
        self.scores.push(elapsed_secs);
    }

    fn report_outcome(&mut self, report: &OutcomeReport) {
        self.outcomes.push(*report);
    }
}

// ── init_state / start_new_game ───────────────────────────────────────────────

#[test]
fn init_state_is_idle() {
    let s = init_state(Field::new(600.0, 400.0));
    assert_eq!(s.status, GameStatus::Idle);
    assert_eq!(s.defeat_count, 0);
    assert!(s.projectiles.is_empty());
    assert_eq!(s.boss.hp, 3);
}

#[test]
fn init_state_player_position() {
    let s = init_state(Field::new(600.0, 400.0));
    assert_eq!(s.player.pos, Vec2::new(300.0, 370.0));
    assert_eq!(s.boss.pos, Vec2::new(280.0, 40.0));
}

#[test]
fn tick_does_nothing_while_idle() {
    let s = init_state(Field::new(600.0, 400.0));
    let s2 = tick(&s, &Intent::default(), 5_000, &mut seeded_rng());
    assert_eq!(s2, s);
}

#[test]
fn start_new_game_runs_first_boss() {
    let s = start_new_game(&init_state(Field::new(600.0, 400.0)), 250, &mut seeded_rng());
    assert_eq!(s.status, GameStatus::Running);
    assert_eq!(s.start_ms, 250);
    assert_eq!(s.boss.hp, 3);
    assert_eq!(s.boss.max_hp, 3);
    assert_eq!(s.boss.last_shot_ms, 250);
    assert!((s.boss.vel.length() - s.boss.config.move_speed).abs() < 1e-4);
}

// ── autofire ──────────────────────────────────────────────────────────────────

#[test]
fn autofire_waits_for_cadence() {
    let s = make_state();
    let s2 = tick(&s, &Intent::default(), 99, &mut seeded_rng());
    assert_eq!(count(&s2, ProjectileOwner::Player), 0);
}

#[test]
fn autofire_shoots_upward_from_player() {
    let s = make_state(); // player at (300, 370)
    let s2 = tick(&s, &Intent::default(), 100, &mut seeded_rng());
    let shots: Vec<_> = s2
        .projectiles
        .iter()
        .filter(|p| p.owner == ProjectileOwner::Player)
        .collect();
    assert_eq!(shots.len(), 1);
    // spawned at (305, 367), advanced by (0, -7) in the same frame
    assert_eq!(shots[0].pos, Vec2::new(305.0, 360.0));
    assert_eq!(s2.last_autofire_ms, 100);
}

// ── boss fire cadence ─────────────────────────────────────────────────────────

#[test]
fn boss_fires_barrage_on_interval() {
    let s = make_state();
    let s2 = tick(&s, &Intent::default(), 1_500, &mut seeded_rng());
    assert_eq!(count(&s2, ProjectileOwner::Boss), 12);
    assert_eq!(s2.boss.last_shot_ms, 1_500);
}

#[test]
fn boss_holds_fire_before_interval() {
    let s = make_state();
    let s2 = tick(&s, &Intent::default(), 1_499, &mut seeded_rng());
    assert_eq!(count(&s2, ProjectileOwner::Boss), 0);
}

#[test]
fn defeated_boss_emits_nothing() {
    let mut s = make_state();
    s.boss.hp = 0;
    let s2 = tick(&s, &Intent::default(), 1_500, &mut seeded_rng());
    assert_eq!(count(&s2, ProjectileOwner::Boss), 0);
    assert_eq!(s2.defeat_count, 0);
}

#[test]
fn tick_drops_ambient_volley_from_top_edge() {
    let s = make_state();
    let held = tick(&s, &Intent::default(), 2_499, &mut seeded_rng());
    assert!(held.projectiles.iter().all(|p| p.pos.y > 10.0));

    let s2 = tick(&s, &Intent::default(), 2_500, &mut seeded_rng());
    assert_eq!(s2.last_ambient_ms, 2_500);
    // one step at speed 2 keeps the volley within 2 units of the top edge
    let ambient = s2.projectiles.iter().filter(|p| p.pos.y <= 2.0 + 1e-4).count();
    assert_eq!(ambient, 12);
}

// ── victory and progression ──────────────────────────────────────────────────

#[test]
fn three_hits_defeat_first_boss_then_next_boss_has_six_hp() {
    let mut s = make_state();
    for _ in 0..3 {
        s.projectiles.push(player_shot_into_boss());
    }
    let s2 = tick(&s, &Intent::default(), 50, &mut seeded_rng());
    assert_eq!(s2.boss.hp, 0);
    assert_eq!(s2.status, GameStatus::Won);
    assert_eq!(s2.outcome, Some(Outcome::Won));
    assert_eq!(s2.defeat_count, 1);
    assert_eq!(s2.next_boss.map(|c| c.hp), Some(6));

    let s3 = advance_to_next_boss(&s2, 1_000, &mut seeded_rng());
    assert_eq!(s3.status, GameStatus::Running);
    assert_eq!(s3.boss.hp, 6);
    assert_eq!(s3.defeat_count, 1);
    assert!(s3.projectiles.is_empty());
}

#[test]
fn surplus_hits_do_not_double_count_defeat() {
    let mut s = make_state();
    for _ in 0..4 {
        s.projectiles.push(player_shot_into_boss());
    }
    let s2 = tick(&s, &Intent::default(), 50, &mut seeded_rng());
    assert_eq!(s2.defeat_count, 1);
    assert_eq!(s2.boss.hp, 0);
    // the fourth shot was not consumed
    assert_eq!(count(&s2, ProjectileOwner::Player), 1);
}

#[test]
fn won_session_is_frozen() {
    let mut s = make_state();
    for _ in 0..3 {
        s.projectiles.push(player_shot_into_boss());
    }
    let won = tick(&s, &Intent::default(), 50, &mut seeded_rng());
    let later = tick(&won, &Intent { left: true, ..Intent::default() }, 9_000, &mut seeded_rng());
    assert_eq!(later, won);
}

#[test]
fn next_boss_excludes_victory_pause_from_score() {
    let mut s = make_state();
    for _ in 0..3 {
        s.projectiles.push(player_shot_into_boss());
    }
    let won = tick(&s, &Intent::default(), 50, &mut seeded_rng());
    let next = advance_to_next_boss(&won, 5_050, &mut seeded_rng());
    assert_eq!(next.start_ms, 5_000);
    let s2 = tick(&next, &Intent::default(), 5_100, &mut seeded_rng());
    assert!((elapsed_secs(&s2) - 0.1).abs() < 1e-9);
}

#[test]
fn fifth_boss_is_hard_tier() {
    let mut s = make_state();
    s.defeat_count = 3;
    s.boss.hp = 1;
    s.projectiles.push(player_shot_into_boss());
    let won = tick(&s, &Intent::default(), 50, &mut seeded_rng());
    assert_eq!(won.defeat_count, 4);
    let next = advance_to_next_boss(&won, 100, &mut seeded_rng());
    assert!(next.boss.config.is_hard_tier);
    assert_eq!(next.boss.hp, 15);
}

#[test]
fn advance_outside_won_is_noop() {
    let s = make_state();
    assert_eq!(advance_to_next_boss(&s, 10, &mut seeded_rng()), s);
}

#[test]
fn restart_resets_defeat_count() {
    let mut s = make_state();
    for _ in 0..3 {
        s.projectiles.push(player_shot_into_boss());
    }
    let won = tick(&s, &Intent::default(), 50, &mut seeded_rng());
    let fresh = start_new_game(&won, 2_000, &mut seeded_rng());
    assert_eq!(fresh.defeat_count, 0);
    assert_eq!(fresh.boss.hp, 3);
    assert_eq!(fresh.start_ms, 2_000);
    assert_eq!(fresh.status, GameStatus::Running);
}

// ── loss ──────────────────────────────────────────────────────────────────────

#[test]
fn boss_shot_on_player_loses_on_same_tick() {
    let mut s = make_state();
    let shot = boss_shot_on_player(&s);
    s.projectiles.push(shot);
    let s2 = tick(&s, &Intent::default(), 1_234, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Lost);
    assert_eq!(s2.outcome, Some(Outcome::Lost));
    assert!((elapsed_secs(&s2) - 1.234).abs() < 1e-9);
}

#[test]
fn loss_is_idempotent() {
    let mut s = make_state();
    let shot = boss_shot_on_player(&s);
    s.projectiles.push(shot);
    let lost = tick(&s, &Intent::default(), 1_234, &mut seeded_rng());

    let mut again = lost.clone();
    let shot = boss_shot_on_player(&again);
    again.projectiles.push(shot);
    let later = tick(&again, &Intent::default(), 4_000, &mut seeded_rng());

    assert_eq!(later.status, GameStatus::Lost);
    assert_eq!(later.outcome, Some(Outcome::Lost));
    assert_eq!(elapsed_secs(&later), elapsed_secs(&lost));
}

// ── run_frame ─────────────────────────────────────────────────────────────────

#[test]
fn run_frame_reports_score_each_running_frame() {
    let s = make_state();
    let mut sink = RecordingSink::default();
    let s = run_frame(&s, &Intent::default(), 500, &mut seeded_rng(), &mut sink);
    let _ = run_frame(&s, &Intent::default(), 750, &mut seeded_rng(), &mut sink);
    assert_eq!(sink.scores, vec![0.5, 0.75]);
    assert!(sink.outcomes.is_empty());
}

#[test]
fn run_frame_reports_outcome_once() {
    let mut s = make_state();
    s.defeat_count = 2;
    let shot = boss_shot_on_player(&s);
    s.projectiles.push(shot);

    let mut sink = RecordingSink::default();
    let lost = run_frame(&s, &Intent::default(), 2_000, &mut seeded_rng(), &mut sink);
    let _ = run_frame(&lost, &Intent::default(), 3_000, &mut seeded_rng(), &mut sink);

    assert_eq!(
        sink.outcomes,
        vec![OutcomeReport {
            outcome: Outcome::Lost,
            elapsed_secs: 2.0,
            defeat_count: 2,
        }]
    );
    assert_eq!(sink.scores, vec![2.0]);
}

// ── resize ────────────────────────────────────────────────────────────────────

#[test]
fn resize_rescales_without_resetting_progress() {
    let mut s = make_state();
    s.defeat_count = 7;
    let s2 = resize_field(&s, Field::new(300.0, 200.0));
    assert_eq!(s2.field, Field::new(300.0, 200.0));
    assert_eq!(s2.player.pos, Vec2::new(150.0, 185.0));
    assert_eq!(s2.boss.pos, Vec2::new(140.0, 20.0));
    assert_eq!(s2.defeat_count, 7);
    assert_eq!(s2.status, GameStatus::Running);
    assert_eq!(s2.start_ms, s.start_ms);
}

#[test]
fn resize_clamps_bodies_into_smaller_field() {
    let mut s = make_state();
    s.player.pos = Vec2::new(590.0, 390.0);
    let s2 = resize_field(&s, Field::new(100.0, 100.0));
    let b = s2.player.bounds();
    assert!(b.right() <= 100.0 && b.bottom() <= 100.0);
}
