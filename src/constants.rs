//! Gameplay tuning.  Distances are field units, times are milliseconds.

// ── Field ─────────────────────────────────────────────────────────────────────

pub const MAX_FIELD_WIDTH: f32 = 600.0;
pub const MAX_FIELD_HEIGHT: f32 = 400.0;

// ── Player ────────────────────────────────────────────────────────────────────

/// Side of the player's square bounding box.
pub const PLAYER_SIZE: f32 = 10.0;
/// Displacement per tick for each held direction.
pub const PLAYER_SPEED: f32 = 4.0;
/// The player spawns this far above the bottom edge.
pub const PLAYER_SPAWN_OFFSET_Y: f32 = 30.0;
/// Touch/mouse drag deltas are scaled by this before reaching the player.
pub const POINTER_SCALE: f32 = 0.2;

pub const AUTOFIRE_INTERVAL_MS: u64 = 100;
pub const PLAYER_SHOT_SPEED: f32 = 7.0;
pub const PLAYER_SHOT_RADIUS: f32 = 3.0;

// ── Boss ──────────────────────────────────────────────────────────────────────

pub const BOSS_WIDTH: f32 = 40.0;
pub const BOSS_HEIGHT: f32 = 20.0;
pub const BOSS_SPAWN_Y: f32 = 40.0;
/// The boss picks a new random heading this often.
pub const BOSS_TURN_INTERVAL_MS: u64 = 500;

pub const BOSS_SHOT_RADIUS: f32 = 5.0;

// ── Ambient barrage ───────────────────────────────────────────────────────────

/// A volley drops from a random point on the top edge this often.
pub const AMBIENT_INTERVAL_MS: u64 = 2500;
pub const AMBIENT_BULLETS: usize = 12;
pub const AMBIENT_BULLET_SPEED: f32 = 2.0;

// ── Difficulty ────────────────────────────────────────────────────────────────

/// Boss HP is `(defeat_count + 1) * BASE_HP`.
pub const BASE_HP: u32 = 3;
/// Every n-th boss belongs to the hard tier.
pub const HARD_TIER_PERIOD: u32 = 5;

pub const ORDINARY_SHOT_INTERVAL_MS: u64 = 1500;
pub const HARD_SHOT_INTERVAL_MS: u64 = 1000;

pub const ORDINARY_MIN_BULLETS: usize = 12;
pub const ORDINARY_MAX_BULLETS: usize = 20;
pub const HARD_MIN_BULLETS: usize = 16;
pub const HARD_MAX_BULLETS: usize = 24;

pub const ORDINARY_BULLET_SPEED: f32 = 3.0;
pub const HARD_BULLET_SPEED: f32 = 4.0;

pub const ORDINARY_BOSS_SPEED: f32 = 2.0;
pub const HARD_BOSS_SPEED: f32 = 3.0;

/// Length of the rainbow colour rotation used by hard-tier barrages.
pub const RAINBOW_COLORS: u8 = 7;

// ── Leaderboard ───────────────────────────────────────────────────────────────

pub const LEADERBOARD_LEN: usize = 10;
