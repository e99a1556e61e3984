/// All game entity types — pure data, no logic.

use crate::constants::{
    BOSS_HEIGHT, BOSS_WIDTH, MAX_FIELD_HEIGHT, MAX_FIELD_WIDTH, PLAYER_SIZE,
};
use crate::difficulty::BossConfig;
use crate::geometry::{Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Built but not started yet.
    Idle,
    Running,
    /// Boss defeated; waiting for the player to call the next one.
    Won,
    /// Player hit; waiting for a restart.
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

// ── Field ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(MAX_FIELD_WIDTH, MAX_FIELD_HEIGHT)
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// What the player asked for during one tick.  Keys are sampled once per
/// tick; the pointer delta is already scaled into field units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub pointer: Vec2,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Boss,
}

/// Visual tag carried by a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Plain,
    /// Index into the rainbow rotation.
    Rainbow(u8),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Centre of the projectile.
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub owner: ProjectileOwner,
    pub tint: Tint,
}

// ── Player & boss ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Top-left corner of the bounding square.
    pub pos: Vec2,
}

impl Player {
    pub fn size() -> Vec2 {
        Vec2::new(PLAYER_SIZE, PLAYER_SIZE)
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.pos, Self::size())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    /// Top-left corner of the bounding box.
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    pub last_shot_ms: u64,
    pub last_turn_ms: u64,
    pub config: BossConfig,
}

impl Boss {
    pub fn size() -> Vec2 {
        Vec2::new(BOSS_WIDTH, BOSS_HEIGHT)
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.pos, Self::size())
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game session.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    pub field: Field,
    pub player: Player,
    pub boss: Boss,
    /// Live projectiles of both owners, in emission order.
    pub projectiles: Vec<Projectile>,
    pub status: GameStatus,
    /// Clock value at which survival time started counting.
    pub start_ms: u64,
    /// Clock value of the most recent tick.
    pub now_ms: u64,
    /// Clock value at which the last `Won`/`Lost` transition happened.
    pub ended_ms: Option<u64>,
    pub last_autofire_ms: u64,
    /// Clock value of the last top-edge volley.
    pub last_ambient_ms: u64,
    /// Bosses defeated in this lineage; survives "next boss", reset on restart.
    pub defeat_count: u32,
    pub outcome: Option<Outcome>,
    /// Configuration of the boss that `advance_to_next_boss` will spawn.
    pub next_boss: Option<BossConfig>,
    pub frame: u64,
}
