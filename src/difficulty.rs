/// Boss progression: every stat of the next boss is a pure function of how
/// many bosses the player has already defeated in this lineage.

use crate::constants::{
    BASE_HP, HARD_BOSS_SPEED, HARD_BULLET_SPEED, HARD_MAX_BULLETS, HARD_MIN_BULLETS,
    HARD_SHOT_INTERVAL_MS, HARD_TIER_PERIOD, ORDINARY_BOSS_SPEED, ORDINARY_BULLET_SPEED,
    ORDINARY_MAX_BULLETS, ORDINARY_MIN_BULLETS, ORDINARY_SHOT_INTERVAL_MS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualTier {
    Standard,
    /// Hard-tier bosses and their barrages cycle through the rainbow.
    Rainbow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossConfig {
    pub hp: u32,
    pub shot_interval_ms: u64,
    pub bullet_count: usize,
    pub bullet_speed: f32,
    /// Magnitude of the boss's own velocity.
    pub move_speed: f32,
    pub is_hard_tier: bool,
    pub visual_tier: VisualTier,
}

pub fn is_hard_tier(defeat_count: u32) -> bool {
    (defeat_count + 1) % HARD_TIER_PERIOD == 0
}

/// Barrage size on the ordinary track: one more bullet per defeat, capped.
fn ordinary_bullet_count(defeat_count: u32) -> usize {
    (ORDINARY_MIN_BULLETS + defeat_count as usize).min(ORDINARY_MAX_BULLETS)
}

pub fn derive_boss_config(defeat_count: u32) -> BossConfig {
    let hp = (defeat_count + 1) * BASE_HP;
    let base_count = ordinary_bullet_count(defeat_count);

    if is_hard_tier(defeat_count) {
        BossConfig {
            hp,
            shot_interval_ms: HARD_SHOT_INTERVAL_MS,
            bullet_count: (base_count * 3 / 2).clamp(HARD_MIN_BULLETS, HARD_MAX_BULLETS),
            bullet_speed: HARD_BULLET_SPEED,
            move_speed: HARD_BOSS_SPEED,
            is_hard_tier: true,
            visual_tier: VisualTier::Rainbow,
        }
    } else {
        BossConfig {
            hp,
            shot_interval_ms: ORDINARY_SHOT_INTERVAL_MS,
            bullet_count: base_count,
            bullet_speed: ORDINARY_BULLET_SPEED,
            move_speed: ORDINARY_BOSS_SPEED,
            is_hard_tier: false,
            visual_tier: VisualTier::Standard,
        }
    }
}
