/// Seams to the collaborators around the core: whatever draws the field,
/// and whatever displays the running score and records final outcomes.

use crate::difficulty::VisualTier;
use crate::entities::{Boss, GameSession, Outcome, Player, ProjectileOwner, Tint};
use crate::geometry::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// `pos` is the top-left corner, `size` the extent.
    Rect,
    /// `pos` is the centre, `size` the bounding diameter.
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Player,
    PlayerShot,
    Boss(VisualTier),
    BossShot(Tint),
}

pub trait RenderSink {
    type Error;

    fn draw_entity(
        &mut self,
        shape: Shape,
        pos: Vec2,
        size: Vec2,
        paint: Paint,
    ) -> Result<(), Self::Error>;
}

/// Issue one draw call per entity: projectiles first, then the boss (unless
/// defeated), then the player on top.
pub fn draw_session<S: RenderSink>(state: &GameSession, sink: &mut S) -> Result<(), S::Error> {
    for p in &state.projectiles {
        let paint = match p.owner {
            ProjectileOwner::Player => Paint::PlayerShot,
            ProjectileOwner::Boss => Paint::BossShot(p.tint),
        };
        let d = p.radius * 2.0;
        sink.draw_entity(Shape::Circle, p.pos, Vec2::new(d, d), paint)?;
    }
    if !state.boss.is_defeated() {
        sink.draw_entity(
            Shape::Rect,
            state.boss.pos,
            Boss::size(),
            Paint::Boss(state.boss.config.visual_tier),
        )?;
    }
    sink.draw_entity(Shape::Rect, state.player.pos, Player::size(), Paint::Player)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutcomeReport {
    pub outcome: Outcome,
    pub elapsed_secs: f64,
    pub defeat_count: u32,
}

/// Receives the running score and final outcomes.  Both calls are
/// fire-and-forget: implementations swallow their own failures.
pub trait ScoreSink {
    fn show_score(&mut self, elapsed_secs: f64);
    fn report_outcome(&mut self, report: &OutcomeReport);
}
