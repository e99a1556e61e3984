/// Rendering layer — all terminal I/O lives here.
///
/// The play field is measured in continuous field units; this module maps
/// it onto the character grid inside the border and translates the core's
/// draw calls into terminal commands.  No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use boss_barrage::compute::elapsed_secs;
use boss_barrage::constants::{MAX_FIELD_HEIGHT, MAX_FIELD_WIDTH, RAINBOW_COLORS};
use boss_barrage::difficulty::VisualTier;
use boss_barrage::entities::{Field, GameSession, GameStatus, Tint};
use boss_barrage::geometry::Vec2;
use boss_barrage::leaderboard::ScoreEntry;
use boss_barrage::sinks::{draw_session, Paint, RenderSink, Shape};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HP: Color = Color::Red;
const C_HUD_HARD: Color = Color::Magenta;
const C_PLAYER: Color = Color::Blue;
const C_BOSS: Color = Color::Red;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_BOSS: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

const RAINBOW: [Color; RAINBOW_COLORS as usize] = [
    Color::Red,
    Color::DarkYellow,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

/// Approximate size of one terminal cell in field units.
const CELL_W: f32 = 8.0;
const CELL_H: f32 = 16.0;

/// The largest field that fits the playable area of a terminal, capped
/// like the browser canvas.
pub fn field_for_terminal(width: u16, height: u16) -> Field {
    let cols = width.saturating_sub(2).max(1) as f32;
    let rows = height.saturating_sub(4).max(1) as f32;
    Field::new(
        (cols * CELL_W).min(MAX_FIELD_WIDTH),
        (rows * CELL_H).min(MAX_FIELD_HEIGHT),
    )
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps field coordinates onto the cells between the border lines
/// (columns 1..width-1, rows 2..height-2).
#[derive(Clone, Copy, Debug)]
struct Viewport {
    field: Field,
    width: u16,
    height: u16,
}

impl Viewport {
    fn inner_cols(&self) -> u16 {
        self.width.saturating_sub(2).max(1)
    }

    fn inner_rows(&self) -> u16 {
        self.height.saturating_sub(4).max(1)
    }

    fn col(&self, x: f32) -> u16 {
        let c = (x / self.field.width * self.inner_cols() as f32).floor();
        1 + (c.max(0.0) as u16).min(self.inner_cols() - 1)
    }

    fn row(&self, y: f32) -> u16 {
        let r = (y / self.field.height * self.inner_rows() as f32).floor();
        2 + (r.max(0.0) as u16).min(self.inner_rows() - 1)
    }

    /// Field units per column and per row, used to scale mouse drags.
    fn units_per_cell(&self) -> Vec2 {
        Vec2::new(
            self.field.width / self.inner_cols() as f32,
            self.field.height / self.inner_rows() as f32,
        )
    }
}

/// Field units covered by one cell of a `width` × `height` terminal.
pub fn units_per_cell(field: Field, width: u16, height: u16) -> Vec2 {
    Viewport { field, width, height }.units_per_cell()
}

// ── Render sink ───────────────────────────────────────────────────────────────

struct TerminalCanvas<'a, W: Write> {
    out: &'a mut W,
    view: Viewport,
    frame: u64,
}

impl<W: Write> TerminalCanvas<'_, W> {
    fn rainbow(&self, offset: u8) -> Color {
        let i = (offset as u64 + self.frame / 4) % RAINBOW_COLORS as u64;
        RAINBOW[i as usize]
    }

    fn color(&self, paint: Paint) -> Color {
        match paint {
            Paint::Player => C_PLAYER,
            Paint::PlayerShot => C_SHOT_PLAYER,
            Paint::Boss(VisualTier::Standard) => C_BOSS,
            Paint::Boss(VisualTier::Rainbow) => self.rainbow(0),
            Paint::BossShot(Tint::Plain) => C_SHOT_BOSS,
            Paint::BossShot(Tint::Rainbow(i)) => self.rainbow(i),
        }
    }

    fn glyph(paint: Paint) -> &'static str {
        match paint {
            Paint::Player => "▲",
            Paint::PlayerShot => "║",
            Paint::Boss(_) => "█",
            Paint::BossShot(_) => "●",
        }
    }
}

impl<W: Write> RenderSink for TerminalCanvas<'_, W> {
    type Error = std::io::Error;

    fn draw_entity(
        &mut self,
        shape: Shape,
        pos: Vec2,
        size: Vec2,
        paint: Paint,
    ) -> std::io::Result<()> {
        self.out.queue(style::SetForegroundColor(self.color(paint)))?;
        let glyph = Self::glyph(paint);

        match shape {
            Shape::Circle => {
                self.out
                    .queue(cursor::MoveTo(self.view.col(pos.x), self.view.row(pos.y)))?;
                self.out.queue(Print(glyph))?;
            }
            Shape::Rect => {
                let (c0, c1) = (self.view.col(pos.x), self.view.col(pos.x + size.x));
                let (r0, r1) = (self.view.row(pos.y), self.view.row(pos.y + size.y));
                for row in r0..=r1 {
                    self.out.queue(cursor::MoveTo(c0, row))?;
                    self.out.queue(Print(glyph.repeat((c1 - c0 + 1) as usize)))?;
                }
            }
        }
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameSession,
    score_secs: f64,
    board: &[ScoreEntry],
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport {
        field: state.field,
        width,
        height,
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, score_secs, width)?;

    draw_session(
        state,
        &mut TerminalCanvas {
            out: &mut *out,
            view,
            frame: state.frame,
        },
    )?;

    draw_controls_hint(out, height)?;

    match state.status {
        GameStatus::Won => draw_victory(out, state, width, height)?,
        GameStatus::Lost => draw_game_over(out, state, board, width, height)?,
        GameStatus::Idle | GameStatus::Running => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn hp_bar(hp: u32, max_hp: u32, cells: usize) -> String {
    let filled = if max_hp == 0 {
        0
    } else {
        (hp as usize * cells).div_ceil(max_hp as usize)
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled.min(cells)))
}

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameSession,
    score_secs: f64,
    width: u16,
) -> std::io::Result<()> {
    // Survival time — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:.2}s", score_secs)))?;

    // Boss HP — centre
    let boss = &state.boss;
    let label = format!(
        "Boss {} {} {}/{}",
        state.defeat_count + 1,
        hp_bar(boss.hp, boss.max_hp, 10),
        boss.hp,
        boss.max_hp
    );
    let lx = (width / 2).saturating_sub(label.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(&label))?;

    // Defeats and hard-tier tag — right
    let hard = if boss.config.is_hard_tier { "[HARD] " } else { "" };
    let right = format!("{}Defeats:{}", hard, state.defeat_count);
    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    if !hard.is_empty() {
        out.queue(style::SetForegroundColor(C_HUD_HARD))?;
        out.queue(Print(hard))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Defeats:{}", state.defeat_count)))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←↑↓→ / WASD / drag : Move   (autofire)   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered_lines<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_victory<W: Write>(
    out: &mut W,
    state: &GameSession,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let mut lines = vec![
        ("╔════════════════════╗".to_string(), Color::Green),
        ("║   BOSS  DEFEATED   ║".to_string(), Color::Green),
        ("╚════════════════════╝".to_string(), Color::Green),
        (format!("Time: {:.2}s", elapsed_secs(state)), C_HUD_SCORE),
    ];
    if let Some(next) = state.next_boss {
        let tag = if next.is_hard_tier { "  ★ HARD ★" } else { "" };
        lines.push((format!("Next boss HP: {}{}", next.hp, tag), Color::White));
    }
    lines.push(("N - Next Boss  R - Restart  Q - Quit".to_string(), Color::White));
    draw_centered_lines(out, &lines, width, height)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameSession,
    board: &[ScoreEntry],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let mut lines = vec![
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (
            format!(
                "Final Score: {:.2}s   Bosses: {}",
                elapsed_secs(state),
                state.defeat_count
            ),
            C_HUD_SCORE,
        ),
    ];
    if !board.is_empty() {
        lines.push(("── Best Times ──".to_string(), C_HINT));
        for (i, entry) in board.iter().enumerate() {
            lines.push((
                format!("{:>2}. {:>8.2}s  ({} bosses)", i + 1, entry.score, entry.defeats),
                C_HINT,
            ));
        }
    }
    lines.push(("R - Play Again  Q - Quit".to_string(), Color::White));
    draw_centered_lines(out, &lines, width, height)
}
