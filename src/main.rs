mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use boss_barrage::compute::{
    advance_to_next_boss, init_state, resize_field, run_frame, start_new_game,
};
use boss_barrage::constants::POINTER_SCALE;
use boss_barrage::entities::{Field, GameSession, GameStatus, Intent};
use boss_barrage::geometry::Vec2;
use boss_barrage::leaderboard::{self, Leaderboard};
use boss_barrage::sinks::{OutcomeReport, ScoreSink};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈128 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// How many leaderboard entries the game-over overlay lists.
const BOARD_SHOWN: usize = 5;

/// Terminal boss-rush bullet-hell: dodge radial barrages, autofire at the boss.
#[derive(Parser, Debug)]
#[command(name = "boss_barrage")]
#[command(version, about)]
struct Cli {
    /// Field width in units (default: fit the terminal, at most 600)
    #[arg(long)]
    width: Option<f32>,

    /// Field height in units (default: fit the terminal, at most 400)
    #[arg(long)]
    height: Option<f32>,

    /// Seed for boss movement, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Leaderboard file (default: ~/.boss_barrage_scores.json)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Keep the leaderboard in memory only
    #[arg(long)]
    no_save: bool,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log: Option<PathBuf>,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Score sink ────────────────────────────────────────────────────────────────

/// Keeps the figure shown in the HUD and forwards outcomes to the board.
struct Scoreboard {
    score_secs: f64,
    board: Leaderboard,
}

impl ScoreSink for Scoreboard {
    fn show_score(&mut self, elapsed_secs: f64) {
        self.score_secs = elapsed_secs;
    }

    fn report_outcome(&mut self, report: &OutcomeReport) {
        info!(
            outcome = ?report.outcome,
            secs = report.elapsed_secs,
            defeats = report.defeat_count,
            "encounter over"
        );
        self.board.report_outcome(report);
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and combine them into one `Intent`, so
/// diagonal movement works with any number of keys held.  Mouse drags
/// accumulate into the pointer delta of the next tick.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameSession,
    scoreboard: &mut Scoreboard,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    fixed_field: bool,
) -> Result<()> {
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut drag_from: Option<(u16, u16)> = None;
    let mut frame: u64 = 0;

    *state = start_new_game(state, now_ms(), rng);

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut pointer = Vec2::ZERO;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if matches!(state.status, GameStatus::Won | GameStatus::Lost) =>
                            {
                                *state = start_new_game(state, now_ms(), rng);
                                scoreboard.score_secs = 0.0;
                            }
                            KeyCode::Char('n') | KeyCode::Char('N')
                                if state.status == GameStatus::Won =>
                            {
                                *state = advance_to_next_boss(state, now_ms(), rng);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => match kind {
                    MouseEventKind::Down(MouseButton::Left) => drag_from = Some((column, row)),
                    MouseEventKind::Drag(MouseButton::Left) => {
                        if let Some((c0, r0)) = drag_from {
                            let (w, h) = terminal::size()?;
                            let cell = display::units_per_cell(state.field, w, h);
                            pointer.x += (column as f32 - c0 as f32) * cell.x * POINTER_SCALE;
                            pointer.y += (row as f32 - r0 as f32) * cell.y * POINTER_SCALE;
                        }
                        drag_from = Some((column, row));
                    }
                    MouseEventKind::Up(MouseButton::Left) => drag_from = None,
                    _ => {}
                },
                Event::Resize(w, h) if !fixed_field => {
                    let field = display::field_for_terminal(w, h);
                    debug!(width = field.width, height = field.height, "field resized");
                    *state = resize_field(state, field);
                }
                _ => {}
            }
        }

        // ── Sample held keys into this tick's intent ──────────────────────────
        let intent = Intent {
            left: any_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
            right: any_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
            up: any_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
            down: any_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
            pointer,
        };

        *state = run_frame(state, &intent, now_ms(), rng, scoreboard);

        display::render(
            out,
            state,
            scoreboard.score_secs,
            scoreboard.board.top(BOARD_SHOWN),
        )?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        init_logging(path)?;
    }

    let board = if cli.no_save {
        Leaderboard::in_memory()
    } else {
        Leaderboard::open_or_empty(cli.scores.clone().unwrap_or_else(leaderboard::default_path))
    };
    let mut scoreboard = Scoreboard {
        score_secs: 0.0,
        board,
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &cli, &mut scoreboard, &rx, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    cli: &Cli,
    scoreboard: &mut Scoreboard,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let fitted = display::field_for_terminal(cols, rows);
    let field = Field::new(
        cli.width.unwrap_or(fitted.width),
        cli.height.unwrap_or(fitted.height),
    );
    let fixed_field = cli.width.is_some() || cli.height.is_some();
    info!(
        width = field.width,
        height = field.height,
        scores = ?scoreboard.board.path(),
        "session starting"
    );

    let mut state = init_state(field);
    game_loop(out, &mut state, scoreboard, rx, rng, fixed_field)
}
