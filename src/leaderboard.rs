/// Locally persisted top-N survival times.
///
/// Submissions are fire-and-forget: persistence failures are logged and
/// dropped, and never reach game state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::LEADERBOARD_LEN;
use crate::entities::Outcome;
use crate::sinks::{OutcomeReport, ScoreSink};

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Survival time in seconds.
    pub score: f64,
    pub defeats: u32,
    pub outcome: Outcome,
}

impl From<&OutcomeReport> for ScoreEntry {
    fn from(report: &OutcomeReport) -> Self {
        Self {
            score: report.elapsed_secs,
            defeats: report.defeat_count,
            outcome: report.outcome,
        }
    }
}

#[derive(Debug, Default)]
pub struct Leaderboard {
    /// Where the board is saved; `None` keeps it in memory only.
    path: Option<PathBuf>,
    entries: Vec<ScoreEntry>,
}

/// `~/.boss_barrage_scores.json`, falling back to the working directory.
pub fn default_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".boss_barrage_scores.json")
}

impl Leaderboard {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read the board at `path`.  A missing file is an empty board.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LeaderboardError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let mut board = Self {
            path: Some(path),
            entries,
        };
        board.normalize();
        Ok(board)
    }

    /// Like `open`, but an unreadable board degrades to an empty one.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(board) => board,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable leaderboard");
                Self {
                    path: Some(path),
                    entries: Vec::new(),
                }
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Entries sorted best first.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Insert an entry, keeping the board sorted and at most
    /// `LEADERBOARD_LEN` long.  Returns the entry's rank if it made the cut.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        if rank >= LEADERBOARD_LEN {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(LEADERBOARD_LEN);
        Some(rank)
    }

    pub fn save(&self) -> Result<(), LeaderboardError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Record an entry and persist; failures are logged only.
    pub fn submit(&mut self, entry: ScoreEntry) {
        let rank = self.insert(entry);
        debug!(?rank, "score submitted");
        if let Err(e) = self.save() {
            warn!(error = %e, "score submission failed");
        }
    }

    fn normalize(&mut self) {
        self.entries.retain(|e| e.score.is_finite());
        self.entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        self.entries.truncate(LEADERBOARD_LEN);
    }
}

/// One row per run: survival time keeps accumulating across won encounters,
/// so only the final loss is recorded.
impl ScoreSink for Leaderboard {
    fn show_score(&mut self, _elapsed_secs: f64) {}

    fn report_outcome(&mut self, report: &OutcomeReport) {
        if report.outcome != Outcome::Lost {
            return;
        }
        self.submit(ScoreEntry::from(report));
    }
}
