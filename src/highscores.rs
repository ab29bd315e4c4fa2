//! High score leaderboard
//!
//! Tracks the top 10 scores and is the default sink for finished Shiba runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Receives the final score of a run. How (or whether) it is stored is up
/// to the implementation.
pub trait ScoreSink {
    fn submit(&mut self, player: &str, score: u64);
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub player: String,
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    /// Where `submit` persists to, if anywhere
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl HighScores {
    /// Create empty in-memory leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, player: &str, score: u64, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            player: player.to_string(),
            score,
            timestamp,
        };

        // Ties go below existing entries
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from `path`; later submissions are saved back there
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let mut scores: Self = persistence::load(path)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        scores.path = Some(path.to_path_buf());
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    /// Like `load`, but a missing or broken file gives an empty board
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            if e.is_not_found() {
                log::info!("No high scores found, starting fresh");
            } else {
                log::warn!("{e}; starting with empty high scores");
            }
            Self {
                entries: Vec::new(),
                path: Some(path.to_path_buf()),
            }
        })
    }

    pub fn save(&self) -> Result<(), StorageError> {
        match &self.path {
            Some(path) => {
                persistence::save(path, self)?;
                log::info!("High scores saved ({} entries)", self.entries.len());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl ScoreSink for HighScores {
    fn submit(&mut self, player: &str, score: u64) {
        let Some(rank) = self.add_score(player, score, now_ms()) else {
            log::info!("{player} scored {score}, not a high score");
            return;
        };
        log::info!("{player} scored {score}, rank {rank}");
        if let Err(e) = self.save() {
            log::warn!("could not save high scores: {e}");
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::test_support::scratch_dir;

    #[test]
    fn test_zero_never_qualifies() {
        let hs = HighScores::new();
        assert!(!hs.qualifies(0));
    }

    #[test]
    fn test_sorted_insert_and_rank() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_score("a", 50, 0), Some(1));
        assert_eq!(hs.add_score("b", 80, 0), Some(1));
        assert_eq!(hs.add_score("c", 60, 0), Some(2));
        assert_eq!(hs.add_score("d", 60, 0), Some(3));
        let scores: Vec<u64> = hs.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![80, 60, 60, 50]);
        assert_eq!(hs.top_score(), Some(80));
    }

    #[test]
    fn test_board_capped() {
        let mut hs = HighScores::new();
        for s in 1..=15 {
            hs.add_score("p", s, 0);
        }
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);
        assert!(!hs.qualifies(6));
        assert!(hs.qualifies(7));
        assert_eq!(hs.entries.last().map(|e| e.score), Some(6));
    }

    #[test]
    fn test_sink_persists() {
        let dir = scratch_dir("highscores");
        let path = dir.join("scores.json");
        let mut hs = HighScores::load_or_default(&path);
        assert!(hs.is_empty());
        hs.submit("amber", 42);
        hs.submit("dan", 0);

        let reloaded = HighScores::load(&path).unwrap();
        assert_eq!(reloaded.entries.len(), 1);
        assert_eq!(reloaded.entries[0].player, "amber");
        assert_eq!(reloaded.entries[0].score, 42);
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let mut hs = HighScores::new();
        hs.submit("x", 3);
        assert!(hs.save().is_ok());
        assert_eq!(hs.top_score(), Some(3));
    }
}
