//! High score leaderboard
//!
//! Top 10 runs per mode, stored inside the progress save.

use serde::{Deserialize, Serialize};

use crate::config::GameMode;

/// Maximum number of high scores kept per mode
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    pub mode: GameMode,
    /// Distance reached (meters)
    pub distance: f32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending within each mode
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn for_mode(&self, mode: GameMode) -> impl Iterator<Item = &HighScoreEntry> {
        self.entries.iter().filter(move |e| e.mode == mode)
    }

    /// Check if a score qualifies for the mode's table
    pub fn qualifies(&self, score: u64, mode: GameMode) -> bool {
        if score == 0 {
            return false;
        }
        let count = self.for_mode(mode).count();
        if count < MAX_HIGH_SCORES {
            return true;
        }
        self.for_mode(mode).last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a score. Returns the rank achieved within its mode (1-indexed)
    /// or None if it didn't qualify.
    pub fn add_score(
        &mut self,
        score: u64,
        mode: GameMode,
        distance: f32,
        timestamp: f64,
    ) -> Option<usize> {
        if !self.qualifies(score, mode) {
            return None;
        }

        let rank = self.for_mode(mode).take_while(|e| e.score >= score).count() + 1;
        let entry = HighScoreEntry {
            score,
            mode,
            distance,
            timestamp,
        };

        // Insert after every entry (any mode) that stays ahead
        let pos = self
            .entries
            .iter()
            .position(|e| e.mode == mode && score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        // Trim the mode's table to max size
        let mut kept = 0;
        self.entries.retain(|e| {
            if e.mode != mode {
                return true;
            }
            kept += 1;
            kept <= MAX_HIGH_SCORES
        });

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score for a mode (if any)
    pub fn top_score(&self, mode: GameMode) -> Option<u64> {
        self.for_mode(mode).next().map(|e| e.score)
    }
}
