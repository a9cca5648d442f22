//! Progress persistence
//!
//! The simulation talks to storage only through `ProgressStore`, which the
//! host constructs and hands to `Game::new`. Reads never fail: a missing or
//! unreadable save yields `SaveData::default()`.

#[cfg(target_arch = "wasm32")]
pub mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

use serde::{Deserialize, Serialize};

use crate::config::GameMode;
use crate::highscores::HighScores;
use crate::sim::bird::NitroTank;

/// Everything persisted between sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    /// Spendable currency
    pub coins: u64,
    pub best_classic: u64,
    pub best_advance: u64,
    /// Longest run (meters)
    pub max_distance: f32,
    /// Equipped dash fuel tank
    pub nitro: NitroTank,
    pub high_scores: HighScores,
}

impl SaveData {
    pub fn best_score(&self, mode: GameMode) -> u64 {
        match mode {
            GameMode::Classic => self.best_classic,
            GameMode::Advance => self.best_advance,
        }
    }

    /// Fold a finished run in. Returns true if it beat the mode's best.
    pub fn apply_session(&mut self, report: &SessionReport) -> bool {
        let best = match report.mode {
            GameMode::Classic => &mut self.best_classic,
            GameMode::Advance => &mut self.best_advance,
        };
        let new_best = report.score > *best;
        if new_best {
            *best = report.score;
        }
        self.max_distance = self.max_distance.max(report.distance);
        self.nitro.remaining = report.nitro_remaining.clamp(0.0, self.nitro.capacity);
        self.high_scores
            .add_score(report.score, report.mode, report.distance, report.timestamp);
        new_best
    }
}

/// What the simulation reports when a run ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub score: u64,
    pub mode: GameMode,
    /// Distance reached (meters)
    pub distance: f32,
    pub nitro_remaining: f32,
    /// Unix timestamp (ms), 0 when the host has no clock
    pub timestamp: f64,
}

/// Current Unix time in milliseconds, 0 if unavailable
pub fn now_timestamp() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Storage backend injected into the game
pub trait ProgressStore {
    /// Current save, or defaults
    fn read(&self) -> SaveData;

    /// Replace the stored save
    fn write(&mut self, data: &SaveData);

    fn add_coins(&mut self, amount: u64) {
        let mut data = self.read();
        data.coins = data.coins.saturating_add(amount);
        self.write(&data);
    }

    /// Record a finished run. Returns true on a new best score.
    fn record_session(&mut self, report: &SessionReport) -> bool {
        let mut data = self.read();
        let new_best = data.apply_session(report);
        self.write(&data);
        new_best
    }
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub data: SaveData,
}

impl MemoryStore {
    pub fn new(data: SaveData) -> Self {
        Self { data }
    }
}

impl ProgressStore for MemoryStore {
    fn read(&self) -> SaveData {
        self.data.clone()
    }

    fn write(&mut self, data: &SaveData) {
        self.data = data.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bird::NitroKind;

    fn report(score: u64, mode: GameMode) -> SessionReport {
        SessionReport {
            score,
            mode,
            distance: score as f32 * 2.0,
            nitro_remaining: 40.0,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_record_session_tracks_best_per_mode() {
        let mut store = MemoryStore::default();
        assert!(store.record_session(&report(12, GameMode::Advance)));
        assert!(!store.record_session(&report(8, GameMode::Advance)));
        assert!(store.record_session(&report(3, GameMode::Classic)));

        let data = store.read();
        assert_eq!(data.best_score(GameMode::Advance), 12);
        assert_eq!(data.best_score(GameMode::Classic), 3);
        assert_eq!(data.max_distance, 24.0);
        assert_eq!(data.high_scores.entries.len(), 3);
    }

    #[test]
    fn test_nitro_remaining_written_back() {
        let mut store = MemoryStore::new(SaveData {
            nitro: NitroTank::new(NitroKind::Standard, 100.0),
            ..Default::default()
        });
        store.record_session(&report(1, GameMode::Advance));
        assert_eq!(store.read().nitro.remaining, 40.0);
    }

    #[test]
    fn test_add_coins() {
        let mut store = MemoryStore::default();
        store.add_coins(1);
        store.add_coins(2);
        assert_eq!(store.read().coins, 3);
    }

    #[test]
    fn test_partial_save_json() {
        let data: SaveData = serde_json::from_str(r#"{"coins": 7}"#).unwrap();
        assert_eq!(data.coins, 7);
        assert_eq!(data.best_advance, 0);
    }
}
