//! Flappy Zones - A side-scrolling flappy arcade game
//!
//! Core modules:
//! - `sim`: Gameplay simulation (avatar physics, obstacle generation, collisions)
//! - `config`: Tunable gameplay parameters and difficulty presets
//! - `persistence`: Injected progress store (coins, nitro, best scores)
//! - `highscores`: Per-mode leaderboard

pub mod config;
pub mod highscores;
pub mod persistence;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{Difficulty, GameConfig, GameMode};
pub use highscores::HighScores;
pub use persistence::{MemoryStore, ProgressStore, SaveData, SessionReport};
pub use sim::{Game, GameEvent, GamePhase};

/// Game configuration constants
pub mod consts {
    /// Reference frame duration (ms). A `dt_ratio` of 1.0 means one frame at 60 Hz.
    pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest step the simulation accepts in one update (implicit 20 fps floor)
    pub const MAX_DT_RATIO: f32 = 3.0;

    /// Logical play field
    pub const SCREEN_WIDTH: f32 = 480.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;
    pub const GROUND_HEIGHT: f32 = 100.0;
    /// Y of the ground line (top of the ground strip)
    pub const GROUND_Y: f32 = SCREEN_HEIGHT - GROUND_HEIGHT;
    /// Minimum clearance between a pipe gap and the screen edges
    pub const PADDING: f32 = 50.0;

    /// Avatar spawn
    pub const BIRD_X: f32 = 120.0;
    pub const BIRD_START_Y: f32 = 300.0;
    pub const BIRD_RADIUS: f32 = 16.0;

    /// World pixels per reported meter of distance
    pub const PX_PER_METER: f32 = 50.0;
}

/// Vertical center of the playable area (above the ground)
#[inline]
pub fn play_field_center() -> f32 {
    consts::GROUND_Y / 2.0
}

/// Cheap deterministic hash to a unit float, for cosmetic variation only
#[inline]
pub fn hash_unit(seed: u32) -> f32 {
    let hash = seed.wrapping_mul(2654435761).rotate_left(13) ^ 0x9e37_79b9;
    (hash % 10_000) as f32 / 10_000.0
}
