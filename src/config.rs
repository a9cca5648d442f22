//! Gameplay tunables and difficulty presets
//!
//! Persisted separately from progress in LocalStorage. The simulation
//! receives a copy through `Game::update_config`, never a shared reference.

use serde::{Deserialize, Serialize};

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Pipes and coins only, no dash, no hazards
    Classic,
    /// Dash, ground enemies, projectile formations
    #[default]
    Advance,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Advance => "advance",
        }
    }

    pub fn is_classic(&self) -> bool {
        *self == GameMode::Classic
    }
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Forward speed for this preset (px per reference frame)
    pub fn speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 2.5,
            Difficulty::Normal => 3.0,
            Difficulty::Hard => 3.8,
        }
    }

    /// Gap between upper and lower pipe bodies
    pub fn pipe_gap(&self) -> f32 {
        match self {
            Difficulty::Easy => 200.0,
            Difficulty::Normal => 170.0,
            Difficulty::Hard => 145.0,
        }
    }
}

/// Flat record of gameplay tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Forward scroll speed (px per reference frame)
    pub speed: f32,
    /// Downward acceleration (px per reference frame²)
    pub gravity: f32,
    /// Jump impulse, applied as vertical speed (negative = up)
    pub jump: f32,
    /// Base gap between top and bottom pipe
    pub pipe_gap: f32,
    /// Base horizontal spacing between normal pipes
    pub pipe_spacing: f32,
    /// Whether dash input is accepted
    pub dash_button: bool,
    pub mode: GameMode,
    /// Theme map used by the level generator
    pub map_id: String,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            gravity: 0.45,
            jump: -8.0,
            pipe_gap: 170.0,
            pipe_spacing: 250.0,
            dash_button: true,
            mode: GameMode::Advance,
            map_id: "meadow".to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a config from a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_difficulty(difficulty);
        config
    }

    /// Apply a difficulty preset (updates the preset-dependent fields only)
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.speed = difficulty.speed();
        self.pipe_gap = difficulty.pipe_gap();
    }

    /// Whether dash input should reach the avatar
    pub fn dash_enabled(&self) -> bool {
        self.dash_button && !self.mode.is_classic()
    }

    /// Copy with degenerate values pulled back into a playable range
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        if !config.speed.is_finite() || config.speed <= 0.0 {
            log::warn!("Invalid speed {}, using default", config.speed);
            config.speed = Self::default().speed;
        }
        if !config.gravity.is_finite() || config.gravity < 0.0 {
            config.gravity = Self::default().gravity;
        }
        if !config.jump.is_finite() {
            config.jump = Self::default().jump;
        }
        config.pipe_gap = if config.pipe_gap.is_finite() {
            config.pipe_gap.clamp(100.0, 320.0)
        } else {
            Self::default().pipe_gap
        };
        config.pipe_spacing = if config.pipe_spacing.is_finite() {
            config.pipe_spacing.clamp(160.0, 600.0)
        } else {
            Self::default().pipe_spacing
        };
        config
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_zones_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(config) = serde_json::from_str(&json) {
                    log::info!("Loaded config from LocalStorage");
                    return config;
                }
                log::warn!("Stored config unreadable, using defaults");
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
