//! Browser bridge
//!
//! Exposes the simulation to JavaScript. The page owns the canvas, the input
//! listeners and the `requestAnimationFrame` loop; it forwards timestamps and
//! edge-triggered inputs here, then reads a JSON snapshot and the pending
//! events each frame.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::persistence::LocalStore;
use crate::sim::Game;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Flappy Zones starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a session from the stored config and LocalStorage progress
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let config = GameConfig::load();
        WebGame {
            game: Game::new(config, Box::new(LocalStore::new())),
        }
    }

    /// Advance using a `requestAnimationFrame` timestamp (ms)
    pub fn frame(&mut self, now_ms: f64) {
        self.game.frame(now_ms);
    }

    pub fn show_start(&mut self) {
        self.game.show_start();
    }

    pub fn on_jump(&mut self) {
        self.game.on_jump();
    }

    pub fn on_dash_start(&mut self) {
        self.game.on_dash_start();
    }

    pub fn on_dash_end(&mut self) {
        self.game.on_dash_end();
    }

    pub fn pause(&mut self) {
        self.game.pause();
    }

    pub fn resume(&mut self) {
        self.game.resume();
    }

    pub fn restart(&mut self) {
        self.game.restart();
    }

    pub fn revive(&mut self) -> bool {
        self.game.revive()
    }

    /// Replace the tunables with a JSON `GameConfig` and persist it.
    /// Malformed JSON is logged and ignored.
    pub fn update_config_json(&mut self, json: &str) {
        match serde_json::from_str::<GameConfig>(json) {
            Ok(config) => {
                config.save();
                self.game.update_config(config);
            }
            Err(e) => log::warn!("Ignoring config update: {e}"),
        }
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.game.snapshot()).unwrap_or_default()
    }

    /// Pending events as a JSON array, oldest first
    pub fn drain_events_json(&mut self) -> String {
        serde_json::to_string(&self.game.drain_events()).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
