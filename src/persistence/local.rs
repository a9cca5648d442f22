//! LocalStorage-backed progress store (WASM only)

use super::{ProgressStore, SaveData};

/// LocalStorage key
const STORAGE_KEY: &str = "flappy_zones_progress";

#[derive(Debug, Clone, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl ProgressStore for LocalStore {
    fn read(&self) -> SaveData {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(data) => return data,
                    Err(e) => log::warn!("Progress save unreadable ({e}), starting fresh"),
                }
            }
        }
        SaveData::default()
    }

    fn write(&mut self, data: &SaveData) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, progress not saved");
            return;
        };
        match serde_json::to_string(data) {
            Ok(json) => {
                if storage.set_item(STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to write progress");
                }
            }
            Err(e) => log::warn!("Failed to serialize progress: {e}"),
        }
    }
}
