//! Outbound notifications for audio and UI
//!
//! The simulation pushes events as things happen; the host drains the queue
//! once per frame. Payloads are primitives only.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Queue cap; the oldest events are dropped if the host stops draining
pub const MAX_PENDING_EVENTS: usize = 256;

/// End-of-run summary shown on the game-over screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: u64,
    pub coins: u32,
    pub distance: f32,
    pub classic: bool,
    pub best_score: u64,
    pub new_best: bool,
    pub can_revive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// The falling avatar hit the ground
    GroundBounce { x: f32, y: f32 },
    Jump,
    DashStart,
    DashEnd,
    /// Lethal contact (pipe or hazard)
    Hit { x: f32, y: f32 },
    Die,
    CoinCollected { x: f32, y: f32, total: u32 },
    ZoneChanged { zone: u32, pipe_color: u32 },
    ScorePopup { x: f32, y: f32, points: u64 },
    Score { score: u64 },
    Paused,
    /// Resume countdown finished
    Resumed,
    GameOver(GameOverSummary),
}

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(MAX_PENDING_EVENTS),
        }
    }

    pub fn push(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}
