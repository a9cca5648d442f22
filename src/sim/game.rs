//! Session orchestrator
//!
//! `Game` owns the avatar, the obstacle generator and the phase machine:
//!
//! ```text
//! Splash -> Start -> Playing <-> Paused
//!                    Playing -> Dying -> GameOver -> Start (revive or restart)
//! ```
//!
//! Per playing frame: avatar update, generator update, collision resolution,
//! then outbound events. Storage is reached only through the injected
//! `ProgressStore`.

use serde::Serialize;

use super::bird::{Bird, BirdContact};
use super::clock::FrameClock;
use super::collision::{CollisionReport, resolve_collisions};
use super::events::{EventQueue, GameEvent, GameOverSummary};
use super::hazard::Hazard;
use super::level::{LevelGenerator, Theme};
use super::pipes::{Coin, Pipe, PipeManager};
use crate::config::GameConfig;
use crate::consts::*;
use crate::persistence::{ProgressStore, SessionReport, now_timestamp};

/// Countdown between resume and play (reference frames)
pub const RESUME_COUNTDOWN_FRAMES: f32 = 180.0;
/// Length of the slowed "safe resume" window after the countdown
pub const SLOW_MOTION_FRAMES: f32 = 90.0;
/// Time scale during the safe resume window
pub const SLOW_MOTION_FACTOR: f32 = 0.1;
/// Delay between landing and the game-over notification
pub const GAME_OVER_DELAY_FRAMES: f32 = 45.0;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum GamePhase {
    /// Title screen
    #[default]
    Splash,
    /// Bird waiting at spawn for the first jump
    Start,
    Playing,
    Paused,
    /// Hit taken: gravity-only fall to the ground
    Dying,
    GameOver,
}

/// Read-only view handed to the renderer each frame
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub coins: u32,
    pub distance: f32,
    pub bird: &'a Bird,
    pub pipes: &'a [Pipe],
    pub coin_list: &'a [Coin],
    pub hazards: &'a [Hazard],
    pub theme: &'a Theme,
    pub slow_motion: bool,
    pub resume_countdown: Option<f32>,
}

pub struct Game {
    config: GameConfig,
    phase: GamePhase,
    bird: Bird,
    pipes: PipeManager,
    score: u64,
    session_coins: u32,
    /// World px scrolled this session
    travelled_px: f32,
    theme: Theme,
    clock: FrameClock,
    events: EventQueue,
    store: Box<dyn ProgressStore>,
    /// Seed of the current run
    seed: u64,
    revived: bool,
    resume_countdown: Option<f32>,
    slow_motion: f32,
    game_over_timer: Option<f32>,
    pending_summary: Option<GameOverSummary>,
    /// Best score for the mode when the run started
    best_baseline: u64,
}

impl Game {
    pub fn new(config: GameConfig, store: Box<dyn ProgressStore>) -> Self {
        let config = config.sanitized();
        let seed = config.seed.unwrap_or_else(rand::random);
        let theme = LevelGenerator::theme(0, &config.map_id);
        let mut game = Self {
            pipes: PipeManager::new(seed, config.pipe_spacing),
            config,
            phase: GamePhase::Splash,
            bird: Bird::new(),
            score: 0,
            session_coins: 0,
            travelled_px: 0.0,
            theme,
            clock: FrameClock::new(),
            events: EventQueue::new(),
            store,
            seed,
            revived: false,
            resume_countdown: None,
            slow_motion: 0.0,
            game_over_timer: None,
            pending_summary: None,
            best_baseline: 0,
        };
        game.load_progress();
        log::info!(
            "Game created: mode={} map={} seed={}",
            game.config.mode.as_str(),
            game.config.map_id,
            seed
        );
        game
    }

    /// Pull the equipped nitro tank and the best-score baseline from storage
    fn load_progress(&mut self) {
        let save = self.store.read();
        self.bird.set_nitro(save.nitro);
        self.best_baseline = save.best_score(self.config.mode);
    }

    // --- Input -----------------------------------------------------------

    /// Leave the title screen
    pub fn show_start(&mut self) {
        if self.phase == GamePhase::Splash {
            self.phase = GamePhase::Start;
        }
    }

    pub fn on_jump(&mut self) {
        match self.phase {
            GamePhase::Start => {
                self.phase = GamePhase::Playing;
                log::info!("Run started");
            }
            GamePhase::Playing => {}
            _ => return,
        }
        self.slow_motion = 0.0;
        if self.bird.flap(self.config.jump) {
            self.events.push(GameEvent::Jump);
        }
    }

    pub fn on_dash_start(&mut self) {
        if self.phase != GamePhase::Playing || !self.config.dash_enabled() {
            return;
        }
        self.slow_motion = 0.0;
        if self.bird.start_dash() {
            self.events.push(GameEvent::DashStart);
        }
    }

    pub fn on_dash_end(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.slow_motion = 0.0;
        if self.bird.stop_dash() {
            self.events.push(GameEvent::DashEnd);
        }
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            // A dash release during the pause would otherwise be lost
            if self.bird.stop_dash() {
                self.events.push(GameEvent::DashEnd);
            }
            self.phase = GamePhase::Paused;
            self.resume_countdown = None;
            self.events.push(GameEvent::Paused);
        }
    }

    /// Start the resume countdown. Play continues once it runs out.
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused && self.resume_countdown.is_none() {
            self.resume_countdown = Some(RESUME_COUNTDOWN_FRAMES);
            self.clock.realign();
        }
    }

    // --- Lifecycle -------------------------------------------------------

    /// Fresh run: zero score, new obstacle field, storage reloaded.
    /// A run still in progress is reported to storage first.
    pub fn restart(&mut self) {
        if matches!(
            self.phase,
            GamePhase::Playing | GamePhase::Paused | GamePhase::Dying
        ) {
            self.finish_session();
        }
        self.seed = self.config.seed.unwrap_or_else(rand::random);
        self.pipes.reseed(self.seed);
        self.pipes.reset(self.config.pipe_spacing);
        self.bird.reset();
        self.load_progress();

        self.score = 0;
        self.session_coins = 0;
        self.travelled_px = 0.0;
        self.theme = LevelGenerator::theme(0, &self.config.map_id);
        self.revived = false;
        self.resume_countdown = None;
        self.slow_motion = 0.0;
        self.game_over_timer = None;
        self.pending_summary = None;
        self.clock.realign();
        self.phase = GamePhase::Start;
        log::info!("Restart (seed {})", self.seed);
    }

    /// Continue the run from game over. Allowed once per session.
    pub fn revive(&mut self) -> bool {
        if self.phase != GamePhase::GameOver || self.revived {
            return false;
        }
        self.revived = true;
        self.pipes.reset(self.config.pipe_spacing);
        self.bird.reset_state_for_revive();
        self.game_over_timer = None;
        self.pending_summary = None;
        self.clock.realign();
        self.phase = GamePhase::Start;
        log::info!("Revived at score {}", self.score);
        true
    }

    /// Apply new tunables from the next frame on. Live entities are kept.
    pub fn update_config(&mut self, config: GameConfig) {
        let config = config.sanitized();
        if config.map_id != self.config.map_id {
            self.theme = LevelGenerator::theme(self.score, &config.map_id);
        }
        self.config = config;
    }

    // --- Frame driving ---------------------------------------------------

    /// Drive one frame from a host timestamp (ms)
    pub fn frame(&mut self, now_ms: f64) {
        let dt = self.clock.tick(now_ms);
        self.update(dt);
    }

    /// Advance by `dt` reference frames
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 {
            dt.min(MAX_DT_RATIO)
        } else {
            1.0
        };

        match self.phase {
            GamePhase::Splash | GamePhase::Start => {
                self.bird.wing_phase = (self.bird.wing_phase + 0.2 * dt) % std::f32::consts::TAU;
            }
            GamePhase::Playing => self.step_playing(dt),
            GamePhase::Paused => self.step_countdown(dt),
            GamePhase::Dying => {
                if self.bird.fall(dt, self.config.gravity) {
                    self.events.push(GameEvent::GroundBounce {
                        x: self.bird.x,
                        y: GROUND_Y,
                    });
                    self.finish_session();
                }
            }
            GamePhase::GameOver => self.step_game_over(dt),
        }
    }

    fn step_countdown(&mut self, dt: f32) {
        let Some(remaining) = self.resume_countdown else {
            return;
        };
        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.resume_countdown = Some(remaining);
            return;
        }
        self.resume_countdown = None;
        self.slow_motion = SLOW_MOTION_FRAMES;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Resumed);
    }

    fn step_playing(&mut self, dt: f32) {
        let dt = if self.slow_motion > 0.0 {
            self.slow_motion = (self.slow_motion - dt).max(0.0);
            dt * SLOW_MOTION_FACTOR
        } else {
            dt
        };

        let was_dashing = self.bird.dashing;
        let contact = self.bird.update(dt, self.config.gravity);
        if was_dashing && !self.bird.dashing {
            self.events.push(GameEvent::DashEnd);
        }

        let speed = self.config.speed * LevelGenerator::speed_multiplier(self.score);
        self.pipes.update(dt, speed, &self.config);
        self.travelled_px += speed * dt;

        let (pipes, coins, hazards) = self.pipes.entities_mut();
        let report = resolve_collisions(&mut self.bird, pipes, coins, hazards);
        self.apply_report(&report);

        if report.lethal || contact == Some(BirdContact::Ground) {
            self.die();
        }
    }

    fn apply_report(&mut self, report: &CollisionReport) {
        let before = self.score;

        if !report.coins.is_empty() {
            self.store.add_coins(report.coins.len() as u64);
        }
        for pos in &report.coins {
            self.session_coins += 1;
            self.events.push(GameEvent::CoinCollected {
                x: pos.x,
                y: pos.y,
                total: self.session_coins,
            });
        }

        for stomp in &report.stomps {
            self.score += stomp.points;
            self.events.push(GameEvent::ScorePopup {
                x: stomp.pos.x,
                y: stomp.pos.y,
                points: stomp.points,
            });
        }
        self.score += report.pipes_passed as u64;

        if self.score != before {
            self.events.push(GameEvent::Score { score: self.score });
            let zone = LevelGenerator::zone_for_score(self.score);
            if zone != self.theme.zone {
                self.theme = LevelGenerator::theme(self.score, &self.config.map_id);
                log::info!("Zone {} ({})", zone, self.theme.name);
                self.events.push(GameEvent::ZoneChanged {
                    zone,
                    pipe_color: self.theme.pipe_color,
                });
            }
        }
    }

    fn die(&mut self) {
        self.bird.dashing = false;
        self.slow_motion = 0.0;
        self.phase = GamePhase::Dying;
        self.events.push(GameEvent::Hit {
            x: self.bird.x,
            y: self.bird.y,
        });
        self.events.push(GameEvent::Die);
        log::info!("Hit at score {}", self.score);
    }

    /// Report the run to storage and queue the game-over summary
    fn finish_session(&mut self) {
        let report = SessionReport {
            score: self.score,
            mode: self.config.mode,
            distance: self.distance(),
            nitro_remaining: self.bird.nitro.remaining,
            timestamp: now_timestamp(),
        };
        let new_best = self.store.record_session(&report);

        self.pending_summary = Some(GameOverSummary {
            score: self.score,
            coins: self.session_coins,
            distance: report.distance,
            classic: self.config.mode.is_classic(),
            best_score: self.best_baseline.max(self.score),
            new_best,
            can_revive: !self.revived,
        });
        self.game_over_timer = Some(GAME_OVER_DELAY_FRAMES);
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score={} distance={:.0}m new_best={}",
            self.score,
            report.distance,
            new_best
        );
    }

    fn step_game_over(&mut self, dt: f32) {
        let Some(timer) = self.game_over_timer else {
            return;
        };
        let timer = timer - dt;
        if timer > 0.0 {
            self.game_over_timer = Some(timer);
            return;
        }
        self.game_over_timer = None;
        if let Some(summary) = self.pending_summary.take() {
            self.events.push(GameEvent::GameOver(summary));
        }
    }

    // --- Accessors -------------------------------------------------------

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score,
            coins: self.session_coins,
            distance: self.distance(),
            bird: &self.bird,
            pipes: self.pipes.pipes(),
            coin_list: self.pipes.coins(),
            hazards: self.pipes.hazards(),
            theme: &self.theme,
            slow_motion: self.is_slow_motion(),
            resume_countdown: self.resume_countdown,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    /// Direct avatar access for hosts and test harnesses
    pub fn bird_mut(&mut self) -> &mut Bird {
        &mut self.bird
    }

    pub fn generator(&self) -> &PipeManager {
        &self.pipes
    }

    pub fn generator_mut(&mut self) -> &mut PipeManager {
        &mut self.pipes
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn session_coins(&self) -> u32 {
        self.session_coins
    }

    /// Distance covered this session (meters)
    pub fn distance(&self) -> f32 {
        self.travelled_px / PX_PER_METER
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn can_revive(&self) -> bool {
        !self.revived
    }

    pub fn is_slow_motion(&self) -> bool {
        self.slow_motion > 0.0
    }

    pub fn resume_countdown(&self) -> Option<f32> {
        self.resume_countdown
    }
}
