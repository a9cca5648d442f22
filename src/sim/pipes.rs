//! Procedural obstacle generator
//!
//! Owns the live pipes, coins and hazards. Every frame it scrolls them left,
//! spawns a new pipe (or a bullet formation) once enough distance has been
//! covered, and drops whatever has left the screen.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, circle_intersects_aabb, circles_overlap};
use super::hazard::{BULLET_SPEED, FORMATION_BULLET_SPEED, Hazard, HazardKind, Species};
use super::pattern::{Pattern, Sequencer, TIGHT_THRESHOLD};
use crate::config::GameConfig;
use crate::consts::*;

pub const PIPE_WIDTH: f32 = 64.0;
/// Random spread of each pipe's gap around the configured gap
pub const GAP_VARIANCE: f32 = 15.0;
pub const MIN_GAP: f32 = 100.0;
pub const COIN_RADIUS: f32 = 12.0;
/// Horizontal margin around pipe bodies for coin placement
const SAFE_MARGIN_X: f32 = 20.0;
/// Coins must sit this far inside the gap
const SAFE_INSET_Y: f32 = 10.0;
/// Extra spacing between coins
const SAFE_COIN_SPACING: f32 = 20.0;
const COIN_CHANCE: f64 = 0.40;
const TIGHT_COIN_CHANCE: f64 = 0.10;
/// Chance per reference frame of a free-floating coin
const FREE_COIN_CHANCE: f32 = 0.006;
const WALKER_CHANCE: f32 = 0.12;
const FALLING_CHANCE: f32 = 0.10;
const BULLET_CHANCE: f32 = 0.18;

/// A pipe pair: an upper body of height `top` and a lower body below the gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    pub x: f32,
    /// Height of the upper body (y of the gap's top edge)
    pub top: f32,
    pub gap: f32,
    pub width: f32,
    /// Already counted toward the score
    pub passed: bool,
    /// Cosmetic variation seed
    pub seed: u32,
    /// Pattern that placed this pipe (renderer metadata)
    pub pattern: Pattern,
}

impl Pipe {
    pub fn new(x: f32, top: f32, gap: f32, seed: u32) -> Self {
        Self {
            x,
            top,
            gap,
            width: PIPE_WIDTH,
            passed: false,
            seed,
            pattern: Pattern::None,
        }
    }

    /// Y of the lower body's top edge
    pub fn bottom_top(&self) -> f32 {
        self.top + self.gap
    }

    pub fn top_body(&self) -> Aabb {
        Aabb::new(Vec2::new(self.x, 0.0), Vec2::new(self.x + self.width, self.top))
    }

    pub fn bottom_body(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, self.bottom_top()),
            Vec2::new(self.x + self.width, GROUND_Y),
        )
    }

    /// Whether a box touches either solid body
    pub fn hits(&self, hitbox: &Aabb) -> bool {
        hitbox.overlaps_x(self.x, self.x + self.width)
            && (hitbox.min.y < self.top || hitbox.max.y > self.bottom_top())
    }

    /// Whether a circle touches either solid body
    pub fn squeezes(&self, center: Vec2, radius: f32) -> bool {
        circle_intersects_aabb(center, radius, &self.top_body())
            || circle_intersects_aabb(center, radius, &self.bottom_body())
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
    /// Pulse phase (cosmetic)
    pub wobble: f32,
}

impl Coin {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            collected: false,
            wobble: 0.0,
        }
    }

    /// Radius including the cosmetic pulse, never negative
    pub fn display_radius(&self) -> f32 {
        (self.radius + self.wobble.sin() * 2.0).max(0.0)
    }
}

/// The obstacle generator
#[derive(Debug, Clone)]
pub struct PipeManager {
    pipes: Vec<Pipe>,
    coins: Vec<Coin>,
    hazards: Vec<Hazard>,
    sequencer: Sequencer,
    /// Distance scrolled since the last spawn
    travelled: f32,
    rng: Pcg32,
    next_id: u32,
}

impl PipeManager {
    pub fn new(seed: u64, pipe_spacing: f32) -> Self {
        let mut manager = Self {
            pipes: Vec::new(),
            coins: Vec::new(),
            hazards: Vec::new(),
            sequencer: Sequencer::new(0.0, pipe_spacing),
            travelled: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        manager.reset(pipe_spacing);
        manager
    }

    /// Clear everything and arm an immediate first spawn
    pub fn reset(&mut self, pipe_spacing: f32) {
        self.clear_live();
        self.sequencer = Sequencer::new(GROUND_Y / 2.0 - 85.0, pipe_spacing);
        self.travelled = pipe_spacing;
    }

    /// Reseed the generator (new run)
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Drop all live entities, keeping the pattern state
    pub fn clear_live(&mut self) {
        self.pipes.clear();
        self.coins.clear();
        self.hazards.clear();
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }

    /// Mutable views for the collision resolver
    pub fn entities_mut(&mut self) -> (&mut [Pipe], &mut [Coin], &mut [Hazard]) {
        (&mut self.pipes, &mut self.coins, &mut self.hazards)
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty() && self.coins.is_empty() && self.hazards.is_empty()
    }

    /// Advance one frame at forward `speed`
    pub fn update(&mut self, dt: f32, speed: f32, config: &GameConfig) {
        let scroll = speed * dt;

        for pipe in &mut self.pipes {
            pipe.x -= scroll;
        }
        while self.pipes.first().is_some_and(|p| p.x + p.width < 0.0) {
            self.pipes.remove(0);
        }

        self.travelled += scroll;
        if self.travelled >= self.sequencer.spawn_interval {
            self.travelled = (self.travelled - self.sequencer.spawn_interval).max(0.0);
            self.spawn_next(config);
        }

        self.update_coins(dt, scroll);
        self.update_hazards(dt, speed, config.gravity);
    }

    /// Emit the next pipe, or the queued bullet formation
    fn spawn_next(&mut self, config: &GameConfig) {
        let pattern = self.sequencer.pattern;
        if pattern.is_formation() {
            self.spawn_formation(pattern);
            self.sequencer.finish_formation();
            return;
        }

        let interval = self.sequencer.spawn_interval;
        let pipe_x = self.spawn_pipe(config.pipe_gap);
        let hazards_enabled = !config.mode.is_classic();

        if hazards_enabled && interval > TIGHT_THRESHOLD {
            self.maybe_spawn_side_hazard(pipe_x, interval);
        }

        let coin_chance = if interval < TIGHT_THRESHOLD {
            TIGHT_COIN_CHANCE
        } else {
            COIN_CHANCE
        };
        if self.rng.random_bool(coin_chance) {
            if let Some(pipe) = self.pipes.last() {
                let pos = Vec2::new(pipe.x + pipe.width / 2.0, pipe.top + pipe.gap / 2.0);
                self.try_place_coin(pos);
            }
        }

        self.sequencer
            .choose_interval(&mut self.rng, config.pipe_spacing, hazards_enabled);
    }

    /// Create a pipe at the right edge. Returns its x.
    pub fn spawn_pipe(&mut self, base_gap: f32) -> f32 {
        let gap = (base_gap + self.rng.random_range(-GAP_VARIANCE..=GAP_VARIANCE)).max(MIN_GAP);
        let max_top = (GROUND_Y - gap - PADDING).max(PADDING);
        let random_top = self.rng.random_range(PADDING..=max_top);

        let pattern = self.sequencer.pattern;
        let top = self.sequencer.place_top(random_top).clamp(PADDING, max_top);
        self.sequencer.last_top = top;

        let mut pipe = Pipe::new(SCREEN_WIDTH, top, gap, self.rng.random());
        pipe.pattern = pattern;
        self.pipes.push(pipe);
        SCREEN_WIDTH
    }

    fn maybe_spawn_side_hazard(&mut self, pipe_x: f32, interval: f32) {
        let roll: f32 = self.rng.random();
        let x = pipe_x + PIPE_WIDTH + interval * 0.5;

        if roll < WALKER_CHANCE {
            let species = if self.rng.random_bool(0.5) {
                Species::Goomba
            } else {
                Species::Snail
            };
            let kind = HazardKind::walker(species);
            self.spawn_hazard(kind, Vec2::new(x, GROUND_Y - kind.size().y));
        } else if roll < WALKER_CHANCE + FALLING_CHANCE {
            let kind = HazardKind::falling();
            self.spawn_hazard(kind, Vec2::new(x, -kind.size().y));
        } else if roll < WALKER_CHANCE + FALLING_CHANCE + BULLET_CHANCE {
            let kind = HazardKind::bullet(BULLET_SPEED);
            let y = self
                .rng
                .random_range(PADDING..=GROUND_Y - PADDING - kind.size().y);
            self.spawn_hazard(kind, Vec2::new(SCREEN_WIDTH + interval * 0.5, y));
        }
    }

    /// Add a hazard to the live list
    pub fn spawn_hazard(&mut self, kind: HazardKind, pos: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("Spawn hazard {id} {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
        self.hazards.push(Hazard::new(id, kind, pos));
        id
    }

    /// Emit a fixed bullet layout just past the right edge
    fn spawn_formation(&mut self, pattern: Pattern) {
        let kind = HazardKind::bullet(FORMATION_BULLET_SPEED);
        let size = kind.size();
        let start_x = SCREEN_WIDTH + 40.0;

        match pattern {
            Pattern::BulletStairs => {
                // Ascending pairs
                for i in 0..5 {
                    let x = start_x + i as f32 * 120.0;
                    let y = GROUND_Y - 80.0 - i as f32 * 90.0;
                    self.spawn_hazard(kind, Vec2::new(x, y));
                    self.spawn_hazard(kind, Vec2::new(x, y - size.y - 12.0));
                }
            }
            Pattern::BulletSquad => {
                let y = self
                    .rng
                    .random_range(PADDING + 60.0..=GROUND_Y - PADDING - 60.0 - size.y);
                for i in 0..4 {
                    let x = start_x + i as f32 * (size.x + 8.0);
                    self.spawn_hazard(kind, Vec2::new(x, y));
                }
            }
            Pattern::BulletZigzag => {
                // Gate corridor: bullets above and below a weaving opening
                let center = self.rng.random_range(250.0..=GROUND_Y - 250.0);
                for i in 0..4 {
                    let x = start_x + i as f32 * 70.0;
                    let weave = if i % 2 == 0 { -30.0 } else { 30.0 };
                    let c = center + weave;
                    self.spawn_hazard(kind, Vec2::new(x, c - 90.0 - size.y));
                    self.spawn_hazard(kind, Vec2::new(x, c + 90.0));
                }
            }
            _ => {}
        }
        log::debug!("Formation {:?}", pattern);
    }

    fn update_coins(&mut self, dt: f32, scroll: f32) {
        for coin in &mut self.coins {
            coin.pos.x -= scroll;
            coin.wobble = (coin.wobble + 0.1 * dt) % std::f32::consts::TAU;
        }

        // Coins that ended up inside a pipe body are removed, not collected
        let pipes = &self.pipes;
        self.coins.retain(|coin| {
            !coin.collected
                && coin.pos.x + coin.radius > 0.0
                && !pipes.iter().any(|p| p.squeezes(coin.pos, coin.radius))
        });

        if self.rng.random::<f32>() < FREE_COIN_CHANCE * dt {
            let y = self
                .rng
                .random_range(PADDING + COIN_RADIUS..=GROUND_Y - PADDING - COIN_RADIUS);
            self.try_place_coin(Vec2::new(SCREEN_WIDTH + 40.0, y));
        }
    }

    fn update_hazards(&mut self, dt: f32, speed: f32, gravity: f32) {
        for hazard in &mut self.hazards {
            hazard.update(dt, speed, gravity);
        }
        self.hazards.retain(|h| !h.is_dead() && !h.is_off_screen());
    }

    /// Place a coin if the spot is safe. Returns whether it was placed.
    pub fn try_place_coin(&mut self, pos: Vec2) -> bool {
        if !self.is_position_safe(pos, COIN_RADIUS) {
            return false;
        }
        self.coins.push(Coin::new(pos, COIN_RADIUS));
        true
    }

    /// A spot is unsafe if it is beside a pipe body (with margin) but not well
    /// inside the gap, or crowds an existing coin.
    pub fn is_position_safe(&self, pos: Vec2, radius: f32) -> bool {
        let beside_pipe_body = self.pipes.iter().any(|p| {
            let in_column = pos.x + radius > p.x - SAFE_MARGIN_X
                && pos.x - radius < p.x + p.width + SAFE_MARGIN_X;
            let outside_gap = pos.y - radius < p.top + SAFE_INSET_Y
                || pos.y + radius > p.bottom_top() - SAFE_INSET_Y;
            in_column && outside_gap
        });
        if beside_pipe_body {
            return false;
        }

        !self
            .coins
            .iter()
            .any(|c| circles_overlap(pos, radius, c.pos, c.radius + SAFE_COIN_SPACING))
    }

    #[cfg(test)]
    pub(crate) fn push_pipe(&mut self, pipe: Pipe) {
        self.pipes.push(pipe);
    }
}
