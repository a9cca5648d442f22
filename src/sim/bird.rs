//! Avatar physics
//!
//! The bird is a small state machine advanced once per frame: a dashing
//! branch (energy drain, recentering) and a normal branch (post-dash
//! stabilize cooldown, or gravity and energy recharge).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::play_field_center;

pub const MAX_ENERGY: f32 = 100.0;
/// Energy required to begin a dash
pub const DASH_MIN_ENERGY: f32 = 20.0;
/// Energy (or nitro) drained per reference frame while dashing
pub const DASH_DRAIN: f32 = 0.6;
/// Energy regained per reference frame while flying normally
pub const ENERGY_RECHARGE: f32 = 0.12;
/// Post-dash cooldown; also the length of the post-dash shield
pub const STABILIZE_FRAMES: f32 = 30.0;
/// Fraction of the distance to the field center covered per reference frame
pub const DASH_CENTER_EASE: f32 = 0.02;
/// Shield granted when returning from a revive
pub const REVIVE_INVULN_FRAMES: f32 = 120.0;
/// Fraction of the radius used for the forgiving hitbox
pub const HITBOX_SCALE: f32 = 0.6;

const ROTATION_UP: f32 = -0.45;
const ROTATION_MAX_DOWN: f32 = 1.4;
const RISE_THRESHOLD: f32 = -1.0;
const FALL_THRESHOLD: f32 = 3.0;
const ROTATION_SMOOTHING: f32 = 0.25;
const WING_SPEED: f32 = 0.35;

/// Dash fuel tank identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NitroKind {
    #[default]
    None,
    Standard,
    Turbo,
    Plasma,
}

impl NitroKind {
    pub fn capacity(&self) -> f32 {
        match self {
            NitroKind::None => 0.0,
            NitroKind::Standard => 100.0,
            NitroKind::Turbo => 200.0,
            NitroKind::Plasma => 400.0,
        }
    }
}

/// Equipped dash fuel, loaded from the progress store at session start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NitroTank {
    pub kind: NitroKind,
    pub capacity: f32,
    pub remaining: f32,
}

impl NitroTank {
    pub fn new(kind: NitroKind, remaining: f32) -> Self {
        let capacity = kind.capacity();
        Self {
            kind,
            capacity,
            remaining: remaining.clamp(0.0, capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Take up to `amount` fuel; returns the part the tank could not cover
    pub fn drain(&mut self, amount: f32) -> f32 {
        let taken = amount.min(self.remaining).max(0.0);
        self.remaining -= taken;
        amount - taken
    }
}

/// Boundary reached during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdContact {
    /// Bottom edge reached the ground line (lethal)
    Ground,
    /// Top edge reached the top of the screen (clamped, harmless)
    Ceiling,
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    /// Vertical speed (px per reference frame, positive = down)
    pub vy: f32,
    pub radius: f32,
    /// Visual pitch in radians (negative = nose up)
    pub rotation: f32,
    pub energy: f32,
    pub dashing: bool,
    /// Wing animation phase (cosmetic)
    pub wing_phase: f32,
    /// Frames of post-dash recovery remaining
    pub stabilize_timer: f32,
    /// Frames of hazard immunity remaining
    pub invulnerable_timer: f32,
    pub nitro: NitroTank,
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

impl Bird {
    pub fn new() -> Self {
        Self {
            x: BIRD_X,
            y: BIRD_START_Y,
            vy: 0.0,
            radius: BIRD_RADIUS,
            rotation: 0.0,
            energy: MAX_ENERGY,
            dashing: false,
            wing_phase: 0.0,
            stabilize_timer: 0.0,
            invulnerable_timer: 0.0,
            nitro: NitroTank::default(),
        }
    }

    /// Reinitialize for a fresh run. The nitro tank is left as loaded.
    pub fn reset(&mut self) {
        let nitro = self.nitro;
        *self = Self::new();
        self.nitro = nitro;
    }

    /// Put the bird back at spawn after a revive, refilled and shielded
    pub fn reset_state_for_revive(&mut self) {
        self.x = BIRD_X;
        self.y = BIRD_START_Y;
        self.vy = 0.0;
        self.rotation = 0.0;
        self.energy = MAX_ENERGY;
        self.dashing = false;
        self.stabilize_timer = 0.0;
        self.invulnerable_timer = REVIVE_INVULN_FRAMES;
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32, gravity: f32) -> Option<BirdContact> {
        if self.invulnerable_timer > 0.0 {
            self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);
        }
        let wing_rate = if self.dashing { 2.0 } else { 1.0 };
        self.wing_phase = (self.wing_phase + WING_SPEED * wing_rate * dt) % std::f32::consts::TAU;

        if self.dashing {
            self.stabilize_timer = 0.0;
            if self.energy > 0.0 {
                self.drain_dash_fuel(DASH_DRAIN * dt);
                self.vy = 0.0;
                // Same approach as a fixed 0.02 per reference frame, independent of frame rate
                let ease = 1.0 - (1.0 - DASH_CENTER_EASE).powf(dt);
                self.y += (play_field_center() - self.y) * ease;
            }
            if self.energy <= 0.0 {
                self.energy = 0.0;
                self.stop_dash();
            }
        } else if self.stabilize_timer > 0.0 {
            self.vy = 0.0;
            self.rotation = 0.0;
            self.stabilize_timer = (self.stabilize_timer - dt).max(0.0);
        } else {
            self.energy = (self.energy + ENERGY_RECHARGE * dt).min(MAX_ENERGY);
            self.vy += gravity * dt;
            self.y += self.vy * dt;
        }

        self.update_rotation(dt);
        self.resolve_bounds()
    }

    /// Gravity-only motion used while the death animation plays.
    /// Returns true once the bird rests on the ground.
    pub fn fall(&mut self, dt: f32, gravity: f32) -> bool {
        self.dashing = false;
        self.stabilize_timer = 0.0;
        self.vy += gravity * dt;
        self.y += self.vy * dt;
        self.rotation += (ROTATION_MAX_DOWN - self.rotation) * (ROTATION_SMOOTHING * dt).min(1.0);
        if self.bottom() >= GROUND_Y {
            self.y = GROUND_Y - self.radius;
            self.vy = 0.0;
            return true;
        }
        false
    }

    /// Jump. Ignored while dashing; cancels any stabilize cooldown.
    pub fn flap(&mut self, impulse: f32) -> bool {
        if self.dashing {
            return false;
        }
        self.vy = impulse;
        self.stabilize_timer = 0.0;
        true
    }

    pub fn start_dash(&mut self) -> bool {
        if self.dashing || self.energy < DASH_MIN_ENERGY {
            return false;
        }
        self.dashing = true;
        self.vy = 0.0;
        true
    }

    /// End a dash, starting the stabilize cooldown and an equal shield window
    pub fn stop_dash(&mut self) -> bool {
        if !self.dashing {
            return false;
        }
        self.dashing = false;
        self.stabilize_timer = STABILIZE_FRAMES;
        self.invulnerable_timer = self.invulnerable_timer.max(STABILIZE_FRAMES);
        true
    }

    pub fn is_invulnerable(&self) -> bool {
        self.dashing || self.invulnerable_timer > 0.0
    }

    /// Add `frames` of immunity on top of whatever remains
    pub fn extend_invulnerability(&mut self, frames: f32) {
        self.invulnerable_timer = self.invulnerable_timer.max(0.0) + frames.max(0.0);
    }

    /// Ensure at least `frames` of immunity remain
    pub fn grant_invulnerability(&mut self, frames: f32) {
        self.invulnerable_timer = self.invulnerable_timer.max(frames);
    }

    /// Cosmetic hop after stomping a hazard
    pub fn bounce(&mut self, impulse: f32) {
        if !self.dashing {
            self.vy = impulse;
            self.stabilize_timer = 0.0;
        }
    }

    pub fn set_nitro(&mut self, nitro: NitroTank) {
        self.nitro = nitro;
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.radius
    }

    /// Forgiving hitbox: a square shrunk to 60% of the radius
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.pos(), Vec2::splat(self.radius * HITBOX_SCALE))
    }

    fn drain_dash_fuel(&mut self, amount: f32) {
        let unmet = if self.nitro.is_empty() {
            amount
        } else {
            self.nitro.drain(amount)
        };
        self.energy = (self.energy - unmet).max(0.0);
    }

    fn update_rotation(&mut self, dt: f32) {
        let target = if self.dashing || self.stabilize_timer > 0.0 {
            0.0
        } else if self.vy < RISE_THRESHOLD {
            ROTATION_UP
        } else if self.vy > FALL_THRESHOLD {
            ((self.vy - FALL_THRESHOLD) * 0.12).min(ROTATION_MAX_DOWN)
        } else {
            0.0
        };
        self.rotation += (target - self.rotation) * (ROTATION_SMOOTHING * dt).min(1.0);
    }

    fn resolve_bounds(&mut self) -> Option<BirdContact> {
        if self.bottom() >= GROUND_Y {
            self.y = GROUND_Y - self.radius;
            return Some(BirdContact::Ground);
        }
        if self.y - self.radius <= 0.0 {
            self.y = self.radius;
            self.vy = 0.0;
            return Some(BirdContact::Ceiling);
        }
        None
    }
}
