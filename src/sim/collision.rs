//! Collision detection and scoring resolution
//!
//! Runs once per playing frame after the avatar and the generator have moved.
//! The avatar uses a forgiving box (60% of its radius); hazards are inset by
//! a few pixels. Effects that reach outside the simulation (score, coins,
//! death) are returned in a `CollisionReport` for the orchestrator to apply.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::hazard::{Hazard, HazardKind};
use super::pipes::{Coin, Pipe};

/// Hazard hitboxes are shrunk by this much on every side
pub const HAZARD_INSET: f32 = 5.0;
/// Extra reach when picking up coins
pub const COIN_TOLERANCE: f32 = 5.0;
/// Shield frames below which a pipe contact extends the shield
pub const PIPE_GRACE_THRESHOLD: f32 = 5.0;
/// Frames added when a fading shield is still inside a pipe
pub const PIPE_GRACE_FRAMES: f32 = 5.0;
/// Frames added when a shielded avatar brushes a hazard
pub const HAZARD_GRACE_FRAMES: f32 = 2.0;
/// A stomp needs the avatar not to be rising faster than this
pub const STOMP_MAX_RISE: f32 = -2.0;
/// Fraction of the hazard height (from its top) the avatar's feet must stay above
pub const STOMP_DEPTH: f32 = 0.8;
/// Shield granted after a stomp
pub const STOMP_INVULN_FRAMES: f32 = 40.0;
/// Vertical speed given to the avatar after a stomp
pub const STOMP_BOUNCE: f32 = -6.0;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Shrink by `amount` on every side (never inverting)
    pub fn inset(&self, amount: f32) -> Self {
        let center = (self.min + self.max) * 0.5;
        let half = ((self.max - self.min) * 0.5 - Vec2::splat(amount)).max(Vec2::ZERO);
        Self::from_center(center, half)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn overlaps_x(&self, min_x: f32, max_x: f32) -> bool {
        self.min.x < max_x && self.max.x > min_x
    }
}

/// Circle-vs-circle test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Circle-vs-box test (closest point)
pub fn circle_intersects_aabb(center: Vec2, radius: f32, aabb: &Aabb) -> bool {
    let closest = center.clamp(aabb.min, aabb.max);
    center.distance_squared(closest) < radius * radius
}

/// A hazard defeated this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stomp {
    pub pos: Vec2,
    pub kind: HazardKind,
    pub points: u64,
}

/// Everything the resolver decided this frame
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// The avatar took an unshielded hit
    pub lethal: bool,
    /// Pipes newly passed (one point each)
    pub pipes_passed: u32,
    /// Positions of coins picked up
    pub coins: Vec<Vec2>,
    pub stomps: Vec<Stomp>,
}

impl CollisionReport {
    pub fn bonus_score(&self) -> u64 {
        self.stomps.iter().map(|s| s.points).sum()
    }
}

/// Resolve avatar contacts with pipes, coins and hazards
pub fn resolve_collisions(
    bird: &mut Bird,
    pipes: &mut [Pipe],
    coins: &mut [Coin],
    hazards: &mut [Hazard],
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let hitbox = bird.hitbox();

    for pipe in pipes.iter_mut() {
        if pipe.hits(&hitbox) {
            if bird.is_invulnerable() {
                // Shield about to lapse while still inside the pipe
                if !bird.dashing && bird.invulnerable_timer < PIPE_GRACE_THRESHOLD {
                    bird.extend_invulnerability(PIPE_GRACE_FRAMES);
                }
            } else {
                report.lethal = true;
            }
        }

        // Counted once the whole pipe, trailing edge included, is behind the bird
        if !pipe.passed && pipe.x + pipe.width < bird.x {
            pipe.passed = true;
            report.pipes_passed += 1;
        }
    }

    for coin in coins.iter_mut().filter(|c| !c.collected) {
        if circles_overlap(bird.pos(), bird.radius, coin.pos, coin.radius + COIN_TOLERANCE) {
            coin.collected = true;
            report.coins.push(coin.pos);
        }
    }

    for hazard in hazards.iter_mut().filter(|h| h.is_alive()) {
        let bounds = hazard.bounds().inset(HAZARD_INSET);
        if !hitbox.intersects(&bounds) {
            continue;
        }

        let from_above = bird.vy > STOMP_MAX_RISE
            && hitbox.max.y < hazard.top() + hazard.height() * STOMP_DEPTH;
        if from_above {
            let points = hazard.stomp();
            report.stomps.push(Stomp {
                pos: hazard.pos,
                kind: hazard.kind,
                points,
            });
            bird.grant_invulnerability(STOMP_INVULN_FRAMES);
            bird.bounce(STOMP_BOUNCE);
        } else if bird.is_invulnerable() {
            bird.extend_invulnerability(HAZARD_GRACE_FRAMES);
        } else {
            report.lethal = true;
        }
    }

    report
}
