//! Ground enemies and projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Frames a stomped hazard keeps animating before it is removed
pub const DYING_FRAMES: f32 = 30.0;
/// Upward pop given to a stomped projectile
const BULLET_POP_SPEED: f32 = -5.0;
/// Extra leftward speed of free-flying bullets
pub const BULLET_SPEED: f32 = 3.0;
/// Slower bullets used in formations, so the layout stays readable
pub const FORMATION_BULLET_SPEED: f32 = 1.5;
const HOP_SPEED: f32 = -6.0;
const HOP_INTERVAL: f32 = 70.0;
const SQUASH_RATE: f32 = 0.08;
const MIN_SQUASH: f32 = 0.25;

/// Species of a walking enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    /// Hops periodically while walking
    Goomba,
    /// Slow crawler
    Snail,
}

/// Hazard kind with the state only that kind needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardKind {
    Walker { species: Species, hop_timer: f32 },
    /// Dropped from above; walks once it lands
    Falling { landed: bool },
    /// Airborne projectile, never falls while alive
    Bullet { speed: f32 },
}

impl HazardKind {
    pub fn walker(species: Species) -> Self {
        HazardKind::Walker {
            species,
            hop_timer: HOP_INTERVAL,
        }
    }

    pub fn falling() -> Self {
        HazardKind::Falling { landed: false }
    }

    pub fn bullet(speed: f32) -> Self {
        HazardKind::Bullet { speed }
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self, HazardKind::Bullet { .. })
    }

    /// Unscaled sprite size
    pub fn size(&self) -> Vec2 {
        match self {
            HazardKind::Walker {
                species: Species::Goomba,
                ..
            } => Vec2::new(36.0, 32.0),
            HazardKind::Walker {
                species: Species::Snail,
                ..
            } => Vec2::new(40.0, 28.0),
            HazardKind::Falling { .. } => Vec2::new(34.0, 34.0),
            HazardKind::Bullet { .. } => Vec2::new(40.0, 24.0),
        }
    }

    /// Own walking speed, on top of the world scroll
    pub fn crawl_speed(&self) -> f32 {
        match self {
            HazardKind::Walker {
                species: Species::Goomba,
                ..
            } => 1.0,
            HazardKind::Walker {
                species: Species::Snail,
                ..
            } => 0.4,
            HazardKind::Falling { .. } => 0.8,
            HazardKind::Bullet { speed } => *speed,
        }
    }

    /// RGB color for the renderer
    pub fn color(&self) -> u32 {
        match self {
            HazardKind::Walker {
                species: Species::Goomba,
                ..
            } => 0x8b_4513,
            HazardKind::Walker {
                species: Species::Snail,
                ..
            } => 0x6b_8e23,
            HazardKind::Falling { .. } => 0x70_8090,
            HazardKind::Bullet { .. } => 0x2f_2f2f,
        }
    }

    /// Bonus for stomping this kind
    pub fn stomp_score(&self) -> u64 {
        if self.is_projectile() { 5 } else { 2 }
    }
}

/// Lifecycle of a hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    /// Stomped: playing its death animation
    Dying { timer: f32 },
    /// Removed on the next filter pass
    Dead,
}

/// A hazard entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Per-axis scale (y shrinks when squashed)
    pub scale: Vec2,
    pub crawl_speed: f32,
    pub color: u32,
    pub lifecycle: Lifecycle,
    /// Animation phase (cosmetic)
    pub anim_phase: f32,
}

impl Hazard {
    pub fn new(id: u32, kind: HazardKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            scale: Vec2::ONE,
            crawl_speed: kind.crawl_speed(),
            color: kind.color(),
            lifecycle: Lifecycle::Alive,
            anim_phase: 0.0,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.kind.size() * self.scale
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn height(&self) -> f32 {
        self.size().y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.pos + self.size())
    }

    pub fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }

    pub fn is_dead(&self) -> bool {
        self.lifecycle == Lifecycle::Dead
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size().x < -50.0 || self.pos.y > SCREEN_HEIGHT
    }

    /// Defeat the hazard. Returns the bonus score, or 0 if it was not alive.
    pub fn stomp(&mut self) -> u64 {
        if !self.is_alive() {
            return 0;
        }
        self.lifecycle = Lifecycle::Dying {
            timer: DYING_FRAMES,
        };
        self.crawl_speed = 0.0;
        if self.kind.is_projectile() {
            self.vel.y = BULLET_POP_SPEED;
        } else {
            self.vel.y = 0.0;
        }
        self.kind.stomp_score()
    }

    /// Advance one frame: scroll with the world, then kind-specific motion
    pub fn update(&mut self, dt: f32, scroll: f32, gravity: f32) {
        match self.lifecycle {
            Lifecycle::Dead => {}
            Lifecycle::Dying { timer } => {
                self.pos.x -= scroll * dt;
                if self.kind.is_projectile() {
                    self.vel.y += gravity * dt;
                    self.pos.y += self.vel.y * dt;
                } else {
                    // Flatten while keeping the feet on the ground
                    let bottom = self.bottom();
                    self.scale.y = (self.scale.y - SQUASH_RATE * dt).max(MIN_SQUASH);
                    self.pos.y = bottom - self.height();
                }
                let timer = timer - dt;
                self.lifecycle = if timer <= 0.0 {
                    Lifecycle::Dead
                } else {
                    Lifecycle::Dying { timer }
                };
            }
            Lifecycle::Alive => {
                self.anim_phase = (self.anim_phase + 0.2 * dt) % std::f32::consts::TAU;
                self.pos.x -= (scroll + self.crawl_speed) * dt;
                if !self.kind.is_projectile() {
                    self.apply_ground_physics(dt, gravity);
                }
            }
        }
    }

    fn apply_ground_physics(&mut self, dt: f32, gravity: f32) {
        let airborne = self.bottom() < GROUND_Y || self.vel.y < 0.0;
        if airborne {
            self.vel.y += gravity * dt;
            self.pos.y += self.vel.y * dt;
        }
        let grounded = self.bottom() >= GROUND_Y;
        if grounded {
            self.pos.y = GROUND_Y - self.height();
            self.vel.y = 0.0;
        }

        match &mut self.kind {
            HazardKind::Falling { landed } if grounded => *landed = true,
            HazardKind::Walker {
                species: Species::Goomba,
                hop_timer,
            } if grounded => {
                *hop_timer -= dt;
                if *hop_timer <= 0.0 {
                    *hop_timer = HOP_INTERVAL;
                    self.vel.y = HOP_SPEED;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walker_falls_to_ground() {
        let mut hazard = Hazard::new(1, HazardKind::falling(), Vec2::new(300.0, 0.0));
        for _ in 0..300 {
            hazard.update(1.0, 3.0, 0.45);
        }
        assert_eq!(hazard.bottom(), GROUND_Y);
        assert_eq!(hazard.kind, HazardKind::Falling { landed: true });
    }

    #[test]
    fn test_bullet_does_not_fall() {
        let mut hazard = Hazard::new(1, HazardKind::bullet(BULLET_SPEED), Vec2::new(400.0, 200.0));
        hazard.update(1.0, 3.0, 0.45);
        assert_eq!(hazard.pos.y, 200.0);
        assert!((hazard.pos.x - (400.0 - 3.0 - BULLET_SPEED)).abs() < 1e-4);
    }

    #[test]
    fn test_stomp_ground_hazard_flattens_then_dies() {
        let size = HazardKind::walker(Species::Snail).size();
        let mut hazard = Hazard::new(
            1,
            HazardKind::walker(Species::Snail),
            Vec2::new(200.0, GROUND_Y - size.y),
        );
        assert_eq!(hazard.stomp(), 2);
        assert_eq!(hazard.crawl_speed, 0.0);
        assert_eq!(hazard.stomp(), 0);

        hazard.update(1.0, 3.0, 0.45);
        assert!(hazard.scale.y < 1.0);
        assert!((hazard.bottom() - GROUND_Y).abs() < 1e-3);

        for _ in 0..DYING_FRAMES as usize {
            hazard.update(1.0, 3.0, 0.45);
        }
        assert!(hazard.is_dead());
    }

    #[test]
    fn test_stomp_bullet_pops_up() {
        let mut hazard = Hazard::new(1, HazardKind::bullet(BULLET_SPEED), Vec2::new(300.0, 300.0));
        assert_eq!(hazard.stomp(), 5);
        hazard.update(1.0, 3.0, 0.45);
        assert!(hazard.pos.y < 300.0);
    }

    #[test]
    fn test_goomba_hops() {
        let size = HazardKind::walker(Species::Goomba).size();
        let mut hazard = Hazard::new(
            1,
            HazardKind::walker(Species::Goomba),
            Vec2::new(300.0, GROUND_Y - size.y),
        );
        let mut hopped = false;
        for _ in 0..(HOP_INTERVAL as usize + 5) {
            hazard.update(1.0, 0.0, 0.45);
            hopped |= hazard.bottom() < GROUND_Y;
        }
        assert!(hopped);
    }
}
