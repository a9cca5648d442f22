//! Pipe pattern sequencing
//!
//! Each time the generator needs a new spawn interval it rolls a pattern.
//! Multi-pipe patterns then govern the next few pipes at a tight spacing;
//! desert stretches and bullet formations change a single interval.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Spacing used inside multi-pipe patterns
pub const TIGHT_SPACING: f32 = 80.0;
/// Intervals at or below this count as tight (fewer coins, no side hazards)
pub const TIGHT_THRESHOLD: f32 = 150.0;
/// Random spread around the configured normal spacing
pub const SPACING_VARIANCE: f32 = 50.0;
pub const STAIRS_UP_STEP: f32 = 60.0;
pub const STAIRS_DOWN_STEP: f32 = 80.0;
pub const DESERT_MIN: f32 = 1800.0;
pub const DESERT_MAX: f32 = 2300.0;

/// Layout template for upcoming pipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Pattern {
    #[default]
    None,
    StairsUp,
    StairsDown,
    Twins,
    Desert,
    BulletStairs,
    BulletSquad,
    BulletZigzag,
}

impl Pattern {
    /// Projectile formations replace one pipe with a cluster of bullets
    pub fn is_formation(&self) -> bool {
        matches!(
            self,
            Pattern::BulletStairs | Pattern::BulletSquad | Pattern::BulletZigzag
        )
    }

    /// Interval forced after a formation has been emitted
    pub fn follow_up_interval(&self) -> f32 {
        match self {
            Pattern::BulletStairs => 2500.0,
            Pattern::BulletSquad | Pattern::BulletZigzag => 800.0,
            _ => 0.0,
        }
    }

    /// Stable id handed to the renderer
    pub fn id(&self) -> u32 {
        *self as u32
    }

    /// Weighted pick from two unit rolls.
    ///
    /// 10% stairs up, 8% stairs down, 7% twins, 5% desert, 15% a bullet
    /// formation (split 40/30/30), otherwise normal spacing. Without
    /// formations their share falls back to normal spacing.
    pub fn select(roll: f32, sub_roll: f32, allow_formations: bool) -> Pattern {
        match roll {
            r if r < 0.10 => Pattern::StairsUp,
            r if r < 0.18 => Pattern::StairsDown,
            r if r < 0.25 => Pattern::Twins,
            r if r < 0.30 => Pattern::Desert,
            r if r < 0.45 && allow_formations => match sub_roll {
                s if s < 0.4 => Pattern::BulletStairs,
                s if s < 0.7 => Pattern::BulletSquad,
                _ => Pattern::BulletZigzag,
            },
            _ => Pattern::None,
        }
    }
}

/// Generator-owned pattern state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequencer {
    pub pattern: Pattern,
    /// Pipes the active pattern still governs
    pub remaining: u32,
    /// Top height of the most recent pipe
    pub last_top: f32,
    /// Distance to travel before the next spawn
    pub spawn_interval: f32,
}

impl Sequencer {
    pub fn new(last_top: f32, spawn_interval: f32) -> Self {
        Self {
            pattern: Pattern::None,
            remaining: 0,
            last_top,
            spawn_interval,
        }
    }

    /// Force a multi-pipe pattern
    pub fn begin(&mut self, pattern: Pattern, count: u32) {
        self.pattern = pattern;
        self.remaining = count;
        self.spawn_interval = TIGHT_SPACING;
    }

    /// Whether the next pipe's top is dictated by a pattern
    pub fn is_governing(&self) -> bool {
        self.remaining > 0
            && matches!(
                self.pattern,
                Pattern::StairsUp | Pattern::StairsDown | Pattern::Twins
            )
    }

    /// Top height for the next pipe given a freshly rolled one.
    /// Consumes one pipe of the active pattern.
    pub fn place_top(&mut self, random_top: f32) -> f32 {
        if self.is_governing() {
            self.remaining -= 1;
            return match self.pattern {
                Pattern::StairsUp => self.last_top - STAIRS_UP_STEP,
                Pattern::StairsDown => self.last_top + STAIRS_DOWN_STEP,
                _ => self.last_top,
            };
        }

        // Keep consecutive gaps reachable
        let jump = random_top - self.last_top;
        if jump.abs() > 300.0 {
            self.last_top + 150.0 * jump.signum()
        } else {
            random_top
        }
    }

    /// Mark a formation as emitted and hold generation off for its follow-up
    pub fn finish_formation(&mut self) {
        self.spawn_interval = self.pattern.follow_up_interval();
        self.pattern = Pattern::None;
        self.remaining = 0;
    }

    /// Pick the interval until the next spawn. Active patterns keep the
    /// tight spacing until they run out.
    pub fn choose_interval<R: Rng>(
        &mut self,
        rng: &mut R,
        base_spacing: f32,
        allow_formations: bool,
    ) {
        if self.is_governing() {
            self.spawn_interval = TIGHT_SPACING;
            return;
        }

        let pattern = Pattern::select(rng.random(), rng.random(), allow_formations);
        self.pattern = pattern;
        self.remaining = 0;
        match pattern {
            Pattern::StairsUp => self.begin(pattern, rng.random_range(3..=5)),
            Pattern::StairsDown => self.begin(pattern, rng.random_range(3..=4)),
            Pattern::Twins => self.begin(pattern, rng.random_range(2..=3)),
            Pattern::Desert => {
                self.spawn_interval = rng.random_range(DESERT_MIN..=DESERT_MAX);
            }
            // The formation takes the next spawn slot at normal spacing
            _ => {
                self.spawn_interval = base_spacing
                    + rng.random_range(-SPACING_VARIANCE..=SPACING_VARIANCE);
            }
        }
        if pattern != Pattern::None {
            log::debug!("Pattern {:?} (interval {:.0})", pattern, self.spawn_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_select_weights() {
        assert_eq!(Pattern::select(0.05, 0.0, true), Pattern::StairsUp);
        assert_eq!(Pattern::select(0.15, 0.0, true), Pattern::StairsDown);
        assert_eq!(Pattern::select(0.20, 0.0, true), Pattern::Twins);
        assert_eq!(Pattern::select(0.27, 0.0, true), Pattern::Desert);
        assert_eq!(Pattern::select(0.35, 0.1, true), Pattern::BulletStairs);
        assert_eq!(Pattern::select(0.35, 0.5, true), Pattern::BulletSquad);
        assert_eq!(Pattern::select(0.35, 0.9, true), Pattern::BulletZigzag);
        assert_eq!(Pattern::select(0.35, 0.9, false), Pattern::None);
        assert_eq!(Pattern::select(0.80, 0.0, true), Pattern::None);
    }

    #[test]
    fn test_stairs_up_places_relative_tops() {
        let mut seq = Sequencer::new(300.0, 250.0);
        seq.begin(Pattern::StairsUp, 3);
        let mut tops = Vec::new();
        for _ in 0..3 {
            let top = seq.place_top(999.0);
            seq.last_top = top;
            tops.push(top);
        }
        assert_eq!(tops, vec![240.0, 180.0, 120.0]);
        assert!(!seq.is_governing());
    }

    #[test]
    fn test_twins_repeat_top() {
        let mut seq = Sequencer::new(222.0, 250.0);
        seq.begin(Pattern::Twins, 2);
        assert_eq!(seq.place_top(50.0), 222.0);
        assert_eq!(seq.place_top(50.0), 222.0);
        assert_eq!(seq.place_top(50.0), 50.0);
    }

    #[test]
    fn test_continuity_clamp() {
        let mut seq = Sequencer::new(100.0, 250.0);
        assert_eq!(seq.place_top(450.0), 250.0);
        let mut seq = Sequencer::new(450.0, 250.0);
        assert_eq!(seq.place_top(100.0), 300.0);
        assert_eq!(seq.place_top(300.0), 300.0);
    }

    #[test]
    fn test_formation_follow_up() {
        let mut seq = Sequencer::new(300.0, 250.0);
        seq.pattern = Pattern::BulletStairs;
        seq.finish_formation();
        assert_eq!(seq.spawn_interval, 2500.0);
        assert_eq!(seq.pattern, Pattern::None);
    }

    #[test]
    fn test_choose_interval_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seq = Sequencer::new(300.0, 250.0);
        for _ in 0..500 {
            seq.remaining = 0;
            seq.choose_interval(&mut rng, 250.0, true);
            let interval = seq.spawn_interval;
            match seq.pattern {
                Pattern::StairsUp | Pattern::StairsDown | Pattern::Twins => {
                    assert_eq!(interval, TIGHT_SPACING);
                    assert!(seq.remaining >= 2);
                }
                Pattern::Desert => assert!((DESERT_MIN..=DESERT_MAX).contains(&interval)),
                _ => assert!((200.0..=300.0).contains(&interval)),
            }
        }
    }

    #[test]
    fn test_active_pattern_keeps_tight_spacing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seq = Sequencer::new(300.0, 250.0);
        seq.begin(Pattern::StairsDown, 2);
        seq.choose_interval(&mut rng, 250.0, true);
        assert_eq!(seq.pattern, Pattern::StairsDown);
        assert_eq!(seq.spawn_interval, TIGHT_SPACING);
    }
}
