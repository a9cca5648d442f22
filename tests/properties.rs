//! Property tests for the simulation invariants

use flappy_zones::GameConfig;
use flappy_zones::consts::*;
use flappy_zones::sim::bird::{Bird, DASH_MIN_ENERGY, MAX_ENERGY};
use flappy_zones::sim::pipes::{GAP_VARIANCE, PipeManager};
use flappy_zones::sim::resolve_collisions;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Action {
    Flap,
    DashStart,
    DashEnd,
    Wait(f32),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Flap),
        Just(Action::DashStart),
        Just(Action::DashEnd),
        (0.1f32..3.0).prop_map(Action::Wait),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn energy_stays_in_bounds(actions in prop::collection::vec(action(), 1..400)) {
        let mut bird = Bird::new();
        for action in actions {
            match action {
                Action::Flap => { bird.flap(-8.0); }
                Action::DashStart => {
                    let had_energy = bird.energy >= DASH_MIN_ENERGY;
                    let was_dashing = bird.dashing;
                    let started = bird.start_dash();
                    prop_assert_eq!(started, had_energy && !was_dashing);
                }
                Action::DashEnd => { bird.stop_dash(); }
                Action::Wait(dt) => {
                    bird.update(dt, 0.45);
                    // Keep the bird airborne so long runs stay meaningful
                    bird.y = bird.y.clamp(100.0, 500.0);
                    if bird.energy <= 0.0 {
                        prop_assert!(!bird.dashing);
                    }
                }
            }
            prop_assert!((0.0..=MAX_ENERGY).contains(&bird.energy));
        }
    }

    #[test]
    fn extending_invulnerability_never_shortens(current in 0.0f32..200.0, frames in 0.0f32..200.0) {
        let mut bird = Bird::new();
        bird.invulnerable_timer = current;
        bird.extend_invulnerability(frames);
        prop_assert!(bird.invulnerable_timer >= current);
        prop_assert!(bird.invulnerable_timer >= frames);

        let mut bird = Bird::new();
        bird.invulnerable_timer = current;
        bird.grant_invulnerability(frames);
        prop_assert!(bird.invulnerable_timer >= current.max(frames));
    }

    #[test]
    fn pipe_gap_and_top_in_range(seed in any::<u64>(), gap in 120.0f32..260.0) {
        let config = GameConfig { pipe_gap: gap, ..GameConfig::default() };
        let mut manager = PipeManager::new(seed, config.pipe_spacing);
        for _ in 0..1500 {
            manager.update(1.0, config.speed, &config);
            for pipe in manager.pipes() {
                prop_assert!((pipe.gap - gap).abs() <= GAP_VARIANCE + 1e-3);
                prop_assert!(pipe.top >= PADDING - 1e-3);
                prop_assert!(pipe.top <= GROUND_Y - pipe.gap - PADDING + 1e-3);
            }
        }
    }

    #[test]
    fn coins_never_overlap_pipes_or_each_other(seed in any::<u64>()) {
        let config = GameConfig::default();
        let mut manager = PipeManager::new(seed, config.pipe_spacing);
        for _ in 0..2000 {
            manager.update(1.0, config.speed, &config);
            let coins = manager.coins();
            for (i, coin) in coins.iter().enumerate() {
                prop_assert!(!manager.pipes().iter().any(|p| p.squeezes(coin.pos, coin.radius)));
                for other in &coins[i + 1..] {
                    prop_assert!(coin.pos.distance(other.pos) >= coin.radius + other.radius);
                }
            }
        }
    }

    #[test]
    fn each_pipe_scores_at_most_once(seed in any::<u64>(), evaluations in 1usize..30) {
        let config = GameConfig::default();
        let mut manager = PipeManager::new(seed, config.pipe_spacing);
        let mut bird = Bird::new();
        for _ in 0..600 {
            manager.update(1.0, config.speed, &config);
        }
        let count = manager.pipes().len() as u32;
        let (pipes, _, _) = manager.entities_mut();
        let mut total = 0;
        for _ in 0..evaluations {
            bird.invulnerable_timer = 1000.0;
            total += resolve_collisions(&mut bird, pipes, &mut [], &mut []).pipes_passed;
        }
        prop_assert!(total <= count);
    }
}
