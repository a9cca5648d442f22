//! End-to-end gameplay scenarios driven through the public API

use flappy_zones::consts::*;
use flappy_zones::sim::hazard::{HazardKind, Lifecycle, Species};
use flappy_zones::sim::pattern::{Pattern, TIGHT_SPACING};
use flappy_zones::sim::{Bird, Pipe, PipeManager, resolve_collisions};
use flappy_zones::{Game, GameConfig, GameEvent, GamePhase, MemoryStore};
use glam::Vec2;

fn playing_game(seed: u64) -> Game {
    let config = GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    };
    let mut game = Game::new(config, Box::new(MemoryStore::default()));
    game.show_start();
    game.on_jump();
    game.drain_events();
    game
}

#[test]
fn stomp_from_above_defeats_hazard() {
    let mut game = playing_game(11);
    game.bird_mut().y = 400.0;
    game.bird_mut().vy = 1.0;
    // After one frame the bird's hitbox bottom sits at 70% of the goomba's height
    let id = game
        .generator_mut()
        .spawn_hazard(HazardKind::walker(Species::Goomba), Vec2::new(102.0, 388.2));

    game.update(1.0);

    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.score(), 2);
    let hazard = game
        .generator()
        .hazards()
        .iter()
        .find(|h| h.id == id)
        .cloned()
        .unwrap();
    assert!(matches!(hazard.lifecycle, Lifecycle::Dying { .. }));
    assert_eq!(hazard.crawl_speed, 0.0);
    assert!(game.bird().is_invulnerable());
    assert!(game.bird().vy < 0.0);

    let events = game.drain_events();
    assert!(events.contains(&GameEvent::Score { score: 2 }));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::ScorePopup { points: 2, .. }))
    );
    assert!(!events.contains(&GameEvent::Die));
}

#[test]
fn rising_into_hazard_kills() {
    let mut game = playing_game(12);
    game.bird_mut().y = 400.0;
    game.bird_mut().vy = -5.0;
    game.generator_mut()
        .spawn_hazard(HazardKind::walker(Species::Goomba), Vec2::new(102.0, 380.0));

    game.update(1.0);

    assert_eq!(game.phase(), GamePhase::Dying);
    assert_eq!(game.score(), 0);
    let events = game.drain_events();
    assert!(events.iter().any(|e| matches!(e, GameEvent::Hit { .. })));
    assert!(events.contains(&GameEvent::Die));
}

#[test]
fn shielded_bird_survives_the_same_hit() {
    let mut game = playing_game(13);
    game.bird_mut().y = 400.0;
    game.bird_mut().vy = -5.0;
    game.bird_mut().invulnerable_timer = 1.5;
    game.generator_mut()
        .spawn_hazard(HazardKind::walker(Species::Goomba), Vec2::new(102.0, 380.0));

    game.update(1.0);

    assert_eq!(game.phase(), GamePhase::Playing);
    // 1.5 - 1 frame + 2 grace frames
    assert!((game.bird().invulnerable_timer - 2.5).abs() < 1e-4);
}

#[test]
fn stairs_up_sequence_through_generator() {
    let config = GameConfig::default();
    let mut manager = PipeManager::new(21, config.pipe_spacing);
    manager.sequencer_mut().last_top = 300.0;
    manager.sequencer_mut().begin(Pattern::StairsUp, 3);

    let mut frames = 0;
    while manager.pipes().len() < 3 && frames < 200 {
        manager.update(1.0, config.speed, &config);
        frames += 1;
        if (1..3).contains(&manager.pipes().len()) {
            assert_eq!(manager.sequencer().spawn_interval, TIGHT_SPACING);
        }
    }

    let tops: Vec<f32> = manager.pipes().iter().map(|p| p.top).collect();
    assert_eq!(tops, vec![240.0, 180.0, 120.0]);

    // A fresh pattern roll decides the 4th interval
    let seq = manager.sequencer();
    assert!(seq.spawn_interval != TIGHT_SPACING || seq.is_governing());
}

#[test]
fn pipe_scores_once() {
    let mut bird = Bird::new();
    let mut pipes = vec![Pipe::new(bird.x - 100.0, 150.0, 170.0, 1)];
    let total: u32 = (0..20)
        .map(|_| resolve_collisions(&mut bird, &mut pipes, &mut [], &mut []).pipes_passed)
        .sum();
    assert_eq!(total, 1);
    assert!(pipes[0].passed);
}

#[test]
fn restart_clears_world_and_bird() {
    let mut game = playing_game(31);
    for _ in 0..60 {
        game.update(1.0);
        let bird = game.bird_mut();
        bird.y = BIRD_START_Y;
        bird.vy = 0.0;
    }
    game.on_dash_start();
    game.update(1.0);

    game.restart();

    let bird = game.bird();
    assert_eq!(bird.energy, 100.0);
    assert_eq!((bird.x, bird.y), (BIRD_X, BIRD_START_Y));
    assert!(!bird.dashing);
    assert_eq!(bird.stabilize_timer, 0.0);
    assert_eq!(bird.invulnerable_timer, 0.0);
    assert!(game.generator().pipes().is_empty());
    assert!(game.generator().coins().is_empty());
    assert!(game.generator().hazards().is_empty());
    assert_eq!(game.score(), 0);
}

#[test]
fn same_seed_same_session() {
    let mut a = playing_game(99);
    let mut b = playing_game(99);
    for frame in 0..600 {
        if frame % 25 == 0 {
            a.on_jump();
            b.on_jump();
        }
        a.update(1.0);
        b.update(1.0);
    }
    assert_eq!(a.phase(), b.phase());
    assert_eq!(a.score(), b.score());
    assert_eq!(a.bird().y, b.bird().y);
    let tops_a: Vec<f32> = a.generator().pipes().iter().map(|p| p.top).collect();
    let tops_b: Vec<f32> = b.generator().pipes().iter().map(|p| p.top).collect();
    assert_eq!(tops_a, tops_b);
}

#[test]
fn collected_coins_are_counted() {
    let mut game = playing_game(41);
    game.bird_mut().y = 300.0;
    assert!(game.generator_mut().try_place_coin(Vec2::new(BIRD_X + 40.0, 300.0)));

    for _ in 0..20 {
        game.update(1.0);
        let bird = game.bird_mut();
        bird.y = 300.0;
        bird.vy = 0.0;
    }

    assert_eq!(game.session_coins(), 1);
    assert!(
        game.drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::CoinCollected { total: 1, .. }))
    );
}
