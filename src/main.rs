//! Flappy Zones entry point
//!
//! The browser build is driven from `web.rs`. Natively this runs a headless
//! session with a simple autopilot and prints the game-over summary as JSON.
//!
//! Usage: `flappy-zones [difficulty] [seed] [classic|advance]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_zones::consts::*;
    use flappy_zones::{Difficulty, Game, GameConfig, GameEvent, GameMode, GamePhase, MemoryStore};

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let difficulty = args
        .get(1)
        .and_then(|s| Difficulty::from_str(s))
        .unwrap_or_default();
    let seed = args.get(2).and_then(|s| s.parse::<u64>().ok());
    let mode = match args.get(3).map(String::as_str) {
        Some("classic") => GameMode::Classic,
        _ => GameMode::Advance,
    };

    let config = GameConfig {
        seed,
        mode,
        ..GameConfig::from_difficulty(difficulty)
    };
    log::info!(
        "Headless run: difficulty={} mode={}",
        difficulty.as_str(),
        mode.as_str()
    );

    let mut game = Game::new(config, Box::new(MemoryStore::default()));
    game.show_start();
    game.on_jump();

    // Ten simulated minutes at most
    let mut summary = None;
    for _ in 0..36_000 {
        if game.phase() == GamePhase::Playing {
            autopilot(&mut game);
        }
        game.update(1.0);
        for event in game.drain_events() {
            match event {
                GameEvent::ZoneChanged { zone, .. } => log::info!("Entered zone {zone}"),
                GameEvent::GameOver(s) => summary = Some(s),
                _ => {}
            }
        }
        if summary.is_some() {
            break;
        }
    }

    match summary {
        Some(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize summary: {e}"),
        },
        None => println!(
            "Survived: score={} distance={:.0}m",
            game.score(),
            game.distance()
        ),
    }

    /// Flap when the bird sinks below the middle of the next gap
    fn autopilot(game: &mut Game) {
        let bird = game.bird();
        let target = game
            .generator()
            .pipes()
            .iter()
            .find(|p| p.x + p.width > bird.x - bird.radius)
            .map(|p| p.top + p.gap * 0.6)
            .unwrap_or(GROUND_Y * 0.5);
        if bird.y > target && bird.vy >= 0.0 {
            game.on_jump();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::wasm_start`
}
