//! Gameplay simulation
//!
//! Everything here is platform-free:
//! - Time arrives as a normalized `dt` ratio (1.0 = one 60 Hz frame)
//! - All procedural choices use the generator's seeded RNG
//! - No rendering, audio or storage calls (storage goes through `ProgressStore`)

pub mod bird;
pub mod clock;
pub mod collision;
pub mod events;
pub mod game;
pub mod hazard;
pub mod level;
pub mod pattern;
pub mod pipes;

pub use bird::{Bird, BirdContact, NitroKind, NitroTank};
pub use clock::FrameClock;
pub use collision::{Aabb, CollisionReport, resolve_collisions};
pub use events::{EventQueue, GameEvent, GameOverSummary};
pub use game::{Game, GamePhase, Snapshot};
pub use hazard::{Hazard, HazardKind, Lifecycle, Species};
pub use level::{LevelGenerator, Theme};
pub use pattern::{Pattern, Sequencer};
pub use pipes::{Coin, Pipe, PipeManager};
