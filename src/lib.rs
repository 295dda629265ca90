//! tilt-2048: the board engine of the 2048 sliding-tile game
//!
//! This crate provides:
//! - A plain `Grid` type with pure operations (`shift`, `classify`, `with_random_tile`, ...)
//! - The single line reduction primitive [`engine::reduce`] behind all four tilts
//! - An owned `GameState` and a `Game` driver for hosts that feed directional input
//! - `GameConfig` for the spawn policy, placement strategy and RNG seed
//!
//! Quick start:
//! ```
//! use tilt_2048::engine::{self, Direction, Grid, Placement};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic grid initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = Grid::EMPTY
//!     .with_random_tile(&mut rng, Placement::EmptyCells)
//!     .with_random_tile(&mut rng, Placement::EmptyCells);
//! let (g1, score, merged) = engine::tilt(g0, 0, Direction::Left);
//! assert!(merged || g1 == g0);
//! assert!(score <= 8);
//! ```
//!
//! Full loop, as a presentation layer would drive it:
//! ```
//! use tilt_2048::{Direction, Game, GameConfig, GameOutcome};
//!
//! let config = GameConfig { seed: Some(7), ..GameConfig::default() };
//! let mut game = Game::from_config(config);
//! let mut moves = 0;
//! while game.outcome() == GameOutcome::InProgress && moves < 8 {
//!     let dir = Direction::ALL[moves % 4];
//!     game.apply(dir).unwrap();
//!     moves += 1;
//! }
//! let snapshot = game.snapshot();
//! assert!(snapshot.grid.highest_tile() >= 2);
//! ```

pub mod config;
pub mod engine;
pub mod game;

pub use config::{ConfigError, GameConfig, SpawnPolicy};
pub use engine::{Direction, GameOutcome, Grid, Placement, Score, Tile};
pub use game::{Game, GameError, GameState, Snapshot, Step};
