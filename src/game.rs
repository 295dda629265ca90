//! Owned game state and a driver that applies directional input serially.
//!
//! [`GameState`] is the (grid, score) pair. It is a plain value: tilting it
//! returns a new state. [`Game`] pairs a state with an RNG and a
//! [`GameConfig`], spawns tiles after tilts according to the configured
//! [`SpawnPolicy`] and refuses input once the outcome is terminal.
//!
//! ```
//! use tilt_2048::{Direction, Game, GameConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut game = Game::new(GameConfig::default(), StdRng::seed_from_u64(3));
//! assert_eq!(game.state().grid.count_empty(), 14);
//! let step = game.apply(Direction::Left).unwrap();
//! assert!(game.state().score >= step.score_delta);
//! ```

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, SpawnPolicy};
use crate::engine::{self, Direction, GameOutcome, Grid, Placement, Score, Spawn};

/// Grid plus accumulated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Grid,
    pub score: Score,
}

impl GameState {
    /// Empty grid, zero score, then two spawned tiles.
    pub fn initialize<R: Rng + ?Sized>(rng: &mut R, placement: Placement) -> Self {
        let grid = Grid::EMPTY.with_random_tile(rng, placement).with_random_tile(rng, placement);
        Self { grid, score: 0 }
    }

    /// Tilt without spawning. Returns the new state and whether the grid changed.
    pub fn apply(self, direction: Direction) -> (Self, bool) {
        let (grid, score, merged) = engine::tilt(self.grid, self.score, direction);
        (Self { grid, score }, merged)
    }

    #[inline]
    pub fn outcome(&self) -> GameOutcome {
        engine::classify(self.grid)
    }
}

/// What one accepted directional input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub direction: Direction,
    /// The tilt changed the grid.
    pub merged: bool,
    pub score_delta: Score,
    pub spawned: Option<Spawn>,
    pub outcome: GameOutcome,
}

/// Everything a presentation layer needs to render the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub score: Score,
    pub outcome: GameOutcome,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("game over ({0}); start a new game to keep playing")]
    Finished(GameOutcome),
}

/// A single game: state, tile RNG and settings.
pub struct Game<R = StdRng> {
    state: GameState,
    outcome: GameOutcome,
    config: GameConfig,
    rng: R,
}

impl Game<StdRng> {
    /// Seed `StdRng` from `config.seed`, or from OS entropy when unset.
    pub fn from_config(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, rng)
    }
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, mut rng: R) -> Self {
        let state = GameState::initialize(&mut rng, config.placement);
        let outcome = state.outcome();
        Self { state, outcome, config, rng }
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { grid: self.state.grid, score: self.state.score, outcome: self.outcome }
    }

    /// Tilt, spawn per policy, then reclassify.
    pub fn apply(&mut self, direction: Direction) -> Result<Step, GameError> {
        if self.outcome.is_terminal() {
            return Err(GameError::Finished(self.outcome));
        }
        let (tilted, merged) = self.state.apply(direction);
        let spawn_now = match self.config.spawn_policy {
            SpawnPolicy::Always => true,
            SpawnPolicy::OnChange => merged,
        };
        let (grid, spawned) = if spawn_now {
            engine::spawn_tile(tilted.grid, &mut self.rng, self.config.placement)
        } else {
            (tilted.grid, None)
        };
        let score_delta = tilted.score - self.state.score;
        self.state = GameState { grid, score: tilted.score };
        self.outcome = self.state.outcome();

        debug!(
            "{direction}: merged={merged} score_delta={score_delta} spawned={spawned:?} outcome={}",
            self.outcome
        );
        if self.outcome.is_terminal() {
            info!("game {} with score {} (highest tile {})", self.outcome, self.state.score, grid.highest_tile());
        }
        Ok(Step { direction, merged, score_delta, spawned, outcome: self.outcome })
    }

    /// Parse a host input token and apply it. Tokens that do not name a
    /// direction are ignored: no transition, no spawn.
    pub fn handle_input(&mut self, input: &str) -> Result<Option<Step>, GameError> {
        match input.parse::<Direction>() {
            Ok(direction) => self.apply(direction).map(Some),
            Err(e) => {
                trace!("ignoring input: {e}");
                Ok(None)
            }
        }
    }

    /// Discard the current game and start a fresh one.
    pub fn restart(&mut self) {
        self.state = GameState::initialize(&mut self.rng, self.config.placement);
        self.outcome = self.state.outcome();
        info!("new game");
    }
}
