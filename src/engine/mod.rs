//! Engine module: the 4x4 grid, the slide/merge reduction, tilts in all four
//! directions, random tile spawning and outcome classification.
//!
//! - `Grid` is the plain tile-value state with useful methods.
//! - Free functions mirror the methods when convenient (e.g., `tilt`, `classify`).
//! - Every direction goes through the single [`reduce`] primitive: rows are
//!   reversed for Right, and columns are handled by transposing the grid.

mod ops;
pub mod spawn;
pub mod state;

pub use state::{Direction, GameOutcome, Grid, GridError, ParseDirectionError, Score, Tile, MAX_TILE, SIZE, WINNING_TILE};

pub use ops::{classify, is_game_over, reduce, shift, tilt};
pub use spawn::{spawn_tile, Placement, Spawn};
