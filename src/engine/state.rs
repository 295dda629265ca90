use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ops;
use super::spawn::{self, Placement};

pub type Tile = u32;
pub type Score = u64;

/// Side length of the (square) grid.
pub const SIZE: usize = 4;

/// Reaching this tile wins the game.
pub const WINNING_TILE: Tile = 2048;

/// Largest tile a 4x4 game can produce (2^17). Larger values are rejected.
pub const MAX_TILE: Tile = 1 << 17;

type Rows = [[Tile; SIZE]; SIZE];

/// A direction to slide/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(s)
    }
}

/// Input token that does not name a direction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts direction names, browser arrow key codes, vi keys and WASD.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "k" | "w" => Ok(Direction::Up),
            "down" | "arrowdown" | "j" | "s" => Ok(Direction::Down),
            "left" | "arrowleft" | "h" | "a" => Ok(Direction::Left),
            "right" | "arrowright" | "l" | "d" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Classification of a grid after a tilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameOutcome {
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    /// `Won` and `Lost` end the game.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameOutcome::InProgress => "in progress",
            GameOutcome::Won => "won",
            GameOutcome::Lost => "lost",
        };
        f.write_str(s)
    }
}

/// Rejected grid data coming from outside the engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("expected 4 rows, got {0}")]
    RowCount(usize),
    #[error("row {row} has {len} cells, expected 4")]
    RowLength { row: usize, len: usize },
    #[error("cell ({row}, {col}) holds {value}, which is neither 0 nor a power of two up to 131072")]
    BadTile { row: usize, col: usize, value: Tile },
}

/// 4x4 2048 grid of tile values, row-major. `0` marks an empty cell.
///
/// Grids are plain `Copy` values: every operation returns a new grid and
/// leaves the receiver untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Tile>>", into = "Vec<Vec<Tile>>")]
pub struct Grid(pub(crate) Rows);

impl Grid {
    /// A constant empty grid (all zeros).
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    /// Build a grid from rows, rejecting values that are not 0 or a power of
    /// two up to [`MAX_TILE`].
    ///
    /// ```
    /// use tilt_2048::engine::Grid;
    /// let g = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]).unwrap();
    /// assert_eq!(g.count_empty(), 14);
    /// assert!(Grid::from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    /// ```
    pub fn from_rows(rows: Rows) -> Result<Self, GridError> {
        for (row, cells) in rows.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(GridError::BadTile { row, col, value });
                }
            }
        }
        Ok(Grid(rows))
    }

    /// Borrow the rows.
    #[inline]
    pub fn rows(&self) -> &Rows {
        &self.0
    }

    /// Consume this grid, returning its rows.
    #[inline]
    pub fn into_rows(self) -> Rows {
        self.0
    }

    /// Tile value at (`row`, `col`), 0 if empty. Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.0[row][col]
    }

    /// True if every cell is 0 or a power of two between 2 and [`MAX_TILE`].
    pub fn is_valid(&self) -> bool {
        self.0.iter().flatten().all(|&v| is_valid_tile(v))
    }

    /// Count the number of empty cells.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.0.iter().flatten().filter(|&&v| v == 0).count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count_empty() == 0
    }

    /// Coordinates of every empty cell in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(SIZE * SIZE);
        for (r, row) in self.0.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v == 0 {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    /// Return the highest tile value present (0 for an empty grid).
    pub fn highest_tile(&self) -> Tile {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values. Sliding and merging preserve it.
    pub fn tile_sum(&self) -> u64 {
        self.0.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    /// Swap rows and columns.
    pub fn transpose(self) -> Self {
        let mut out = [[0; SIZE]; SIZE];
        for (r, row) in self.0.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                out[c][r] = v;
            }
        }
        Grid(out)
    }

    /// Reverse every row (left-right reflection).
    pub fn mirror(self) -> Self {
        let mut out = self.0;
        for row in out.iter_mut() {
            row.reverse();
        }
        Grid(out)
    }

    /// Slide/merge tiles in `dir` (no random insert). Returns the new grid and
    /// the score gained from merges.
    ///
    /// ```
    /// use tilt_2048::engine::{Direction, Grid};
    /// let g = Grid::from_rows([[0, 2, 2, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let (next, gained) = g.shift(Direction::Left);
    /// assert_eq!(next.rows()[0], [4, 0, 0, 0]);
    /// assert_eq!(gained, 4);
    /// ```
    #[inline]
    pub fn shift(self, dir: Direction) -> (Self, Score) {
        ops::shift(self, dir)
    }

    /// Classify this grid as won, lost or still in progress.
    #[inline]
    pub fn classify(self) -> GameOutcome {
        ops::classify(self)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty cell.
    /// A full grid is returned unchanged.
    ///
    /// ```
    /// use tilt_2048::engine::{Grid, Placement};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let g = Grid::EMPTY
    ///     .with_random_tile(&mut rng, Placement::EmptyCells)
    ///     .with_random_tile(&mut rng, Placement::EmptyCells);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R, placement: Placement) -> Self {
        spawn::spawn_tile(self, rng, placement).0
    }

    #[inline]
    pub(crate) fn with_tile(mut self, row: usize, col: usize, value: Tile) -> Self {
        self.0[row][col] = value;
        self
    }
}

#[inline]
fn is_valid_tile(value: Tile) -> bool {
    value == 0 || (value >= 2 && value <= MAX_TILE && value.is_power_of_two())
}

impl TryFrom<Vec<Vec<Tile>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        if rows.len() != SIZE {
            return Err(GridError::RowCount(rows.len()));
        }
        let mut out = [[0; SIZE]; SIZE];
        for (r, cells) in rows.iter().enumerate() {
            if cells.len() != SIZE {
                return Err(GridError::RowLength { row: r, len: cells.len() });
            }
            out[r].copy_from_slice(cells);
        }
        Grid::from_rows(out)
    }
}

impl From<Grid> for Vec<Vec<Tile>> {
    fn from(grid: Grid) -> Self {
        grid.0.iter().map(|row| row.to_vec()).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{:^7}", x),
    }
}
