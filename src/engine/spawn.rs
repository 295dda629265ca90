use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::state::{Grid, Tile, SIZE};
use crate::config::ParseChoiceError;

/// Uniform draw from this table gives 2 with p=0.9 and 4 with p=0.1.
const TILE_TABLE: [Tile; 10] = [2, 2, 2, 2, 2, 2, 2, 2, 2, 4];

/// How the empty cell for a new tile is chosen. Both give every empty cell
/// the same probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Draw random (row, col) pairs until one is empty.
    Rejection,
    /// Draw once from the list of empty cells.
    #[default]
    EmptyCells,
}

impl FromStr for Placement {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rejection" => Ok(Placement::Rejection),
            "empty-cells" => Ok(Placement::EmptyCells),
            _ => Err(ParseChoiceError::new("placement", s, "rejection, empty-cells")),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Placement::Rejection => "rejection",
            Placement::EmptyCells => "empty-cells",
        })
    }
}

/// A tile placed by [`spawn_tile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
}

/// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
///
/// A full grid comes back unchanged with `None`. Occupied cells are never
/// overwritten.
pub fn spawn_tile<R: Rng + ?Sized>(grid: Grid, rng: &mut R, placement: Placement) -> (Grid, Option<Spawn>) {
    debug_assert!(grid.is_valid(), "malformed grid passed to spawn_tile: {grid:?}");
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return (grid, None);
    }
    let (row, col) = match placement {
        Placement::Rejection => loop {
            let row = rng.gen_range(0..SIZE);
            let col = rng.gen_range(0..SIZE);
            if grid.get(row, col) == 0 {
                break (row, col);
            }
        },
        Placement::EmptyCells => empty[rng.gen_range(0..empty.len())],
    };
    let tile = generate_random_tile(rng);
    (grid.with_tile(row, col, tile), Some(Spawn { row, col, tile }))
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    TILE_TABLE[rng.gen_range(0..TILE_TABLE.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FULL: [[Tile; SIZE]; SIZE] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

    #[test]
    fn it_fills_the_grid() {
        for placement in [Placement::Rejection, Placement::EmptyCells] {
            let mut rng = StdRng::seed_from_u64(7);
            let mut grid = Grid::EMPTY;
            for placed in 1..=16 {
                let (next, spawn) = spawn_tile(grid, &mut rng, placement);
                let spawn = spawn.unwrap();
                assert_eq!(grid.get(spawn.row, spawn.col), 0);
                assert_eq!(next.get(spawn.row, spawn.col), spawn.tile);
                assert_eq!(16 - next.count_empty(), placed);
                grid = next;
            }
            assert!(grid.is_full());
            assert!(grid.is_valid());
        }
    }

    #[test]
    fn it_is_a_no_op_on_full_grid() {
        let full = Grid::from_rows(FULL).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for placement in [Placement::Rejection, Placement::EmptyCells] {
            assert_eq!(spawn_tile(full, &mut rng, placement), (full, None));
        }
    }

    #[test]
    fn it_finds_the_last_hole() {
        let mut rows = FULL;
        rows[3][1] = 0;
        let grid = Grid::from_rows(rows).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        for placement in [Placement::Rejection, Placement::EmptyCells] {
            let (next, spawn) = spawn_tile(grid, &mut rng, placement);
            let spawn = spawn.unwrap();
            assert_eq!((spawn.row, spawn.col), (3, 1));
            assert!(next.is_full());
        }
    }

    #[test]
    fn it_draws_mostly_twos() {
        let mut rng = StdRng::seed_from_u64(2048);
        let draws = 10_000;
        let fours = (0..draws).filter(|_| generate_random_tile(&mut rng) == 4).count();
        assert!(fours > 800 && fours < 1200, "fours = {fours}");
    }

    #[test]
    fn it_spreads_over_empty_cells() {
        for placement in [Placement::Rejection, Placement::EmptyCells] {
            let mut rng = StdRng::seed_from_u64(5);
            let mut hits = [[0u32; SIZE]; SIZE];
            for _ in 0..16_000 {
                let (_, spawn) = spawn_tile(Grid::EMPTY, &mut rng, placement);
                let spawn = spawn.unwrap();
                hits[spawn.row][spawn.col] += 1;
            }
            for &count in hits.iter().flatten() {
                assert!(count > 800 && count < 1200, "{placement}: {count}");
            }
        }
    }

    #[test]
    fn it_parses_placement() {
        assert_eq!("rejection".parse(), Ok(Placement::Rejection));
        assert_eq!("empty-cells".parse(), Ok(Placement::EmptyCells));
        assert!("random".parse::<Placement>().is_err());
    }
}
