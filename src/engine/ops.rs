use super::state::{Direction, GameOutcome, Grid, Score, Tile, SIZE, WINNING_TILE};

/// Slide/merge a single line toward index 0.
///
/// Zeros are squeezed out, each adjacent equal pair is merged once in a
/// single left-to-right pass (a freshly merged tile never merges again in
/// the same pass), the result is compacted again and padded with zeros.
/// Returns the new line and the sum of the merged values.
///
/// ```
/// use tilt_2048::engine::reduce;
/// assert_eq!(reduce([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
/// assert_eq!(reduce([0, 2, 0, 2]), ([4, 0, 0, 0], 4));
/// assert_eq!(reduce([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
/// ```
pub fn reduce<const N: usize>(line: [Tile; N]) -> ([Tile; N], Score) {
    let mut merged = compact(line);
    let mut gained: Score = 0;
    for i in 0..N.saturating_sub(1) {
        if merged[i] != 0 && merged[i] == merged[i + 1] {
            merged[i] *= 2;
            merged[i + 1] = 0;
            gained += Score::from(merged[i]);
        }
    }
    (compact(merged), gained)
}

/// Move non-zero tiles to the front, preserving order, and pad with zeros.
fn compact<const N: usize>(line: [Tile; N]) -> [Tile; N] {
    let mut out = [0; N];
    for (slot, tile) in out.iter_mut().zip(line.into_iter().filter(|&v| v != 0)) {
        *slot = tile;
    }
    out
}

/// `reduce` toward the far end: reverse, reduce, reverse back.
fn reduce_reversed<const N: usize>(mut line: [Tile; N]) -> ([Tile; N], Score) {
    line.reverse();
    let (mut out, gained) = reduce(line);
    out.reverse();
    (out, gained)
}

/// Slide/merge tiles in the given direction. No randomness.
pub fn shift(grid: Grid, direction: Direction) -> (Grid, Score) {
    debug_assert!(grid.is_valid(), "malformed grid passed to shift: {grid:?}");
    match direction {
        Direction::Left | Direction::Right => shift_rows(grid, direction),
        Direction::Up | Direction::Down => shift_cols(grid, direction),
    }
}

/// Apply a tilt to a (grid, score) pair.
///
/// Returns the new grid, the new score and whether the grid changed.
///
/// ```
/// use tilt_2048::engine::{tilt, Direction, Grid};
/// let g = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
/// let (next, score, merged) = tilt(g, 10, Direction::Left);
/// assert_eq!((next, score, merged), (g, 10, false));
/// ```
pub fn tilt(grid: Grid, score: Score, direction: Direction) -> (Grid, Score, bool) {
    let (next, gained) = shift(grid, direction);
    (next, score + gained, next != grid)
}

fn shift_rows(grid: Grid, direction: Direction) -> (Grid, Score) {
    let reduce_line: fn([Tile; SIZE]) -> ([Tile; SIZE], Score) = match direction {
        Direction::Left => reduce,
        Direction::Right => reduce_reversed,
        _ => unreachable!("shift_rows only handles left/right"),
    };
    let mut rows = grid.into_rows();
    let mut gained = 0;
    for row in rows.iter_mut() {
        let (line, line_gain) = reduce_line(*row);
        *row = line;
        gained += line_gain;
    }
    (Grid(rows), gained)
}

fn shift_cols(grid: Grid, direction: Direction) -> (Grid, Score) {
    let row_direction = match direction {
        Direction::Up => Direction::Left,
        Direction::Down => Direction::Right,
        _ => unreachable!("shift_cols only handles up/down"),
    };
    let (shifted, gained) = shift_rows(grid.transpose(), row_direction);
    (shifted.transpose(), gained)
}

/// `Won` if any tile reached 2048; otherwise `Lost` when the grid is full and
/// no two orthogonally adjacent tiles are equal; otherwise `InProgress`.
pub fn classify(grid: Grid) -> GameOutcome {
    if grid.rows().iter().flatten().any(|&v| v == WINNING_TILE) {
        return GameOutcome::Won;
    }
    if grid.is_full() && !has_adjacent_pair(grid) {
        return GameOutcome::Lost;
    }
    GameOutcome::InProgress
}

fn has_adjacent_pair(grid: Grid) -> bool {
    let rows = grid.rows();
    for r in 0..SIZE {
        for c in 0..SIZE {
            if c + 1 < SIZE && rows[r][c] == rows[r][c + 1] {
                return true;
            }
            if r + 1 < SIZE && rows[r][c] == rows[r + 1][c] {
                return true;
            }
        }
    }
    false
}

/// True if no move in any direction changes the grid, i.e. the player has
/// no legal move left. Hosts can use it to grey out input; unlike
/// [`classify`] it ignores whether 2048 was reached.
pub fn is_game_over(grid: Grid) -> bool {
    Direction::ALL.into_iter().all(|d| shift(grid, d).0 == grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: [[Tile; SIZE]; SIZE]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn it_reduce_left() {
        assert_eq!(reduce([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
        assert_eq!(reduce([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
        assert_eq!(reduce([2, 2, 4, 4]), ([4, 8, 0, 0], 12));
        assert_eq!(reduce([2, 0, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(reduce([0, 2, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(reduce([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(reduce([4, 2, 2, 0]), ([4, 4, 0, 0], 4));
        assert_eq!(reduce([8, 8, 16, 0]), ([16, 16, 0, 0], 16));
    }

    #[test]
    fn it_reduce_other_lengths() {
        assert_eq!(reduce::<0>([]), ([], 0));
        assert_eq!(reduce([2]), ([2], 0));
        assert_eq!(reduce([2, 2, 2, 0, 2, 4]), ([4, 4, 4, 0, 0, 0], 8));
    }

    #[test]
    fn it_reduce_reversed() {
        assert_eq!(reduce_reversed([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
        assert_eq!(reduce_reversed([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
        assert_eq!(reduce_reversed([2, 2, 4, 4]), ([0, 0, 4, 8], 12));
        assert_eq!(reduce_reversed([32, 0, 0, 32]), ([0, 0, 0, 64], 64));
        assert_eq!(reduce_reversed([0, 4, 4, 4]), ([0, 0, 4, 8], 8));
    }

    #[test]
    fn test_move_left() {
        let g = grid([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let (next, gained) = shift(g, Direction::Left);
        assert_eq!(next, grid([[2, 4, 8, 16], [2, 16, 4, 0], [8, 0, 0, 0], [2, 4, 0, 0]]));
        assert_eq!(gained, 24);
    }

    #[test]
    fn test_move_right() {
        let g = grid([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let (next, gained) = shift(g, Direction::Right);
        assert_eq!(next, grid([[2, 4, 8, 16], [0, 2, 16, 4], [0, 0, 0, 8], [0, 0, 2, 4]]));
        assert_eq!(gained, 24);
    }

    #[test]
    fn test_move_up() {
        let g = grid([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let (next, gained) = shift(g, Direction::Up);
        assert_eq!(next, grid([[2, 2, 8, 2], [4, 16, 0, 4], [8, 4, 0, 0], [16, 0, 0, 0]]));
        assert_eq!(gained, 24);
    }

    #[test]
    fn test_move_down() {
        let g = grid([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let (next, gained) = shift(g, Direction::Down);
        assert_eq!(next, grid([[2, 0, 0, 0], [4, 2, 0, 0], [8, 16, 0, 2], [16, 4, 8, 4]]));
        assert_eq!(gained, 24);
    }

    #[test]
    fn test_tilt_without_change() {
        let g = grid([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(tilt(g, 0, Direction::Left), (g, 0, false));
        assert_eq!(tilt(g, 0, Direction::Up), (g, 0, false));
        let (next, score, merged) = tilt(g, 0, Direction::Right);
        assert_eq!(next.rows()[0], [0, 0, 0, 2]);
        assert_eq!(score, 0);
        assert!(merged);
    }

    #[test]
    fn test_tilt_accumulates_score() {
        let g = grid([[0, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let (next, score, merged) = tilt(g, 100, Direction::Left);
        assert_eq!(next.rows()[0], [4, 0, 0, 0]);
        assert_eq!(score, 104);
        assert!(merged);
    }

    #[test]
    fn it_classifies() {
        assert_eq!(classify(Grid::EMPTY), GameOutcome::InProgress);
        let stuck = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(classify(stuck), GameOutcome::Lost);
        assert!(is_game_over(stuck));

        let won_and_full = grid([[2048, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(classify(won_and_full), GameOutcome::Won);
        assert!(is_game_over(won_and_full));

        let horizontal_pair = grid([[2, 2, 8, 4], [4, 8, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(classify(horizontal_pair), GameOutcome::InProgress);
        let vertical_pair = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 8], [4, 2, 4, 8]]);
        assert_eq!(classify(vertical_pair), GameOutcome::InProgress);

        let one_hole = grid([[0, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(classify(one_hole), GameOutcome::InProgress);
        assert!(!is_game_over(one_hole));
    }

    #[test]
    fn it_merges_up_to_the_largest_tile() {
        let g = grid([[1 << 16, 1 << 16, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let (next, score, merged) = tilt(g, 0, Direction::Left);
        assert_eq!(next.rows()[0], [1 << 17, 0, 0, 0]);
        assert_eq!(score, 1 << 17);
        assert!(merged);
        assert!(next.is_valid());
        assert_eq!(next.tile_sum(), g.tile_sum());
    }

    #[test]
    fn it_only_wins_on_exact_tile() {
        let beyond = grid([[4096, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(classify(beyond), GameOutcome::InProgress);
    }
}
