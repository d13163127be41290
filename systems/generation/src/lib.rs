#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic maze generation system.
//!
//! Carves a perfect maze with randomized backtracking over the odd-coordinate
//! cell lattice, then punches extra exits through the border. The same seed
//! always yields the same [`MazeLayout`].

use maze_rover_core::{CellState, GeneratorConfig, Grid, GridCoord, MazeLayout};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Cell every generated maze starts from.
pub const START_CELL: GridCoord = GridCoord::new(1, 1);

/// Two-step offsets between neighboring passage cells. Passages live on odd
/// coordinates; the cell halfway between two passages is the wall to carve.
const TWO_STEP_DIRECTIONS: [(i64, i64); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// Generates a maze layout from the validated configuration and seed.
///
/// The grid comes out as a spanning tree over the odd-coordinate cells:
/// fully connected, no cycles. The primary exit at (rows − 2, cols − 2) is
/// always present; up to `extra_exits` additional border cells adjacent to a
/// carved corridor are opened afterwards. Requesting more extra exits than
/// the border offers carves all available candidates.
#[must_use]
pub fn generate(config: &GeneratorConfig, seed: u64) -> MazeLayout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = Grid::filled(config.rows(), config.cols(), CellState::Wall);

    carve_passages(&mut grid, START_CELL, &mut rng);

    let primary_exit = GridCoord::new(config.rows() - 2, config.cols() - 2);
    let mut exits = vec![primary_exit];
    carve_extra_exits(&mut grid, config.extra_exits(), &mut rng, &mut exits);

    MazeLayout::new(grid, exits, START_CELL)
}

/// Randomized backtracking over an explicit stack.
///
/// Each visited cell shuffles the two-step directions and descends into the
/// first unvisited in-border candidate, opening the wall cell in between.
/// When no candidate remains the cell is popped. The visited set grows
/// strictly, so the walk always terminates.
fn carve_passages(grid: &mut Grid, start: GridCoord, rng: &mut ChaCha8Rng) {
    let mut visited = VisitedSet::new(grid.rows(), grid.cols());
    let mut stack = vec![start];
    visited.mark(start);
    grid.set(start, CellState::Open);

    while let Some(&cell) = stack.last() {
        let mut directions = TWO_STEP_DIRECTIONS;
        directions.shuffle(rng);

        let mut descended = false;
        for (row_delta, col_delta) in directions {
            let Some(next) = offset_cell(cell, row_delta, col_delta) else {
                continue;
            };
            if !strictly_inside_border(grid, next) || visited.contains(next) {
                continue;
            }
            let Some(between) = offset_cell(cell, row_delta / 2, col_delta / 2) else {
                continue;
            };

            grid.set(between, CellState::Open);
            grid.set(next, CellState::Open);
            visited.mark(next);
            stack.push(next);
            descended = true;
            break;
        }

        if !descended {
            let _ = stack.pop();
        }
    }
}

/// Opens up to `count` border wall cells that sit next to a carved corridor,
/// recording each as an exit.
fn carve_extra_exits(
    grid: &mut Grid,
    count: u32,
    rng: &mut ChaCha8Rng,
    exits: &mut Vec<GridCoord>,
) {
    let mut candidates = border_exit_candidates(grid);
    candidates.shuffle(rng);

    let requested = usize::try_from(count).unwrap_or(usize::MAX);
    for cell in candidates.into_iter().take(requested) {
        grid.set(cell, CellState::Open);
        exits.push(cell);
    }
}

/// Border wall cells directly adjacent to an open interior cell, the only
/// places where an exit connects to the maze.
fn border_exit_candidates(grid: &Grid) -> Vec<GridCoord> {
    let rows = grid.rows();
    let cols = grid.cols();
    let mut candidates = Vec::new();
    let consider = |border: GridCoord, inside: GridCoord, out: &mut Vec<GridCoord>| {
        if grid.cell(border) == Some(CellState::Wall) && grid.is_open(inside) {
            out.push(border);
        }
    };

    for row in 1..rows - 1 {
        consider(GridCoord::new(row, 0), GridCoord::new(row, 1), &mut candidates);
        consider(
            GridCoord::new(row, cols - 1),
            GridCoord::new(row, cols - 2),
            &mut candidates,
        );
    }
    for col in 1..cols - 1 {
        consider(GridCoord::new(0, col), GridCoord::new(1, col), &mut candidates);
        consider(
            GridCoord::new(rows - 1, col),
            GridCoord::new(rows - 2, col),
            &mut candidates,
        );
    }

    candidates
}

fn strictly_inside_border(grid: &Grid, cell: GridCoord) -> bool {
    cell.row() >= 1
        && cell.row() + 1 < grid.rows()
        && cell.col() >= 1
        && cell.col() + 1 < grid.cols()
}

fn offset_cell(cell: GridCoord, row_delta: i64, col_delta: i64) -> Option<GridCoord> {
    let row = i64::from(cell.row()).checked_add(row_delta)?;
    let col = i64::from(cell.col()).checked_add(col_delta)?;
    let row = u32::try_from(row).ok()?;
    let col = u32::try_from(col).ok()?;
    Some(GridCoord::new(row, col))
}

/// Dense row-major visited bookkeeping for the carving walk.
#[derive(Debug)]
struct VisitedSet {
    cols: usize,
    cells: Vec<bool>,
}

impl VisitedSet {
    fn new(rows: u32, cols: u32) -> Self {
        let rows = usize::try_from(rows).unwrap_or(0);
        let cols = usize::try_from(cols).unwrap_or(0);
        Self {
            cols,
            cells: vec![false; rows * cols],
        }
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        let row = usize::try_from(cell.row()).ok()?;
        let col = usize::try_from(cell.col()).ok()?;
        row.checked_mul(self.cols)?.checked_add(col)
    }

    fn mark(&mut self, cell: GridCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = true;
            }
        }
    }

    fn contains(&self, cell: GridCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }
}
