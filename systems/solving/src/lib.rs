#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateless breadth-first path solving system.
//!
//! [`shortest_path`] computes the fewest-cells route from a start cell to
//! the nearest member of an exit set. The [`Solving`] wrapper reacts to
//! [`Event::PathNeeded`] broadcasts and answers with [`Command::SetPath`],
//! recomputing from scratch on every request rather than patching paths
//! incrementally.

use std::collections::VecDeque;

use maze_rover_core::{Command, Event, Grid, GridCoord};
use thiserror::Error;

/// Rejected solver invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The start cell is out of bounds or a wall. The navigator only ever
    /// occupies open cells, so this indicates a desync between the caller
    /// and the grid.
    #[error(
        "path solving must start on an open cell, got ({row}, {col})",
        row = .cell.row(),
        col = .cell.col()
    )]
    InvalidStart {
        /// Rejected start coordinate.
        cell: GridCoord,
    },
}

/// Computes the shortest path from `start` to the nearest cell of `exits`.
///
/// Breadth-first search over 4-connected open cells: cells are marked
/// visited when enqueued, exit membership is tested when a cell is popped,
/// and neighbors expand in the fixed order down, right, left, up so that
/// equal-length paths resolve the same way on every run. The returned
/// sequence runs from `start` to the reached exit inclusive; a start that is
/// itself an exit yields a single-element path. When no exit is reachable
/// the result is an empty sequence, a recoverable signal rather than an
/// error.
pub fn shortest_path(
    grid: &Grid,
    exits: &[GridCoord],
    start: GridCoord,
) -> Result<Vec<GridCoord>, SolveError> {
    if !grid.is_open(start) {
        return Err(SolveError::InvalidStart { cell: start });
    }

    let width = usize::try_from(grid.cols()).unwrap_or(0);
    let height = usize::try_from(grid.rows()).unwrap_or(0);
    let cell_count = width.checked_mul(height).unwrap_or(0);

    let mut visited = vec![false; cell_count];
    let mut parents: Vec<Option<GridCoord>> = vec![None; cell_count];
    let mut frontier = VecDeque::new();

    if let Some(index) = index(width, start) {
        visited[index] = true;
    }
    frontier.push_back(start);

    while let Some(cell) = frontier.pop_front() {
        if exits.contains(&cell) {
            return Ok(reconstruct(&parents, width, start, cell));
        }

        for neighbor in neighbors_in_order(cell, grid.rows(), grid.cols()) {
            if !grid.is_open(neighbor) {
                continue;
            }
            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };
            if visited[neighbor_index] {
                continue;
            }
            visited[neighbor_index] = true;
            parents[neighbor_index] = Some(cell);
            frontier.push_back(neighbor);
        }
    }

    Ok(Vec::new())
}

/// Walks the parent pointers from the reached exit back to the start.
fn reconstruct(
    parents: &[Option<GridCoord>],
    width: usize,
    start: GridCoord,
    exit: GridCoord,
) -> Vec<GridCoord> {
    let mut path = vec![exit];
    let mut cell = exit;
    while cell != start {
        let parent = index(width, cell)
            .and_then(|offset| parents.get(offset).copied())
            .flatten();
        let Some(parent) = parent else {
            break;
        };
        path.push(parent);
        cell = parent;
    }
    path.reverse();
    path
}

/// Neighbor expansion order fixing the tie-break among equal-length paths:
/// (row+1, col), (row, col+1), (row, col−1), (row−1, col).
fn neighbors_in_order(cell: GridCoord, rows: u32, cols: u32) -> NeighborIter {
    let mut neighbors = NeighborIter::default();

    if cell.row() + 1 < rows {
        neighbors.push(GridCoord::new(cell.row() + 1, cell.col()));
    }
    if cell.col() + 1 < cols {
        neighbors.push(GridCoord::new(cell.row(), cell.col() + 1));
    }
    if cell.col() > 0 {
        neighbors.push(GridCoord::new(cell.row(), cell.col() - 1));
    }
    if cell.row() > 0 {
        neighbors.push(GridCoord::new(cell.row() - 1, cell.col()));
    }

    neighbors
}

#[derive(Clone, Debug, Default)]
struct NeighborIter {
    buffer: [Option<GridCoord>; 4],
    len: usize,
    cursor: usize,
}

impl NeighborIter {
    fn push(&mut self, cell: GridCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for NeighborIter {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

fn index(width: usize, cell: GridCoord) -> Option<usize> {
    let row = usize::try_from(cell.row()).ok()?;
    let col = usize::try_from(cell.col()).ok()?;
    row.checked_mul(width)?.checked_add(col)
}

/// Pure system that answers path requests with freshly solved paths.
#[derive(Debug, Default)]
pub struct Solving;

impl Solving {
    /// Consumes world events and immutable views to emit path commands.
    pub fn handle(
        &self,
        events: &[Event],
        grid: &Grid,
        exits: &[GridCoord],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PathNeeded { from } = event {
                match shortest_path(grid, exits, *from) {
                    Ok(cells) => out.push(Command::SetPath { cells }),
                    Err(desync) => {
                        debug_assert!(false, "navigator desynced from grid: {desync}");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_rover_core::CellState;

    /// Builds a grid from rows of `#` (wall) and `.` (open).
    fn grid_from_rows(rows: &[&str]) -> Grid {
        let height = u32::try_from(rows.len()).expect("row count");
        let width = u32::try_from(rows[0].len()).expect("column count");
        let mut grid = Grid::filled(height, width, CellState::Wall);
        for (row, line) in rows.iter().enumerate() {
            for (col, glyph) in line.chars().enumerate() {
                if glyph == '.' {
                    let row = u32::try_from(row).expect("row index");
                    let col = u32::try_from(col).expect("column index");
                    grid.set(GridCoord::new(row, col), CellState::Open);
                }
            }
        }
        grid
    }

    #[test]
    fn follows_a_single_corridor_to_the_exit() {
        let grid = grid_from_rows(&[
            "#####", //
            "#...#", //
            "###.#", //
            "#...#", //
            "#####",
        ]);
        let exits = [GridCoord::new(3, 1)];

        let path = shortest_path(&grid, &exits, GridCoord::new(1, 1)).expect("open start");

        assert_eq!(
            path,
            vec![
                GridCoord::new(1, 1),
                GridCoord::new(1, 2),
                GridCoord::new(1, 3),
                GridCoord::new(2, 3),
                GridCoord::new(3, 3),
                GridCoord::new(3, 2),
                GridCoord::new(3, 1),
            ]
        );
    }

    #[test]
    fn equal_length_routes_resolve_downward_first() {
        // Open 3x3 room: two shortest routes to the opposite corner; the
        // fixed expansion order commits to the row-increasing one.
        let grid = grid_from_rows(&[
            "#####", //
            "#...#", //
            "#...#", //
            "#...#", //
            "#####",
        ]);
        let exits = [GridCoord::new(3, 3)];

        let path = shortest_path(&grid, &exits, GridCoord::new(1, 1)).expect("open start");

        assert_eq!(
            path,
            vec![
                GridCoord::new(1, 1),
                GridCoord::new(2, 1),
                GridCoord::new(3, 1),
                GridCoord::new(3, 2),
                GridCoord::new(3, 3),
            ]
        );
    }

    #[test]
    fn nearest_of_several_exits_wins() {
        let grid = grid_from_rows(&[
            "#####", //
            "#...#", //
            "#.#.#", //
            "#...#", //
            "#####",
        ]);
        let far = GridCoord::new(3, 3);
        let near = GridCoord::new(1, 3);

        let path =
            shortest_path(&grid, &[far, near], GridCoord::new(1, 1)).expect("open start");

        assert_eq!(path.last(), Some(&near));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn start_on_an_exit_returns_a_single_cell() {
        let grid = grid_from_rows(&["###", "#.#", "###"]);
        let start = GridCoord::new(1, 1);
        let path = shortest_path(&grid, &[start], start).expect("open start");
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn unreachable_exits_yield_an_empty_path() {
        let grid = grid_from_rows(&[
            "#####", //
            "#.#.#", //
            "#####",
        ]);
        let sealed_off = GridCoord::new(1, 3);

        let path =
            shortest_path(&grid, &[sealed_off], GridCoord::new(1, 1)).expect("open start");
        assert!(path.is_empty());

        let no_exits = shortest_path(&grid, &[], GridCoord::new(1, 1)).expect("open start");
        assert!(no_exits.is_empty());
    }

    #[test]
    fn wall_or_out_of_bounds_start_is_rejected() {
        let grid = grid_from_rows(&["###", "#.#", "###"]);
        assert_eq!(
            shortest_path(&grid, &[], GridCoord::new(0, 0)),
            Err(SolveError::InvalidStart {
                cell: GridCoord::new(0, 0),
            })
        );
        assert_eq!(
            shortest_path(&grid, &[], GridCoord::new(9, 9)),
            Err(SolveError::InvalidStart {
                cell: GridCoord::new(9, 9),
            })
        );
    }

    #[test]
    fn system_answers_path_requests_with_set_path() {
        let grid = grid_from_rows(&["###", "#.#", "###"]);
        let start = GridCoord::new(1, 1);
        let solving = Solving;
        let mut commands = Vec::new();

        solving.handle(
            &[
                Event::TimeAdvanced {
                    dt: std::time::Duration::from_millis(16),
                },
                Event::PathNeeded { from: start },
            ],
            &grid,
            &[start],
            &mut commands,
        );

        assert_eq!(
            commands,
            vec![Command::SetPath {
                cells: vec![start],
            }]
        );
    }
}
